use anyhow::{bail, Result};
use tracing::warn;

use crate::error::Error;
use crate::menu::{Launcher, MenuRequest};

/// How a menu reply relates to the rows that were offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Item,
    Back,
    Invalid,
}

/// Offered rows take precedence over the back sentinel, and the sentinel
/// only counts on screens that offered it.
pub fn classify(reply: &str, items: &[String], allow_back: bool, back_label: &str) -> Reply {
    if items.iter().any(|item| item == reply) {
        Reply::Item
    } else if allow_back && reply == back_label {
        Reply::Back
    } else {
        Reply::Invalid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picked {
    Item(String),
    Back,
}

#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub prompt: &'a str,
    pub mesg: &'a str,
    pub back: bool,
}

/// Ordered rows paired with what picking them does. Order is display order.
#[derive(Debug, Clone)]
pub struct MenuOptions<A> {
    entries: Vec<(String, A)>,
}

impl<A> Default for MenuOptions<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: Clone> MenuOptions<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, action: A) {
        self.entries.push((label.into(), action));
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn action(&self, label: &str) -> Option<A> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, action)| action.clone())
    }
}

/// The only place that waits on the user.
pub struct Gate<'a> {
    launcher: &'a dyn Launcher,
}

impl<'a> Gate<'a> {
    pub fn new(launcher: &'a dyn Launcher) -> Self {
        Self { launcher }
    }

    /// Shows `items` and validates the reply. A reply that was never offered
    /// is reported to the user and ends the navigation.
    pub fn present(&self, items: &[String], prompt: Prompt<'_>) -> Result<Picked> {
        let reply = self.launcher.show(&MenuRequest {
            items,
            prompt: prompt.prompt,
            back: prompt.back,
            mesg: prompt.mesg,
        })?;

        match classify(&reply, items, prompt.back, self.launcher.back_label()) {
            Reply::Item => Ok(Picked::Item(reply)),
            Reply::Back => Ok(Picked::Back),
            Reply::Invalid => {
                warn!(option = %reply, "option not found");
                self.notice(&format!("Option '{reply}' selected not found."))?;
                bail!(Error::InvalidSelection(reply))
            }
        }
    }

    pub fn choose<A: Clone>(&self, options: &MenuOptions<A>, prompt: Prompt<'_>) -> Result<Option<A>> {
        match self.present(&options.labels(), prompt)? {
            Picked::Back => Ok(None),
            Picked::Item(label) => match options.action(&label) {
                Some(action) => Ok(Some(action)),
                None => bail!(Error::InvalidSelection(label)),
            },
        }
    }

    /// Single-row informational screen. Dismissing it with Esc acknowledges
    /// it; Ctrl-C still unwinds.
    pub fn notice(&self, message: &str) -> Result<()> {
        let items = [message.to_string()];
        match self.launcher.show(&MenuRequest::notice(&items, "twitch:")) {
            Ok(_) => Ok(()),
            Err(err) if matches!(err.downcast_ref::<Error>(), Some(Error::Dismissed)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}
