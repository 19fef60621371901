use std::process::{Command, Stdio};
use std::thread;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;

const URL_PLACEHOLDER: &str = "%URL%";
const APP_NAME: &str = "twitch-menu";

/// Fire-and-forget side effects. Neither call waits for the external program
/// and neither reports failure back to the caller.
pub trait Effects: Send + Sync {
    fn notify(&self, message: &str);
    fn launch(&self, target: &str);
}

pub struct Executor {
    player: Vec<String>,
    notify: bool,
}

impl Executor {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            player: cfg.command.clone(),
            notify: cfg.notify,
        }
    }

    pub fn player_name(&self) -> &str {
        self.player.first().map(String::as_str).unwrap_or("browser")
    }
}

impl Effects for Executor {
    fn notify(&self, message: &str) {
        if !self.notify {
            return;
        }
        let argv = vec![
            "notify-send".to_string(),
            "-a".to_string(),
            APP_NAME.to_string(),
            APP_NAME.to_string(),
            message.to_string(),
        ];
        spawn_detached(argv);
    }

    fn launch(&self, target: &str) {
        info!(url = target, player = self.player_name(), "opening");
        if self.player.is_empty() {
            let url = target.to_string();
            thread::spawn(move || {
                if let Err(err) = webbrowser::open(&url) {
                    warn!(%url, error = %err, "failed to open in browser");
                }
            });
            return;
        }
        spawn_detached(player_argv(&self.player, target));
    }
}

/// Substitutes the placeholder, or appends the target when there is none.
pub fn player_argv(command: &[String], target: &str) -> Vec<String> {
    let mut argv: Vec<String> = command
        .iter()
        .map(|arg| arg.replace(URL_PLACEHOLDER, target))
        .collect();
    if !command.iter().any(|arg| arg.contains(URL_PLACEHOLDER)) {
        argv.push(target.to_string());
    }
    argv
}

fn spawn_detached(argv: Vec<String>) {
    thread::spawn(move || {
        if let Err(err) = run_to_exit(&argv) {
            let reason = format!("{err:#}");
            warn!(command = ?argv, error = %reason, "side effect failed");
        }
    });
}

// Runs on a helper thread so the child is reaped without holding up the menu.
fn run_to_exit(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("empty command"))?;
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("launch {program}"))?;
    debug!(%program, %status, "side effect finished");
    if !status.success() {
        return Err(anyhow!("{program} exited with {status}"));
    }
    Ok(())
}
