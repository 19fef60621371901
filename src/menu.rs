use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

use crate::config::MenuConfig;
use crate::error::Error;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy)]
pub struct MenuRequest<'a> {
    pub items: &'a [String],
    pub prompt: &'a str,
    pub back: bool,
    pub mesg: &'a str,
}

impl<'a> MenuRequest<'a> {
    pub fn notice(items: &'a [String], prompt: &'a str) -> Self {
        Self {
            items,
            prompt,
            back: false,
            mesg: "",
        }
    }
}

/// The external list picker. Blocks until the user picks or types one line.
pub trait Launcher: Send + Sync {
    /// Esc surfaces as [`Error::Dismissed`], Ctrl-C as [`Error::Interrupted`].
    fn show(&self, request: &MenuRequest<'_>) -> Result<String>;
    /// Reply meaning "go back", offered when `MenuRequest::back` is set.
    fn back_label(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuProgram {
    Rofi,
    Dmenu,
    Fzf,
}

impl MenuProgram {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rofi" => Ok(MenuProgram::Rofi),
            "dmenu" => Ok(MenuProgram::Dmenu),
            "fzf" => Ok(MenuProgram::Fzf),
            other => Err(anyhow!("unsupported menu program {other:?} (expected rofi, dmenu or fzf)")),
        }
    }

    pub fn binary(&self) -> &'static str {
        match self {
            MenuProgram::Rofi => "rofi",
            MenuProgram::Dmenu => "dmenu",
            MenuProgram::Fzf => "fzf",
        }
    }

    fn args(&self, prompt: &str, mesg: &str) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            MenuProgram::Rofi => {
                args.extend(["-dmenu", "-i", "-p"].map(String::from));
                args.push(prompt.to_string());
                if !mesg.is_empty() {
                    args.push("-mesg".into());
                    args.push(mesg.to_string());
                }
            }
            MenuProgram::Dmenu => {
                args.extend(["-i", "-l", "20", "-p"].map(String::from));
                args.push(prompt.to_string());
            }
            MenuProgram::Fzf => {
                args.push(format!("--prompt={prompt} "));
                if !mesg.is_empty() {
                    args.push(format!("--header={mesg}"));
                }
                // Typed text is returned when nothing matches.
                args.push("--print-query".into());
            }
        }
        args
    }
}

pub struct ProcessLauncher {
    program: MenuProgram,
    extra_args: Vec<String>,
    back_label: String,
}

impl ProcessLauncher {
    pub fn new(cfg: &MenuConfig) -> Result<Self> {
        Ok(Self {
            program: MenuProgram::parse(&cfg.program)?,
            extra_args: cfg.args.clone(),
            back_label: cfg.back_label.clone(),
        })
    }

    fn render_input(&self, request: &MenuRequest<'_>) -> String {
        let mut rows = Vec::with_capacity(request.items.len() + 1);
        if request.back {
            rows.push(self.back_label.as_str());
        }
        rows.extend(request.items.iter().map(String::as_str));
        rows.join("\n")
    }
}

impl Launcher for ProcessLauncher {
    fn show(&self, request: &MenuRequest<'_>) -> Result<String> {
        let binary = self.program.binary();
        // Ctrl-C during a fetch stops before anything is drawn.
        if take_interrupt() {
            bail!(Error::Interrupted);
        }
        debug!(
            program = binary,
            prompt = request.prompt,
            items = request.items.len(),
            "showing menu"
        );

        let mut child = Command::new(binary)
            .args(self.program.args(request.prompt, request.mesg))
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("launch menu program {binary}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The picker may exit before reading everything.
            let _ = stdin.write_all(self.render_input(request).as_bytes());
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("wait for menu program {binary}"))?;

        if take_interrupt() {
            bail!(Error::Interrupted);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        interpret_exit(self.program, output.status.code(), &stdout)
    }

    fn back_label(&self) -> &str {
        &self.back_label
    }
}

fn interpret_exit(program: MenuProgram, code: Option<i32>, stdout: &str) -> Result<String> {
    match code {
        Some(0) => Ok(reply_line(program, stdout)),
        // fzf reports "no match" with 1 but still prints the query.
        Some(1) if program == MenuProgram::Fzf && !stdout.trim().is_empty() => {
            Ok(reply_line(program, stdout))
        }
        Some(1) => bail!(Error::Dismissed),
        Some(130) | None => bail!(Error::Interrupted),
        Some(code) => bail!("menu program {} exited with status {code}", program.binary()),
    }
}

fn reply_line(program: MenuProgram, stdout: &str) -> String {
    let mut lines = stdout.lines();
    let first = lines.next().unwrap_or_default();
    // With --print-query the query comes first and the pick second.
    let picked = match program {
        MenuProgram::Fzf => lines.next().filter(|l| !l.is_empty()).unwrap_or(first),
        _ => first,
    };
    picked.trim_end_matches('\r').to_string()
}

/// Records Ctrl-C instead of dying, so an interrupt during a prompt unwinds
/// the navigation as [`Error::Interrupted`].
#[cfg(unix)]
pub fn install_interrupt_handler() {
    extern "C" fn on_sigint(_signal: libc::c_int) {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }

    let handler = on_sigint as extern "C" fn(libc::c_int);
    // SAFETY: the handler only touches an atomic, which is async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() {}

fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}
