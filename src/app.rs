use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config};
use crate::data::HelixChannelService;
use crate::error::Error;
use crate::executor::Executor;
use crate::format::Style;
use crate::helix;
use crate::menu::{self, Launcher, MenuRequest, ProcessLauncher};
use crate::nav::Navigator;

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub config_file: Option<PathBuf>,
    pub menu: Option<String>,
    pub player: Option<Vec<String>>,
}

/// How a run ended, for logging and for the final screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Interrupted,
    Dismissed,
    InvalidSelection,
    Connection,
    Application,
}

pub fn classify(err: &anyhow::Error) -> Failure {
    match err.downcast_ref::<Error>() {
        Some(Error::Interrupted) => Failure::Interrupted,
        Some(Error::Dismissed) => Failure::Dismissed,
        Some(Error::InvalidSelection(_)) => Failure::InvalidSelection,
        Some(Error::Api { .. }) => Failure::Connection,
        _ if err.chain().any(|cause| cause.is::<reqwest::Error>()) => Failure::Connection,
        _ => Failure::Application,
    }
}

pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,twitch_menu=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Everything is reported here; the caller only turns the result into an
/// exit status.
pub fn run(options: Options) -> Result<()> {
    let cfg = match load_config(options) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("{err:#}");
            return Err(err);
        }
    };

    let launcher = match ProcessLauncher::new(&cfg.menu) {
        Ok(launcher) => launcher,
        Err(err) => {
            error!("{err:#}");
            return Err(err);
        }
    };
    menu::install_interrupt_handler();

    let result = browse(&cfg, &launcher);
    if let Err(err) = &result {
        report(err, &launcher);
    }
    result
}

fn load_config(options: Options) -> Result<Config> {
    let path = options.config_file.clone().or_else(config::default_path);
    debug!(path = ?path, "loading config");
    let mut cfg = config::load(config::LoadOptions {
        config_file: options.config_file,
        env_prefix: None,
    })
    .context("load config")?;

    if let Some(program) = options.menu {
        cfg.menu.program = program;
    }
    if let Some(player) = options.player {
        cfg.player.command = player;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn browse(cfg: &Config, launcher: &ProcessLauncher) -> Result<()> {
    let client = helix::Client::new(helix::ClientConfig {
        client_id: cfg.twitch.client_id.clone(),
        access_token: cfg.twitch.access_token.clone(),
        base_url: Some(cfg.twitch.base_url.clone()),
        timeout: Some(cfg.twitch.timeout),
        page_size: cfg.twitch.page_size,
        http_client: None,
    })
    .context("create twitch client")?;

    let service = HelixChannelService::new(Arc::new(client), &cfg.twitch.user_id);
    let executor = Executor::new(&cfg.player);
    let navigator = Navigator::new(&service, launcher, &executor, Style::from_config(&cfg.ui))?;
    navigator.run()
}

fn report(err: &anyhow::Error, launcher: &dyn Launcher) {
    let failure = classify(err);
    match failure {
        Failure::Interrupted => info!("terminated by user"),
        Failure::Dismissed => info!("menu closed by user"),
        // The gate already showed the offending option.
        Failure::InvalidSelection => error!("{err:#}"),
        Failure::Connection | Failure::Application => {
            error!(?failure, "{err:#}");
            let items = [format!("{err:#}")];
            if let Err(show_err) = launcher.show(&MenuRequest::notice(&items, "twitch-menu error>")) {
                info!("error screen not shown: {show_err:#}");
            }
        }
    }
}
