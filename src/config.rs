use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const DEFAULT_ENV_PREFIX: &str = "TWITCH_MENU";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub twitch: TwitchConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub ui: UIConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwitchConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            access_token: String::new(),
            user_id: String::new(),
            base_url: default_base_url(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    crate::helix::HELIX_API_BASE.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_back_label")]
    pub back_label: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            back_label: default_back_label(),
        }
    }
}

fn default_program() -> String {
    "rofi".into()
}

fn default_back_label() -> String {
    "↩ Back".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_live_icon")]
    pub live_icon: String,
    #[serde(default = "default_bullet_icon")]
    pub bullet_icon: String,
    #[serde(default = "default_eye_icon")]
    pub eye_icon: String,
    #[serde(default = "default_clock_icon")]
    pub clock_icon: String,
    #[serde(default = "default_calendar_icon")]
    pub calendar_icon: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            live_icon: default_live_icon(),
            bullet_icon: default_bullet_icon(),
            eye_icon: default_eye_icon(),
            clock_icon: default_clock_icon(),
            calendar_icon: default_calendar_icon(),
        }
    }
}

fn default_delimiter() -> String {
    "|".into()
}

fn default_live_icon() -> String {
    "●".into()
}

fn default_bullet_icon() -> String {
    "•".into()
}

fn default_eye_icon() -> String {
    "👁".into()
}

fn default_clock_icon() -> String {
    "⏱".into()
}

fn default_calendar_icon() -> String {
    "📅".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_player_command")]
    pub command: Vec<String>,
    #[serde(default = "default_notify")]
    pub notify: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            notify: default_notify(),
        }
    }
}

fn default_player_command() -> Vec<String> {
    vec!["streamlink".into(), "%URL%".into(), "best".into()]
}

fn default_notify() -> bool {
    true
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.twitch.client_id.trim().is_empty() {
            bail!(Error::Missing("twitch.client_id".into()));
        }
        if self.twitch.access_token.trim().is_empty() {
            bail!(Error::Missing("twitch.access_token".into()));
        }
        if self.twitch.page_size == 0 || self.twitch.page_size > 100 {
            bail!(
                "config: twitch.page_size must be between 1 and 100, got {}",
                self.twitch.page_size
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    cfg = apply_env(cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.twitch.client_id.is_empty() {
        base.twitch.client_id = other.twitch.client_id;
    }
    if !other.twitch.access_token.is_empty() {
        base.twitch.access_token = other.twitch.access_token;
    }
    if !other.twitch.user_id.is_empty() {
        base.twitch.user_id = other.twitch.user_id;
    }
    if !other.twitch.base_url.is_empty() {
        base.twitch.base_url = other.twitch.base_url;
    }
    base.twitch.timeout = other.twitch.timeout;
    if other.twitch.page_size != 0 {
        base.twitch.page_size = other.twitch.page_size;
    }

    if !other.menu.program.is_empty() {
        base.menu.program = other.menu.program;
    }
    if !other.menu.args.is_empty() {
        base.menu.args = other.menu.args;
    }
    if !other.menu.back_label.is_empty() {
        base.menu.back_label = other.menu.back_label;
    }

    if !other.ui.delimiter.is_empty() {
        base.ui.delimiter = other.ui.delimiter;
    }
    if !other.ui.live_icon.is_empty() {
        base.ui.live_icon = other.ui.live_icon;
    }
    if !other.ui.bullet_icon.is_empty() {
        base.ui.bullet_icon = other.ui.bullet_icon;
    }
    if !other.ui.eye_icon.is_empty() {
        base.ui.eye_icon = other.ui.eye_icon;
    }
    if !other.ui.clock_icon.is_empty() {
        base.ui.clock_icon = other.ui.clock_icon;
    }
    if !other.ui.calendar_icon.is_empty() {
        base.ui.calendar_icon = other.ui.calendar_icon;
    }

    // An explicit empty list means "open with the browser".
    base.player.command = other.player.command;
    base.player.notify = other.player.notify;

    base
}

fn apply_env(mut cfg: Config, prefix: &str) -> Config {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(&mut cfg, &key, value);
    }

    cfg
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "twitch.client_id" => cfg.twitch.client_id = value,
        "twitch.access_token" => cfg.twitch.access_token = value,
        "twitch.user_id" => cfg.twitch.user_id = value,
        "twitch.base_url" => cfg.twitch.base_url = value,
        "twitch.timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.twitch.timeout = duration;
            }
        }
        "twitch.page_size" => {
            if let Ok(parsed) = value.parse::<u32>() {
                cfg.twitch.page_size = parsed;
            }
        }
        "menu.program" => cfg.menu.program = value,
        "menu.args" => cfg.menu.args = split_list(&value),
        "menu.back_label" => cfg.menu.back_label = value,
        "ui.delimiter" => cfg.ui.delimiter = value,
        "ui.live_icon" => cfg.ui.live_icon = value,
        "ui.bullet_icon" => cfg.ui.bullet_icon = value,
        "ui.eye_icon" => cfg.ui.eye_icon = value,
        "ui.clock_icon" => cfg.ui.clock_icon = value,
        "ui.calendar_icon" => cfg.ui.calendar_icon = value,
        "player.command" => cfg.player.command = split_list(&value),
        "player.notify" => {
            cfg.player.notify = matches!(value.as_str(), "1" | "true" | "TRUE" | "True");
        }
        _ => {}
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("twitch-menu").join("config.yaml"))
}
