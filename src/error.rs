/// Failures the top level tells apart. Everything else travels as a plain
/// `anyhow::Error` with context attached.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("option '{0}' selected not found")]
    InvalidSelection(String),
    #[error("{0} is not supported yet")]
    Unsupported(&'static str),
    /// Ctrl-C, or the menu program was killed.
    #[error("terminated by user")]
    Interrupted,
    /// The menu was closed without a pick (Esc).
    #[error("menu dismissed")]
    Dismissed,
    #[error("twitch api error: HTTP {status} => {body}")]
    Api { status: u16, body: String },
    #[error("config: {0} is required")]
    Missing(String),
}
