#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod executor;
pub mod format;
pub mod helix;
pub mod live;
pub mod menu;
pub mod nav;
pub mod select;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
pub use error::Error;
