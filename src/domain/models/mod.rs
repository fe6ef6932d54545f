pub mod config;

pub use config::{BootConfig, BootDocument, LogFormat, LogSettings};
