//! Configuration builders and INI file loading.

mod build;
mod ini_file;
mod types;

pub use ini_file::{load_ini_file, parse_ini_str};
pub use types::{BackendConfig, FrontendKind, LoggingConfig, SinkConfig};
