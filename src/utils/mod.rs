pub mod aq_toml;
pub mod config;
pub mod logger;

pub use aq_toml::{apply_file_to_opts, load_aq_toml};
pub use config::*;
pub use logger::setup_logging;
