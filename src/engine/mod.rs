//! CLI engine: argument parsing and command handlers.

pub mod arg_parser;
pub mod handlers;

pub use arg_parser::Cli;
pub use handlers::{exit_code_for, handle_folder, handle_run, handle_single, setup_opts};
