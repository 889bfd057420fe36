//! stderr logging for the CLI. Result lines go to stdout; everything here goes to stderr.

use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

fn level_tag(level: Level) -> Option<ColoredString> {
    match level {
        Level::Error => Some("ERROR".red()),
        Level::Warn => Some("WARN".yellow()),
        Level::Debug | Level::Trace => Some("DEBUG".dimmed()),
        Level::Info => None,
    }
}

/// Warn for dependencies, Info (Debug when `verbose`) for this crate. `RUST_LOG` is applied on top.
/// Safe to call twice; the second call is a no-op.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .parse_default_env()
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            match level_tag(record.level()) {
                Some(tag) if record.level() <= Level::Warn => writeln!(
                    buf,
                    "[{} {} {}] {}",
                    name,
                    tag,
                    record.target().white(),
                    record.args()
                ),
                Some(tag) => writeln!(buf, "[{} {}] {}", name, tag, record.args()),
                None => writeln!(buf, "[{}] {}", name, record.args()),
            }
        })
        .try_init();
}
