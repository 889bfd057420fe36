//! Load `.aq.toml` (CLI only). Lib callers pass [`SweepOpts`](crate::SweepOpts) directly.
//!
//! ```toml
//! [settings]
//! attribute = "com.apple.quarantine"
//! threads = 4
//! queue_cap = 2048
//! follow_links = false
//! verbose = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AqToml {
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    attribute: Option<String>,
    threads: Option<usize>,
    queue_cap: Option<usize>,
    follow_links: Option<bool>,
    verbose: Option<bool>,
}

pub fn parse_aq_toml(s: &str) -> Result<AqToml> {
    Ok(toml::from_str(s)?)
}

/// Load the config file. An explicit path must exist; the default `.aq.toml` in the current
/// directory is optional (None when missing).
pub fn load_aq_toml(explicit: Option<&Path>) -> Result<Option<AqToml>> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (Path::new(PackagePaths::get().config_filename()).to_path_buf(), false),
    };
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("read config {}", path.display()));
        }
    };
    parse_aq_toml(&s)
        .with_context(|| format!("parse config {}", path.display()))
        .map(Some)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($settings:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $settings.$field.clone() {
            $opts.$field = v;
        }
    };
    ($settings:expr, $opts:expr, Some $field:ident) => {
        if let Some(v) = $settings.$field {
            $opts.$field = Some(v);
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &AqToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, attribute);
    apply_file_opt!(s, opts, Some threads);
    apply_file_opt!(s, opts, Some queue_cap);
    apply_file_opt!(s, opts, follow_links);
    apply_file_opt!(s, opts, verbose);
}
