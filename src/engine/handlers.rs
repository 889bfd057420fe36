//! CLI command handlers: single-path query/remove and folder list/remove.

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::attr::SystemProbe;
use crate::device::StatDevices;
use crate::engine::arg_parser::Cli;
use crate::error::{AqError, ExitCodes};
use crate::pipeline::log_skipped_paths;
use crate::single::{query_path, remove_path};
use crate::sweep::sweep_with;
use crate::utils::{apply_file_to_opts, load_aq_toml, setup_logging};
use crate::{Hit, HitAction, Mode, Opts};

/// Defaults, then the config file, then CLI flags.
pub fn setup_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = load_aq_toml(cli.config.as_deref())? {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(attr) = &cli.attr {
        opts.attribute = attr.clone();
    }
    if cli.threads.is_some() {
        opts.threads = cli.threads;
    }
    if cli.queue_cap.is_some() {
        opts.queue_cap = cli.queue_cap;
    }
    if let Some(v) = cli.follow_links {
        opts.follow_links = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if opts.attribute.is_empty() {
        anyhow::bail!("attribute name must not be empty");
    }
    Ok(opts)
}

/// Exit code for a failed run: the [`AqError`] in the chain decides, anything else is a failure.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<AqError>()
        .map(AqError::exit_code)
        .unwrap_or(ExitCodes::FAILURE)
}

/// Run the command line and map the outcome to an exit code. Errors are printed to stderr.
pub fn handle_run(cli: &Cli) -> ExitCode {
    match run(cli) {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    setup_logging(opts.verbose);
    match (&cli.folder, &cli.path) {
        (Some(dir), _) => handle_folder(dir, cli.remove, &opts),
        (None, Some(path)) => handle_single(path, cli.remove, &opts),
        (None, None) => anyhow::bail!("nothing to do: give a PATH or --folder DIR"),
    }
}

/// Single path: print one line, fail fast.
pub fn handle_single(path: &Path, remove: bool, opts: &Opts) -> Result<()> {
    let probe = SystemProbe::new(opts.follow_links);
    let attr = &opts.attribute;
    if remove {
        remove_path(&probe, path, attr)
            .with_context(|| format!("failed to remove {attr} from {}", path.display()))?;
        println!("Removed {} from: {}", attr, path.display());
        return Ok(());
    }
    let has = query_path(&probe, path, attr)
        .with_context(|| format!("failed to check {attr} on {}", path.display()))?;
    if has {
        println!("{} || HAS {}", path.display(), attr);
    } else {
        println!("{} || does NOT have {}", path.display(), attr);
    }
    Ok(())
}

fn print_hit(hit: &Hit, attr: &str) {
    match hit.action {
        HitAction::Listed => println!("{}", hit.path.display()),
        HitAction::Removed => println!("Removed {} from: {}", attr, hit.path.display()),
    }
}

/// Folder: sweep the tree, print one line per hit, then report skips and failures.
pub fn handle_folder(dir: &Path, remove: bool, opts: &Opts) -> Result<()> {
    let mode = if remove { Mode::Remove } else { Mode::List };
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let sweep_opts = opts.sweep_opts(mode, Some(cancel));
    let attr = opts.attribute.clone();
    let report = sweep_with(
        dir,
        &sweep_opts,
        Arc::new(SystemProbe::new(opts.follow_links)),
        Arc::new(StatDevices::new(opts.follow_links)),
        |hit| print_hit(hit, &attr),
    )
    .with_context(|| format!("cannot sweep {}", dir.display()))?;

    log_skipped_paths(&report.skipped, opts.verbose);
    if remove && report.errors.is_empty() && report.walk_error.is_none() {
        info!("Removed {} from {} paths", opts.attribute, report.hits);
    }
    debug!(
        "{} paths checked under {}",
        report.processed,
        dir.display()
    );
    report
        .into_result()
        .with_context(|| format!("errors occurred under {}", dir.display()))?;
    Ok(())
}
