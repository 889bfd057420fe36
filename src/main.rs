//! aq CLI: check or remove an extended attribute on a file, or recursively on a directory.

use aq::ExitCodes;
use aq::engine::arg_parser::Cli;
use aq::engine::handle_run;
use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    ExitCode::from(ExitCodes::SUCCESS)
                }
                _ => ExitCode::from(ExitCodes::FAILURE),
            };
        }
    };
    let code = handle_run(&cli);
    log::debug!("Total time: {:?}", start_time.elapsed());
    code
}
