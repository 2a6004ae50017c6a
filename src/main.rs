//! svgview - Preview the default-exported symbol-to-image map of a source file
//!
//! svgview provides:
//! - Token-aware location of `export default { ... }` in TypeScript/JavaScript
//! - A data-only literal parser (no code is evaluated)
//! - Gallery rendering to html/json/jsonl/md

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod core;
mod extract;
mod flows;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            core::util::show_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
