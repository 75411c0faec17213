//! tsdoc-meta - Command-line tool for generating documentation metadata from
//! annotated TypeScript service methods.
//!
//! # Usage
//!
//! ```bash
//! tsdoc-meta -c <CONFIG> [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Generate the TypeScript module configured in `tsdoc.yaml`:
//! ```bash
//! tsdoc-meta -c tsdoc.yaml
//! ```
//!
//! Generate JSON to a different file:
//! ```bash
//! tsdoc-meta -c tsdoc.yaml -f json -o doc-meta.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! tsdoc-meta -c tsdoc.yaml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use tsdoc_meta::cli;

fn main() -> Result<()> {
    // The verbose flag decides the log level, so parse before the logger exists
    // and validate afterwards.
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("tsdoc-meta starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Doc meta generation completed successfully");

    Ok(())
}
