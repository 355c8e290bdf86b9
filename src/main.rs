//! OpenAPI Type Schema - command-line front end.
//!
//! # Usage
//!
//! ```bash
//! openapi-type-schema schema [OPTIONS] <PROJECT_PATH> --type <TYPE>...
//! openapi-type-schema import [OPTIONS] <FILE>
//! ```
//!
//! # Examples
//!
//! Translate two types with camelCase property names:
//! ```bash
//! openapi-type-schema schema ./my-api -t Order -t "Vec<Customer>" --naming camel
//! ```
//!
//! Import a JSON Schema document as JSON:
//! ```bash
//! openapi-type-schema import order.schema.json -f json -o order.openapi.json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_type_schema::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    info!("OpenAPI Type Schema starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Done");

    Ok(())
}
