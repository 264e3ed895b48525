//! Binary entry point for texsplice.
//!
//! A thin chat-host stand-in: delivers one message to the pipeline and
//! prints the transformed text.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use texsplice::cli::output::{OutputFormat, format_error};
use texsplice::cli::{Cli, execute};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "texsplice=debug"
    } else {
        "texsplice=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                // Handle broken pipe gracefully (e.g., when piped to `head` or `jq`)
                if let Err(e) = write!(io::stdout(), "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json => {
                    // JSON errors go to stdout for programmatic parsing
                    println!("{error_output}");
                }
                OutputFormat::Text => {
                    eprintln!("Error: {error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
