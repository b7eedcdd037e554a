//! medocr: command-line client for a medical-document OCR pipeline.

mod cli;
mod output;

use clap::Parser;
use medocr_protocol::ErrorCode;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use output::Output;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(cli.json);

    let result = run(cli, &output).await;
    let code = exit_code(result, &output);
    if code != 0 {
        std::process::exit(code);
    }
}

/// Run the selected command. `Ok(false)` means the failure was already reported.
async fn run(cli: Cli, output: &Output) -> anyhow::Result<bool> {
    let timeout = cli.timeout();

    match cli.command {
        Commands::Scan(args) => {
            cli::commands::scan::run(&cli.backend_url, args, output, timeout).await
        }
        Commands::Health => cli::commands::health::run(&cli.backend_url, output, timeout).await,
        Commands::Pdf(args) => cli::commands::pdf::run(args, output),
    }
}

/// Map a command result to the process exit code, reporting unexpected
/// errors through the envelope.
fn exit_code(result: anyhow::Result<bool>, output: &Output) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            output.print_error(ErrorCode::InternalError, &format!("{:#}", e));
            1
        }
    }
}
