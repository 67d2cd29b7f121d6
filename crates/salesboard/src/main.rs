//! Main entry point for salesboard.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use salesboard::{render, App, Cli};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let app = App::bootstrap(&cli)?;

    let outcome = app.run(cli.report, &cli.params()).await;
    println!("{}", render(&outcome, cli.pretty)?);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
