// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docweave: command-line document manipulation
//
// Entry point. Initialises logging, builds the manipulator chain from the
// configuration and dispatches the requested subcommand.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use docweave_core::human_errors::humanize_error;
use docweave_core::{DocweaveError, ErrorClass};
use docweave_document::ManipulatorChain;

use cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Arguments parsed");

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, class = ?err.class(), "Command failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("hint:  {}", human.suggestion);
            exit_code(&err)
        }
    }
}

fn execute(cli: Cli) -> docweave_core::Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    let chain = ManipulatorChain::from_config(&config)?.into_shared();

    let stdout = std::io::stdout();
    commands::run(cli.command, &chain, &mut stdout.lock())
}

fn exit_code(err: &DocweaveError) -> ExitCode {
    match err.class() {
        ErrorClass::Configuration => ExitCode::from(2),
        ErrorClass::Precondition => ExitCode::from(3),
        ErrorClass::Backend => ExitCode::from(1),
    }
}
