// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `tanuki`: build and inspect Tanuki subject stores.
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `info` filter); command
//! output goes to stdout.

mod cli;
mod commands;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout().lock();
    let code = match cli.command {
        Command::Combine(args) => commands::combine::run(args).map(|()| ExitCode::SUCCESS),
        Command::Extract { input, output } => {
            commands::extract::run(&input, &output).map(|()| ExitCode::SUCCESS)
        }
        Command::Diff { a, b } => commands::diff::run(&a, &b, &mut out).map(|()| ExitCode::SUCCESS),
        Command::Dump { path, id, all } => {
            commands::dump::run(&path, id, all, &mut out).map(|()| ExitCode::SUCCESS)
        }
        Command::LintMarkup { path } => commands::lint::run(&path, &mut out).map(|issues| {
            if issues == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
    }?;
    out.flush()?;
    Ok(code)
}
