// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tanuki_schema::SubjectId;

#[derive(Debug, Parser)]
#[command(name = "tanuki", version, about = "Tanuki subject data pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Combine a raw directory store into a shippable blob
    Combine(CombineArgs),
    /// Unpack a store into one file per subject
    Extract {
        /// Store to read (usually a blob)
        #[arg(long)]
        input: PathBuf,
        /// Directory to write; created if missing
        #[arg(long)]
        output: PathBuf,
    },
    /// Unified diff of every subject present in both stores
    Diff {
        /// Old store
        a: PathBuf,
        /// New store
        b: PathBuf,
    },
    /// Print one subject, or list every subject
    Dump {
        /// Store to read
        path: PathBuf,
        /// Subject to print in full
        id: Option<SubjectId>,
        /// Print every subject in full instead of `id. slug`
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Check bracket tags in every raw mnemonic, hint and explanation
    LintMarkup {
        /// Store to check
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct CombineArgs {
    /// JSON run configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Raw subject store
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Blob to write
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// TOML override file
    #[arg(long)]
    pub overrides: Option<PathBuf>,
    /// Unscored similarity source (repeatable, applied first)
    #[arg(long, value_name = "FILE")]
    pub unscored: Vec<PathBuf>,
    /// Scored similarity source (repeatable, applied after unscored)
    #[arg(long, value_name = "FILE")]
    pub scored: Vec<PathBuf>,
    /// Scored pairs must exceed this confidence
    #[arg(long)]
    pub score_threshold: Option<f32>,
    /// Leave amalgamation lists in scraped order
    #[arg(long)]
    pub keep_amalgamation_order: bool,
}
