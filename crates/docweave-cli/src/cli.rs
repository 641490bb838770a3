// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface of the `docweave` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Docweave - combine, layer and mail-merge office documents
#[derive(Debug, Parser)]
#[command(name = "docweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON chain configuration (manipulator order, output directory, PDF settings)
    #[arg(long, global = true, value_name = "JSON")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Concatenate documents in the given order
    Append(AppendArgs),

    /// Put one or more documents in front of a base document
    Prepend(PrependArgs),

    /// Draw a foreground document over a background document
    Layer(LayerArgs),

    /// Mail-merge a template with JSON field data
    Merge(MergeArgs),

    /// Print the mail-merge fields of a template as JSON
    Fields(InputArgs),

    /// Print the format, size and SHA-256 of a document
    Info(InputArgs),
}

#[derive(Debug, Args)]
pub struct AppendArgs {
    /// Documents to concatenate; the first one decides the backend
    #[arg(required = true, num_args = 2.., value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Where to write the result
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct PrependArgs {
    /// Document that ends up last
    pub base: PathBuf,

    /// Documents placed before the base, in order
    #[arg(required = true, num_args = 1.., value_name = "OTHER")]
    pub others: Vec<PathBuf>,

    /// Where to write the result
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct LayerArgs {
    /// Document whose pages are kept
    #[arg(long)]
    pub foreground: PathBuf,

    /// Document drawn beneath every foreground page
    #[arg(long)]
    pub background: PathBuf,

    /// Where to write the result
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Template document
    pub input: PathBuf,

    /// JSON file with `fields` and `blocks`
    #[arg(long, value_name = "JSON")]
    pub data: PathBuf,

    /// Where to write the result
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    pub input: PathBuf,
}
