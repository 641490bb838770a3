// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers. Each one opens its inputs against a shared chain,
// runs one facade operation and writes or prints the result.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use docweave_core::{ChainConfig, DocumentFormat, DocweaveError, MergeData, Result};
use docweave_document::pdf::page_count;
use docweave_document::{Document, ManipulatorChain};
use tracing::{debug, info};

use crate::cli::{AppendArgs, Command, InputArgs, LayerArgs, MergeArgs, PrependArgs};

/// Load the chain configuration. Every failure here is a configuration
/// error, including unreadable or malformed files.
pub fn load_config(path: Option<&Path>) -> Result<ChainConfig> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(ChainConfig::default());
    };

    ChainConfig::from_json_file(path).map_err(|err| match err {
        DocweaveError::Io(io) => {
            DocweaveError::InvalidConfig(format!("cannot read {}: {}", path.display(), io))
        }
        DocweaveError::Serialization(json) => {
            DocweaveError::InvalidConfig(format!("{}: {}", path.display(), json))
        }
        other => other,
    })
}

/// Read merge data. A missing or malformed file is a bad argument.
pub fn load_merge_data(path: &Path) -> Result<MergeData> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        DocweaveError::InvalidArgument(format!("cannot read merge data {}: {}", path.display(), err))
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        DocweaveError::InvalidArgument(format!("merge data {}: {}", path.display(), err))
    })
}

pub fn run(command: Command, chain: &Arc<ManipulatorChain>, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Append(args) => append(chain, args, out),
        Command::Prepend(args) => prepend(chain, args, out),
        Command::Layer(args) => layer(chain, args, out),
        Command::Merge(args) => merge(chain, args, out),
        Command::Fields(args) => fields(chain, args, out),
        Command::Info(args) => describe(chain, args, out),
    }
}

fn append(chain: &Arc<ManipulatorChain>, args: AppendArgs, out: &mut impl Write) -> Result<()> {
    let documents = open_all(chain, &args.inputs)?;
    let (first, rest) = documents
        .split_first()
        .ok_or_else(|| DocweaveError::InvalidArgument("no documents to append".into()))?;

    let combined = match rest {
        [second] => first.append(second)?,
        _ => first.append_multiple(rest)?,
    };
    write_result(&combined, &args.output, out)
}

fn prepend(chain: &Arc<ManipulatorChain>, args: PrependArgs, out: &mut impl Write) -> Result<()> {
    let base = Document::open(chain, &args.base)?;
    let others = open_all(chain, &args.others)?;

    let combined = match others.as_slice() {
        [single] => base.prepend(single)?,
        _ => base.prepend_multiple(&others)?,
    };
    write_result(&combined, &args.output, out)
}

fn layer(chain: &Arc<ManipulatorChain>, args: LayerArgs, out: &mut impl Write) -> Result<()> {
    let foreground = Document::open(chain, &args.foreground)?;
    let background = Document::open(chain, &args.background)?;

    let layered = foreground.put_in_front(&background)?;
    write_result(&layered, &args.output, out)
}

fn merge(chain: &Arc<ManipulatorChain>, args: MergeArgs, out: &mut impl Write) -> Result<()> {
    let template = Document::open(chain, &args.input)?;
    let data = load_merge_data(&args.data)?;

    let merged = template.merge(&data)?;
    write_result(&merged, &args.output, out)
}

fn fields(chain: &Arc<ManipulatorChain>, args: InputArgs, out: &mut impl Write) -> Result<()> {
    let template = Document::open(chain, &args.input)?;
    let fields = template.merge_fields()?;

    serde_json::to_writer_pretty(&mut *out, &fields)?;
    writeln!(out)?;
    Ok(())
}

fn describe(chain: &Arc<ManipulatorChain>, args: InputArgs, out: &mut impl Write) -> Result<()> {
    let document = Document::open(chain, &args.input)?;
    let file = document.file();

    writeln!(out, "format: {}", document.format())?;
    writeln!(out, "mime:   {}", document.format().mime_type())?;
    writeln!(out, "size:   {} bytes", file.len())?;
    if document.format() == DocumentFormat::Pdf {
        match page_count(file) {
            Ok(pages) => writeln!(out, "pages:  {}", pages)?,
            Err(err) => debug!(%err, "Page count unavailable"),
        }
    }
    writeln!(out, "sha256: {}", file.checksum())?;
    Ok(())
}

fn open_all(chain: &Arc<ManipulatorChain>, paths: &[impl AsRef<Path>]) -> Result<Vec<Document>> {
    paths.iter().map(|path| Document::open(chain, path)).collect()
}

fn write_result(document: &Document, output: &Path, out: &mut impl Write) -> Result<()> {
    let saved = document.save(Some(output))?;
    info!(
        path = %output.display(),
        format = %saved.format(),
        sha256 = %saved.file().checksum(),
        "Result written"
    );
    writeln!(out, "{}", output.display())?;
    Ok(())
}
