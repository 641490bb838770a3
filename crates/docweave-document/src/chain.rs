// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manipulator chain: routes each document operation to the first registered
// manipulator that supports it, then wraps the result in a new Document bound
// to the same chain.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docweave_core::error::{DocweaveError, Result};
use docweave_core::types::{DocumentFormat, MergeData, MergeField, Operation};
use tracing::{debug, instrument};

use crate::document::Document;
use crate::file::File;
use crate::manipulator::Manipulator;

/// An ordered registry of manipulators plus the operations that dispatch to
/// them.
///
/// Build the chain with [`ManipulatorChain::new`] / [`ManipulatorChain::add`],
/// then freeze it with [`ManipulatorChain::into_shared`]. Once shared, the
/// registry can no longer change, so concurrent lookups need no locking.
pub struct ManipulatorChain {
    manipulators: Vec<Arc<dyn Manipulator>>,
    output_dir: PathBuf,
}

impl ManipulatorChain {
    // -- Construction ---------------------------------------------------------

    /// Create a chain from manipulators in registration order.
    pub fn new(manipulators: impl IntoIterator<Item = Arc<dyn Manipulator>>) -> Self {
        Self {
            manipulators: manipulators.into_iter().collect(),
            output_dir: std::env::temp_dir(),
        }
    }

    /// Register a manipulator after all existing ones.
    pub fn add(&mut self, manipulator: impl Manipulator + 'static) -> &mut Self {
        self.add_shared(Arc::new(manipulator))
    }

    /// Register an already shared manipulator after all existing ones.
    pub fn add_shared(&mut self, manipulator: Arc<dyn Manipulator>) -> &mut Self {
        debug!(
            manipulator = manipulator.name(),
            position = self.manipulators.len(),
            "Manipulator registered"
        );
        self.manipulators.push(manipulator);
        self
    }

    /// Directory used by [`Document::save`] when no path is given.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Freeze the registry so documents can hold a handle to it.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    // -- Inspection -----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.manipulators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manipulators.is_empty()
    }

    /// Registered manipulators, in registration order.
    pub fn manipulators(&self) -> impl Iterator<Item = &dyn Manipulator> {
        self.manipulators.iter().map(|m| m.as_ref())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    // -- Resolution -----------------------------------------------------------

    /// Return the earliest-registered manipulator supporting `operation` on
    /// `format` documents.
    pub fn find_manipulator(
        &self,
        format: DocumentFormat,
        operation: Operation,
    ) -> Result<&dyn Manipulator> {
        match self
            .manipulators
            .iter()
            .find(|m| m.supports(format, operation))
        {
            Some(manipulator) => {
                debug!(
                    %format,
                    %operation,
                    manipulator = manipulator.name(),
                    "Manipulator resolved"
                );
                Ok(manipulator.as_ref())
            }
            None => {
                debug!(%format, %operation, registered = self.len(), "No manipulator found");
                Err(DocweaveError::ManipulatorNotFound { format, operation })
            }
        }
    }

    // -- Operations -----------------------------------------------------------

    /// Mail-merge `document` with `data`.
    #[instrument(skip_all, fields(format = %document.format()))]
    pub fn merge(self: &Arc<Self>, document: &Document, data: &MergeData) -> Result<Document> {
        let contents = self
            .find_manipulator(document.format(), Operation::Merge)?
            .merge(document.file(), data)?;

        Ok(self.wrap(document.format(), File::from_bytes(contents)))
    }

    /// Append `second` to `first`. Only `first`'s format drives resolution.
    #[instrument(skip_all, fields(format = %first.format()))]
    pub fn append(self: &Arc<Self>, first: &Document, second: &Document) -> Result<Document> {
        let file = self
            .find_manipulator(first.format(), Operation::Append)?
            .append(first.file(), second.file())?;

        Ok(self.wrap(first.format(), file))
    }

    /// Append every document in `others`, in order, to `document`.
    ///
    /// Fails with [`DocweaveError::InvalidArgument`] before any resolution
    /// when `others` is empty.
    #[instrument(skip_all, fields(format = %document.format()))]
    pub fn append_multiple<'a>(
        self: &Arc<Self>,
        document: &Document,
        others: impl IntoIterator<Item = &'a Document>,
    ) -> Result<Document> {
        let files: Vec<&File> = others.into_iter().map(Document::file).collect();
        if files.is_empty() {
            return Err(DocweaveError::InvalidArgument(
                "at least one document must be given to append".into(),
            ));
        }

        debug!(count = files.len(), "Appending documents");
        let file = self
            .find_manipulator(document.format(), Operation::AppendMultiple)?
            .append_multiple(document.file(), &files)?;

        Ok(self.wrap(document.format(), file))
    }

    /// Composite `foreground` over `background`. Only the foreground's format
    /// drives resolution.
    #[instrument(skip_all, fields(format = %foreground.format()))]
    pub fn layer(self: &Arc<Self>, foreground: &Document, background: &Document) -> Result<Document> {
        let file = self
            .find_manipulator(foreground.format(), Operation::Layer)?
            .layer(foreground.file(), background.file())?;

        Ok(self.wrap(foreground.format(), file))
    }

    /// List the mail-merge fields in `document`. The manipulator's answer is
    /// returned as-is.
    #[instrument(skip_all, fields(format = %document.format()))]
    pub fn merge_fields(&self, document: &Document) -> Result<Vec<MergeField>> {
        self.find_manipulator(document.format(), Operation::GetMergeFields)?
            .merge_fields(document.file())
    }

    /// Bind a manipulator's output to this chain. The format is taken from
    /// the output bytes when recognisable, else from the primary input.
    fn wrap(self: &Arc<Self>, primary: DocumentFormat, file: File) -> Document {
        let format = DocumentFormat::sniff(file.bytes()).unwrap_or(primary);
        debug!(%format, bytes_len = file.len(), "Wrapping manipulator output");
        Document::new(Arc::clone(self), format, file)
    }
}

impl Default for ManipulatorChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for ManipulatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManipulatorChain")
            .field(
                "manipulators",
                &self.manipulators.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
