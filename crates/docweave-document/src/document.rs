// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document: a file of a known format, bound to the chain that performs
// operations on it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use docweave_core::error::{DocweaveError, Result};
use docweave_core::types::{DocumentFormat, MergeData, MergeField};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::chain::ManipulatorChain;
use crate::file::File;

/// A document at some point in a manipulation pipeline.
///
/// Documents are immutable: every operation returns a new `Document` bound to
/// the same chain, so calls can be chained fluently:
///
/// ```no_run
/// # use docweave_document::{Document, ManipulatorChain, PdfManipulator};
/// # fn main() -> docweave_document::Result<()> {
/// let mut chain = ManipulatorChain::default();
/// chain.add(PdfManipulator::default());
/// let chain = chain.into_shared();
///
/// let letter = Document::open(&chain, "letter.pdf")?;
/// let terms = Document::open(&chain, "terms.pdf")?;
/// let letterhead = Document::open(&chain, "letterhead.pdf")?;
///
/// letter
///     .append(&terms)?
///     .put_in_front(&letterhead)?
///     .save(Some("out.pdf".as_ref()))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Document {
    chain: Arc<ManipulatorChain>,
    format: DocumentFormat,
    file: File,
}

impl Document {
    // -- Construction ---------------------------------------------------------

    pub fn new(chain: Arc<ManipulatorChain>, format: DocumentFormat, file: File) -> Self {
        Self {
            chain,
            format,
            file,
        }
    }

    /// Open a document from disk. The format comes from the extension, or
    /// from the file contents when the extension is missing or unknown.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(chain: &Arc<ManipulatorChain>, path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)?;
        let format = path_ref
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentFormat::from_extension)
            .or_else(|| DocumentFormat::sniff(file.bytes()))
            .ok_or_else(|| DocweaveError::UnknownFormat(path_ref.display().to_string()))?;

        info!(%format, bytes_len = file.len(), "Document opened");
        Ok(Self::new(Arc::clone(chain), format, file))
    }

    /// Wrap in-memory bytes, detecting the format from their contents.
    pub fn from_bytes(chain: &Arc<ManipulatorChain>, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let file = File::from_bytes(bytes);
        let format = DocumentFormat::sniff(file.bytes()).ok_or_else(|| {
            DocweaveError::UnknownFormat("unrecognised document contents".into())
        })?;
        Ok(Self::new(Arc::clone(chain), format, file))
    }

    // -- Accessors ------------------------------------------------------------

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn bytes(&self) -> &[u8] {
        self.file.bytes()
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn chain(&self) -> &Arc<ManipulatorChain> {
        &self.chain
    }

    // -- Persistence ----------------------------------------------------------

    /// Write the document to `path`, or to a fresh file in the chain's output
    /// directory when `path` is `None`.
    pub fn save(&self, path: Option<&Path>) -> Result<Document> {
        let file = match path {
            Some(path) => self.file.save(path)?,
            None => {
                let name = format!("{}.{}", Uuid::new_v4(), self.format.extension());
                self.file.save(self.chain.output_dir().join(name))?
            }
        };
        Ok(Self::new(Arc::clone(&self.chain), self.format, file))
    }

    // -- Operations -----------------------------------------------------------

    /// Mail-merge this document with `data`.
    pub fn merge(&self, data: &MergeData) -> Result<Document> {
        self.chain.merge(self, data)
    }

    /// This document followed by `other`.
    pub fn append(&self, other: &Document) -> Result<Document> {
        self.chain.append(self, other)
    }

    /// This document followed by each of `others`, in order.
    pub fn append_multiple(&self, others: &[Document]) -> Result<Document> {
        self.chain.append_multiple(self, others)
    }

    /// `other` followed by this document.
    pub fn append_to(&self, other: &Document) -> Result<Document> {
        self.chain.append(other, self)
    }

    /// `other` followed by this document.
    pub fn prepend(&self, other: &Document) -> Result<Document> {
        self.chain.append(other, self)
    }

    /// Each of `others`, in order, followed by this document. The first of
    /// `others` is the primary document for resolution.
    pub fn prepend_multiple(&self, others: &[Document]) -> Result<Document> {
        let (first, rest) = others.split_first().ok_or_else(|| {
            DocweaveError::InvalidArgument(
                "at least one document must be given to prepend".into(),
            )
        })?;
        self.chain
            .append_multiple(first, rest.iter().chain(std::iter::once(self)))
    }

    /// This document followed by `other`.
    pub fn prepend_to(&self, other: &Document) -> Result<Document> {
        self.chain.append(self, other)
    }

    /// Layer this document over `background`.
    pub fn put_in_front(&self, background: &Document) -> Result<Document> {
        self.chain.layer(self, background)
    }

    /// Layer `foreground` over this document.
    pub fn put_behind(&self, foreground: &Document) -> Result<Document> {
        self.chain.layer(foreground, self)
    }

    /// Mail-merge fields and blocks contained in this document.
    pub fn merge_fields(&self) -> Result<Vec<MergeField>> {
        self.chain.merge_fields(self)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("format", &self.format)
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}
