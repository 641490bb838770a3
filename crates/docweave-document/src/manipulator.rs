// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manipulator trait: the extension point for per-format backends.

use docweave_core::error::{DocweaveError, Result};
use docweave_core::types::{DocumentFormat, MergeData, MergeField, Operation};

use crate::file::File;

/// A backend able to perform some operations on some document formats.
///
/// `supports` must be a pure predicate: the chain calls it on every
/// resolution, in registration order, and never caches the answer.
///
/// Every operation method defaults to [`DocweaveError::Unsupported`]. A
/// manipulator that answers `true` for `(format, op)` must override the
/// matching method. Errors returned from these methods reach the caller
/// unchanged.
pub trait Manipulator: Send + Sync {
    /// Short identifier used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether this manipulator handles `operation` on `format` documents.
    fn supports(&self, format: DocumentFormat, operation: Operation) -> bool;

    /// Mail-merge `file` with `data`, returning the merged document bytes.
    fn merge(&self, _file: &File, _data: &MergeData) -> Result<Vec<u8>> {
        Err(self.unsupported(Operation::Merge))
    }

    /// Concatenate `second` after `first`.
    fn append(&self, _first: &File, _second: &File) -> Result<File> {
        Err(self.unsupported(Operation::Append))
    }

    /// Concatenate every file in `others`, in order, after `file`.
    fn append_multiple(&self, _file: &File, _others: &[&File]) -> Result<File> {
        Err(self.unsupported(Operation::AppendMultiple))
    }

    /// Composite `foreground` over `background`.
    fn layer(&self, _foreground: &File, _background: &File) -> Result<File> {
        Err(self.unsupported(Operation::Layer))
    }

    /// List the mail-merge fields and blocks in `file`.
    fn merge_fields(&self, _file: &File) -> Result<Vec<MergeField>> {
        Err(self.unsupported(Operation::GetMergeFields))
    }

    #[doc(hidden)]
    fn unsupported(&self, operation: Operation) -> DocweaveError {
        DocweaveError::Unsupported {
            manipulator: self.name().to_string(),
            operation,
        }
    }
}
