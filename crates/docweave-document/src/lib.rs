// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docweave-document: the manipulator chain and its document facade.
//
// Provides the `Manipulator` plugin trait, the `ManipulatorChain` that routes
// merge/append/layer/field-extraction requests to the first capable backend,
// the fluent `Document` wrapper, and a built-in PDF backend (append, append
// multiple, layer) on top of lopdf.

pub mod chain;
pub mod document;
pub mod file;
pub mod manipulator;
pub mod pdf;
pub mod registry;

// Re-export the primary types so callers can use `docweave_document::Document` etc.
pub use chain::ManipulatorChain;
pub use document::Document;
pub use file::File;
pub use manipulator::Manipulator;
pub use pdf::PdfManipulator;
pub use registry::ManipulatorRegistry;

pub use docweave_core::{
    ChainConfig, DocumentFormat, DocweaveError, ErrorClass, MergeData, MergeField, Operation,
    Result,
};
