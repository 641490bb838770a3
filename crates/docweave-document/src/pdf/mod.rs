// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: the built-in manipulator and the page-tree plumbing behind it.

pub mod manipulator;
mod pages;

pub use manipulator::PdfManipulator;

use docweave_core::error::{DocweaveError, Result};

use crate::file::File;

/// Number of pages in a PDF file.
pub fn page_count(file: &File) -> Result<usize> {
    let doc = lopdf::Document::load_mem(file.bytes())
        .map_err(|err| DocweaveError::Pdf(format!("failed to load PDF: {}", err)))?;
    Ok(doc.get_pages().len())
}
