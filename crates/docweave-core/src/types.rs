// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Docweave manipulator chain.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocweaveError;

/// The closed set of document formats a chain can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Legacy Word binary (OLE2 compound file).
    Doc,
    /// Office Open XML word-processing package.
    Docx,
    Pdf,
    Rtf,
}

impl DocumentFormat {
    /// Every recognised format, in declaration order.
    pub const ALL: [DocumentFormat; 4] = [Self::Doc, Self::Docx, Self::Pdf, Self::Rtf];

    /// Lowercase tag, also the canonical file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Rtf => "rtf",
        }
    }

    /// Canonical file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
            Self::Rtf => "application/rtf",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "doc" | "dot" => Some(Self::Doc),
            "docx" | "dotx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "rtf" => Some(Self::Rtf),
            _ => None,
        }
    }

    /// Infer the format from leading magic bytes.
    ///
    /// A ZIP container is reported as DOCX; nothing else in the closed set
    /// is zip-based.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

        if bytes.starts_with(b"%PDF-") {
            Some(Self::Pdf)
        } else if bytes.starts_with(b"{\\rtf") {
            Some(Self::Rtf)
        } else if bytes.starts_with(b"PK\x03\x04") {
            Some(Self::Docx)
        } else if bytes.starts_with(OLE2_MAGIC) {
            Some(Self::Doc)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = DocweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| DocweaveError::UnknownFormat(s.to_string()))
    }
}

/// A named capability a manipulator may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Mail-merge a document against field data.
    Merge,
    /// Concatenate two documents.
    Append,
    /// Concatenate one document with an ordered list of others.
    AppendMultiple,
    /// Composite a foreground document over a background document.
    Layer,
    /// Introspect a document for mail-merge placeholders.
    GetMergeFields,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Self::Merge,
        Self::Append,
        Self::AppendMultiple,
        Self::Layer,
        Self::GetMergeFields,
    ];

    /// Operation name as used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Append => "append",
            Self::AppendMultiple => "appendMultiple",
            Self::Layer => "layer",
            Self::GetMergeFields => "getMergeFields",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field data for a mail merge.
///
/// `fields` holds scalar placeholders. `blocks` holds repeating sections,
/// one nested record per repetition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeData {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub blocks: BTreeMap<String, Vec<MergeData>>,
}

impl MergeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style scalar field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style repeating block setter.
    pub fn with_block(mut self, name: impl Into<String>, rows: Vec<MergeData>) -> Self {
        self.blocks.insert(name.into(), rows);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.blocks.is_empty()
    }
}

/// A mail-merge placeholder found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MergeField {
    /// A scalar placeholder.
    Field { name: String },
    /// A repeating section and the placeholders inside it.
    Block { name: String, fields: Vec<MergeField> },
}

impl MergeField {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field { name: name.into() }
    }

    pub fn block(name: impl Into<String>, fields: Vec<MergeField>) -> Self {
        Self::Block {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Field { name } | Self::Block { name, .. } => name,
        }
    }
}
