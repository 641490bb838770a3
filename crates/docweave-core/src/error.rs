// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docweave.

use thiserror::Error;

use crate::types::{DocumentFormat, Operation};

/// Top-level error type for all Docweave operations.
#[derive(Debug, Error)]
pub enum DocweaveError {
    // -- Chain configuration --
    #[error("no manipulator found for {format} documents supporting '{operation}'")]
    ManipulatorNotFound {
        format: DocumentFormat,
        operation: Operation,
    },

    #[error("unknown manipulator: {0}")]
    UnknownManipulator(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Caller preconditions --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown document format: {0}")]
    UnknownFormat(String),

    // -- Backend failures --
    #[error("manipulator '{manipulator}' does not implement '{operation}'")]
    Unsupported {
        manipulator: String,
        operation: Operation,
    },

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Which side of the system an error comes from.
///
/// Callers should at minimum tell a missing capability apart from a backend
/// that ran and failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The chain is not set up to handle the request.
    Configuration,
    /// The caller passed arguments or files the operation cannot accept,
    /// including input files that cannot be read and outputs that cannot be
    /// written.
    Precondition,
    /// A result was being produced and that failed: a manipulator error, or
    /// encoding the result.
    Backend,
}

impl DocweaveError {
    /// Wrap an arbitrary error raised inside an external manipulator.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ManipulatorNotFound { .. }
            | Self::UnknownManipulator(_)
            | Self::InvalidConfig(_) => ErrorClass::Configuration,

            Self::InvalidArgument(_) | Self::UnknownFormat(_) | Self::Io(_) => {
                ErrorClass::Precondition
            }

            Self::Unsupported { .. }
            | Self::Pdf(_)
            | Self::Backend(_)
            | Self::Serialization(_) => ErrorClass::Backend,
        }
    }

    /// Whether the failure happened while producing a result, as opposed to
    /// routing or the caller's inputs.
    pub fn is_backend(&self) -> bool {
        self.class() == ErrorClass::Backend
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocweaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_format_and_operation() {
        let err = DocweaveError::ManipulatorNotFound {
            format: DocumentFormat::Docx,
            operation: Operation::Append,
        };
        assert_eq!(
            err.to_string(),
            "no manipulator found for docx documents supporting 'append'"
        );
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn classification() {
        assert_eq!(
            DocweaveError::InvalidArgument("x".into()).class(),
            ErrorClass::Precondition
        );
        assert_eq!(DocweaveError::Pdf("x".into()).class(), ErrorClass::Backend);
        assert!(DocweaveError::backend("tool crashed").is_backend());

    }

    #[test]
    fn unreadable_files_are_caller_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DocweaveError::from(io);
        assert_eq!(err.class(), ErrorClass::Precondition);
        assert!(!err.is_backend());
    }

    #[test]
    fn backend_keeps_source() {
        use std::error::Error as _;

        let err = DocweaveError::backend(std::io::Error::other("converter exited 1"));
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "converter exited 1");
    }
}
