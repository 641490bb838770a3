// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for command-line users.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::DocweaveError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary condition (busy disk, interrupted write); trying again may work.
    Transient,
    /// The user must change something (configuration, arguments, file choice).
    ActionRequired,
    /// The document itself cannot be processed as-is.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether repeating the same command might succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `DocweaveError` into a `HumanError`.
pub fn humanize_error(err: &DocweaveError) -> HumanError {
    match err {
        // -- Configuration --
        DocweaveError::ManipulatorNotFound { format, operation } => HumanError {
            message: format!("Nothing is set up to {} {} documents.", verb(*operation), format),
            suggestion: "Add a manipulator that handles this format to the configuration, or convert the document to a supported format first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocweaveError::UnknownManipulator(name) => HumanError {
            message: format!("The configuration lists an unknown manipulator \"{name}\"."),
            suggestion: "Check the spelling in the configuration file. Built-in manipulators: pdf.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocweaveError::InvalidConfig(detail) => HumanError {
            message: "The configuration file isn't valid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Preconditions --
        DocweaveError::InvalidArgument(detail) => HumanError {
            message: "The command was given the wrong inputs.".into(),
            suggestion: format!("Check the arguments and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocweaveError::UnknownFormat(detail) => HumanError {
            message: "This type of document isn't supported.".into(),
            suggestion: format!("Use a DOC, DOCX, PDF or RTF file. (Got: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Backend --
        DocweaveError::Unsupported { manipulator, operation } => HumanError {
            message: format!("The \"{manipulator}\" manipulator claims to {} documents but can't.", verb(*operation)),
            suggestion: "This is a bug in the manipulator. Register a different one ahead of it in the configuration.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocweaveError::Pdf(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged or encrypted. Try opening it in a PDF viewer first to check it works.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocweaveError::Backend(source) => HumanError {
            message: "The document backend failed.".into(),
            suggestion: format!("Check the input documents and try again. (Detail: {source})"),
            retriable: true,
            severity: Severity::Transient,
        },

        DocweaveError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path. It may have been moved or deleted.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading or writing a file.".into(),
                    suggestion: "Check the file and directory permissions.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        DocweaveError::Serialization(detail) => HumanError {
            message: "A JSON file couldn't be read.".into(),
            suggestion: format!("Check the JSON syntax. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

fn verb(operation: crate::types::Operation) -> &'static str {
    use crate::types::Operation;

    match operation {
        Operation::Merge => "mail-merge",
        Operation::Append | Operation::AppendMultiple => "combine",
        Operation::Layer => "layer",
        Operation::GetMergeFields => "list merge fields in",
    }
}
