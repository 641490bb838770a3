// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Chain configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocweaveError, Result};

/// Settings used to assemble a manipulator chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Backend names, in registration order. Earlier entries win ties.
    pub manipulators: Vec<String>,
    /// Directory for documents saved without an explicit path
    /// (system temp dir when unset).
    pub output_dir: Option<PathBuf>,
    /// Options for the built-in PDF backend.
    pub pdf: PdfSettings,
}

/// Options for the built-in PDF backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// PDF header version written on output.
    pub version: String,
    /// Compress content streams before saving.
    pub compress: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            manipulators: vec!["pdf".to_string()],
            output_dir: None,
            pdf: PdfSettings::default(),
        }
    }
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            version: "1.5".to_string(),
            compress: true,
        }
    }
}

impl ChainConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Effective directory for documents saved without a path.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn validate(&self) -> Result<()> {
        if self.manipulators.is_empty() {
            return Err(DocweaveError::InvalidConfig(
                "at least one manipulator must be listed".into(),
            ));
        }
        if let Some(blank) = self.manipulators.iter().position(|name| name.trim().is_empty()) {
            return Err(DocweaveError::InvalidConfig(format!(
                "manipulator #{} has an empty name",
                blank + 1
            )));
        }
        if !matches!(
            self.pdf.version.as_str(),
            "1.3" | "1.4" | "1.5" | "1.6" | "1.7" | "2.0"
        ) {
            return Err(DocweaveError::InvalidConfig(format!(
                "unsupported PDF version {}",
                self.pdf.version
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_pdf_backend() {
        let config = ChainConfig::default();
        assert_eq!(config.manipulators, ["pdf"]);
        assert_eq!(config.pdf.version, "1.5");
        assert!(config.pdf.compress);
        assert_eq!(config.resolved_output_dir(), std::env::temp_dir());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = ChainConfig::from_json_str(r#"{"output_dir":"/srv/out"}"#).unwrap();
        assert_eq!(config.manipulators, ["pdf"]);
        assert_eq!(config.resolved_output_dir(), PathBuf::from("/srv/out"));
    }

    #[test]
    fn empty_manipulator_list_is_rejected() {
        let err = ChainConfig::from_json_str(r#"{"manipulators":[]}"#).unwrap_err();
        assert!(matches!(err, DocweaveError::InvalidConfig(_)));
    }

    #[test]
    fn unsupported_pdf_version_is_rejected() {
        let err = ChainConfig::from_json_str(r#"{"pdf":{"version":"9.9"}}"#).unwrap_err();
        assert!(matches!(err, DocweaveError::InvalidConfig(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        std::fs::write(&path, r#"{"manipulators":["pdf"],"pdf":{"compress":false}}"#).unwrap();

        let config = ChainConfig::from_json_file(&path).unwrap();
        assert!(!config.pdf.compress);
        assert_eq!(config.pdf.version, "1.5");
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = ChainConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, DocweaveError::Serialization(_)));
    }
}
