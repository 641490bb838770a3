// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manipulator registry: builds a chain from the backend names listed in a
// `ChainConfig`.

use std::sync::Arc;

use docweave_core::config::ChainConfig;
use docweave_core::error::{DocweaveError, Result};
use tracing::info;

use crate::chain::ManipulatorChain;
use crate::manipulator::Manipulator;
use crate::pdf::PdfManipulator;

type Factory = Box<dyn Fn(&ChainConfig) -> Arc<dyn Manipulator> + Send + Sync>;

/// Named manipulator factories.
pub struct ManipulatorRegistry {
    factories: Vec<(String, Factory)>,
}

impl ManipulatorRegistry {
    /// A registry with no factories.
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// A registry containing the built-in backends (`pdf`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("pdf", |config| Arc::new(PdfManipulator::new(config.pdf.clone())));
        registry
    }

    /// Register a factory under `name`, replacing any existing one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&ChainConfig) -> Arc<dyn Manipulator> + Send + Sync + 'static,
    {
        let name = name.into().to_ascii_lowercase();
        self.factories.retain(|(existing, _)| *existing != name);
        self.factories.push((name, Box::new(factory)));
        self
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(name, _)| name.as_str())
    }

    /// Instantiate every manipulator named in `config`, in the listed order.
    pub fn build(&self, config: &ChainConfig) -> Result<ManipulatorChain> {
        config.validate()?;

        let mut chain = ManipulatorChain::default().with_output_dir(config.resolved_output_dir());
        for name in &config.manipulators {
            let wanted = name.trim().to_ascii_lowercase();
            let (_, factory) = self
                .factories
                .iter()
                .find(|(registered, _)| *registered == wanted)
                .ok_or_else(|| DocweaveError::UnknownManipulator(name.clone()))?;
            chain.add_shared(factory(config));
        }

        info!(
            manipulators = ?config.manipulators,
            output_dir = %chain.output_dir().display(),
            "Manipulator chain built"
        );
        Ok(chain)
    }
}

impl Default for ManipulatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ManipulatorChain {
    /// Build a chain from `config` using the built-in backends only.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        ManipulatorRegistry::with_builtins().build(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_core::types::{DocumentFormat, Operation};

    struct DocxFields;

    impl Manipulator for DocxFields {
        fn name(&self) -> &str {
            "docx-fields"
        }

        fn supports(&self, format: DocumentFormat, operation: Operation) -> bool {
            format == DocumentFormat::Docx && operation == Operation::GetMergeFields
        }
    }

    #[test]
    fn default_config_builds_pdf_chain() {
        let chain = ManipulatorChain::from_config(&ChainConfig::default()).unwrap();
        let names: Vec<&str> = chain.manipulators().map(|m| m.name()).collect();
        assert_eq!(names, ["pdf"]);
        assert_eq!(chain.output_dir(), std::env::temp_dir());
    }

    #[test]
    fn listed_order_is_registration_order() {
        let mut registry = ManipulatorRegistry::with_builtins();
        registry.register("DOCX-Fields", |_| Arc::new(DocxFields));

        let config = ChainConfig {
            manipulators: vec!["docx-fields".into(), "PDF".into()],
            output_dir: Some("/var/docweave".into()),
            ..ChainConfig::default()
        };
        let chain = registry.build(&config).unwrap();

        let names: Vec<&str> = chain.manipulators().map(|m| m.name()).collect();
        assert_eq!(names, ["docx-fields", "pdf"]);
        assert_eq!(chain.output_dir(), std::path::Path::new("/var/docweave"));
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        let config = ChainConfig {
            manipulators: vec!["pdf".into(), "libreoffice".into()],
            ..ChainConfig::default()
        };
        match ManipulatorChain::from_config(&config) {
            Err(DocweaveError::UnknownManipulator(name)) => assert_eq!(name, "libreoffice"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn register_replaces_existing_factory() {
        let mut registry = ManipulatorRegistry::with_builtins();
        registry.register("pdf", |_| Arc::new(DocxFields));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["pdf"]);

        let chain = registry.build(&ChainConfig::default()).unwrap();
        assert_eq!(chain.manipulators().next().unwrap().name(), "docx-fields");
    }
}
