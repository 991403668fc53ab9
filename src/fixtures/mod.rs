//! Fixtures
//!
//! YAML-backed scenario sets: a seed, a synthesis configuration and the
//! backend reference data to run it against. Lets a scenario be stored next
//! to the suite that uses it and replayed byte-for-byte.

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    backend::{Branch, FeatureSet, InMemoryBackend, VatOption},
    scenario::Scenario,
    synthesis::SynthesisConfig,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Backend reference data for one fixture set.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendFixture {
    /// Store default language code
    pub language: String,

    /// Store branches, active and inactive
    pub branches: Vec<Branch>,

    /// Seller VAT options
    pub vat: Vec<VatOption>,

    /// Channels granted by the seller's subscription
    #[serde(default)]
    pub features: FeatureSet,
}

/// A complete scenario fixture: seed, configuration and backend seed data.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFixture {
    /// Seed for the scenario's rng
    pub seed: u64,

    /// Synthesis configuration; defaults apply for omitted fields
    #[serde(default)]
    pub config: SynthesisConfig,

    /// Reference data the in-memory backend is seeded with
    pub backend: BackendFixture,
}

impl ScenarioFixture {
    /// Parses a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] when the document does not parse.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Loads a fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// The scenario this fixture describes.
    pub fn scenario(&self) -> Scenario {
        Scenario::new(self.seed, self.config.clone())
    }

    /// Builds a fresh in-memory backend seeded with the fixture's
    /// reference data and no products.
    pub fn backend(&self) -> InMemoryBackend {
        InMemoryBackend::new(
            self.backend.branches.clone(),
            self.backend.language.clone(),
            self.backend.vat.clone(),
            self.backend.features,
        )
    }
}
