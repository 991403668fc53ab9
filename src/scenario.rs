//! Scenarios
//!
//! A scenario is the explicit context object carried from generation to
//! verification: a seed plus a synthesis configuration. The seed fixes
//! every randomized choice, so a failing scenario can be replayed exactly;
//! nothing is stashed in shared state between the two phases.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    backend::SellerBackend,
    products::ProductModel,
    synthesis::{self, SynthesisConfig, SynthesisError},
};

/// One replayable test scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Seed for every randomized choice in this scenario
    pub seed: u64,

    /// What kind of product to synthesize
    pub config: SynthesisConfig,
}

impl Scenario {
    /// Creates a scenario from a seed and configuration.
    pub fn new(seed: u64, config: SynthesisConfig) -> Self {
        Self { seed, config }
    }

    /// Synthesizes this scenario's expected product model from a freshly
    /// seeded rng. Calling this twice against the same reference data
    /// yields models that differ only in their timestamped content.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] when reference data is missing or a
    /// collaborator call fails.
    pub fn synthesize(&self, backend: &dyn SellerBackend) -> Result<ProductModel, SynthesisError> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        synthesis::synthesize(backend, &self.config, &mut rng)
    }
}
