//! Counterpart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    apply::{ApplyError, InMemoryApplier, ModelApplier, Platform},
    backend::{
        BackendError, Branch, FeatureSet, InMemoryBackend, SellerBackend, VatOption,
        active_branch_ids,
    },
    fixtures::{BackendFixture, FixtureError, ScenarioFixture},
    products::{
        BranchId, BranchStock, ChannelVisibility, InventoryManagement, ItemAttribute,
        MAX_PRICE, ModelVariant, PackageDimensions, Price, PriceTriad, ProductModel,
        SeoFields, TaxInfo, VariantStatus, VariationGroup, VariationGroups,
    },
    retry::{RetryError, RetryPolicy},
    scenario::Scenario,
    synthesis::{SynthesisConfig, SynthesisError, synthesize},
    verify::{
        ChannelChecks, Mismatch, Mismatches, OracleError, OracleOptions, compare,
        strip_html, verify, verify_strict,
    },
};
