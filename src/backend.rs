//! Backend
//!
//! Read-only collaborator interfaces the synthesizer and oracle depend on.
//! The real implementations (a REST client against the seller platform) live
//! outside this crate; [`InMemoryBackend`] is the in-process stand-in used by
//! tests, fixtures and the demo.

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{BranchId, ProductModel};

/// Errors surfaced by backend collaborators.
///
/// The synthesizer and oracle propagate these unchanged; there is no fallback
/// or default substitution for missing reference data.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No product exists with the given id.
    #[error("product {0} not found")]
    ProductNotFound(u64),

    /// No product exists with the given name.
    #[error("no product named '{0}'")]
    NameNotFound(String),

    /// The backend could not serve the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// A store branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Backend id of the branch
    pub id: BranchId,

    /// Branch display name
    pub name: String,

    /// Whether the branch is active; stock only lives at active branches
    pub active: bool,
}

/// A VAT/tax option available to the seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatOption {
    /// Backend id of the tax option
    pub id: u64,

    /// Display name of the tax option
    pub name: String,
}

/// Sales channels granted by the seller's subscription package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Web storefront channel
    pub web: bool,

    /// Buyer app channel
    pub app: bool,

    /// In-store (POS) channel
    pub in_store: bool,

    /// GoSocial channel
    pub go_social: bool,
}

impl FeatureSet {
    /// A package granting every sales channel.
    pub fn all() -> Self {
        Self {
            web: true,
            app: true,
            in_store: true,
            go_social: true,
        }
    }

    /// Whether the web channel is granted.
    pub fn has_web_channel(&self) -> bool {
        self.web
    }

    /// Whether the buyer-app channel is granted.
    pub fn has_app_channel(&self) -> bool {
        self.app
    }

    /// Whether the in-store channel is granted.
    pub fn has_in_store_channel(&self) -> bool {
        self.in_store
    }

    /// Whether the GoSocial channel is granted.
    pub fn has_social_channel(&self) -> bool {
        self.go_social
    }
}

/// Read-only view of the seller platform's backend.
pub trait SellerBackend {
    /// All branches of the store, active and inactive.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the branch list cannot be fetched.
    fn branch_list(&self) -> Result<Vec<Branch>, BackendError>;

    /// The store's default language code.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the store information cannot be fetched.
    fn default_language(&self) -> Result<String, BackendError>;

    /// The seller's VAT/tax options.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the VAT list cannot be fetched.
    fn vat_list(&self) -> Result<Vec<VatOption>, BackendError>;

    /// The sales channels the seller's subscription grants.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the feature list cannot be fetched.
    fn user_features(&self) -> Result<FeatureSet, BackendError>;

    /// The persisted state of a product, the oracle's ground truth.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ProductNotFound`] if no product has this id.
    fn product_detail(&self, id: u64) -> Result<ProductModel, BackendError>;

    /// Resolves a freshly created product's id by its (unique) name.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NameNotFound`] if no product has this name.
    fn search_product_id_by_name(&self, name: &str) -> Result<u64, BackendError>;
}

/// Returns the ids of the active branches, in branch-list order.
pub fn active_branch_ids(branches: &[Branch]) -> Vec<BranchId> {
    branches
        .iter()
        .filter(|branch| branch.active)
        .map(|branch| branch.id)
        .collect()
}

/// In-process [`SellerBackend`] seeded with reference data.
///
/// Product storage uses interior mutability so appliers can persist models
/// through a shared handle; scenarios are single-threaded by design, so a
/// `RefCell` suffices.
#[derive(Debug)]
pub struct InMemoryBackend {
    branches: Vec<Branch>,
    language: String,
    vat: Vec<VatOption>,
    features: FeatureSet,
    products: RefCell<FxHashMap<u64, ProductModel>>,
    next_id: Cell<u64>,
}

impl InMemoryBackend {
    /// Creates a backend with the given reference data and no products.
    pub fn new(
        branches: Vec<Branch>,
        language: impl Into<String>,
        vat: Vec<VatOption>,
        features: FeatureSet,
    ) -> Self {
        Self {
            branches,
            language: language.into(),
            vat,
            features,
            products: RefCell::new(FxHashMap::default()),
            next_id: Cell::new(1),
        }
    }

    /// Persists a product, assigning it a fresh id, and returns that id.
    pub fn insert_product(&self, mut model: ProductModel) -> u64 {
        let id = self.next_id.get();

        self.next_id.set(id + 1);
        model.id = id;
        self.products.borrow_mut().insert(id, model);

        id
    }

    /// Replaces the stored state of an existing product.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ProductNotFound`] if no product has this id.
    pub fn update_product(&self, id: u64, mut model: ProductModel) -> Result<(), BackendError> {
        let mut products = self.products.borrow_mut();

        if !products.contains_key(&id) {
            return Err(BackendError::ProductNotFound(id));
        }

        model.id = id;
        products.insert(id, model);

        Ok(())
    }
}

impl SellerBackend for InMemoryBackend {
    fn branch_list(&self) -> Result<Vec<Branch>, BackendError> {
        Ok(self.branches.clone())
    }

    fn default_language(&self) -> Result<String, BackendError> {
        Ok(self.language.clone())
    }

    fn vat_list(&self) -> Result<Vec<VatOption>, BackendError> {
        Ok(self.vat.clone())
    }

    fn user_features(&self) -> Result<FeatureSet, BackendError> {
        Ok(self.features)
    }

    fn product_detail(&self, id: u64) -> Result<ProductModel, BackendError> {
        self.products
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(BackendError::ProductNotFound(id))
    }

    fn search_product_id_by_name(&self, name: &str) -> Result<u64, BackendError> {
        self.products
            .borrow()
            .values()
            .find(|product| product.name == name)
            .map(|product| product.id)
            .ok_or_else(|| BackendError::NameNotFound(name.to_string()))
    }
}
