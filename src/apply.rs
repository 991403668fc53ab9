//! Apply
//!
//! The seam between this crate and the UI drivers. Applying an expected
//! model to the application is platform work (Android, iOS, Web) and lives
//! outside this crate; implementations plug in through [`ModelApplier`].
//! [`InMemoryApplier`] persists straight into an [`InMemoryBackend`] so
//! tests and the demo can exercise the full synthesize → apply → verify
//! loop without a device.

use std::{fmt, rc::Rc};

use thiserror::Error;

use crate::{
    backend::{BackendError, InMemoryBackend, SellerBackend},
    products::ProductModel,
};

/// The platform a [`ModelApplier`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Android seller app
    Android,

    /// iOS seller app
    Ios,

    /// Web dashboard
    Web,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => f.write_str("Android"),
            Platform::Ios => f.write_str("iOS"),
            Platform::Web => f.write_str("Web"),
        }
    }
}

/// Errors raised while applying an expected model.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The backend rejected the created product or could not resolve it.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Applies an expected product model to the application under test and
/// resolves the created product's id.
pub trait ModelApplier {
    /// The platform this applier drives.
    fn platform(&self) -> Platform;

    /// Creates the product described by `model` and returns its backend id.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] when creation fails or the new product's
    /// id cannot be resolved.
    fn apply(&mut self, model: &ProductModel) -> Result<u64, ApplyError>;
}

/// Applier that persists directly into an [`InMemoryBackend`], resolving
/// the new id by name afterwards exactly like the UI flow does.
#[derive(Debug)]
pub struct InMemoryApplier {
    backend: Rc<InMemoryBackend>,
    platform: Platform,
}

impl InMemoryApplier {
    /// Creates an applier writing into the given backend.
    pub fn new(backend: Rc<InMemoryBackend>, platform: Platform) -> Self {
        Self { backend, platform }
    }
}

impl ModelApplier for InMemoryApplier {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn apply(&mut self, model: &ProductModel) -> Result<u64, ApplyError> {
        self.backend.insert_product(model.clone());

        // The UI layer never sees the id of the product it just created;
        // resolve it through the search endpoint like the real flow.
        let id = self.backend.search_product_id_by_name(&model.name)?;

        Ok(id)
    }
}
