//! Synthesis
//!
//! Composes the price, stock and variation generators into a complete
//! expected [`ProductModel`] for one test scenario. The synthesizer only
//! reads from its collaborators (branch list, default language, VAT list,
//! feature list); it never writes to the backend.

use chrono::Utc;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    backend::{BackendError, SellerBackend, active_branch_ids},
    products::{
        BranchId, BranchStock, ChannelVisibility, InventoryManagement, ItemAttribute,
        MAX_PRICE, ModelVariant, PackageDimensions, PriceTriad, ProductModel, SeoFields,
        TaxInfo, VariantStatus,
    },
};

pub mod prices;
pub mod stock;
pub mod variations;

/// Most item attributes a synthesized product may carry.
pub const MAX_ATTRIBUTES: usize = 9;

/// Errors raised while synthesizing an expected product model.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The store has no active branch; stock cannot be allocated anywhere.
    #[error("store has no active branch")]
    NoActiveBranch,

    /// The seller has no VAT option configured.
    #[error("seller has no VAT option")]
    NoVatOption,

    /// A collaborator call failed; propagated unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Feature flags and inputs describing the product a scenario wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Generate variation groups and one model per combination
    pub has_model: bool,

    /// Pin the cost price to 0
    pub no_cost: bool,

    /// Pin the selling price to the listing price
    pub no_discount: bool,

    /// Track stock by IMEI/serial numbers instead of plain quantities
    pub manage_by_imei: bool,

    /// Attach SEO fields
    pub has_seo: bool,

    /// Attach shipping dimensions
    pub has_dimension: bool,

    /// Manage stock by lot/batch; ignored (forced false) under IMEI
    pub has_lot: bool,

    /// Attach a random number of item attributes
    pub has_attribution: bool,

    /// Request web-storefront visibility
    pub on_web: bool,

    /// Request buyer-app visibility
    pub on_app: bool,

    /// Request in-store visibility
    pub in_store: bool,

    /// Request GoSocial visibility
    pub in_gosocial: bool,

    /// Stock quantities to allocate to active branches, in branch order;
    /// under IMEI management these are distinct-serial counts
    pub branch_stock: Vec<u32>,

    /// Display priority; 0 means none configured
    pub priority: u32,

    /// Exclusive upper bound for generated listing prices, in minor units
    pub max_price: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            has_model: false,
            no_cost: false,
            no_discount: false,
            manage_by_imei: false,
            has_seo: false,
            has_dimension: false,
            has_lot: false,
            has_attribution: false,
            on_web: true,
            on_app: true,
            in_store: true,
            in_gosocial: true,
            branch_stock: Vec::new(),
            priority: 0,
            max_price: MAX_PRICE,
        }
    }
}

/// Synthesizes a complete expected product model from the scenario
/// configuration and the seller's reference data.
///
/// Collaborator reads are the only side effects. Repeated calls never
/// collide on product name thanks to a millisecond timestamp suffix, while
/// all randomized choices come from the caller's rng so a scenario can be
/// replayed from its seed.
///
/// # Errors
///
/// - [`SynthesisError::NoActiveBranch`]: the store has no active branch.
/// - [`SynthesisError::NoVatOption`]: the seller has no VAT option.
/// - [`SynthesisError::Backend`]: a collaborator call failed.
pub fn synthesize(
    backend: &dyn SellerBackend,
    config: &SynthesisConfig,
    rng: &mut impl Rng,
) -> Result<ProductModel, SynthesisError> {
    let branches = backend.branch_list()?;
    let active = active_branch_ids(&branches);

    if active.is_empty() {
        return Err(SynthesisError::NoActiveBranch);
    }

    let language = backend.default_language()?;
    let vat = backend.vat_list()?;
    let tax = vat
        .first()
        .map(|option| TaxInfo {
            id: option.id,
            name: option.name.clone(),
        })
        .ok_or(SynthesisError::NoVatOption)?;

    let features = backend.user_features()?;

    let timestamp = Utc::now().timestamp_millis();
    let inventory = if config.manage_by_imei {
        InventoryManagement::ImeiSerialNumber
    } else {
        InventoryManagement::Product
    };

    // Lot-tracking and IMEI management are mutually exclusive; IMEI wins.
    let lot_available = config.has_lot && !config.manage_by_imei;

    let name = product_name(&language, inventory, config.has_model, timestamp);
    let description = format!("[{language}] description of {name}");

    let mut model = ProductModel {
        id: 0,
        language: language.clone(),
        name: name.clone(),
        description: description.clone(),
        prices: PriceTriad::default(),
        inventory,
        lot_available,
        branch_stock: BranchStock::default(),
        branch_serials: FxHashMap::default(),
        variation_groups: None,
        variants: Vec::new(),
        attributes: Vec::new(),
        seo: None,
        dimensions: None,
        tax: Some(tax),
        channels: ChannelVisibility {
            on_web: config.on_web && features.has_web_channel(),
            on_app: config.on_app && features.has_app_channel(),
            in_store: config.in_store && features.has_in_store_channel(),
            in_gosocial: config.in_gosocial && features.has_social_channel(),
        },
        show_out_of_stock: true,
        hide_stock: false,
        priority: config.priority,
    };

    if config.has_model {
        let groups = variations::generate(rng, &language);
        let combinations = groups.combinations();

        debug!(
            combinations = combinations.len(),
            groups = groups.len(),
            "generated variation groups"
        );

        model.variants = combinations
            .iter()
            .enumerate()
            .map(|(index, value)| ModelVariant {
                value: value.clone(),
                name: format!("{name} - {value}"),
                description: description.clone(),
                sku: format!("sku-{value}-{timestamp}"),
                barcode: format!("{timestamp}{index}"),
                status: VariantStatus::Active,
                prices: prices::draw_triad(
                    rng,
                    config.max_price,
                    config.no_discount,
                    config.no_cost,
                ),
                branch_stock: stock::allocate(&active, &config.branch_stock, lot_available),
            })
            .collect();

        model.variation_groups = Some(groups);
        model.prices = model.rolled_up_prices();
    } else {
        model.prices =
            prices::draw_triad(rng, config.max_price, config.no_discount, config.no_cost);
        model.branch_stock = stock::allocate(&active, &config.branch_stock, lot_available);

        if config.manage_by_imei {
            model.branch_serials = serial_entries(&name, &model.branch_stock);
        }
    }

    if config.has_attribution {
        let count = rng.gen_range(0..=MAX_ATTRIBUTES);

        model.attributes = (1..=count)
            .map(|index| ItemAttribute {
                name: format!("attribute_{index}_{timestamp}"),
                value: format!("value_{index}_{timestamp}"),
                displayed: rng.gen_bool(0.5),
            })
            .collect();
    }

    if config.has_seo {
        model.seo = Some(SeoFields {
            title: format!("seo title {language} {timestamp}"),
            description: format!("seo description {language} {timestamp}"),
            keywords: format!("seo,keyword,{language},{timestamp}"),
            url: format!("seo-url-{timestamp}"),
        });
    }

    if config.has_dimension {
        model.dimensions = Some(PackageDimensions {
            length_cm: rng.gen_range(1..=100),
            width_cm: rng.gen_range(1..=100),
            height_cm: rng.gen_range(1..=100),
            weight_grams: rng.gen_range(1..=10_000),
        });
    }

    debug!(name = %model.name, variants = model.variants.len(), "synthesized expected model");

    Ok(model)
}

/// Builds the unique product name, encoding language, inventory mode and
/// variation status plus a millisecond timestamp.
fn product_name(
    language: &str,
    inventory: InventoryManagement,
    has_model: bool,
    timestamp: i64,
) -> String {
    let mode = match inventory {
        InventoryManagement::Product => "normal",
        InventoryManagement::ImeiSerialNumber => "imei",
    };
    let shape = if has_model { "variation" } else { "simple" };

    format!("{language} {mode} {shape} product {timestamp}")
}

/// Generates the per-branch distinct serial entries for an IMEI-managed
/// product: one serial per unit of allocated stock.
fn serial_entries(
    name: &str,
    branch_stock: &BranchStock,
) -> FxHashMap<BranchId, Vec<String>> {
    branch_stock
        .iter()
        .map(|(branch, quantity)| {
            let serials = (1..=*quantity)
                .map(|unit| format!("{name} sn {branch} {unit}"))
                .collect();

            (*branch, serials)
        })
        .collect()
}
