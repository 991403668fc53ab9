//! Products
//!
//! The expected/actual product representation shared by the synthesizer and
//! the verification oracle. A [`ProductModel`] is synthesized fresh per test
//! scenario and discarded once the scenario's assertions complete; nothing in
//! this module persists state.

use std::{fmt, ops::Deref};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod variations;

pub use variations::{VariationGroup, VariationGroups};

/// Identifier of a store branch, as reported by the backend.
pub type BranchId = u64;

/// Mapping from branch id to a non-negative stock quantity.
///
/// Covers every active branch of the store; a missing entry means 0.
pub type BranchStock = FxHashMap<BranchId, u32>;

/// Upper bound (exclusive) for generated listing prices, in minor units.
pub const MAX_PRICE: u64 = 100_000_000;

/// Represents a price in minor units (pence/cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// Creates a new Price
    pub fn new(value: u64) -> Self {
        Price { value }
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// A (listing, selling, cost) price triad.
///
/// Every triad produced by this crate satisfies
/// `listing >= selling >= cost >= 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTriad {
    /// Listing (before-discount) price
    pub listing: Price,

    /// Selling (after-discount) price
    pub selling: Price,

    /// Cost price
    pub cost: Price,
}

impl PriceTriad {
    /// Creates a triad from raw minor-unit amounts.
    pub fn from_minor(listing: u64, selling: u64, cost: u64) -> Self {
        Self {
            listing: Price::new(listing),
            selling: Price::new(selling),
            cost: Price::new(cost),
        }
    }

    /// Returns true when `listing >= selling >= cost`.
    pub fn is_ordered(&self) -> bool {
        self.listing >= self.selling && self.selling >= self.cost
    }
}

/// How stock for a product is tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryManagement {
    /// Plain per-branch quantities.
    #[default]
    Product,

    /// Each unit is tracked by a unique serial/IMEI identifier; per-branch
    /// "stock" is the count of distinct serial entries.
    ImeiSerialNumber,
}

impl fmt::Display for InventoryManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryManagement::Product => f.write_str("PRODUCT"),
            InventoryManagement::ImeiSerialNumber => f.write_str("IMEI_SERIAL_NUMBER"),
        }
    }
}

/// Status of a single variation model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantStatus {
    /// The variation is purchasable.
    #[default]
    Active,

    /// The variation is hidden from buyers.
    Inactive,
}

impl fmt::Display for VariantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantStatus::Active => f.write_str("ACTIVE"),
            VariantStatus::Inactive => f.write_str("INACTIVE"),
        }
    }
}

/// A single (name, value, displayed) product attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttribute {
    /// Attribute name
    pub name: String,

    /// Attribute value
    pub value: String,

    /// Whether the attribute is shown on the product page
    pub displayed: bool,
}

impl fmt::Display for ItemAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} (displayed: {})", self.name, self.value, self.displayed)
    }
}

/// Per-language SEO fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoFields {
    /// SEO title
    pub title: String,

    /// SEO description
    pub description: String,

    /// SEO keywords
    pub keywords: String,

    /// SEO url slug
    pub url: String,
}

/// Shipping package dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDimensions {
    /// Length in centimetres
    pub length_cm: u32,

    /// Width in centimetres
    pub width_cm: u32,

    /// Height in centimetres
    pub height_cm: u32,

    /// Weight in grams
    pub weight_grams: u32,
}

/// Tax option attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInfo {
    /// Backend id of the tax option
    pub id: u64,

    /// Display name of the tax option
    pub name: String,
}

/// Per-sales-channel visibility flags.
///
/// A synthesized model never claims visibility on a channel the seller's
/// subscription package does not grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVisibility {
    /// Visible on the web storefront
    pub on_web: bool,

    /// Visible in the buyer app
    pub on_app: bool,

    /// Visible for in-store (POS) sales
    pub in_store: bool,

    /// Visible on the GoSocial channel
    pub in_gosocial: bool,
}

/// One element of a product's `models` list: a specific combination of
/// variation-group values with its own price triad and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Composite variation value, group values joined by `|` in group order
    pub value: String,

    /// Variation display name
    pub name: String,

    /// Variation description (may reuse the parent product's description)
    pub description: String,

    /// Stock keeping unit
    pub sku: String,

    /// Barcode
    pub barcode: String,

    /// Active/inactive status
    pub status: VariantStatus,

    /// Price triad for this variation
    pub prices: PriceTriad,

    /// Per-branch stock for this variation
    pub branch_stock: BranchStock,
}

impl ModelVariant {
    /// Total stock for this variation across all branches it was allocated to.
    pub fn total_stock(&self) -> u64 {
        self.branch_stock.values().map(|qty| u64::from(*qty)).sum()
    }
}

/// The expected (or backend-fetched actual) representation of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductModel {
    /// Backend id; 0 until the product has been created
    pub id: u64,

    /// Language code the localized content was generated for
    pub language: String,

    /// Product name
    pub name: String,

    /// Product description (may contain HTML in the backend's copy)
    pub description: String,

    /// Product-level price triad; for variation products this is the
    /// roll-up of the variation triads
    pub prices: PriceTriad,

    /// How stock is tracked
    pub inventory: InventoryManagement,

    /// Whether stock is managed per lot/batch; mutually exclusive with
    /// IMEI tracking, and forces direct branch quantities to 0
    pub lot_available: bool,

    /// Per-branch stock; for IMEI-managed products the quantity is the
    /// count of distinct serial entries per branch
    pub branch_stock: BranchStock,

    /// Generated serial/IMEI entries per branch, for IMEI-managed
    /// products without variations
    pub branch_serials: FxHashMap<BranchId, Vec<String>>,

    /// Variation groups this product was built from, when it has any
    pub variation_groups: Option<VariationGroups>,

    /// One entry per variation-group value combination; empty for
    /// products without variations
    pub variants: Vec<ModelVariant>,

    /// Ordered product attributes
    pub attributes: Vec<ItemAttribute>,

    /// SEO fields, when configured
    pub seo: Option<SeoFields>,

    /// Shipping dimensions, when configured
    pub dimensions: Option<PackageDimensions>,

    /// Tax option, taken from the seller's VAT list
    pub tax: Option<TaxInfo>,

    /// Sales-channel visibility
    pub channels: ChannelVisibility,

    /// Whether the storefront still displays the product when out of stock
    pub show_out_of_stock: bool,

    /// Whether the storefront hides remaining-stock numbers
    pub hide_stock: bool,

    /// Display priority; 0 means no priority configured
    pub priority: u32,
}

impl ProductModel {
    /// Returns true when the product carries variation models.
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// The price triad buyers effectively see.
    ///
    /// For variation products this is the triad of the cheapest variation by
    /// selling price (the storefront "from" price); otherwise the flat triad.
    pub fn rolled_up_prices(&self) -> PriceTriad {
        self.variants
            .iter()
            .min_by_key(|variant| variant.prices.selling)
            .map_or(self.prices, |variant| variant.prices)
    }

    /// Total stock across all branches, summing variation stock when the
    /// product has variations.
    pub fn total_stock(&self) -> u64 {
        if self.has_variants() {
            self.variants.iter().map(ModelVariant::total_stock).sum()
        } else {
            self.branch_stock.values().map(|qty| u64::from(*qty)).sum()
        }
    }
}
