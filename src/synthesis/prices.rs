//! Price Generation
//!
//! Draws randomized price triads that always honor the ordering invariant
//! `listing >= selling >= cost >= 0`.

use rand::Rng;

use crate::products::{Price, PriceTriad};

/// Draws a `(listing, selling, cost)` triad.
///
/// - `listing` is uniform in `[0, max_price)`;
/// - `selling` equals `listing` under `no_discount`, otherwise uniform in
///   `[0, max(listing, 1))`;
/// - `cost` is 0 under `no_cost`, otherwise uniform in
///   `[0, max(selling, 1))`.
///
/// The `max(_, 1)` guards keep the draw ranges non-empty when the bound
/// lands on 0, so the ordering invariant holds for every draw including the
/// zero boundaries.
pub fn draw_triad(
    rng: &mut impl Rng,
    max_price: u64,
    no_discount: bool,
    no_cost: bool,
) -> PriceTriad {
    let listing = rng.gen_range(0..max_price.max(1));

    let selling = if no_discount {
        listing
    } else {
        rng.gen_range(0..listing.max(1))
    };

    let cost = if no_cost {
        0
    } else {
        rng.gen_range(0..selling.max(1))
    };

    PriceTriad {
        listing: Price::new(listing),
        selling: Price::new(selling),
        cost: Price::new(cost),
    }
}
