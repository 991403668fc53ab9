//! Variation Generation
//!
//! Builds randomized variation-group sets: the group and variant counts are
//! drawn from the rng, while the group names and values themselves are
//! deterministic in the seed language and the chosen counts.

use rand::Rng;

use crate::products::{VariationGroup, VariationGroups};

/// Most variants a single-group product may have.
pub const MAX_SINGLE_GROUP_VARIANTS: usize = 5;

/// Most variants a two-group product may have.
pub const MAX_TWO_GROUP_VARIANTS: usize = 10;

/// Generates a variation-group set for the given language.
///
/// Chooses 1 or 2 groups uniformly, then a total variant count uniform in
/// `[1, 5]` for one group or `[1, 10]` for two. A two-group total is split
/// into `(a, b)` sizes via [`split_total`]. Values follow the fixed
/// `"{lang}_var{group}_{value}"` scheme (1-based indices), so only the
/// counts are random.
pub fn generate(rng: &mut impl Rng, language: &str) -> VariationGroups {
    if rng.gen_bool(0.5) {
        let total = rng.gen_range(1..=MAX_TWO_GROUP_VARIANTS);
        let (first, second) = split_total(total);

        VariationGroups::new([
            group(language, 1, first),
            group(language, 2, second),
        ])
    } else {
        let total = rng.gen_range(1..=MAX_SINGLE_GROUP_VARIANTS);

        VariationGroups::new([group(language, 1, total)])
    }
}

/// Splits a two-group variant total into `(a, b)` with `a * b == total`,
/// where `a` is the smallest divisor of `total` in `[2, 5]`.
///
/// When no divisor in that range exists (totals 1 and 7), falls back to
/// `(1, total)`, which degenerates to one effective group. That fallback is
/// documented upstream behavior and is preserved as-is.
pub fn split_total(total: usize) -> (usize, usize) {
    (2..=5)
        .find(|candidate| total % candidate == 0)
        .map_or((1, total), |candidate| (candidate, total / candidate))
}

fn group(language: &str, group_index: usize, value_count: usize) -> VariationGroup {
    let values = (1..=value_count)
        .map(|value_index| format!("{language}_var{group_index}_{value_index}"))
        .collect();

    VariationGroup::new(format!("{language}_group{group_index}"), values)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn split_picks_smallest_divisor_in_range() {
        assert_eq!(split_total(2), (2, 1));
        assert_eq!(split_total(4), (2, 2));
        assert_eq!(split_total(6), (2, 3));
        assert_eq!(split_total(9), (3, 3));
        assert_eq!(split_total(10), (2, 5));
        assert_eq!(split_total(25), (5, 5));
    }

    #[test]
    fn split_falls_back_when_nothing_divides() {
        assert_eq!(split_total(1), (1, 1));
        assert_eq!(split_total(7), (1, 7));
    }

    #[test]
    fn generated_counts_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..1000 {
            let groups = generate(&mut rng, "en");
            let count = groups.combination_count();

            assert!(
                groups.len() == 1 || groups.len() == 2,
                "unexpected group count: {}",
                groups.len()
            );
            assert!(
                (1..=MAX_TWO_GROUP_VARIANTS).contains(&count),
                "combination count out of range: {count}"
            );

            if groups.len() == 1 {
                assert!(
                    count <= MAX_SINGLE_GROUP_VARIANTS,
                    "single group exceeded bound: {count}"
                );
            }
        }
    }

    #[test]
    fn two_group_sizes_multiply_to_split_total() {
        let mut rng = StdRng::seed_from_u64(22);

        for _ in 0..1000 {
            let groups = generate(&mut rng, "en");

            if let [first, second] = groups.groups() {
                let total = first.values.len() * second.values.len();

                assert_eq!(
                    (first.values.len(), second.values.len()),
                    split_total(total),
                    "split was not minimal for total {total}"
                );
            }
        }
    }

    #[test]
    fn values_follow_language_and_index_scheme() {
        let mut rng = StdRng::seed_from_u64(23);
        let groups = generate(&mut rng, "vi");

        for (group_position, group) in groups.groups().iter().enumerate() {
            let group_index = group_position + 1;

            assert_eq!(group.name, format!("vi_group{group_index}"));

            for (value_position, value) in group.values.iter().enumerate() {
                assert_eq!(
                    value,
                    &format!("vi_var{group_index}_{}", value_position + 1)
                );
            }
        }
    }

    #[test]
    fn generated_groups_round_trip_through_composites() {
        let mut rng = StdRng::seed_from_u64(24);

        for _ in 0..200 {
            let groups = generate(&mut rng, "en");

            let rebuilt = VariationGroups::from_composite(
                &groups.composite_name(),
                &groups.combinations(),
            );

            assert_eq!(rebuilt, groups, "composite round-trip diverged");
        }
    }
}
