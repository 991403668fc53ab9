//! Variation Groups
//!
//! A product has one or two named variation groups (e.g. Colour, Size), each
//! with an ordered list of distinct values. The cartesian combinations of the
//! group values define the product's variation models; a combination is
//! written as the group values joined by `|` in fixed group order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Separator used for composite group names and composite variation values.
pub const COMPOSITE_SEPARATOR: char = '|';

/// A named variation group with its ordered, distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationGroup {
    /// Group name (e.g. `Colour`)
    pub name: String,

    /// Ordered distinct values (e.g. `Red`, `Blue`)
    pub values: Vec<String>,
}

impl VariationGroup {
    /// Creates a group from a name and values.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// The ordered set of variation groups for one product (one or two groups).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationGroups {
    groups: SmallVec<[VariationGroup; 2]>,
}

impl VariationGroups {
    /// Creates a group set from the given groups, preserving their order.
    pub fn new(groups: impl IntoIterator<Item = VariationGroup>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    /// The groups, in the fixed order combinations are built in.
    pub fn groups(&self) -> &[VariationGroup] {
        &self.groups
    }

    /// Number of groups (1 or 2 for generated sets).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true when there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The composite group name: group names joined by `|`.
    pub fn composite_name(&self) -> String {
        self.groups
            .iter()
            .map(|group| group.name.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Number of cartesian combinations of the group values.
    pub fn combination_count(&self) -> usize {
        if self.groups.is_empty() {
            0
        } else {
            self.groups.iter().map(|group| group.values.len()).product()
        }
    }

    /// All cartesian combinations as composite values, group values joined by
    /// `|` in group order. The last group varies fastest.
    pub fn combinations(&self) -> Vec<String> {
        self.groups.iter().fold(Vec::new(), |acc, group| {
            if acc.is_empty() {
                group.values.clone()
            } else {
                acc.iter()
                    .flat_map(|prefix| {
                        group
                            .values
                            .iter()
                            .map(move |value| format!("{prefix}|{value}"))
                    })
                    .collect()
            }
        })
    }

    /// Reconstructs the group set from a composite group name (`"A|B"`) and a
    /// list of composite values (`"v1|v2"`), keeping each group's values
    /// distinct and in first-seen order.
    ///
    /// This is the inverse of [`VariationGroups::combinations`]: for any
    /// generated set `g`, `from_composite(g.composite_name(),
    /// &g.combinations()) == g`.
    pub fn from_composite<S: AsRef<str>>(composite_name: &str, composite_values: &[S]) -> Self {
        let mut groups: SmallVec<[VariationGroup; 2]> = composite_name
            .split(COMPOSITE_SEPARATOR)
            .map(|name| VariationGroup::new(name, Vec::new()))
            .collect();

        for composite in composite_values {
            for (group, part) in groups
                .iter_mut()
                .zip(composite.as_ref().split(COMPOSITE_SEPARATOR))
            {
                if !group.values.iter().any(|existing| existing == part) {
                    group.values.push(part.to_string());
                }
            }
        }

        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> VariationGroups {
        VariationGroups::new([
            VariationGroup::new(
                "Colour",
                vec!["Red".to_string(), "Blue".to_string()],
            ),
            VariationGroup::new(
                "Size",
                vec!["S".to_string(), "M".to_string(), "L".to_string()],
            ),
        ])
    }

    #[test]
    fn combination_count_is_product_of_group_sizes() {
        assert_eq!(two_groups().combination_count(), 6);
    }

    #[test]
    fn combinations_join_values_in_group_order() {
        let combos = two_groups().combinations();

        assert_eq!(
            combos,
            vec!["Red|S", "Red|M", "Red|L", "Blue|S", "Blue|M", "Blue|L"]
        );
    }

    #[test]
    fn single_group_combinations_are_bare_values() {
        let groups = VariationGroups::new([VariationGroup::new(
            "Colour",
            vec!["Red".to_string(), "Blue".to_string()],
        )]);

        assert_eq!(groups.combinations(), vec!["Red", "Blue"]);
        assert_eq!(groups.composite_name(), "Colour");
    }

    #[test]
    fn composite_name_joins_group_names() {
        assert_eq!(two_groups().composite_name(), "Colour|Size");
    }

    #[test]
    fn from_composite_round_trips_generated_groups() {
        let groups = two_groups();

        let rebuilt =
            VariationGroups::from_composite(&groups.composite_name(), &groups.combinations());

        assert_eq!(rebuilt, groups);
    }

    #[test]
    fn from_composite_deduplicates_values_in_first_seen_order() {
        let rebuilt = VariationGroups::from_composite(
            "Colour|Size",
            &["Blue|S", "Blue|M", "Red|S", "Red|M"],
        );

        assert_eq!(
            rebuilt.groups(),
            &[
                VariationGroup::new("Colour", vec!["Blue".to_string(), "Red".to_string()]),
                VariationGroup::new(
                    "Size",
                    vec!["S".to_string(), "M".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn empty_group_set_has_no_combinations() {
        let groups = VariationGroups::default();

        assert!(groups.is_empty());
        assert!(groups.combinations().is_empty());
    }
}
