//! Stock Allocation
//!
//! Maps caller-supplied stock quantities onto the store's active branches.

use crate::products::{BranchId, BranchStock};

/// Allocates supplied quantities to the active branches, in order.
///
/// The branch at position `i` receives `supplied[i]`, or 0 past the end of
/// the supplied slice. Under lot-tracking every quantity is forced to 0
/// (stock then lives in the lot subsystem, not on the branch). Every active
/// branch gets an entry; inactive branches never do.
pub fn allocate(active_branches: &[BranchId], supplied: &[u32], lot_available: bool) -> BranchStock {
    active_branches
        .iter()
        .enumerate()
        .map(|(position, id)| {
            let quantity = if lot_available {
                0
            } else {
                supplied.get(position).copied().unwrap_or(0)
            };

            (*id, quantity)
        })
        .collect()
}

/// Allocates bulk-increase quantities: the branch at position `i` receives
/// `base[i] + i * step`.
///
/// The per-branch offset keeps quantities distinct across branches, which is
/// what multi-branch bulk-edit verification relies on.
pub fn allocate_increased(active_branches: &[BranchId], base: &[u32], step: u32) -> BranchStock {
    let mut offset = 0u32;

    active_branches
        .iter()
        .enumerate()
        .map(|(position, id)| {
            let quantity = base.get(position).copied().unwrap_or(0) + offset;

            offset += step;

            (*id, quantity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_supplied_quantities_in_branch_order() {
        let stock = allocate(&[1, 2, 3], &[5, 0, 3], false);

        assert_eq!(stock.get(&1), Some(&5));
        assert_eq!(stock.get(&2), Some(&0));
        assert_eq!(stock.get(&3), Some(&3));
    }

    #[test]
    fn branches_past_supplied_slice_get_zero() {
        let stock = allocate(&[1, 2, 3, 4], &[7], false);

        assert_eq!(stock.get(&1), Some(&7));
        assert_eq!(stock.get(&2), Some(&0));
        assert_eq!(stock.get(&3), Some(&0));
        assert_eq!(stock.get(&4), Some(&0));
    }

    #[test]
    fn lot_tracking_forces_all_quantities_to_zero() {
        let stock = allocate(&[1, 2], &[5, 9], true);

        assert_eq!(stock.get(&1), Some(&0));
        assert_eq!(stock.get(&2), Some(&0));
    }

    #[test]
    fn every_active_branch_gets_an_entry_and_no_others() {
        let stock = allocate(&[10, 20, 30], &[], false);

        assert_eq!(stock.len(), 3);
        assert!(stock.keys().all(|id| [10, 20, 30].contains(id)));
    }

    #[test]
    fn increase_adds_position_times_step() {
        let stock = allocate_increased(&[1, 2, 3], &[10, 10, 10], 5);

        assert_eq!(stock.get(&1), Some(&10));
        assert_eq!(stock.get(&2), Some(&15));
        assert_eq!(stock.get(&3), Some(&20));
    }

    #[test]
    fn increase_keeps_per_branch_quantities_distinct() {
        let stock = allocate_increased(&[1, 2, 3, 4], &[3, 3, 3, 3], 1);
        let mut quantities: Vec<u32> = stock.values().copied().collect();

        quantities.sort_unstable();
        quantities.dedup();

        assert_eq!(quantities.len(), 4, "expected distinct quantities");
    }
}
