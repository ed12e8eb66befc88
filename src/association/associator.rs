//! # Greedy nearest-timestamp association
//!
//! Timestamps of two sensors never match exactly, so each primary sample is paired with the
//! closest secondary sample that nobody else has claimed yet.
//!
//! ## Algorithm
//! -----------------
//! 1. **Candidate generation** – every pair `(ia, ib)` with
//!    `|t_a − (t_b + offset)| < max_difference` (strict) is a candidate. `O(N·M)`.
//! 2. **Ordering** – candidates are sorted by `(time_diff, ia, ib)`. The index components make
//!    ties deterministic. `O(K log K)` for `K` candidates.
//! 3. **Greedy claim** – candidates are scanned in order; a pair is accepted only if neither
//!    index has been claimed, then both are marked.
//!
//! This is a greedy approximation of minimum-cost bipartite matching. It does not minimize the
//! total time difference over all pairs; it only guarantees that the accepted pairs form an
//! injective mapping in both directions and respect the threshold.
//!
//! ## Reporting
//! -----------------
//! Primary indices left unclaimed are returned in [`Association::missing`] and their count is
//! logged as a warning. They never abort the association.
use itertools::iproduct;
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use super::{Association, AssociationEntry, AssociationMap, EntryLayout};
use crate::{constants::Seconds, records::Timestamped};

/// Associate two timestamped sequences.
///
/// Arguments
/// -----------------
/// * `primary` – First sequence; its indices are the keys of the resulting map.
/// * `secondary` – Second sequence; its indices are the association targets.
/// * `offset` – Added to every secondary timestamp before comparison (fixed sensor delay).
/// * `max_difference` – Exclusive upper bound on the accepted time difference.
/// * `layout` – Whether entries record the matched timestamps.
///
/// Return
/// ----------
/// * An [`Association`] whose map is injective in both directions and whose entries all satisfy
///   `time_diff < max_difference`, together with the unmatched primary indices in ascending order.
///
/// Identical inputs always produce identical outputs.
///
/// See also
/// ------------
/// * [`cache::load_or_build`](crate::association::cache::load_or_build) – Runs this once per
///   dataset and persists the result.
pub fn associate<A, B>(
    primary: &[A],
    secondary: &[B],
    offset: Seconds,
    max_difference: Seconds,
    layout: EntryLayout,
) -> Association
where
    A: Timestamped,
    B: Timestamped,
{
    let mut candidates: Vec<(Seconds, usize, usize)> =
        iproduct!(primary.iter().enumerate(), secondary.iter().enumerate())
            .filter_map(|((ia, a), (ib, b))| {
                let diff = (a.timestamp() - (b.timestamp() + offset)).abs();
                (diff < max_difference).then_some((diff, ia, ib))
            })
            .collect();

    candidates.sort_unstable_by_key(|&(diff, ia, ib)| (OrderedFloat(diff), ia, ib));
    debug!(candidates = candidates.len(), "association candidates");

    let mut primary_claimed = vec![false; primary.len()];
    let mut secondary_claimed = vec![false; secondary.len()];
    let mut map = AssociationMap::new();

    for (diff, ia, ib) in candidates {
        if primary_claimed[ia] || secondary_claimed[ib] {
            continue;
        }
        primary_claimed[ia] = true;
        secondary_claimed[ib] = true;

        let entry = match layout {
            EntryLayout::Compact => AssociationEntry::compact(ib, diff),
            EntryLayout::WithTimestamps => AssociationEntry::with_timestamps(
                ib,
                diff,
                primary[ia].timestamp(),
                secondary[ib].timestamp(),
            ),
        };
        map.insert(ia, entry);
    }

    let missing: Vec<usize> = primary_claimed
        .iter()
        .enumerate()
        .filter_map(|(ia, claimed)| (!claimed).then_some(ia))
        .collect();

    if !missing.is_empty() {
        warn!("{} missing associations!", missing.len());
    }

    Association { map, missing }
}

#[cfg(test)]
mod associator_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_example() {
        let primary = [0.0, 1.0, 2.1];
        let secondary = [0.05, 1.02, 5.0];

        let assoc = associate(&primary, &secondary, 0.0, 0.1, EntryLayout::Compact);

        assert_eq!(assoc.map.len(), 2);
        let e0 = assoc.map.get(0).unwrap();
        assert_eq!(e0.secondary_index, 0);
        assert_relative_eq!(e0.time_diff, 0.05, epsilon = 1e-12);
        let e1 = assoc.map.get(1).unwrap();
        assert_eq!(e1.secondary_index, 1);
        assert_relative_eq!(e1.time_diff, 0.02, epsilon = 1e-12);

        assert!(assoc.map.get(2).is_none());
        assert_eq!(assoc.missing, vec![2]);
        assert_eq!(assoc.missing_count(), 1);
    }

    #[test]
    fn test_greedy_is_not_optimal() {
        // The globally optimal assignment is {0: 0, 1: 1} (total 0.08), greedy takes the
        // closest pair (1, 0) first and leaves primary 0 unmatched.
        let primary = [0.0, 0.05];
        let secondary = [0.04, 0.09];

        let assoc = associate(&primary, &secondary, 0.0, 0.06, EntryLayout::Compact);
        assert_eq!(assoc.map.get(1).map(|e| e.secondary_index), Some(0));
        assert!(!assoc.map.contains(0));
        assert_eq!(assoc.missing, vec![0]);
    }

    #[test]
    fn test_ties_break_on_indices() {
        let primary = [1.0, 1.0];
        let secondary = [1.0, 1.0];

        let assoc = associate(&primary, &secondary, 0.0, 0.5, EntryLayout::Compact);
        assert_eq!(assoc.map.get(0).unwrap().secondary_index, 0);
        assert_eq!(assoc.map.get(1).unwrap().secondary_index, 1);
        assert!(assoc.missing.is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let primary = [0.0];
        let secondary = [0.5];

        let assoc = associate(&primary, &secondary, 0.0, 0.5, EntryLayout::Compact);
        assert!(assoc.map.is_empty());
        assert_eq!(assoc.missing_count(), 1);
    }

    #[test]
    fn test_offset_shifts_secondary() {
        let primary = [10.0, 11.0];
        let secondary = [9.0, 10.0];

        let assoc = associate(&primary, &secondary, 1.0, 0.01, EntryLayout::WithTimestamps);
        let entry = assoc.map.get(0).unwrap();
        assert_eq!(entry.secondary_index, 0);
        assert_eq!(entry.primary_timestamp, Some(10.0));
        assert_eq!(entry.secondary_timestamp, Some(9.0));
        assert_eq!(assoc.map.get(1).unwrap().secondary_index, 1);
    }

    #[test]
    fn test_empty_inputs() {
        let empty: [f64; 0] = [];
        let assoc = associate(&empty, &[1.0, 2.0], 0.0, 1.0, EntryLayout::Compact);
        assert!(assoc.map.is_empty());
        assert!(assoc.missing.is_empty());

        let assoc = associate(&[1.0, 2.0], &empty, 0.0, 1.0, EntryLayout::Compact);
        assert!(assoc.map.is_empty());
        assert_eq!(assoc.missing, vec![0, 1]);
    }

    #[test]
    fn test_nan_timestamps_are_never_matched() {
        let assoc = associate(&[f64::NAN, 1.0], &[1.0], 0.0, 1.0, EntryLayout::Compact);
        assert_eq!(assoc.map.len(), 1);
        assert_eq!(assoc.missing, vec![0]);
    }
}
