//! Detect overlapping bookings for a single owner.
//!
//! Every unordered pair is compared once. Per-owner booking lists are small
//! (tens of entries), so the quadratic scan is kept over a sweep line.
//! The caller partitions by owner; owners are not compared here.

use tracing::warn;

use crate::booking::Booking;
use crate::overlap::{bookings_overlap, overlap_duration};

/// Two bookings whose time ranges overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictPair {
    pub booking_a: Booking,
    pub booking_b: Booking,
    /// Zero when the bookings only touch at an endpoint.
    pub overlap_minutes: i64,
}

/// Return every booking that overlaps at least one other booking in the list.
///
/// Output preserves input order. Malformed bookings (`end <= start`) never
/// conflict and are logged at `warn`.
pub fn find_conflicting_bookings(bookings: &[Booking]) -> Vec<Booking> {
    warn_malformed(bookings);

    let mut in_conflict = vec![false; bookings.len()];
    for (i, j) in overlapping_index_pairs(bookings) {
        in_conflict[i] = true;
        in_conflict[j] = true;
    }

    bookings
        .iter()
        .zip(in_conflict)
        .filter(|(_, conflicted)| *conflicted)
        .map(|(booking, _)| booking.clone())
        .collect()
}

/// Find all pairwise conflicts within one owner's bookings.
///
/// Pairs are reported as `(earlier index, later index)` in input order.
pub fn find_conflict_pairs(bookings: &[Booking]) -> Vec<ConflictPair> {
    warn_malformed(bookings);

    overlapping_index_pairs(bookings)
        .into_iter()
        .map(|(i, j)| {
            let a = &bookings[i];
            let b = &bookings[j];
            ConflictPair {
                booking_a: a.clone(),
                booking_b: b.clone(),
                overlap_minutes: overlap_duration(&a.range(), &b.range()).num_minutes(),
            }
        })
        .collect()
}

/// Group bookings into connected sets of transitively overlapping bookings.
///
/// If A overlaps B and B overlaps C, all three land in one group even when A
/// and C are disjoint. Bookings without conflicts are left out. Groups are
/// ordered by their first member; members keep input order.
pub fn group_conflicts(bookings: &[Booking]) -> Vec<Vec<Booking>> {
    warn_malformed(bookings);

    // Union-find where a set's root is always its lowest index.
    let mut parent: Vec<usize> = (0..bookings.len()).collect();
    for (i, j) in overlapping_index_pairs(bookings) {
        let ri = find_root(&mut parent, i);
        let rj = find_root(&mut parent, j);
        if ri != rj {
            parent[ri.max(rj)] = ri.min(rj);
        }
    }

    let mut groups: Vec<(usize, Vec<Booking>)> = Vec::new();
    for (i, booking) in bookings.iter().enumerate() {
        let root = find_root(&mut parent, i);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(booking.clone()),
            None => groups.push((root, vec![booking.clone()])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(_, members)| members)
        .collect()
}

fn overlapping_index_pairs(bookings: &[Booking]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..bookings.len() {
        for j in (i + 1)..bookings.len() {
            if bookings_overlap(&bookings[i], &bookings[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn warn_malformed(bookings: &[Booking]) {
    for booking in bookings.iter().filter(|b| !b.is_well_formed()) {
        warn!(
            booking_id = %booking.id,
            start = %booking.start,
            end = %booking.end,
            "ignoring booking whose end is not after its start"
        );
    }
}
