//! Sorted adjacency list primitives.
//!
//! Every list handled here is kept strictly ascending by neighbour index so
//! membership tests can use binary search. All mutations preserve that
//! ordering.

use super::{EdgeInsertion, Neighbour};

#[inline]
pub(super) fn locate(list: &[Neighbour], node: usize) -> Result<usize, usize> {
    list.binary_search_by_key(&node, |entry| entry.node)
}

/// Inserts `node` at its sorted position, or adds `weight` to the existing
/// entry when `node` is already present.
pub(super) fn insert_or_accumulate(
    list: &mut Vec<Neighbour>,
    node: usize,
    weight: f64,
) -> EdgeInsertion {
    match locate(list, node) {
        Ok(position) => {
            if let Some(entry) = list.get_mut(position) {
                entry.weight += weight;
            }
            EdgeInsertion::Merged
        }
        Err(position) => {
            list.insert(position, Neighbour::new(node, weight));
            EdgeInsertion::Created
        }
    }
}

pub(super) fn overwrite_weight(list: &mut [Neighbour], node: usize, weight: f64) -> bool {
    match locate(list, node) {
        Ok(position) => list.get_mut(position).is_some_and(|entry| {
            entry.weight = weight;
            true
        }),
        Err(_) => false,
    }
}

pub(super) fn remove(list: &mut Vec<Neighbour>, node: usize) -> Option<Neighbour> {
    locate(list, node).ok().map(|position| list.remove(position))
}

/// Drops any reference to `removed` and shifts every larger index down by
/// one. Returns `true` when a reference was dropped.
///
/// Decrementing every index above `removed` keeps the list ascending, so no
/// re-sort is needed.
pub(super) fn detach_and_renumber(list: &mut Vec<Neighbour>, removed: usize) -> bool {
    let detached = remove(list, removed).is_some();
    let first_above = list.partition_point(|entry| entry.node < removed);
    for entry in list.iter_mut().skip(first_above) {
        entry.node -= 1;
    }
    detached
}

/// Counts indices present in both sorted lists, ignoring `skip_left` and
/// `skip_right`.
pub(crate) fn intersection_count(
    left: &[Neighbour],
    right: &[Neighbour],
    skip_left: usize,
    skip_right: usize,
) -> usize {
    let mut lhs = left
        .iter()
        .map(|entry| entry.node)
        .filter(|&node| node != skip_left && node != skip_right)
        .peekable();
    let mut rhs = right
        .iter()
        .map(|entry| entry.node)
        .filter(|&node| node != skip_left && node != skip_right)
        .peekable();
    let mut shared = 0;
    while let (Some(&a), Some(&b)) = (lhs.peek(), rhs.peek()) {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => {
                lhs.next();
            }
            std::cmp::Ordering::Greater => {
                rhs.next();
            }
            std::cmp::Ordering::Equal => {
                shared += 1;
                lhs.next();
                rhs.next();
            }
        }
    }
    shared
}
