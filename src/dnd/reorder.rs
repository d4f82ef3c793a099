//! Pure list reordering used to commit drops.
//!
//! Neither function mutates its input; both return a fresh `Vec`. An
//! out-of-bounds start index yields an unchanged copy.

use super::edge::Edge;

/// Remove the item at `start_index` and reinsert it at `finish_index` of the
/// post-removal list. A `finish_index` past the end appends.
pub fn reorder<T: Clone>(list: &[T], start_index: usize, finish_index: usize) -> Vec<T> {
    let mut result = list.to_vec();
    if start_index >= result.len() {
        return result;
    }
    let item = result.remove(start_index);
    let finish_index = finish_index.min(result.len());
    result.insert(finish_index, item);
    result
}

/// Final index for an item moved from `start_index` next to the item at
/// `index_of_target`, accounting for the shift caused by removing it first.
///
/// Without an edge the item takes the target's place.
pub fn reorder_destination_index(
    start_index: usize,
    index_of_target: usize,
    closest_edge_of_target: Option<Edge>,
) -> usize {
    if start_index == index_of_target {
        return start_index;
    }
    let Some(edge) = closest_edge_of_target else {
        return index_of_target;
    };
    let is_going_after = edge == Edge::Bottom;
    let is_moving_forward = start_index < index_of_target;
    match (is_moving_forward, is_going_after) {
        (true, true) => index_of_target,
        (true, false) => index_of_target - 1,
        (false, true) => index_of_target + 1,
        (false, false) => index_of_target,
    }
}

/// Move the item at `start_index` to sit before (`Top`) or after (`Bottom`)
/// the item at `index_of_target`.
pub fn reorder_with_edge<T: Clone>(
    list: &[T],
    start_index: usize,
    index_of_target: usize,
    closest_edge_of_target: Option<Edge>,
) -> Vec<T> {
    if start_index >= list.len() || index_of_target >= list.len() {
        return list.to_vec();
    }
    let finish_index =
        reorder_destination_index(start_index, index_of_target, closest_edge_of_target);
    reorder(list, start_index, finish_index)
}
