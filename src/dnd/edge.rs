//! Closest-edge resolution for card drop targets.
//!
//! Cards only support vertical insertion, so the resolver works on the
//! vertical axis. The pointer is treated as sitting in the centre of its
//! cell and compared against the target's midpoint; coordinates are doubled
//! so the comparison stays in integers.

use ratatui::layout::{Position, Rect};

/// Side of a drop target the dragged item will be inserted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The edges a card target allows.
pub const VERTICAL_EDGES: [Edge; 2] = [Edge::Top, Edge::Bottom];

/// Distance from the pointer's cell centre to `edge` of `rect`, in half-cells.
fn half_cell_distance(rect: Rect, pointer: Position, edge: Edge) -> u32 {
    let centre = 2 * u32::from(pointer.y) + 1;
    let line = match edge {
        Edge::Top => 2 * u32::from(rect.top()),
        Edge::Bottom => 2 * u32::from(rect.bottom()),
    };
    centre.abs_diff(line)
}

/// The allowed edge of `rect` nearest to `pointer`.
///
/// Ties go to the edge listed first in `allowed`. Returns `None` only when
/// `allowed` is empty. The pointer does not need to be inside `rect`: a
/// pointer above the rect resolves to `Top`, below it to `Bottom`.
pub fn closest_edge(rect: Rect, pointer: Position, allowed: &[Edge]) -> Option<Edge> {
    let mut best: Option<(Edge, u32)> = None;
    for &edge in allowed {
        let distance = half_cell_distance(rect, pointer, edge);
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((edge, distance)),
        }
    }
    best.map(|(edge, _)| edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(y: u16) -> Position {
        Position::new(5, y)
    }

    #[test]
    fn upper_half_is_top() {
        let rect = Rect::new(0, 10, 20, 4);
        assert_eq!(closest_edge(rect, at(10), &VERTICAL_EDGES), Some(Edge::Top));
        assert_eq!(closest_edge(rect, at(11), &VERTICAL_EDGES), Some(Edge::Top));
    }

    #[test]
    fn lower_half_is_bottom() {
        let rect = Rect::new(0, 10, 20, 4);
        assert_eq!(closest_edge(rect, at(12), &VERTICAL_EDGES), Some(Edge::Bottom));
        assert_eq!(closest_edge(rect, at(13), &VERTICAL_EDGES), Some(Edge::Bottom));
    }

    #[test]
    fn odd_height_middle_row_ties_to_top() {
        let rect = Rect::new(0, 0, 20, 3);
        assert_eq!(closest_edge(rect, at(1), &VERTICAL_EDGES), Some(Edge::Top));
        assert_eq!(closest_edge(rect, at(2), &VERTICAL_EDGES), Some(Edge::Bottom));
    }

    #[test]
    fn tie_respects_allowed_order() {
        let rect = Rect::new(0, 0, 20, 3);
        let reversed = [Edge::Bottom, Edge::Top];
        assert_eq!(closest_edge(rect, at(1), &reversed), Some(Edge::Bottom));
    }

    #[test]
    fn single_allowed_edge_always_wins() {
        let rect = Rect::new(0, 0, 20, 4);
        assert_eq!(closest_edge(rect, at(0), &[Edge::Bottom]), Some(Edge::Bottom));
        assert_eq!(closest_edge(rect, at(0), &[]), None);
    }

    #[test]
    fn outside_rect_resolves_to_nearest_side() {
        let rect = Rect::new(0, 10, 20, 3);
        assert_eq!(closest_edge(rect, at(7), &VERTICAL_EDGES), Some(Edge::Top));
        assert_eq!(closest_edge(rect, at(15), &VERTICAL_EDGES), Some(Edge::Bottom));
    }

    proptest! {
        #[test]
        fn switches_exactly_once_top_to_bottom(y in 0u16..200, height in 1u16..40) {
            let rect = Rect::new(0, y, 10, height);
            let edges: Vec<Edge> = (rect.top()..rect.bottom())
                .map(|row| closest_edge(rect, at(row), &VERTICAL_EDGES).unwrap())
                .collect();
            let switches = edges.windows(2).filter(|w| w[0] != w[1]).count();
            prop_assert!(switches <= 1);
            prop_assert_eq!(edges[0], Edge::Top);
            if height > 1 {
                prop_assert_eq!(*edges.last().unwrap(), Edge::Bottom);
            }
            // The switch sits at the midpoint: rows strictly above it are top.
            for (offset, edge) in edges.iter().enumerate() {
                let expected = if 2 * offset + 1 <= height as usize { Edge::Top } else { Edge::Bottom };
                prop_assert_eq!(*edge, expected);
            }
        }
    }
}
