//! Auto-scroll while dragging.
//!
//! Scroll containers register each frame. On every tick of a drag the
//! scroller looks at where the pointer is and asks for at most one scroll
//! step per axis. Over-element registrations scroll when the pointer is in
//! the edge zone inside the container; overflow registrations keep scrolling
//! when the pointer has gone past the container's edge.

use ratatui::layout::{Position, Rect};
use serde::{Deserialize, Serialize};

use super::payload::DragSource;

/// Largest edge zone, in cells.
const MAX_EDGE_ZONE: u16 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSpeed {
    #[default]
    Standard,
    Fast,
}

impl ScrollSpeed {
    /// Cells per tick in the max-speed zone.
    pub fn max_step(self) -> u16 {
        match self {
            Self::Standard => 2,
            Self::Fast => 4,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Fast,
            Self::Fast => Self::Standard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fast => "fast",
        }
    }
}

/// Cells per tick in the accelerate zone.
const ACCELERATE_STEP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    Board,
    Column(String),
}

/// How far an overflow zone reaches past one edge of a container: `outward`
/// away from the container, and along the edge by `cross_before` /
/// `cross_after` cells beyond the container's own extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowEdge {
    pub outward: u16,
    pub cross_before: u16,
    pub cross_after: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overflow {
    /// Past the top (vertical) or left (horizontal) edge.
    pub from_start: Option<OverflowEdge>,
    /// Past the bottom or right edge.
    pub from_end: Option<OverflowEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    OverElement,
    Overflow(Overflow),
}

#[derive(Debug, Clone)]
pub struct AutoScrollRegion {
    pub target: ScrollTarget,
    pub rect: Rect,
    pub axis: Axis,
    pub speed: ScrollSpeed,
    pub can_scroll: fn(&DragSource) -> bool,
    pub mode: ScrollMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: ScrollTarget,
    pub axis: Axis,
    /// Negative scrolls toward the start (up / left).
    pub delta: i32,
}

/// The four edge bands of a container along one axis. Max-speed bands sit
/// against the edges, accelerate bands just inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeZones {
    pub start_max_speed: Rect,
    pub start_accelerate: Rect,
    pub end_accelerate: Rect,
    pub end_max_speed: Rect,
}

/// Split the edges of `rect` into scroll zones along `axis`.
pub fn edge_zones(rect: Rect, axis: Axis) -> EdgeZones {
    let length = match axis {
        Axis::Horizontal => rect.width,
        Axis::Vertical => rect.height,
    };
    let zone = (length / 4).min(MAX_EDGE_ZONE);
    let max_len = zone / 2;
    let accel_len = zone - max_len;
    // (offset from start, length) along the axis
    let band = |offset: u16, len: u16| match axis {
        Axis::Horizontal => Rect::new(rect.x + offset, rect.y, len, rect.height),
        Axis::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, len),
    };
    EdgeZones {
        start_max_speed: band(0, max_len),
        start_accelerate: band(max_len, accel_len),
        end_accelerate: band(length - zone, accel_len),
        end_max_speed: band(length - max_len, max_len),
    }
}

/// Whether `pointer` is in the zone `edge` reaches past `rect`. Computed in
/// `u32` since overflow margins run far off screen.
pub fn in_overflow_zone(rect: Rect, axis: Axis, edge: OverflowEdge, from_end: bool, pointer: Position) -> bool {
    let (main, cross, start, len, cross_start, cross_len) = match axis {
        Axis::Vertical => (pointer.y, pointer.x, rect.y, rect.height, rect.x, rect.width),
        Axis::Horizontal => (pointer.x, pointer.y, rect.x, rect.width, rect.y, rect.height),
    };
    let (main, cross) = (u32::from(main), u32::from(cross));
    let (start, end) = (u32::from(start), u32::from(start) + u32::from(len));
    let cross_lo = u32::from(cross_start).saturating_sub(u32::from(edge.cross_before));
    let cross_hi = u32::from(cross_start) + u32::from(cross_len) + u32::from(edge.cross_after);
    if cross < cross_lo || cross >= cross_hi {
        return false;
    }
    if from_end {
        main >= end && main < end + u32::from(edge.outward)
    } else {
        main < start && main + u32::from(edge.outward) >= start
    }
}

impl AutoScrollRegion {
    fn step(&self, pointer: Position) -> Option<i32> {
        let max = i32::from(self.speed.max_step());
        match self.mode {
            ScrollMode::OverElement => {
                if !self.rect.contains(pointer) {
                    return None;
                }
                let zones = edge_zones(self.rect, self.axis);
                let accel = i32::from(ACCELERATE_STEP);
                if zones.start_max_speed.contains(pointer) {
                    Some(-max)
                } else if zones.start_accelerate.contains(pointer) {
                    Some(-accel)
                } else if zones.end_max_speed.contains(pointer) {
                    Some(max)
                } else if zones.end_accelerate.contains(pointer) {
                    Some(accel)
                } else {
                    None
                }
            }
            ScrollMode::Overflow(overflow) => {
                let hit = |edge: Option<OverflowEdge>, from_end| {
                    edge.is_some_and(|e| in_overflow_zone(self.rect, self.axis, e, from_end, pointer))
                };
                if hit(overflow.from_start, false) {
                    Some(-max)
                } else if hit(overflow.from_end, true) {
                    Some(max)
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct AutoScroller {
    regions: Vec<AutoScrollRegion>,
}

impl AutoScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.regions.clear();
    }

    /// Register a container. Earlier registrations win ties, so inner
    /// containers register before the ones enclosing them.
    pub fn register(&mut self, region: AutoScrollRegion) {
        self.regions.push(region);
    }

    #[cfg(test)]
    pub fn regions(&self) -> &[AutoScrollRegion] {
        &self.regions
    }

    /// Scroll steps for one tick: at most one per axis, over-element zones
    /// before overflow zones.
    pub fn tick(&self, source: &DragSource, pointer: Position) -> Vec<ScrollRequest> {
        let over_element = self.regions.iter().filter(|r| r.mode == ScrollMode::OverElement);
        let overflow = self.regions.iter().filter(|r| r.mode != ScrollMode::OverElement);

        let mut requests: Vec<ScrollRequest> = Vec::new();
        for region in over_element.chain(overflow) {
            if requests.iter().any(|r| r.axis == region.axis) || !(region.can_scroll)(source) {
                continue;
            }
            if let Some(delta) = region.step(pointer) {
                requests.push(ScrollRequest {
                    target: region.target.clone(),
                    axis: region.axis,
                    delta,
                });
            }
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Card;
    use crate::dnd::payload::{is_dragging_a_card, DragPayload, ElementKey};

    fn card_source() -> DragSource {
        let rect = Rect::new(0, 0, 10, 3);
        DragSource {
            element: ElementKey::Card("c".into()),
            rect,
            data: DragPayload::card(Card::new("c", "c"), "a", rect),
        }
    }

    fn column_source() -> DragSource {
        DragSource {
            element: ElementKey::Column("a".into()),
            rect: Rect::new(0, 0, 10, 20),
            data: DragPayload::column(crate::board::Column::new("a", "A", vec![])),
        }
    }

    fn vertical(rect: Rect, mode: ScrollMode) -> AutoScrollRegion {
        AutoScrollRegion {
            target: ScrollTarget::Column("a".into()),
            rect,
            axis: Axis::Vertical,
            speed: ScrollSpeed::Standard,
            can_scroll: is_dragging_a_card,
            mode,
        }
    }

    #[test]
    fn zones_are_capped() {
        let zones = edge_zones(Rect::new(0, 10, 20, 40), Axis::Vertical);
        assert_eq!(zones.start_max_speed, Rect::new(0, 10, 20, 2));
        assert_eq!(zones.start_accelerate, Rect::new(0, 12, 20, 2));
        assert_eq!(zones.end_accelerate, Rect::new(0, 46, 20, 2));
        assert_eq!(zones.end_max_speed, Rect::new(0, 48, 20, 2));
    }

    #[test]
    fn small_container_only_accelerates() {
        let zones = edge_zones(Rect::new(0, 0, 6, 10), Axis::Horizontal);
        assert!(zones.start_max_speed.is_empty());
        assert_eq!(zones.start_accelerate, Rect::new(0, 0, 1, 10));
        assert_eq!(zones.end_accelerate, Rect::new(5, 0, 1, 10));
    }

    #[test]
    fn over_element_speeds() {
        let mut scroller = AutoScroller::new();
        scroller.register(vertical(Rect::new(0, 0, 10, 40), ScrollMode::OverElement));
        let source = card_source();
        let delta = |y| scroller.tick(&source, Position::new(3, y)).first().map(|r| r.delta);
        assert_eq!(delta(0), Some(-2));
        assert_eq!(delta(3), Some(-1));
        assert_eq!(delta(20), None);
        assert_eq!(delta(37), Some(1));
        assert_eq!(delta(39), Some(2));
        assert_eq!(delta(45), None);
    }

    #[test]
    fn fast_speed_doubles_max_step() {
        let mut scroller = AutoScroller::new();
        let mut region = vertical(Rect::new(0, 0, 10, 40), ScrollMode::OverElement);
        region.speed = ScrollSpeed::Fast;
        scroller.register(region);
        let requests = scroller.tick(&card_source(), Position::new(3, 39));
        assert_eq!(requests[0].delta, 4);
    }

    #[test]
    fn overflow_scrolls_past_the_edge() {
        let overflow = Overflow {
            from_start: Some(OverflowEdge { outward: 10_000, cross_before: 0, cross_after: 0 }),
            from_end: Some(OverflowEdge { outward: 1000, cross_before: 0, cross_after: 0 }),
        };
        let mut scroller = AutoScroller::new();
        scroller.register(vertical(Rect::new(0, 5, 10, 20), ScrollMode::Overflow(overflow)));
        let source = card_source();
        let delta = |x, y| scroller.tick(&source, Position::new(x, y)).first().map(|r| r.delta);
        assert_eq!(delta(3, 2), Some(-2));
        assert_eq!(delta(3, 30), Some(2));
        // Inside the container is not overflow.
        assert_eq!(delta(3, 10), None);
        // No cross-axis reach.
        assert_eq!(delta(12, 30), None);
    }

    #[test]
    fn gate_blocks_other_drag_kinds() {
        let mut scroller = AutoScroller::new();
        scroller.register(vertical(Rect::new(0, 0, 10, 40), ScrollMode::OverElement));
        assert!(scroller.tick(&column_source(), Position::new(3, 0)).is_empty());
    }

    #[test]
    fn one_request_per_axis_over_element_first() {
        let overflow = Overflow {
            from_start: None,
            from_end: Some(OverflowEdge { outward: 1000, cross_before: 1000, cross_after: 1000 }),
        };
        let mut scroller = AutoScroller::new();
        let mut outer = vertical(Rect::new(0, 0, 40, 10), ScrollMode::Overflow(overflow));
        outer.target = ScrollTarget::Board;
        scroller.register(outer);
        scroller.register(vertical(Rect::new(0, 11, 10, 20), ScrollMode::OverElement));
        let requests = scroller.tick(&card_source(), Position::new(2, 30));
        assert_eq!(
            requests,
            vec![ScrollRequest { target: ScrollTarget::Column("a".into()), axis: Axis::Vertical, delta: 2 }]
        );
    }

    #[test]
    fn horizontal_overflow_zone_reaches_around() {
        let edge = OverflowEdge { outward: 1000, cross_before: 1000, cross_after: 1000 };
        let rect = Rect::new(5, 3, 50, 20);
        assert!(in_overflow_zone(rect, Axis::Horizontal, edge, false, Position::new(0, 0)));
        assert!(in_overflow_zone(rect, Axis::Horizontal, edge, false, Position::new(4, 900)));
        assert!(!in_overflow_zone(rect, Axis::Horizontal, edge, false, Position::new(5, 10)));
        assert!(in_overflow_zone(rect, Axis::Horizontal, edge, true, Position::new(55, 10)));
        assert!(!in_overflow_zone(rect, Axis::Horizontal, edge, true, Position::new(54, 10)));
    }
}
