//! Debug overlay of a column's auto-scroll zones.
//!
//! While enabled the overlay is scheduled and recomputes its rectangles on
//! every frame, so they follow scrolling and resizes. Turning the setting off
//! cancels the schedule and clears the rectangles.

use ratatui::layout::Rect;

use crate::dnd::autoscroll::{edge_zones, Axis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitboxes {
    pub accelerate: Rect,
    pub max_speed: Rect,
    /// From the list's bottom edge to the bottom of the screen.
    pub overflow: Rect,
}

/// Zones past the bottom of a column's card list.
pub fn compute_hitboxes(list: Rect, screen: Rect) -> Hitboxes {
    let zones = edge_zones(list, Axis::Vertical);
    let top = list.bottom().min(screen.bottom());
    Hitboxes {
        accelerate: zones.end_accelerate,
        max_speed: zones.end_max_speed,
        overflow: Rect::new(list.x, top, list.width, screen.bottom() - top),
    }
}

#[derive(Debug, Default)]
pub struct HitboxOverlay {
    scheduled: bool,
    hitboxes: Option<Hitboxes>,
}

impl HitboxOverlay {
    /// Schedule or cancel per-frame updates to match the setting.
    pub fn sync(&mut self, visible: bool) {
        if visible == self.scheduled {
            return;
        }
        self.scheduled = visible;
        if !visible {
            self.hitboxes = None;
        }
    }

    /// Drop last frame's zones, for a column that is no longer on screen.
    pub fn clear(&mut self) {
        self.hitboxes = None;
    }

    /// Frame tick. Does nothing unless scheduled.
    pub fn on_frame(&mut self, list: Rect, screen: Rect) {
        if self.scheduled {
            self.hitboxes = Some(compute_hitboxes(list, screen));
        }
    }

    pub fn hitboxes(&self) -> Option<&Hitboxes> {
        self.hitboxes.as_ref()
    }
}
