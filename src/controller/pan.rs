//! Click-and-drag panning of the board, independent of drag and drop.
//!
//! A press on the board background waits until the pointer has moved far
//! enough, then scrolls by the distance since the previous sample. The
//! gesture ends on release, a new press, any key, or a resize.

use ratatui::layout::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanState {
    #[default]
    Idle,
    WaitingToMoveEnough { start: Position },
    Scrolling { last: Position },
}

#[derive(Debug, Clone)]
pub struct PanGesture {
    state: PanState,
    threshold: u16,
}

impl PanGesture {
    pub fn new(threshold: u16) -> Self {
        Self {
            state: PanState::Idle,
            threshold,
        }
    }

    pub fn set_threshold(&mut self, threshold: u16) {
        self.threshold = threshold;
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != PanState::Idle
    }

    pub fn begin(&mut self, start: Position) {
        self.state = PanState::WaitingToMoveEnough { start };
    }

    pub fn end(&mut self) {
        self.state = PanState::Idle;
    }

    /// Feed a pointer sample. Returns the horizontal scroll to apply, in
    /// cells; positive scrolls right. The board only scrolls sideways, so
    /// vertical motion counts toward the threshold and nothing else.
    pub fn pointer_move(&mut self, current: Position) -> Option<i32> {
        match self.state {
            PanState::Idle => None,
            PanState::WaitingToMoveEnough { start } => {
                let moved_enough = start.x.abs_diff(current.x) > self.threshold
                    || start.y.abs_diff(current.y) > self.threshold;
                if moved_enough {
                    self.state = PanState::Scrolling { last: current };
                }
                None
            }
            PanState::Scrolling { last } => {
                self.state = PanState::Scrolling { last: current };
                let delta = i32::from(last.x) - i32::from(current.x);
                (delta != 0).then_some(delta)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: u16, y: u16) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn small_moves_do_not_pan() {
        let mut pan = PanGesture::new(10);
        pan.begin(p(50, 10));
        assert_eq!(pan.pointer_move(p(60, 10)), None);
        assert_eq!(pan.pointer_move(p(40, 20)), None);
        assert_eq!(pan.state(), PanState::WaitingToMoveEnough { start: p(50, 10) });
    }

    #[test]
    fn crossing_threshold_starts_scrolling_without_jump() {
        let mut pan = PanGesture::new(10);
        pan.begin(p(50, 10));
        assert_eq!(pan.pointer_move(p(61, 10)), None);
        assert_eq!(pan.state(), PanState::Scrolling { last: p(61, 10) });
    }

    #[test]
    fn delta_is_since_last_sample() {
        let mut pan = PanGesture::new(2);
        pan.begin(p(50, 10));
        pan.pointer_move(p(40, 10));
        assert_eq!(pan.pointer_move(p(38, 10)), Some(2));
        assert_eq!(pan.pointer_move(p(35, 11)), Some(3));
        assert_eq!(pan.pointer_move(p(35, 11)), None);
        assert_eq!(pan.pointer_move(p(39, 11)), Some(-4));
    }

    #[test]
    fn vertical_motion_scrolls_nothing() {
        let mut pan = PanGesture::new(2);
        pan.begin(p(50, 10));
        // Past the threshold vertically, so the pan is live.
        assert_eq!(pan.pointer_move(p(50, 14)), None);
        assert_eq!(pan.state(), PanState::Scrolling { last: p(50, 14) });
        assert_eq!(pan.pointer_move(p(50, 2)), None);
        assert_eq!(pan.pointer_move(p(48, 2)), Some(2));
    }

    #[test]
    fn end_stops_everything() {
        let mut pan = PanGesture::new(0);
        pan.begin(p(5, 5));
        pan.pointer_move(p(6, 5));
        assert!(pan.is_active());
        pan.end();
        assert!(!pan.is_active());
        assert_eq!(pan.pointer_move(p(1, 5)), None);
    }
}
