//! Per-column drag feedback and the column's auto-scroll wiring.
//!
//! A column drags by its header and accepts both card and column drops on
//! its full height. Its card list registers for vertical auto-scroll
//! according to the injected settings.

use ratatui::layout::{Position, Rect};

use super::hitboxes::HitboxOverlay;
use crate::config::AutoScrollSettings;
use crate::dnd::autoscroll::{AutoScrollRegion, Axis, Overflow, OverflowEdge, ScrollMode, ScrollTarget};
use crate::dnd::engine::{preserve_offset_on_source, DragEvent, DragEventKind, DragPreview, Role};
use crate::dnd::payload::{is_card_drop_target_data, is_dragging_a_card, CardDragData, DragSource};

/// Overflow reach of a column's card list.
const OVERFLOW_ABOVE: u16 = 10_000;
const OVERFLOW_BELOW: u16 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnState {
    #[default]
    Idle,
    /// This column is being dragged.
    Dragging,
    /// A card hovers somewhere in this column. When it is not over one of the
    /// column's cards the column shows a trailing placeholder.
    CardOver { is_over_child_card: bool, dragging: Rect },
    /// Another column hovers this one.
    ColumnOver,
}

fn card_over(dragging: &CardDragData, event: &DragEvent<'_>) -> ColumnState {
    let is_over_child_card = event
        .location
        .current
        .innermost()
        .is_some_and(|record| is_card_drop_target_data(&record.data));
    ColumnState::CardOver {
        is_over_child_card,
        dragging: dragging.rect,
    }
}

/// Next state of column `column_id` after `event`, delivered for its `role`.
pub fn transition(column_id: &str, current: ColumnState, role: Role, event: &DragEvent<'_>) -> ColumnState {
    if role == Role::Draggable {
        return match event.kind {
            DragEventKind::DragStart => ColumnState::Dragging,
            DragEventKind::Drop => ColumnState::Idle,
            _ => current,
        };
    }

    let card = event.source.data.as_card();
    let is_self = event
        .source
        .data
        .as_column()
        .is_some_and(|data| data.column.id == column_id);
    match event.kind {
        DragEventKind::DragStart | DragEventKind::DropTargetChange => match card {
            Some(dragging) => card_over(dragging, event),
            None => current,
        },
        DragEventKind::DragEnter => match card {
            Some(dragging) => card_over(dragging, event),
            None if event.source.data.as_column().is_some() && !is_self => ColumnState::ColumnOver,
            None => current,
        },
        DragEventKind::DragLeave if is_self => current,
        DragEventKind::DragLeave | DragEventKind::Drop => ColumnState::Idle,
        _ => current,
    }
}

/// Vertical auto-scroll registrations for a column's card list. Overflow
/// scrolling only applies while over-element scrolling is on.
pub fn auto_scroll_regions(column_id: &str, list: Rect, settings: &AutoScrollSettings) -> Vec<AutoScrollRegion> {
    if !settings.over_element_enabled {
        return Vec::new();
    }
    let region = |mode| AutoScrollRegion {
        target: ScrollTarget::Column(column_id.to_string()),
        rect: list,
        axis: Axis::Vertical,
        speed: settings.column_scroll_speed,
        can_scroll: is_dragging_a_card,
        mode,
    };
    let mut regions = vec![region(ScrollMode::OverElement)];
    if settings.overflow_enabled {
        regions.push(region(ScrollMode::Overflow(Overflow {
            from_start: Some(OverflowEdge {
                outward: OVERFLOW_ABOVE,
                cross_before: 0,
                cross_after: 0,
            }),
            from_end: Some(OverflowEdge {
                outward: OVERFLOW_BELOW,
                cross_before: 0,
                cross_after: 0,
            }),
        })));
    }
    regions
}

#[derive(Debug)]
pub struct ColumnController {
    column_id: String,
    state: ColumnState,
    hitboxes: HitboxOverlay,
}

impl ColumnController {
    pub fn new(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            state: ColumnState::Idle,
            hitboxes: HitboxOverlay::default(),
        }
    }

    pub fn state(&self) -> ColumnState {
        self.state
    }

    /// Apply one notification. Returns whether the state changed; an equal
    /// projected state is not stored again.
    pub fn on_drag_event(&mut self, role: Role, event: &DragEvent<'_>) -> bool {
        let next = transition(&self.column_id, self.state, role, event);
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }

    /// The ghost is a clone of the whole column at its drag-start size.
    pub fn generate_preview(&self, source: &DragSource, input: Position, tilted: bool) -> DragPreview {
        DragPreview {
            width: source.rect.width,
            height: source.rect.height,
            offset: preserve_offset_on_source(source.rect, input),
            tilted,
        }
    }

    pub fn hitboxes(&self) -> &HitboxOverlay {
        &self.hitboxes
    }

    pub fn hitboxes_mut(&mut self) -> &mut HitboxOverlay {
        &mut self.hitboxes
    }

    pub fn reset(&mut self) {
        self.state = ColumnState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Card, Column};
    use crate::dnd::autoscroll::ScrollSpeed;
    use crate::dnd::engine::{DragLocation, DragLocationHistory, DropTargetRecord};
    use crate::dnd::payload::{DragPayload, ElementKey, TargetData};

    const CARD_RECT: Rect = Rect { x: 0, y: 1, width: 28, height: 3 };

    fn card_source() -> DragSource {
        DragSource {
            element: ElementKey::Card("c1".into()),
            rect: CARD_RECT,
            data: DragPayload::card(Card::new("c1", "one"), "a", CARD_RECT),
        }
    }

    fn column_source(id: &str) -> DragSource {
        DragSource {
            element: ElementKey::Column(id.into()),
            rect: Rect::new(0, 0, 28, 20),
            data: DragPayload::column(Column::new(id, id, vec![])),
        }
    }

    fn column_record(id: &str) -> DropTargetRecord {
        DropTargetRecord {
            element: ElementKey::Column(id.into()),
            data: TargetData::column(Column::new(id, id, vec![])),
        }
    }

    fn card_record(id: &str, column: &str) -> DropTargetRecord {
        DropTargetRecord {
            element: ElementKey::Card(id.into()),
            data: TargetData::card(Card::new(id, id), column, Rect::new(30, 1, 28, 3)),
        }
    }

    fn history(targets: Vec<DropTargetRecord>) -> DragLocationHistory {
        let here = DragLocation {
            input: Position::new(0, 0),
            drop_targets: targets,
        };
        DragLocationHistory {
            initial: here.clone(),
            previous: here.clone(),
            current: here,
        }
    }

    fn send(
        ctl: &mut ColumnController,
        role: Role,
        kind: DragEventKind,
        source: &DragSource,
        targets: Vec<DropTargetRecord>,
    ) -> bool {
        let location = history(targets);
        let event = DragEvent {
            kind,
            source,
            location: &location,
            self_data: None,
        };
        ctl.on_drag_event(role, &event)
    }

    #[test]
    fn card_over_body_vs_child_card() {
        let mut ctl = ColumnController::new("b");
        let source = card_source();
        send(&mut ctl, Role::DropTarget, DragEventKind::DragEnter, &source, vec![column_record("b")]);
        assert_eq!(
            ctl.state(),
            ColumnState::CardOver { is_over_child_card: false, dragging: CARD_RECT }
        );
        send(
            &mut ctl,
            Role::DropTarget,
            DragEventKind::DropTargetChange,
            &source,
            vec![card_record("c3", "b"), column_record("b")],
        );
        assert_eq!(
            ctl.state(),
            ColumnState::CardOver { is_over_child_card: true, dragging: CARD_RECT }
        );
    }

    #[test]
    fn card_drag_starting_inside_column() {
        let mut ctl = ColumnController::new("a");
        let source = card_source();
        send(
            &mut ctl,
            Role::DropTarget,
            DragEventKind::DragStart,
            &source,
            vec![card_record("c1", "a"), column_record("a")],
        );
        assert!(matches!(ctl.state(), ColumnState::CardOver { is_over_child_card: true, .. }));
    }

    #[test]
    fn other_column_over_hides_content() {
        let mut ctl = ColumnController::new("b");
        let source = column_source("a");
        send(&mut ctl, Role::DropTarget, DragEventKind::DragEnter, &source, vec![column_record("b")]);
        assert_eq!(ctl.state(), ColumnState::ColumnOver);
        send(&mut ctl, Role::DropTarget, DragEventKind::DragLeave, &source, vec![]);
        assert_eq!(ctl.state(), ColumnState::Idle);
    }

    #[test]
    fn dragged_column_ignores_itself() {
        let mut ctl = ColumnController::new("a");
        let source = column_source("a");
        send(&mut ctl, Role::Draggable, DragEventKind::DragStart, &source, vec![]);
        assert_eq!(ctl.state(), ColumnState::Dragging);
        send(&mut ctl, Role::DropTarget, DragEventKind::DragEnter, &source, vec![column_record("a")]);
        assert_eq!(ctl.state(), ColumnState::Dragging);
        send(&mut ctl, Role::DropTarget, DragEventKind::DragLeave, &source, vec![]);
        assert_eq!(ctl.state(), ColumnState::Dragging);
        send(&mut ctl, Role::Draggable, DragEventKind::Drop, &source, vec![]);
        assert_eq!(ctl.state(), ColumnState::Idle);
    }

    #[test]
    fn drop_always_resets() {
        let mut ctl = ColumnController::new("b");
        let source = card_source();
        send(&mut ctl, Role::DropTarget, DragEventKind::DragEnter, &source, vec![column_record("b")]);
        send(&mut ctl, Role::DropTarget, DragEventKind::Drop, &source, vec![column_record("b")]);
        assert_eq!(ctl.state(), ColumnState::Idle);
    }

    #[test]
    fn repeated_card_over_is_not_stored_again() {
        let mut ctl = ColumnController::new("b");
        let source = card_source();
        assert!(send(&mut ctl, Role::DropTarget, DragEventKind::DragEnter, &source, vec![column_record("b")]));
        for _ in 0..3 {
            assert!(!send(
                &mut ctl,
                Role::DropTarget,
                DragEventKind::DropTargetChange,
                &source,
                vec![column_record("b")]
            ));
        }
        assert!(matches!(ctl.state(), ColumnState::CardOver { .. }));
    }

    #[test]
    fn auto_scroll_follows_settings() {
        let list = Rect::new(0, 2, 28, 20);
        let mut settings = AutoScrollSettings::default();
        let regions = auto_scroll_regions("a", list, &settings);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].mode, ScrollMode::OverElement);
        assert_eq!(regions[0].speed, ScrollSpeed::Standard);
        assert!(matches!(regions[1].mode, ScrollMode::Overflow(_)));

        settings.overflow_enabled = false;
        settings.column_scroll_speed = ScrollSpeed::Fast;
        let regions = auto_scroll_regions("a", list, &settings);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].speed, ScrollSpeed::Fast);

        // Overflow alone does nothing without over-element scrolling.
        settings.over_element_enabled = false;
        settings.overflow_enabled = true;
        assert!(auto_scroll_regions("a", list, &settings).is_empty());
    }

    #[test]
    fn column_preview_uses_whole_column() {
        let ctl = ColumnController::new("a");
        let source = column_source("a");
        let preview = ctl.generate_preview(&source, Position::new(4, 0), false);
        assert_eq!((preview.width, preview.height), (28, 20));
        assert_eq!(preview.offset, Position::new(4, 0));
    }
}
