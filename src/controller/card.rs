//! Per-card drag feedback.
//!
//! A card is both draggable and a drop target. Its visual state is a closed
//! set of variants moved by [`transition`], a pure function of the current
//! state and one drag notification. The controller never touches the board.

use ratatui::layout::{Position, Rect};

use crate::dnd::edge::Edge;
use crate::dnd::engine::{preserve_offset_on_source, DragEvent, DragEventKind, DragPreview, Role};
use crate::dnd::payload::{extract_closest_edge, DragSource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardState {
    #[default]
    Idle,
    /// This card is being dragged.
    Dragging,
    /// This card is being dragged and the pointer has left its slot; the slot
    /// collapses.
    DraggingLeftSelf,
    /// Another card hovers this one. `dragging` is that card's original rect,
    /// used to size the drop shadow.
    Over { dragging: Rect, closest_edge: Edge },
    /// The ghost for this card is being captured.
    Preview { dragging: Rect },
}

/// Next state of card `card_id` after `event`, delivered for its `role`.
pub fn transition(card_id: &str, current: CardState, role: Role, event: &DragEvent<'_>) -> CardState {
    match role {
        Role::Draggable => match event.kind {
            DragEventKind::DragStart => CardState::Dragging,
            DragEventKind::Drop => CardState::Idle,
            _ => current,
        },
        Role::DropTarget => {
            let Some(dragging) = event.source.data.as_card() else {
                return match event.kind {
                    DragEventKind::Drop => CardState::Idle,
                    _ => current,
                };
            };
            let is_self = dragging.card.id == card_id;
            match event.kind {
                DragEventKind::DragEnter | DragEventKind::Drag => {
                    if is_self {
                        return current;
                    }
                    match event.self_data.and_then(extract_closest_edge) {
                        Some(closest_edge) => CardState::Over {
                            dragging: dragging.rect,
                            closest_edge,
                        },
                        None => current,
                    }
                }
                DragEventKind::DragLeave if is_self => CardState::DraggingLeftSelf,
                DragEventKind::DragLeave | DragEventKind::Drop => CardState::Idle,
                _ => current,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardController {
    card_id: String,
    state: CardState,
}

impl CardController {
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            state: CardState::Idle,
        }
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    /// An equal state is not stored again, so `false` means nothing needs
    /// redrawing.
    fn set_state(&mut self, next: CardState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }

    /// Apply one notification. Returns whether the state changed.
    pub fn on_drag_event(&mut self, role: Role, event: &DragEvent<'_>) -> bool {
        let next = transition(&self.card_id, self.state, role, event);
        self.set_state(next)
    }

    /// Size the ghost from the card's rect at drag start and keep the pointer
    /// where it grabbed the card.
    pub fn generate_preview(&mut self, source: &DragSource, input: Position, tilted: bool) -> DragPreview {
        self.set_state(CardState::Preview { dragging: source.rect });
        DragPreview {
            width: source.rect.width,
            height: source.rect.height,
            offset: preserve_offset_on_source(source.rect, input),
            tilted,
        }
    }

    /// Forget transient state, e.g. after the board was replaced.
    pub fn reset(&mut self) {
        self.set_state(CardState::Idle);
    }
}
