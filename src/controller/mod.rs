pub mod board;
pub mod card;
pub mod column;
pub mod hitboxes;
pub mod pan;

use std::collections::HashMap;

use ratatui::layout::{Position, Rect};

use crate::board::Board;
use crate::config::Settings;
use crate::dnd::autoscroll::AutoScroller;
use crate::dnd::edge::VERTICAL_EDGES;
use crate::dnd::engine::{DragEngine, DragEvent, DragListener, DragPreview, DraggableRegion, DropTargetRegion, Role};
use crate::dnd::payload::{
    is_dragging_a_card, is_dragging_a_card_or_column, DragPayload, DragSource, ElementKey, TargetData,
};
use crate::ui::layout::BoardLayout;
use board::board_auto_scroll_regions;
use card::CardController;
use column::ColumnController;

/// Every per-element controller, keyed by id, routed to by the drag engine.
#[derive(Debug, Default)]
pub struct Controllers {
    pub cards: HashMap<String, CardController>,
    pub columns: HashMap<String, ColumnController>,
    /// Whether ghosts are drawn tilted.
    pub tilt_preview: bool,
}

impl Controllers {
    pub fn new(board: &Board, tilt_preview: bool) -> Self {
        let mut controllers = Self {
            tilt_preview,
            ..Self::default()
        };
        controllers.sync(board);
        controllers
    }

    /// Match the controller set to the board: add controllers for new ids and
    /// drop those whose element is gone. Existing controllers keep their state.
    pub fn sync(&mut self, board: &Board) {
        self.columns.retain(|id, _| board.column_index(id).is_some());
        self.cards.retain(|id, _| board.find_card(id).is_some());
        for column in &board.columns {
            self.columns
                .entry(column.id.clone())
                .or_insert_with(|| ColumnController::new(column.id.clone()));
            for card in &column.cards {
                self.cards
                    .entry(card.id.clone())
                    .or_insert_with(|| CardController::new(card.id.clone()));
            }
        }
    }

    /// Return every controller to idle.
    pub fn reset(&mut self) {
        self.cards.values_mut().for_each(CardController::reset);
        self.columns.values_mut().for_each(ColumnController::reset);
    }

    /// Frame tick for the debug overlays: follow the setting, then recompute
    /// the zones of every visible column list. Columns off screen have none.
    pub fn update_hitboxes(&mut self, layout: &BoardLayout, board: &Board, visible: bool, screen: Rect) {
        for controller in self.columns.values_mut() {
            let overlay = controller.hitboxes_mut();
            overlay.sync(visible);
            overlay.clear();
        }
        for col in layout.visible_columns() {
            let (Some(column), Some(list)) = (board.columns.get(col.column_index), col.list_viewport()) else {
                continue;
            };
            if let Some(controller) = self.columns.get_mut(&column.id) {
                controller.hitboxes_mut().on_frame(list, screen);
            }
        }
    }
}

/// Register this frame's regions from the layout about to be drawn: every
/// visible column and card with the drag engine, then the column lists and
/// the board with the auto-scroller. Inner scroll containers go first.
pub fn register_regions(
    layout: &BoardLayout,
    board: &Board,
    settings: &Settings,
    engine: &mut DragEngine,
    scroller: &mut AutoScroller,
) {
    engine.begin_frame();
    scroller.begin_frame();

    for col in layout.visible_columns() {
        let (Some(column), Some(outer)) = (board.columns.get(col.column_index), col.outer()) else {
            continue;
        };
        let column_key = ElementKey::Column(column.id.clone());
        if let (Some(header), Some(rect)) = (col.header(), col.box_rect()) {
            engine.register_draggable(DraggableRegion {
                element: column_key.clone(),
                handle: header,
                rect,
                data: DragPayload::column(column.clone()),
            });
        }
        engine.register_drop_target(DropTargetRegion {
            element: column_key.clone(),
            parent: None,
            rect: outer,
            anchor: outer,
            data: TargetData::column(column.clone()),
            sticky: true,
            allowed_edges: &[],
            can_drop: is_dragging_a_card_or_column,
        });

        for slot in &col.slots {
            let Some(card) = column.cards.get(slot.card_index) else {
                continue;
            };
            let Some(hit) = col.rows_on_screen(slot.extent()) else {
                continue;
            };
            let visible_card = col.rows_on_screen(slot.card);
            let anchor = visible_card.unwrap_or(hit);
            let card_key = ElementKey::Card(card.id.clone());
            if let Some(handle) = visible_card {
                // The payload keeps the card's full height even when clipped,
                // so shadows match the card.
                let rect = Rect {
                    height: slot.card.height,
                    ..handle
                };
                engine.register_draggable(DraggableRegion {
                    element: card_key.clone(),
                    handle,
                    rect,
                    data: DragPayload::card(card.clone(), column.id.clone(), rect),
                });
            }
            engine.register_drop_target(DropTargetRegion {
                element: card_key,
                parent: Some(column_key.clone()),
                rect: hit,
                anchor,
                data: TargetData::card(card.clone(), column.id.clone(), anchor),
                sticky: false,
                allowed_edges: &VERTICAL_EDGES,
                can_drop: is_dragging_a_card,
            });
        }

        if let Some(list) = col.list_viewport() {
            for region in column::auto_scroll_regions(&column.id, list, &settings.auto_scroll) {
                scroller.register(region);
            }
        }
    }

    for region in board_auto_scroll_regions(layout.area) {
        scroller.register(region);
    }
}

impl DragListener for Controllers {
    fn on_drag_event(&mut self, element: &ElementKey, role: Role, event: &DragEvent<'_>) {
        let changed = match element {
            ElementKey::Card(id) => self.cards.get_mut(id).map(|c| c.on_drag_event(role, event)),
            ElementKey::Column(id) => self.columns.get_mut(id).map(|c| c.on_drag_event(role, event)),
        };
        debug_assert!(changed.is_some(), "no controller for {element:?}");
    }

    fn on_generate_preview(
        &mut self,
        element: &ElementKey,
        source: &DragSource,
        input: Position,
    ) -> Option<DragPreview> {
        let tilted = self.tilt_preview;
        match element {
            ElementKey::Card(id) => self
                .cards
                .get_mut(id)
                .map(|c| c.generate_preview(source, input, tilted)),
            ElementKey::Column(id) => self
                .columns
                .get(id)
                .map(|c| c.generate_preview(source, input, tilted)),
        }
    }
}
