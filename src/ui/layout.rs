//! Board geometry for one frame.
//!
//! The board is a horizontal strip of fixed-width columns scrolled by
//! `scroll` cells; each column's card list scrolls vertically on its own.
//! Positions inside a list are kept in content rows and mapped to the screen
//! on demand, clipped to what is actually visible. The layout depends on
//! controller state: drop shadows and placeholders take up rows, and a card
//! that has left its own slot takes none.

use std::collections::HashMap;

use ratatui::layout::{Position, Rect};

use crate::board::{Board, Column};
use crate::controller::card::CardState;
use crate::controller::column::ColumnState;
use crate::controller::Controllers;
use crate::dnd::edge::Edge;

pub const COLUMN_WIDTH: u16 = 28;
pub const COLUMN_GAP: u16 = 1;
pub const CARD_HEIGHT: u16 = 3;
/// Top and bottom border rows of a column box.
const COLUMN_CHROME: u16 = 2;

/// A vertical run of content rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rows {
    pub y: u16,
    pub height: u16,
}

impl Rows {
    pub fn end(self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    pub card_index: usize,
    pub card: Rows,
    /// Drop shadow shown next to the card while another card hovers it.
    pub shadow: Option<Rows>,
}

impl CardSlot {
    /// Card plus shadow. This is the card's hit area, so the pointer stays
    /// on the card while it is over the shadow.
    pub fn extent(&self) -> Rows {
        match self.shadow {
            Some(shadow) => Rows {
                y: shadow.y.min(self.card.y),
                height: shadow.height + self.card.height,
            },
            None => self.card,
        }
    }
}

/// Intersect an `i32`-positioned rect with `bounds`.
fn clip(x: i32, y: i32, width: u16, height: u16, bounds: Rect) -> Option<Rect> {
    let x0 = x.max(i32::from(bounds.x));
    let y0 = y.max(i32::from(bounds.y));
    let x1 = (x + i32::from(width)).min(i32::from(bounds.right()));
    let y1 = (y + i32::from(height)).min(i32::from(bounds.bottom()));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub column_index: usize,
    /// Screen x of the left border; negative once scrolled past.
    pub x: i32,
    pub top: u16,
    /// Height of the column's drop area: the whole board viewport.
    pub full_height: u16,
    /// Visible list rows between the borders.
    pub list_height: u16,
    pub content_height: u16,
    pub scroll: u16,
    pub slots: Vec<CardSlot>,
    /// Trailing placeholder while a card hovers the column body.
    pub placeholder: Option<Rows>,
    /// The board viewport everything is clipped to.
    pub bounds: Rect,
}

impl ColumnLayout {
    pub fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.list_height)
    }

    pub fn box_height(&self) -> u16 {
        self.list_height + COLUMN_CHROME
    }

    /// Full-height drop area.
    pub fn outer(&self) -> Option<Rect> {
        clip(self.x, i32::from(self.top), COLUMN_WIDTH, self.full_height, self.bounds)
    }

    /// The title row, which is the column's drag handle.
    pub fn header(&self) -> Option<Rect> {
        clip(self.x, i32::from(self.top), COLUMN_WIDTH, 1, self.bounds)
    }

    /// The drawn box, borders included.
    pub fn box_rect(&self) -> Option<Rect> {
        clip(self.x, i32::from(self.top), COLUMN_WIDTH, self.box_height(), self.bounds)
    }

    /// Unclipped box, for drawing off-screen parts into a scratch buffer.
    pub fn box_origin(&self) -> (i32, i32) {
        (self.x, i32::from(self.top))
    }

    /// The visible part of the card list.
    pub fn list_viewport(&self) -> Option<Rect> {
        clip(
            self.x + 1,
            i32::from(self.top) + 1,
            COLUMN_WIDTH - 2,
            self.list_height,
            self.bounds,
        )
    }

    /// Where content `rows` are on screen, if visible at all.
    pub fn rows_on_screen(&self, rows: Rows) -> Option<Rect> {
        let viewport = self.list_viewport()?;
        let y = i32::from(self.top) + 1 + i32::from(rows.y) - i32::from(self.scroll);
        clip(self.x + 1, y, COLUMN_WIDTH - 2, rows.height, viewport)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub area: Rect,
    pub scroll: u16,
    pub max_scroll: u16,
    pub columns: Vec<ColumnLayout>,
}

impl BoardLayout {
    /// Columns with any part inside the viewport.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnLayout> {
        self.columns.iter().filter(|c| c.outer().is_some())
    }

    pub fn column_at(&self, pos: Position) -> Option<&ColumnLayout> {
        self.visible_columns().find(|c| c.outer().is_some_and(|r| r.contains(pos)))
    }

    pub fn column(&self, column_index: usize) -> Option<&ColumnLayout> {
        self.columns.iter().find(|c| c.column_index == column_index)
    }
}

/// Width of the whole strip of `count` columns.
pub fn strip_width(count: usize) -> u16 {
    let count = u16::try_from(count).unwrap_or(u16::MAX);
    count
        .saturating_mul(COLUMN_WIDTH + COLUMN_GAP)
        .saturating_sub(if count > 0 { COLUMN_GAP } else { 0 })
}

fn column_slots(column: &Column, controllers: &Controllers) -> (Vec<CardSlot>, Option<Rows>, u16) {
    let mut slots = Vec::with_capacity(column.cards.len());
    let mut y: u16 = 0;
    for (card_index, card) in column.cards.iter().enumerate() {
        let state = controllers.cards.get(&card.id).map(|c| c.state()).unwrap_or_default();
        let slot = match state {
            CardState::DraggingLeftSelf => continue,
            CardState::Over { dragging, closest_edge: Edge::Top } => CardSlot {
                card_index,
                card: Rows { y: y + dragging.height, height: CARD_HEIGHT },
                shadow: Some(Rows { y, height: dragging.height }),
            },
            CardState::Over { dragging, closest_edge: Edge::Bottom } => CardSlot {
                card_index,
                card: Rows { y, height: CARD_HEIGHT },
                shadow: Some(Rows { y: y + CARD_HEIGHT, height: dragging.height }),
            },
            _ => CardSlot {
                card_index,
                card: Rows { y, height: CARD_HEIGHT },
                shadow: None,
            },
        };
        y = slot.extent().end();
        slots.push(slot);
    }

    let column_state = controllers.columns.get(&column.id).map(|c| c.state()).unwrap_or_default();
    let placeholder = match column_state {
        ColumnState::CardOver { is_over_child_card: false, dragging } => {
            let rows = Rows { y, height: dragging.height };
            y = rows.end();
            Some(rows)
        }
        _ => None,
    };
    (slots, placeholder, y)
}

/// Lay the board out in `area`. Scroll offsets are clamped to what the
/// content allows; the clamped values are in the result.
pub fn compute_layout(
    board: &Board,
    controllers: &Controllers,
    area: Rect,
    board_scroll: u16,
    column_scroll: &HashMap<String, u16>,
) -> BoardLayout {
    let max_scroll = strip_width(board.columns.len()).saturating_sub(area.width);
    let scroll = board_scroll.min(max_scroll);
    let max_list = area.height.saturating_sub(COLUMN_CHROME);

    let columns = board
        .columns
        .iter()
        .enumerate()
        .map(|(column_index, column)| {
            let (slots, placeholder, content_height) = column_slots(column, controllers);
            let list_height = content_height.min(max_list);
            let scroll_y = column_scroll
                .get(&column.id)
                .copied()
                .unwrap_or(0)
                .min(content_height - list_height);
            let offset = column_index as i32 * i32::from(COLUMN_WIDTH + COLUMN_GAP);
            ColumnLayout {
                column_index,
                x: i32::from(area.x) + offset - i32::from(scroll),
                top: area.y,
                full_height: area.height,
                list_height,
                content_height,
                scroll: scroll_y,
                slots,
                placeholder,
                bounds: area,
            }
        })
        .collect();

    BoardLayout {
        area,
        scroll,
        max_scroll,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::test_board;
    use crate::board::sample::sample_board;
    use crate::controller::card::CardController;
    use crate::dnd::engine::{DragEvent, DragEventKind, DragLocation, DragLocationHistory, Role};
    use crate::dnd::payload::{attach_closest_edge, DragPayload, DragSource, ElementKey, TargetData};
    use crate::board::Card;

    fn area() -> Rect {
        Rect::new(0, 0, 80, 20)
    }

    fn hover(controllers: &mut Controllers, card_id: &str, edge_row: u16) {
        let rect = Rect::new(0, 0, 26, 3);
        let source = DragSource {
            element: ElementKey::Card("dragged".into()),
            rect,
            data: DragPayload::card(Card::new("dragged", "x"), "z", rect),
        };
        let data = attach_closest_edge(
            TargetData::card(Card::new(card_id, card_id), "a", rect),
            rect,
            Position::new(1, edge_row),
            &crate::dnd::edge::VERTICAL_EDGES,
        );
        let here = DragLocation { input: Position::new(0, 0), drop_targets: vec![] };
        let location = DragLocationHistory { initial: here.clone(), previous: here.clone(), current: here };
        let event = DragEvent { kind: DragEventKind::DragEnter, source: &source, location: &location, self_data: Some(&data) };
        controllers
            .cards
            .entry(card_id.to_string())
            .or_insert_with(|| CardController::new(card_id))
            .on_drag_event(Role::DropTarget, &event);
    }

    #[test]
    fn columns_stack_left_to_right() {
        let board = test_board(&[("a", &["c1", "c2"]), ("b", &[])]);
        let controllers = Controllers::new(&board, false);
        let layout = compute_layout(&board, &controllers, area(), 0, &HashMap::new());
        assert_eq!(layout.max_scroll, 0);
        let a = &layout.columns[0];
        let b = &layout.columns[1];
        assert_eq!(a.header(), Some(Rect::new(0, 0, 28, 1)));
        assert_eq!(b.outer(), Some(Rect::new(29, 0, 28, 20)));
        assert_eq!(a.list_viewport(), Some(Rect::new(1, 1, 26, 6)));
        assert_eq!(a.rows_on_screen(a.slots[1].card), Some(Rect::new(1, 4, 26, 3)));
        // Empty column still accepts drops over its full height.
        assert_eq!(b.list_height, 0);
        assert_eq!(b.box_height(), 2);
    }

    #[test]
    fn board_scroll_is_clamped_and_shifts_columns() {
        let board = sample_board();
        let controllers = Controllers::new(&board, false);
        let layout = compute_layout(&board, &controllers, area(), u16::MAX, &HashMap::new());
        assert_eq!(layout.max_scroll, strip_width(board.columns.len()) - 80);
        assert_eq!(layout.scroll, layout.max_scroll);
        let last = layout.columns.last().unwrap();
        assert_eq!(last.outer().unwrap().right(), 80);
        assert!(layout.columns[0].outer().is_none());
    }

    #[test]
    fn list_scroll_clips_cards() {
        let board = test_board(&[("a", &["c1", "c2", "c3", "c4", "c5", "c6", "c7"])]);
        let controllers = Controllers::new(&board, false);
        let scroll = HashMap::from([("a".to_string(), 2u16)]);
        let layout = compute_layout(&board, &controllers, area(), 0, &scroll);
        let a = &layout.columns[0];
        assert_eq!(a.content_height, 21);
        assert_eq!(a.list_height, 18);
        assert_eq!(a.scroll, 2);
        // c1 spans rows 0..3, two are scrolled away.
        assert_eq!(a.rows_on_screen(a.slots[0].card), Some(Rect::new(1, 1, 26, 1)));
        assert_eq!(a.max_scroll(), 3);
    }

    #[test]
    fn shadow_sits_on_the_hovered_edge() {
        let board = test_board(&[("a", &["c1", "c2"])]);
        let mut controllers = Controllers::new(&board, false);
        hover(&mut controllers, "c2", 0);
        let layout = compute_layout(&board, &controllers, area(), 0, &HashMap::new());
        let slot = &layout.columns[0].slots[1];
        assert_eq!(slot.shadow, Some(Rows { y: 3, height: 3 }));
        assert_eq!(slot.card, Rows { y: 6, height: 3 });
        assert_eq!(slot.extent(), Rows { y: 3, height: 6 });

        hover(&mut controllers, "c1", 2);
        let layout = compute_layout(&board, &controllers, area(), 0, &HashMap::new());
        let slot = &layout.columns[0].slots[0];
        assert_eq!(slot.card, Rows { y: 0, height: 3 });
        assert_eq!(slot.shadow, Some(Rows { y: 3, height: 3 }));
    }

    #[test]
    fn strip_width_counts_gaps() {
        assert_eq!(strip_width(0), 0);
        assert_eq!(strip_width(1), 28);
        assert_eq!(strip_width(3), 3 * 28 + 2);
    }
}
