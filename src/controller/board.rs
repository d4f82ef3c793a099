//! The board coordinator: sole owner and writer of the committed board.
//!
//! Drops are resolved by monitors, each gated to one drag kind. Resolution is
//! all-or-nothing: any lookup that fails means the drop has no effect.

use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::board::{Board, Column};
use crate::dnd::autoscroll::{AutoScrollRegion, Axis, Overflow, OverflowEdge, ScrollMode, ScrollSpeed, ScrollTarget};
use crate::dnd::edge::Edge;
use crate::dnd::engine::{DragDispatch, DragLocation};
use crate::dnd::payload::{is_dragging_a_card, is_dragging_a_card_or_column, is_dragging_a_column, DragSource, TargetData};
use crate::dnd::reorder::{reorder, reorder_with_edge};

/// Overflow reach of the board's horizontal scroll container, every side.
const BOARD_OVERFLOW: u16 = 1000;

/// Receives completed drops of the drag kinds it accepts.
pub trait DropMonitor {
    fn can_monitor(&self, source: &DragSource) -> bool;

    /// The board after the drop, or `None` when the drop changes nothing.
    fn on_drop(&self, board: &Board, source: &DragSource, location: &DragLocation) -> Option<Board>;
}

pub struct CardDropMonitor;

impl DropMonitor for CardDropMonitor {
    fn can_monitor(&self, source: &DragSource) -> bool {
        is_dragging_a_card(source)
    }

    fn on_drop(&self, board: &Board, source: &DragSource, location: &DragLocation) -> Option<Board> {
        resolve_card_drop(board, source, location)
    }
}

pub struct ColumnDropMonitor;

impl DropMonitor for ColumnDropMonitor {
    fn can_monitor(&self, source: &DragSource) -> bool {
        is_dragging_a_column(source)
    }

    fn on_drop(&self, board: &Board, source: &DragSource, location: &DragLocation) -> Option<Board> {
        resolve_column_drop(board, source, location)
    }
}

fn with_column(board: &Board, index: usize, column: Column) -> Board {
    let mut columns = board.columns.clone();
    columns[index] = column;
    Board::new(columns)
}

/// Move the card at `card_index` of column `from` into column `to` at `insert_at`.
fn move_across(board: &Board, from: usize, card_index: usize, to: usize, insert_at: usize) -> Board {
    let mut columns = board.columns.clone();
    let card = columns[from].cards.remove(card_index);
    let destination = &mut columns[to].cards;
    let insert_at = insert_at.min(destination.len());
    destination.insert(insert_at, card);
    Board::new(columns)
}

/// Resolve a card drop against the innermost drop target.
///
/// Dropping on a card places the dragged card before or after it according to
/// the target's edge. Dropping on a column's body (not on a card) puts the
/// card at the end of that column.
pub fn resolve_card_drop(board: &Board, source: &DragSource, location: &DragLocation) -> Option<Board> {
    let dragging = source.data.as_card()?;
    let innermost = location.innermost()?;

    let home_index = board.column_index(&dragging.column_id)?;
    let home = &board.columns[home_index];
    let card_index_in_home = home.card_index(&dragging.card.id)?;

    match &innermost.data {
        TargetData::Card { data: target, closest_edge } => {
            let destination_index = board.column_index(&target.column_id)?;
            let destination = &board.columns[destination_index];
            let index_of_target = destination.card_index(&target.card.id)?;

            if destination_index == home_index {
                if card_index_in_home == index_of_target {
                    return None;
                }
                let cards = reorder_with_edge(&home.cards, card_index_in_home, index_of_target, *closest_edge);
                if cards == home.cards {
                    return None;
                }
                let column = Column::new(home.id.clone(), home.title.clone(), cards);
                return Some(with_column(board, home_index, column));
            }

            let final_index = if *closest_edge == Some(Edge::Bottom) {
                index_of_target + 1
            } else {
                index_of_target
            };
            Some(move_across(board, home_index, card_index_in_home, destination_index, final_index))
        }
        TargetData::Column(target) => {
            let destination_index = board.column_index(&target.column.id)?;
            if destination_index == home_index {
                let last = home.cards.len() - 1;
                if card_index_in_home == last {
                    return None;
                }
                let cards = reorder(&home.cards, card_index_in_home, last);
                let column = Column::new(home.id.clone(), home.title.clone(), cards);
                return Some(with_column(board, home_index, column));
            }
            let end = board.columns[destination_index].cards.len();
            Some(move_across(board, home_index, card_index_in_home, destination_index, end))
        }
    }
}

/// Resolve a column drop: the dragged column takes the target column's place.
pub fn resolve_column_drop(board: &Board, source: &DragSource, location: &DragLocation) -> Option<Board> {
    let dragging = source.data.as_column()?;
    let target = location.innermost()?.data.as_column()?;
    let home_index = board.column_index(&dragging.column.id)?;
    let destination_index = board.column_index(&target.column.id)?;
    if home_index == destination_index {
        return None;
    }
    Some(Board::new(reorder(&board.columns, home_index, destination_index)))
}

/// Horizontal auto-scroll registrations for the board's scroll container:
/// over the container, and well past its left and right edges.
pub fn board_auto_scroll_regions(container: Rect) -> [AutoScrollRegion; 2] {
    let edge = OverflowEdge {
        outward: BOARD_OVERFLOW,
        cross_before: BOARD_OVERFLOW,
        cross_after: BOARD_OVERFLOW,
    };
    let region = |mode| AutoScrollRegion {
        target: ScrollTarget::Board,
        rect: container,
        axis: Axis::Horizontal,
        speed: ScrollSpeed::Fast,
        can_scroll: is_dragging_a_card_or_column,
        mode,
    };
    [
        region(ScrollMode::OverElement),
        region(ScrollMode::Overflow(Overflow {
            from_start: Some(edge),
            from_end: Some(edge),
        })),
    ]
}

pub struct BoardCoordinator {
    board: Board,
    revision: u64,
    monitors: Vec<Box<dyn DropMonitor>>,
}

impl BoardCoordinator {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            revision: 0,
            monitors: vec![Box::new(CardDropMonitor), Box::new(ColumnDropMonitor)],
        }
    }

    /// The live, committed board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Bumped on every commit. The app resyncs its controllers when it
    /// changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Offer a finished gesture to the monitors. Cancelled gestures and drops
    /// that resolve to nothing leave the board untouched. Returns whether the
    /// board was replaced.
    pub fn handle_drop(&mut self, dispatch: &DragDispatch) -> bool {
        if !dispatch.completed {
            return false;
        }
        let source = &dispatch.source;
        let location = &dispatch.location.current;
        for monitor in self.monitors.iter().filter(|m| m.can_monitor(source)) {
            if let Some(next) = monitor.on_drop(&self.board, source, location) {
                self.board = next;
                self.revision += 1;
                info!(
                    element = ?source.element,
                    target = ?location.innermost().map(|r| &r.element),
                    revision = self.revision,
                    "board updated"
                );
                return true;
            }
        }
        debug!(element = ?source.element, "drop had no effect");
        false
    }
}
