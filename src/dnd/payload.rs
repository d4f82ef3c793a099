//! Drag payloads and drop-target data.
//!
//! A payload's kind is its enum variant, so nothing outside this module can
//! make arbitrary data look like a card or column drag. The classification
//! predicates below are what monitors, drop targets and auto-scroll gates use
//! to react only to the drag kind they care about.

use ratatui::layout::{Position, Rect};

use super::edge::{closest_edge, Edge};
use crate::board::{Card, Column};

/// Data published by a dragged card: the card, its home column at drag start,
/// and the card's on-screen rect when the drag began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDragData {
    pub card: Card,
    pub column_id: String,
    pub rect: Rect,
}

/// Data published by a dragged column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDragData {
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    Card(CardDragData),
    Column(ColumnDragData),
}

impl DragPayload {
    pub fn card(card: Card, column_id: impl Into<String>, rect: Rect) -> Self {
        Self::Card(CardDragData {
            card,
            column_id: column_id.into(),
            rect,
        })
    }

    pub fn column(column: Column) -> Self {
        Self::Column(ColumnDragData { column })
    }

    pub fn as_card(&self) -> Option<&CardDragData> {
        match self {
            Self::Card(data) => Some(data),
            Self::Column(_) => None,
        }
    }

    pub fn as_column(&self) -> Option<&ColumnDragData> {
        match self {
            Self::Column(data) => Some(data),
            Self::Card(_) => None,
        }
    }
}

/// Data a drop target reports about itself. Card targets additionally carry
/// the edge closest to the pointer, attached when the target is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetData {
    Card {
        data: CardDragData,
        closest_edge: Option<Edge>,
    },
    Column(ColumnDragData),
}

impl TargetData {
    pub fn card(card: Card, column_id: impl Into<String>, rect: Rect) -> Self {
        Self::Card {
            data: CardDragData {
                card,
                column_id: column_id.into(),
                rect,
            },
            closest_edge: None,
        }
    }

    pub fn column(column: Column) -> Self {
        Self::Column(ColumnDragData { column })
    }

    pub fn as_card(&self) -> Option<&CardDragData> {
        match self {
            Self::Card { data, .. } => Some(data),
            Self::Column(_) => None,
        }
    }

    pub fn as_column(&self) -> Option<&ColumnDragData> {
        match self {
            Self::Column(data) => Some(data),
            Self::Card { .. } => None,
        }
    }
}

/// Identity of a registered element. Card and column ids live in separate
/// namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Card(String),
    Column(String),
}

impl ElementKey {
    pub fn id(&self) -> &str {
        match self {
            Self::Card(id) | Self::Column(id) => id,
        }
    }
}

/// The element being dragged, as seen by drop targets, monitors and
/// auto-scroll gates for the whole gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub element: ElementKey,
    /// The dragged element's rect at drag start.
    pub rect: Rect,
    pub data: DragPayload,
}

pub fn is_card_data(payload: &DragPayload) -> bool {
    matches!(payload, DragPayload::Card(_))
}

pub fn is_column_data(payload: &DragPayload) -> bool {
    matches!(payload, DragPayload::Column(_))
}

pub fn is_card_drop_target_data(data: &TargetData) -> bool {
    matches!(data, TargetData::Card { .. })
}

pub fn is_dragging_a_card(source: &DragSource) -> bool {
    is_card_data(&source.data)
}

pub fn is_dragging_a_column(source: &DragSource) -> bool {
    is_column_data(&source.data)
}

pub fn is_dragging_a_card_or_column(source: &DragSource) -> bool {
    is_dragging_a_card(source) || is_dragging_a_column(source)
}

/// Resolve the closest allowed edge of `anchor` for `pointer` and record it
/// on card target data. Column data has no edge and is returned unchanged.
pub fn attach_closest_edge(
    data: TargetData,
    anchor: Rect,
    pointer: Position,
    allowed: &[Edge],
) -> TargetData {
    match data {
        TargetData::Card { data, .. } => TargetData::Card {
            data,
            closest_edge: closest_edge(anchor, pointer, allowed),
        },
        column => column,
    }
}

/// The edge attached to card target data, if any.
pub fn extract_closest_edge(data: &TargetData) -> Option<Edge> {
    match data {
        TargetData::Card { closest_edge, .. } => *closest_edge,
        TargetData::Column(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::edge::VERTICAL_EDGES;

    fn card_source() -> DragSource {
        let rect = Rect::new(0, 0, 10, 3);
        DragSource {
            element: ElementKey::Card("c1".into()),
            rect,
            data: DragPayload::card(Card::new("c1", "one"), "a", rect),
        }
    }

    fn column_source() -> DragSource {
        DragSource {
            element: ElementKey::Column("a".into()),
            rect: Rect::new(0, 0, 28, 20),
            data: DragPayload::column(Column::new("a", "A", vec![])),
        }
    }

    #[test]
    fn classification_is_by_variant() {
        assert!(is_dragging_a_card(&card_source()));
        assert!(!is_dragging_a_column(&card_source()));
        assert!(is_dragging_a_column(&column_source()));
        assert!(!is_dragging_a_card(&column_source()));
        assert!(is_dragging_a_card_or_column(&card_source()));
    }

    #[test]
    fn column_named_like_a_card_is_still_a_column() {
        // A column whose id and title look like card data stays a column.
        let column = Column::new("card:1", "card", vec![Card::new("card:2", "x")]);
        let data = TargetData::column(column);
        assert!(data.as_column().is_some());
        assert!(!is_card_drop_target_data(&data));
        assert!(data.as_card().is_none());
    }

    #[test]
    fn attach_then_extract_edge() {
        let anchor = Rect::new(0, 10, 10, 4);
        let data = TargetData::card(Card::new("c2", "two"), "a", anchor);
        assert_eq!(extract_closest_edge(&data), None);

        let top = attach_closest_edge(data.clone(), anchor, Position::new(1, 10), &VERTICAL_EDGES);
        assert_eq!(extract_closest_edge(&top), Some(Edge::Top));

        let bottom = attach_closest_edge(data, anchor, Position::new(1, 13), &VERTICAL_EDGES);
        assert_eq!(extract_closest_edge(&bottom), Some(Edge::Bottom));
    }

    #[test]
    fn attach_leaves_column_data_alone() {
        let data = TargetData::column(Column::new("a", "A", vec![]));
        let attached =
            attach_closest_edge(data.clone(), Rect::new(0, 0, 5, 5), Position::new(0, 0), &VERTICAL_EDGES);
        assert_eq!(attached, data);
        assert_eq!(extract_closest_edge(&attached), None);
    }

    #[test]
    fn element_key_id() {
        assert_eq!(ElementKey::Card("c1".into()).id(), "c1");
        assert_ne!(ElementKey::Card("x".into()), ElementKey::Column("x".into()));
    }
}
