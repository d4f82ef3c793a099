pub mod sample;
pub mod storage;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Reasons an initial board is rejected before it reaches the coordinator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("column at position {0} has an empty id")]
    EmptyColumnId(usize),
    #[error("card at position {position} in column {column:?} has an empty id")]
    EmptyCardId { column: String, position: usize },
    #[error("duplicate column id {0:?}")]
    DuplicateColumn(String),
    #[error("duplicate card id {0:?}")]
    DuplicateCard(String),
}

/// A single kanban card. Identity is `id`; cards are replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub description: String,
}

impl Card {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// A single kanban column. Card order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards,
        }
    }

    /// Index of a card in this column.
    pub fn card_index(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }
}

/// The whole board. Only the board coordinator replaces it once the app is running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Index of a column by id.
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id == column_id)
    }

    /// Find which column a card is in and its index.
    pub fn find_card(&self, card_id: &str) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(col_idx, col)| col.card_index(card_id).map(|card_idx| (col_idx, card_idx)))
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Check the identity invariants: non-empty ids, no column or card id appears twice.
    ///
    /// Card ids are unique across the whole board, which also guarantees a card
    /// belongs to exactly one column.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut column_ids = HashSet::new();
        let mut card_ids = HashSet::new();
        for (col_pos, column) in self.columns.iter().enumerate() {
            if column.id.is_empty() {
                return Err(BoardError::EmptyColumnId(col_pos));
            }
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardError::DuplicateColumn(column.id.clone()));
            }
            for (card_pos, card) in column.cards.iter().enumerate() {
                if card.id.is_empty() {
                    return Err(BoardError::EmptyCardId {
                        column: column.id.clone(),
                        position: card_pos,
                    });
                }
                if !card_ids.insert(card.id.as_str()) {
                    return Err(BoardError::DuplicateCard(card.id.clone()));
                }
            }
        }
        Ok(())
    }
}
