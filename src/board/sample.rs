use super::{Board, Card, Column};

/// Number of columns on the demo board.
pub const SAMPLE_COLUMNS: usize = 30;

/// Cards in column `index`: between 30 and 34, deterministic so runs are reproducible.
fn cards_in_column(index: usize) -> usize {
    30 + (index * 7) % 5
}

/// Build the demo board: `column:0..29`, each holding 30-34 cards with ids
/// `card:K` numbered consecutively across the whole board.
pub fn sample_board() -> Board {
    let mut next_card = 0usize;
    let columns = (0..SAMPLE_COLUMNS)
        .map(|index| {
            let cards = (0..cards_in_column(index))
                .map(|_| {
                    let id = next_card;
                    next_card += 1;
                    Card::new(format!("card:{id}"), format!("Card {id}"))
                })
                .collect();
            Column::new(format!("column:{index}"), format!("Column {index}"), cards)
        })
        .collect();
    Board::new(columns)
}
