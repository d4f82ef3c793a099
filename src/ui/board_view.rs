use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::layout::{BoardLayout, CardSlot, Rows, CARD_HEIGHT, COLUMN_WIDTH};
use super::theme::Theme;
use crate::board::{Board, Card, Column};
use crate::controller::card::CardState;
use crate::controller::column::ColumnState;
use crate::controller::Controllers;
use crate::dnd::engine::DragPreview;
use crate::dnd::payload::{DragPayload, DragSource};

/// Width of a column's card list, inside the borders.
const LIST_WIDTH: u16 = COLUMN_WIDTH - 2;

/// Truncate `text` to `max_width` display cells, ending in `…` when cut.
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let avail = max_width - 1;
    let mut truncated: String = text
        .graphemes(true)
        .scan(0, |w, g| {
            let gw = g.width();
            (*w + gw <= avail).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    truncated.push('…');
    truncated
}

/// Copy the `from` part of `src` onto `dst` with its top-left corner at
/// `(x, y)`. Cells falling outside `clip` are skipped, so `(x, y)` may be off
/// screen.
pub(crate) fn blit(src: &Buffer, from: Rect, x: i32, y: i32, clip: Rect, dst: &mut Buffer) {
    for row in 0..from.height {
        let dy = y + i32::from(row);
        if dy < i32::from(clip.top()) || dy >= i32::from(clip.bottom()) {
            continue;
        }
        for col in 0..from.width {
            let dx = x + i32::from(col);
            if dx < i32::from(clip.left()) || dx >= i32::from(clip.right()) {
                continue;
            }
            let Some(cell) = src.cell((from.x + col, from.y + row)) else {
                continue;
            };
            if let Some(target) = dst.cell_mut((dx as u16, dy as u16)) {
                *target = cell.clone();
            }
        }
    }
}

fn draw_card(card: &Card, state: CardState, area: Rect, buf: &mut Buffer) {
    let (border, text) = match state {
        CardState::Over { .. } => (Style::default().fg(Theme::CARD_OVER_BORDER), Style::default()),
        CardState::Dragging | CardState::DraggingLeftSelf | CardState::Preview { .. } => {
            (Theme::dim_style(), Theme::dim_style())
        }
        CardState::Idle => (Style::default().fg(Theme::CARD_BORDER), Style::default()),
    };
    let inner_width = usize::from(area.width.saturating_sub(4));
    let id = truncate(&format!(" {} ", card.id), inner_width);
    Paragraph::new(Line::from(Span::styled(truncate(&card.description, inner_width), text)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(Span::styled(id, Style::default().fg(Theme::CARD_ID)))
                .padding(Padding::horizontal(1)),
        )
        .render(area, buf);
}

/// Drop shadow or trailing placeholder: an outlined, hatched slot.
fn draw_shadow(area: Rect, buf: &mut Buffer) {
    let style = Style::default().fg(Theme::SHADOW);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(style);
    let inner = block.inner(area);
    block.render(area, buf);
    for y in inner.top()..inner.bottom() {
        for x in inner.left()..inner.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol("░").set_style(style);
            }
        }
    }
}

fn list_rect(rows: Rows) -> Rect {
    Rect::new(0, rows.y, LIST_WIDTH, rows.height)
}

/// Everything needed to draw one column box.
struct ColumnView<'a> {
    column: &'a Column,
    slots: &'a [CardSlot],
    placeholder: Option<Rows>,
    content_height: u16,
    list_height: u16,
    scroll: u16,
    state: ColumnState,
}

/// Draw the whole card list, scrolled or not, into its own buffer.
fn draw_list(view: &ColumnView<'_>, card_state: &dyn Fn(&Card) -> CardState) -> Buffer {
    let mut buf = Buffer::empty(Rect::new(0, 0, LIST_WIDTH, view.content_height));
    for slot in view.slots {
        let Some(card) = view.column.cards.get(slot.card_index) else {
            continue;
        };
        if let Some(shadow) = slot.shadow {
            draw_shadow(list_rect(shadow), &mut buf);
        }
        draw_card(card, card_state(card), list_rect(slot.card), &mut buf);
    }
    if let Some(placeholder) = view.placeholder {
        draw_shadow(list_rect(placeholder), &mut buf);
    }
    buf
}

fn draw_column(view: &ColumnView<'_>, card_state: &dyn Fn(&Card) -> CardState) -> Buffer {
    let area = Rect::new(0, 0, COLUMN_WIDTH, view.list_height + 2);
    let mut buf = Buffer::empty(area);

    let border = match view.state {
        ColumnState::CardOver { .. } | ColumnState::ColumnOver => Style::default().fg(Theme::COLUMN_DROP_BORDER),
        _ => Style::default().fg(Theme::COLUMN_BORDER),
    };
    let title = format!(" {} ({}) ", view.column.title, view.column.cards.len());
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled(
            truncate(&title, usize::from(LIST_WIDTH)),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let max_scroll = view.content_height.saturating_sub(view.list_height);
    if max_scroll > 0 {
        block = block.title_bottom(
            Line::from(Span::styled(format!(" {}/{} ", view.scroll, max_scroll), Theme::dim_style()))
                .right_aligned(),
        );
    }
    block.render(area, &mut buf);

    // A column hovered by another column shows only its frame.
    if view.state != ColumnState::ColumnOver {
        let list = draw_list(view, card_state);
        let visible = Rect::new(0, view.scroll, LIST_WIDTH, view.list_height);
        blit(&list, visible, 1, 1, area, &mut buf);
    }
    if view.state == ColumnState::Dragging {
        buf.set_style(area, Theme::dim_style());
    }
    buf
}

pub fn render_board(f: &mut Frame, layout: &BoardLayout, board: &Board, controllers: &Controllers) {
    if board.columns.is_empty() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled("This board has no columns.", Theme::dim_style())))
                .alignment(Alignment::Center),
            layout.area,
        );
        return;
    }

    let card_state = |card: &Card| {
        controllers
            .cards
            .get(&card.id)
            .map(|c| c.state())
            .unwrap_or_default()
    };
    let buf = f.buffer_mut();
    for col in layout.visible_columns() {
        let Some(column) = board.columns.get(col.column_index) else {
            continue;
        };
        let state = controllers
            .columns
            .get(&column.id)
            .map(|c| c.state())
            .unwrap_or_default();
        let view = ColumnView {
            column,
            slots: &col.slots,
            placeholder: col.placeholder,
            content_height: col.content_height,
            list_height: col.list_height,
            scroll: col.scroll,
            state,
        };
        let scratch = draw_column(&view, &card_state);
        let (x, y) = col.box_origin();
        blit(&scratch, scratch.area, x, y, layout.area, buf);
    }
}

/// Tint each column's auto-scroll zones.
pub fn render_hitboxes(f: &mut Frame, controllers: &Controllers) {
    let screen = f.area();
    let buf = f.buffer_mut();
    for column in controllers.columns.values() {
        let Some(boxes) = column.hitboxes().hitboxes() else {
            continue;
        };
        for (rect, color) in [
            (boxes.overflow, Theme::HITBOX_OVERFLOW),
            (boxes.accelerate, Theme::HITBOX_ACCELERATE),
            (boxes.max_speed, Theme::HITBOX_MAX_SPEED),
        ] {
            buf.set_style(rect.intersection(screen), Style::default().bg(color));
        }
    }
}

/// A dragged column as it looked at drag start, unscrolled.
fn draw_column_ghost(column: &Column, height: u16) -> Buffer {
    let slots: Vec<CardSlot> = (0..column.cards.len())
        .map(|card_index| CardSlot {
            card_index,
            card: Rows {
                y: u16::try_from(card_index).unwrap_or(u16::MAX).saturating_mul(CARD_HEIGHT),
                height: CARD_HEIGHT,
            },
            shadow: None,
        })
        .collect();
    let content_height = slots.last().map_or(0, |s| s.card.end());
    let view = ColumnView {
        column,
        slots: &slots,
        placeholder: None,
        content_height,
        list_height: height.saturating_sub(2).min(content_height),
        scroll: 0,
        state: ColumnState::Idle,
    };
    draw_column(&view, &|_| CardState::Idle)
}

/// Draw the floating ghost for the dragged element under the pointer. A
/// tilted ghost leans right: its lower half is shifted one cell.
pub fn render_ghost(f: &mut Frame, source: &DragSource, preview: &DragPreview, pointer: Position) {
    let scratch = match &source.data {
        DragPayload::Card(data) => {
            let mut buf = Buffer::empty(Rect::new(0, 0, preview.width, preview.height));
            draw_card(&data.card, CardState::Idle, buf.area, &mut buf);
            buf
        }
        DragPayload::Column(data) => draw_column_ghost(&data.column, preview.height),
    };
    let area = preview.area(pointer);
    let screen = f.area();
    let buf = f.buffer_mut();
    let height = scratch.area.height;
    for row in 0..height {
        let shift = if preview.tilted {
            i32::from(u32::from(row) * 2 >= u32::from(height))
        } else {
            0
        };
        let line = Rect::new(0, row, scratch.area.width, 1);
        blit(&scratch, line, i32::from(area.x) + shift, i32::from(area.y) + i32::from(row), screen, buf);
    }
    let styled = Rect {
        width: area.width.saturating_add(u16::from(preview.tilted)),
        height: height.min(area.height),
        ..area
    };
    buf.set_style(styled.intersection(screen), Theme::ghost_style(preview.tilted));
}
