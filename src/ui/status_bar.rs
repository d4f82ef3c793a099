use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::board_view::truncate;
use super::theme::Theme;
use crate::app::{Mode, NotificationLevel};
use crate::dnd::payload::ElementKey;

/// What the pointer is doing right now, for the left zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity<'a> {
    Idle,
    Dragging {
        element: &'a ElementKey,
        over: Option<&'a ElementKey>,
    },
    Panning,
}

/// Everything the status bar shows.
pub struct StatusInfo<'a> {
    pub mode: &'a Mode,
    pub activity: Activity<'a>,
    pub notification: Option<(&'a str, NotificationLevel)>,
    pub columns: usize,
    pub cards: usize,
    pub scroll: u16,
    pub max_scroll: u16,
}

pub fn render_status_bar(f: &mut Frame, area: Rect, info: &StatusInfo<'_>) {
    let left = build_left_zone(info);
    let right = build_right_zone(info);

    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let center_avail = usize::from(area.width).saturating_sub(left_width + right_width);
    let center = build_center_zone(info, center_avail);

    let mut spans = left;
    spans.extend(center);
    spans.extend(right);

    f.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_style()), area);
}

fn element_label(element: &ElementKey) -> String {
    match element {
        ElementKey::Card(id) => id.clone(),
        ElementKey::Column(id) => format!("[{id}]"),
    }
}

/// Mode badge, then what is being dragged and where.
fn build_left_zone(info: &StatusInfo<'_>) -> Vec<Span<'static>> {
    let badge = match (info.mode, info.activity) {
        (_, Activity::Dragging { .. }) => "DRAG",
        (_, Activity::Panning) => "PAN",
        (Mode::Normal, Activity::Idle) => "NORMAL",
        (Mode::Help, Activity::Idle) => "HELP",
        (Mode::Settings { .. }, Activity::Idle) => "SETTINGS",
    };
    let mut spans = vec![
        Span::styled(
            format!(" {badge} "),
            Style::default()
                .fg(Theme::FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
    ];

    if let Activity::Dragging { element, over } = info.activity {
        spans.push(Span::styled(
            element_label(element),
            Style::default().fg(Theme::STATUS_DRAG),
        ));
        let over = over.map_or_else(|| "nowhere".to_string(), element_label);
        spans.push(Span::styled(format!(" over {over} "), Theme::dim_style()));
    } else {
        spans.push(Span::styled("tack ", Theme::dim_style()));
    }
    spans
}

/// Board totals and horizontal scroll position.
fn build_right_zone(info: &StatusInfo<'_>) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        format!("{} columns · {} cards", info.columns, info.cards),
        Theme::dim_style(),
    )];
    if info.max_scroll > 0 {
        spans.push(Span::styled(
            format!("  ◀ {}/{} ▶", info.scroll, info.max_scroll),
            Style::default().fg(Theme::FG),
        ));
    }
    spans.push(Span::raw(" "));
    spans
}

/// Notification centered in the remaining width.
fn build_center_zone(info: &StatusInfo<'_>, avail_width: usize) -> Vec<Span<'static>> {
    let Some((notif, level)) = info.notification else {
        return vec![Span::raw(" ".repeat(avail_width))];
    };
    let color = match level {
        NotificationLevel::Info => Theme::FG,
        NotificationLevel::Error => Theme::STATUS_ERROR,
    };
    let notif = truncate(notif, avail_width);
    let pad_total = avail_width.saturating_sub(notif.width());
    let pad_left = pad_total / 2;
    vec![
        Span::raw(" ".repeat(pad_left)),
        Span::styled(notif, Style::default().fg(color)),
        Span::raw(" ".repeat(pad_total - pad_left)),
    ]
}
