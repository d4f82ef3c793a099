//! Runtime settings overlay. Changes apply immediately and are not saved.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::config::{Settings, SettingsField};

/// Settings lines; the selected one is reversed.
pub fn settings_lines(settings: &Settings, selected: usize) -> Vec<Line<'static>> {
    SettingsField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let marker = if i == selected { "▸ " } else { "  " };
            let style = if i == selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{marker}{:<24}", field.label()), style),
                Span::styled(format!(" {:>8}", settings.value(*field)), Theme::dim_style()),
            ])
        })
        .collect()
}

pub fn render_settings(f: &mut Frame, area: Rect, settings: &Settings, selected: usize) {
    let height = u16::try_from(SettingsField::ALL.len()).unwrap_or(u16::MAX) + 6;
    let panel_area = super::centered_rect(area, 40, 20, 44, height);

    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " Settings ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(1, 1, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    let mut lines = settings_lines(settings, selected);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter toggles · Esc closes",
        Theme::dim_style(),
    )));
    f.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_show_current_values() {
        let mut settings = Settings::default();
        settings.toggle(SettingsField::Hitboxes);
        let lines = settings_lines(&settings, 3);
        assert_eq!(lines.len(), SettingsField::ALL.len());
        let text: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("▸ Show hitboxes"));
        assert!(text.ends_with("on"));
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.starts_with("  Column auto-scroll"));
    }
}
