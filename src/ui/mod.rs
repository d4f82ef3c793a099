pub mod board_view;
pub mod help;
pub mod layout;
pub mod settings;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{App, Mode};

/// Create a centered rect within `area` using percentage-based sizing with minimums.
pub fn centered_rect(area: Rect, w_pct: u16, h_pct: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (area.width * w_pct / 100).max(min_w).min(area.width);
    let height = (area.height * h_pct / 100).max(min_h).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Board viewport and the status line below it.
pub fn split_screen(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Whether the terminal draws a tilted ghost acceptably. Apple's Terminal
/// renders the shifted italic rows badly.
pub fn tilt_supported_on(term_program: Option<&str>) -> bool {
    term_program != Some("Apple_Terminal")
}

pub fn tilt_supported() -> bool {
    tilt_supported_on(std::env::var("TERM_PROGRAM").ok().as_deref())
}

/// Draw one frame. The layout was computed by [`App::prepare_frame`] for this
/// same area.
pub fn render(f: &mut Frame, app: &App) {
    let (_, status_area) = split_screen(f.area());

    board_view::render_board(f, app.layout(), app.board(), app.controllers());

    if app.state.settings.debug.hitboxes_visible {
        board_view::render_hitboxes(f, app.controllers());
    }

    if let (Some(source), Some(preview), Some(pointer)) =
        (app.drag_source(), app.state.preview.as_ref(), app.pointer())
    {
        board_view::render_ghost(f, source, preview, pointer);
    }

    status_bar::render_status_bar(f, status_area, &app.status_info());

    match &app.state.mode {
        Mode::Help => help::render_help(f, f.area()),
        Mode::Settings { selected } => settings::render_settings(f, f.area(), &app.state.settings, *selected),
        Mode::Normal => {}
    }
}
