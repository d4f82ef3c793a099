use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::DefaultTerminal;
use tracing::info;

use crate::board::Board;
use crate::config::{Settings, SettingsField};
use crate::controller::board::BoardCoordinator;
use crate::controller::pan::{PanGesture, PanState};
use crate::controller::{register_regions, Controllers};
use crate::dnd::autoscroll::{AutoScroller, ScrollTarget};
use crate::dnd::engine::{DragDispatch, DragEngine, DragPreview};
use crate::dnd::payload::DragSource;
use crate::input::action::Action;
use crate::input::keymap::map_key;
use crate::ui::layout::{compute_layout, BoardLayout, COLUMN_GAP, COLUMN_WIDTH};
use crate::ui::status_bar::{Activity, StatusInfo};

/// Frame interval; auto-scroll steps once per frame while dragging.
const FRAME: Duration = Duration::from_millis(33);
const IDLE_POLL: Duration = Duration::from_millis(100);
/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: i32 = 3;
/// Cells scrolled by `h` / `l`: one column.
const COLUMN_STEP: i32 = (COLUMN_WIDTH + COLUMN_GAP) as i32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
    Settings { selected: usize },
}

/// Notification severity for statusbar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// UI state that is not owned by a controller.
pub struct AppState {
    pub mode: Mode,
    pub settings: Settings,
    pub board_scroll: u16,
    pub column_scroll: HashMap<String, u16>,
    /// Ghost of the current drag, set when the drag starts.
    pub preview: Option<DragPreview>,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: Mode::Normal,
            settings,
            board_scroll: 0,
            column_scroll: HashMap::new(),
            preview: None,
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            should_quit: false,
        }
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Show a transient error notification (rendered in red).
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_level = NotificationLevel::Info;
                self.notification_expires = None;
            }
        }
    }
}

/// Move `current` by `delta`, kept within `0..=max`.
fn offset(current: u16, delta: i32, max: u16) -> u16 {
    (i32::from(current) + delta).clamp(0, i32::from(max)) as u16
}

/// The running board: coordinator, controllers, and the gesture machinery,
/// fed by crossterm events and frame ticks.
pub struct App {
    pub state: AppState,
    coordinator: BoardCoordinator,
    controllers: Controllers,
    engine: DragEngine,
    scroller: AutoScroller,
    pan: PanGesture,
    layout: BoardLayout,
    /// Coordinator revision the controllers were last synced to.
    synced_revision: u64,
    tilt_supported: bool,
}

impl App {
    pub fn new(board: Board, settings: Settings, tilt_supported: bool) -> Self {
        let controllers = Controllers::new(&board, settings.preview.tilt && tilt_supported);
        let pan = PanGesture::new(settings.pan.threshold);
        Self {
            state: AppState::new(settings),
            coordinator: BoardCoordinator::new(board),
            controllers,
            engine: DragEngine::new(),
            scroller: AutoScroller::new(),
            pan,
            layout: BoardLayout::default(),
            synced_revision: 0,
            tilt_supported,
        }
    }

    pub fn board(&self) -> &Board {
        self.coordinator.board()
    }

    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    pub fn drag_source(&self) -> Option<&DragSource> {
        self.engine.source()
    }

    /// Pointer position of the live drag.
    pub fn pointer(&self) -> Option<Position> {
        self.engine.location().map(|l| l.current.input)
    }

    pub fn status_info(&self) -> StatusInfo<'_> {
        let activity = match (self.engine.source(), self.engine.location()) {
            (Some(source), Some(location)) => Activity::Dragging {
                element: &source.element,
                over: location.current.innermost().map(|r| &r.element),
            },
            _ if matches!(self.pan.state(), PanState::Scrolling { .. }) => Activity::Panning,
            _ => Activity::Idle,
        };
        let board = self.coordinator.board();
        StatusInfo {
            mode: &self.state.mode,
            activity,
            notification: self
                .state
                .notification
                .as_deref()
                .map(|n| (n, self.state.notification_level)),
            columns: board.columns.len(),
            cards: board.card_count(),
            scroll: self.layout.scroll,
            max_scroll: self.layout.max_scroll,
        }
    }

    /// Lay out the board for `screen` and register this frame's regions.
    /// While dragging, hit testing is re-run against the new regions, since
    /// scrolling or feedback may have moved content under a still pointer.
    pub fn prepare_frame(&mut self, screen: Rect) {
        self.wire(screen);
        if let Some(dispatch) = self.engine.refresh() {
            self.dispatch(dispatch);
            self.wire(screen);
        }
    }

    fn wire(&mut self, screen: Rect) {
        let (board_area, _) = crate::ui::split_screen(screen);
        let board = self.coordinator.board();
        self.layout = compute_layout(
            board,
            &self.controllers,
            board_area,
            self.state.board_scroll,
            &self.state.column_scroll,
        );
        self.state.board_scroll = self.layout.scroll;
        register_regions(
            &self.layout,
            board,
            &self.state.settings,
            &mut self.engine,
            &mut self.scroller,
        );
        self.controllers.update_hitboxes(
            &self.layout,
            board,
            self.state.settings.debug.hitboxes_visible,
            screen,
        );
    }

    /// Frame tick: expire notifications and step auto-scroll.
    pub fn tick(&mut self) {
        self.state.tick_notification();
        let requests = match (self.engine.source(), self.engine.location()) {
            (Some(source), Some(location)) => self.scroller.tick(source, location.current.input),
            _ => return,
        };
        for request in requests {
            self.apply_scroll(&request.target, request.delta);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) => self.pan.end(),
            Event::FocusLost => self.cancel_drag(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.pan.end();
        if key.code == KeyCode::Esc && self.engine.is_dragging() {
            self.cancel_drag();
            return;
        }
        let action = map_key(key, &self.state.mode);
        self.process_action(action);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pan.end();
                if self.state.mode != Mode::Normal {
                    return;
                }
                if !self.engine.pointer_down(pos) && self.layout.area.contains(pos) {
                    self.pan.begin(pos);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.pan.is_active() {
                    if let Some(delta) = self.pan.pointer_move(pos) {
                        self.apply_scroll(&ScrollTarget::Board, delta);
                    }
                    return;
                }
                if let Some(dispatch) = self.engine.pointer_move(pos) {
                    self.dispatch(dispatch);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pan.end();
                if let Some(dispatch) = self.engine.pointer_up(pos) {
                    self.dispatch(dispatch);
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let delta = if mouse.kind == MouseEventKind::ScrollDown {
                    WHEEL_STEP
                } else {
                    -WHEEL_STEP
                };
                let column_id = self
                    .layout
                    .column_at(pos)
                    .and_then(|c| self.coordinator.board().columns.get(c.column_index))
                    .map(|c| c.id.clone());
                if let Some(id) = column_id {
                    self.apply_scroll(&ScrollTarget::Column(id), delta);
                }
            }
            MouseEventKind::ScrollRight => {
                self.apply_scroll(&ScrollTarget::Board, WHEEL_STEP);
            }
            MouseEventKind::ScrollLeft => {
                self.apply_scroll(&ScrollTarget::Board, -WHEEL_STEP);
            }
            _ => {}
        }
    }

    /// Route engine notifications to the controllers; a finished gesture is
    /// then offered to the coordinator.
    fn dispatch(&mut self, dispatch: DragDispatch) {
        if let Some(preview) = dispatch.deliver(&mut self.controllers) {
            self.state.preview = Some(preview);
        }
        if !dispatch.is_finished() {
            return;
        }
        self.state.preview = None;
        if self.coordinator.handle_drop(&dispatch) {
            self.state.notify(format!("Moved {}", dispatch.source.element.id()));
        }
        self.sync_controllers();
    }

    /// Bring the controllers in line with a board the coordinator replaced.
    fn sync_controllers(&mut self) {
        let revision = self.coordinator.revision();
        if revision == self.synced_revision {
            return;
        }
        self.controllers.sync(self.coordinator.board());
        self.controllers.reset();
        self.synced_revision = revision;
    }

    fn cancel_drag(&mut self) {
        if let Some(dispatch) = self.engine.cancel() {
            self.dispatch(dispatch);
            self.state.notify("Drag cancelled");
        }
    }

    /// Scroll a container, clamped to its content. Returns whether it moved.
    fn apply_scroll(&mut self, target: &ScrollTarget, delta: i32) -> bool {
        match target {
            ScrollTarget::Board => {
                let next = offset(self.state.board_scroll, delta, self.layout.max_scroll);
                let moved = next != self.state.board_scroll;
                self.state.board_scroll = next;
                moved
            }
            ScrollTarget::Column(id) => {
                let Some(col) = self
                    .coordinator
                    .board()
                    .column_index(id)
                    .and_then(|i| self.layout.column(i))
                else {
                    return false;
                };
                let current = col.scroll;
                let next = offset(current, delta, col.max_scroll());
                self.state.column_scroll.insert(id.clone(), next);
                next != current
            }
        }
    }

    /// Push changed settings into the pieces that hold a copy.
    fn apply_settings(&mut self) {
        self.controllers.tilt_preview = self.state.settings.preview.tilt && self.tilt_supported;
        self.pan.set_threshold(self.state.settings.pan.threshold);
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.state.should_quit = true,

            Action::ScrollLeft => {
                self.apply_scroll(&ScrollTarget::Board, -COLUMN_STEP);
            }
            Action::ScrollRight => {
                self.apply_scroll(&ScrollTarget::Board, COLUMN_STEP);
            }
            Action::ScrollStart => self.state.board_scroll = 0,
            Action::ScrollEnd => self.state.board_scroll = self.layout.max_scroll,

            Action::CancelDrag => self.cancel_drag(),

            Action::ShowHelp => self.state.mode = Mode::Help,
            Action::OpenSettings => self.state.mode = Mode::Settings { selected: 0 },
            Action::ClosePanel => self.state.mode = Mode::Normal,
            Action::SettingsUp => {
                if let Mode::Settings { selected } = &mut self.state.mode {
                    *selected = selected.saturating_sub(1);
                }
            }
            Action::SettingsDown => {
                if let Mode::Settings { selected } = &mut self.state.mode {
                    *selected = (*selected + 1).min(SettingsField::ALL.len() - 1);
                }
            }
            Action::SettingsToggle => {
                let Mode::Settings { selected } = self.state.mode else {
                    return;
                };
                let Some(&field) = SettingsField::ALL.get(selected) else {
                    self.state.notify_error("No such setting");
                    return;
                };
                self.state.settings.toggle(field);
                self.apply_settings();
                let value = self.state.settings.value(field);
                info!(setting = field.label(), %value, "setting changed");
                self.state.notify(format!("{}: {value}", field.label()));
            }
        }
    }
}

/// Main TUI application loop.
pub fn run(terminal: &mut DefaultTerminal, mut app: App) -> color_eyre::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // Tick
        if last_frame.elapsed() >= FRAME {
            app.tick();
            last_frame = Instant::now();
        }

        // Render
        terminal.draw(|f| {
            app.prepare_frame(f.area());
            crate::ui::render(f, &app);
        })?;

        // Handle input; queued events are drained so a drag follows the
        // latest pointer position.
        let timeout = if app.is_dragging() {
            FRAME.saturating_sub(last_frame.elapsed())
        } else {
            IDLE_POLL
        };
        if event::poll(timeout)? {
            app.handle_event(event::read()?);
            while event::poll(Duration::ZERO)? {
                app.handle_event(event::read()?);
            }
        }

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::sample::sample_board;
    use crate::board::tests::{card_ids, test_board};
    use crate::controller::card::CardState;
    use crate::controller::column::ColumnState;
    use crossterm::event::KeyModifiers;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 21,
    };

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn press(app: &mut App, x: u16, y: u16) {
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
    }

    fn drag(app: &mut App, x: u16, y: u16) {
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), x, y));
        app.prepare_frame(SCREEN);
    }

    fn release(app: &mut App, x: u16, y: u16) {
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), x, y));
        app.prepare_frame(SCREEN);
    }

    fn key(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn app(board: Board) -> App {
        let mut app = App::new(board, Settings::default(), true);
        app.prepare_frame(SCREEN);
        app
    }

    // Layout on an 80x20 board area: column a spans x 0..28, column b x 29..57.
    // Cards are 3 rows starting at row 1.

    #[test]
    fn drag_card_onto_card_in_other_column() {
        let mut app = app(test_board(&[("a", &["c1", "c2"]), ("b", &["c3"])]));
        press(&mut app, 5, 2);
        drag(&mut app, 5, 3);
        assert!(app.is_dragging());
        assert!(app.state.preview.is_some());
        // Lower half of c3.
        drag(&mut app, 35, 3);
        release(&mut app, 35, 3);
        assert!(!app.is_dragging());
        assert!(app.state.preview.is_none());
        assert_eq!(card_ids(app.board(), "a"), vec!["c2"]);
        assert_eq!(card_ids(app.board(), "b"), vec!["c3", "c1"]);
        assert_eq!(app.state.notification.as_deref(), Some("Moved c1"));
    }

    #[test]
    fn committed_drop_resyncs_controllers() {
        let mut app = app(test_board(&[("a", &["c1", "c2"]), ("b", &["c3"])]));
        assert_eq!(app.synced_revision, 0);
        press(&mut app, 5, 2);
        drag(&mut app, 5, 3);
        drag(&mut app, 35, 3);
        release(&mut app, 35, 3);
        assert_eq!(app.coordinator.revision(), 1);
        assert_eq!(app.synced_revision, 1);
        assert!(app.controllers.cards.values().all(|c| c.state() == CardState::Idle));
        assert!(app.controllers.columns.values().all(|c| c.state() == ColumnState::Idle));

        // A drop that changes nothing leaves the revision alone.
        press(&mut app, 35, 5);
        drag(&mut app, 35, 6);
        release(&mut app, 35, 6);
        assert_eq!(app.coordinator.revision(), 1);
        assert_eq!(app.synced_revision, 1);
    }

    #[test]
    fn drop_on_column_body_appends() {
        let mut app = app(test_board(&[("a", &["c1", "c2"]), ("b", &["c3"])]));
        press(&mut app, 5, 2);
        drag(&mut app, 5, 3);
        drag(&mut app, 40, 15);
        release(&mut app, 40, 15);
        assert_eq!(card_ids(app.board(), "b"), vec!["c3", "c1"]);
    }

    #[test]
    fn escape_cancels_without_commit() {
        let board = test_board(&[("a", &["c1", "c2"]), ("b", &["c3"])]);
        let mut app = app(board.clone());
        press(&mut app, 5, 2);
        drag(&mut app, 5, 3);
        drag(&mut app, 35, 3);
        key(&mut app, KeyCode::Esc);
        assert!(!app.is_dragging());
        assert!(app.state.preview.is_none());
        release(&mut app, 35, 3);
        assert_eq!(app.board(), &board);
        assert!(app
            .controllers()
            .cards
            .values()
            .all(|c| c.state() == CardState::Idle));
    }

    #[test]
    fn click_without_moving_changes_nothing() {
        let board = test_board(&[("a", &["c1", "c2"])]);
        let mut app = app(board.clone());
        press(&mut app, 5, 2);
        release(&mut app, 5, 2);
        assert!(!app.is_dragging());
        assert_eq!(app.board(), &board);
    }

    #[test]
    fn drag_column_header_reorders_columns() {
        let mut app = app(test_board(&[("a", &["c1"]), ("b", &["c2"]), ("c", &[])]));
        press(&mut app, 2, 0);
        drag(&mut app, 3, 0);
        drag(&mut app, 62, 10);
        release(&mut app, 62, 10);
        let order: Vec<&str> = app.board().columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn pan_scrolls_board_after_threshold() {
        let mut app = app(sample_board());
        // Below column 0's cards: the bottom border row is not a handle, the
        // list fills the height, so press in the gap between columns.
        press(&mut app, 28, 10);
        drag(&mut app, 20, 10);
        assert_eq!(app.state.board_scroll, 0);
        drag(&mut app, 17, 10);
        assert_eq!(app.state.board_scroll, 0);
        drag(&mut app, 12, 10);
        assert_eq!(app.state.board_scroll, 5);
        assert!(matches!(app.status_info().activity, Activity::Panning));
        // Any key ends the pan.
        key(&mut app, KeyCode::Char('x'));
        drag(&mut app, 2, 10);
        assert_eq!(app.state.board_scroll, 5);
    }

    #[test]
    fn auto_scroll_moves_board_near_right_edge() {
        let mut app = app(sample_board());
        press(&mut app, 5, 2);
        drag(&mut app, 5, 3);
        drag(&mut app, 79, 10);
        let before = app.state.board_scroll;
        app.tick();
        app.prepare_frame(SCREEN);
        assert!(app.state.board_scroll > before);
    }

    #[test]
    fn settings_toggle_applies_immediately() {
        let mut app = app(test_board(&[("a", &["c1"])]));
        assert!(app.controllers().tilt_preview);
        key(&mut app, KeyCode::Char('s'));
        assert_eq!(app.state.mode, Mode::Settings { selected: 0 });
        for _ in 0..10 {
            key(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.state.mode, Mode::Settings { selected: SettingsField::ALL.len() - 1 });
        key(&mut app, KeyCode::Enter);
        assert!(!app.state.settings.preview.tilt);
        assert!(!app.controllers().tilt_preview);
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.state.mode, Mode::Normal);
    }

    #[test]
    fn tilt_needs_terminal_support() {
        let app = App::new(test_board(&[("a", &[])]), Settings::default(), false);
        assert!(!app.controllers().tilt_preview);
    }

    #[test]
    fn wheel_scrolls_column_under_pointer() {
        let cards: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let ids: Vec<&str> = cards.iter().map(String::as_str).collect();
        let mut app = app(test_board(&[("a", &ids)]));
        app.handle_event(mouse(MouseEventKind::ScrollDown, 5, 5));
        app.prepare_frame(SCREEN);
        assert_eq!(app.layout().columns[0].scroll, 3);
        app.handle_event(mouse(MouseEventKind::ScrollUp, 5, 5));
        app.handle_event(mouse(MouseEventKind::ScrollUp, 5, 5));
        app.prepare_frame(SCREEN);
        assert_eq!(app.layout().columns[0].scroll, 0);
    }

    #[test]
    fn keys_scroll_board_by_columns() {
        let mut app = app(sample_board());
        key(&mut app, KeyCode::Char('l'));
        assert_eq!(app.state.board_scroll, 29);
        key(&mut app, KeyCode::Char('G'));
        app.prepare_frame(SCREEN);
        assert_eq!(app.state.board_scroll, app.layout().max_scroll);
        key(&mut app, KeyCode::Char('g'));
        assert_eq!(app.state.board_scroll, 0);
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = app(test_board(&[("a", &[])]));
        key(&mut app, KeyCode::Char('q'));
        assert!(app.state.should_quit);
    }
}
