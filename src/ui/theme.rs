use ratatui::style::{Color, Modifier, Style};

/// Color theme for tack.
///
/// Chrome uses the terminal's default foreground. Color is reserved for drag
/// feedback: drop highlights, shadows and the debug hitboxes.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Column
    pub const COLUMN_BORDER: Color = Color::Reset;
    pub const COLUMN_DROP_BORDER: Color = Color::Cyan;

    // Card
    pub const CARD_BORDER: Color = Color::Reset;
    pub const CARD_ID: Color = Color::DarkGray;
    pub const CARD_OVER_BORDER: Color = Color::Cyan;

    // Drop shadow and placeholder
    pub const SHADOW: Color = Color::DarkGray;

    // Debug hitboxes
    pub const HITBOX_ACCELERATE: Color = Color::Yellow;
    pub const HITBOX_MAX_SPEED: Color = Color::Red;
    pub const HITBOX_OVERFLOW: Color = Color::LightRed;

    // Status bar
    pub const STATUS_DRAG: Color = Color::Cyan;
    pub const STATUS_ERROR: Color = Color::Red;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }

    /// Style of the floating ghost under the pointer.
    pub fn ghost_style(tilted: bool) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        if tilted {
            style.add_modifier(Modifier::ITALIC)
        } else {
            style
        }
    }
}
