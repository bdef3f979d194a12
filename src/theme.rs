use ratatui::style::Color;

// Centralized theme colors. Everything that paints a background or a
// highlight goes through these helpers so the palette lives in one place.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn accent() -> Color {
    let (r, g, b) = ACCENT_RGB;
    Color::Rgb(r, g, b)
}

pub fn accent_alt() -> Color {
    let (r, g, b) = ACCENT_ALT_RGB;
    Color::Rgb(r, g, b)
}

// Desktop surface
pub fn desktop_bg() -> Color {
    Color::Black
}

// Dock
pub fn dock_bg() -> Color {
    Color::DarkGray
}
pub fn dock_fg() -> Color {
    Color::White
}
pub fn dock_running_fg() -> Color {
    accent_alt()
}

// Menu / picker
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}

// Dialog / confirm
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}
pub fn dialog_separator() -> Color {
    Color::DarkGray
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_inactive_bg() -> Color {
    Color::DarkGray
}
pub fn decorator_border() -> Color {
    Color::DarkGray
}
pub fn decorator_close_fg() -> Color {
    Color::LightRed
}

// Memory cards
pub fn card_back() -> Color {
    Color::Blue
}
pub fn card_face() -> Color {
    Color::White
}
pub fn card_matched() -> Color {
    Color::Green
}

// Chat
pub fn chat_self_fg() -> Color {
    Color::Cyan
}
pub fn chat_system_fg() -> Color {
    Color::DarkGray
}

// Tasks
pub fn task_completed_fg() -> Color {
    Color::DarkGray
}

// Debug log highlight
pub fn debug_highlight() -> Color {
    accent_alt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_are_rgb() {
        assert_eq!(accent(), Color::Rgb(200, 100, 0));
        assert_eq!(accent_alt(), Color::Rgb(255, 165, 0));
    }
}
