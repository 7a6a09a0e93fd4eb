use ratatui::style::Color;

use crate::model::integration::IntegrationKind;

pub fn kind_color(kind: IntegrationKind) -> Color {
    match kind {
        IntegrationKind::Jira => Color::Rgb(0x00, 0x52, 0xCC),
        IntegrationKind::Zendesk => Color::Rgb(0x03, 0x36, 0x3D),
    }
}

pub fn toggle_color(enabled: bool) -> Color {
    if enabled {
        Color::Green
    } else {
        Color::DarkGray
    }
}

pub fn border_color() -> Color {
    Color::Cyan
}

pub fn error_color() -> Color {
    Color::Red
}
