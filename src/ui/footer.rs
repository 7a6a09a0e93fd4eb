use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    match &app.view_mode {
        ViewMode::Table => {
            spans.push(hint("↑↓", "navigate"));
            spans.push(hint("a", "add jira"));
            spans.push(hint("z", "add zendesk"));
            spans.push(hint("e", "edit"));
            spans.push(hint("x", "delete"));
            spans.push(hint("J/K", "move row"));
            spans.push(hint("c", "calendar"));
            spans.push(hint("r", "refresh"));
            spans.push(hint("s", "apply"));
            spans.push(hint("q", "quit"));
        }
        ViewMode::Form => {
            spans.push(hint("tab", "next field"));
            spans.push(hint("enter", "save"));
            spans.push(hint("esc", "cancel"));
        }
        ViewMode::Calendar => {
            spans.push(hint("esc", "back"));
            spans.push(hint("q", "quit"));
        }
    }

    // Unapplied-edits indicator
    spans.push(Span::raw("  "));
    if app.dirty {
        spans.push(Span::styled(
            " UNAPPLIED ",
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(ratatui::style::Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            " SYNCED ",
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(ratatui::style::Color::DarkGray),
        ));
    }

    // Flash message
    if let Some((msg, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            msg,
            Style::default().fg(ratatui::style::Color::Yellow),
        ));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line);
    f.render_widget(paragraph, area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(ratatui::style::Color::DarkGray),
    )
}
