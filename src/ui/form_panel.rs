use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{form_fields, App, FormField, FormState};
use crate::ui::theme::{error_color, kind_color};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(form) = &app.form else {
        return;
    };

    let title = match form.target {
        Some(_) => format!(" Edit {} Integration ", form.data.kind.display_name()),
        None => format!(" New {} Integration ", form.data.kind.display_name()),
    };

    let gray = Style::default().fg(ratatui::style::Color::Gray);
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(u16, u16)> = None;

    for (i, field) in form_fields(form.data.kind).iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default()
                .fg(ratatui::style::Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            gray
        };
        let marker = if focused { "> " } else { "  " };

        if *field == FormField::Vuln {
            let box_mark = if form.data.enable_software_vulnerabilities {
                "[x]"
            } else {
                "[ ]"
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{box_mark} "), label_style),
                Span::styled(field.label(), label_style),
                Span::styled("  (space to toggle)", gray),
            ]));
        } else {
            let value = field_value(form, *field);
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{:<12} ", field.label()), label_style),
                Span::raw(value.to_string()),
            ]));
            if focused {
                // Cursor sits after the typed value
                let x = area.x + 1 + 2 + 13 + value.chars().count() as u16;
                let y = area.y + 1 + lines.len() as u16 - 1;
                cursor = Some((x.min(area.x + area.width.saturating_sub(2)), y));
            }
        }

        if let Some(msg) = field_error(form, *field) {
            lines.push(Line::from(Span::styled(
                format!("    {msg}"),
                Style::default().fg(error_color()),
            )));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  enter", gray),
        Span::raw(" save   "),
        Span::styled("tab", gray),
        Span::raw(" next field   "),
        Span::styled("esc", gray),
        Span::raw(" cancel"),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(kind_color(form.data.kind)))
        .title(title);

    f.render_widget(Paragraph::new(lines).block(block), area);

    if let Some((x, y)) = cursor {
        f.set_cursor_position((x, y));
    }
}

fn field_value<'a>(form: &'a FormState, field: FormField) -> &'a str {
    match field {
        FormField::Url => &form.data.url,
        FormField::Username => &form.data.username,
        FormField::Email => &form.data.email,
        FormField::ApiToken => &form.data.api_token,
        FormField::ProjectKey => &form.data.project_key,
        FormField::GroupId => &form.data.group_id,
        FormField::Vuln => "",
    }
}

fn field_error(form: &FormState, field: FormField) -> Option<&str> {
    match field {
        FormField::Url => form.errors.url.as_deref(),
        FormField::Username => form.errors.username.as_deref(),
        FormField::Email => form.errors.email.as_deref(),
        FormField::ApiToken => form.errors.api_token.as_deref(),
        FormField::ProjectKey => form.errors.project_key.as_deref(),
        FormField::GroupId => form.errors.group_id.as_deref(),
        FormField::Vuln => None,
    }
}
