use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::integration::IntegrationKind;
use crate::ui::theme::{border_color, kind_color, toggle_color};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color()))
        .title(" Details ");

    let Some(row) = app.rows.get(app.selected) else {
        f.render_widget(block, area);
        return;
    };

    let gray = Style::default().fg(ratatui::style::Color::Gray);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Service: ", gray),
        Span::styled(
            row.kind.display_name(),
            Style::default().fg(kind_color(row.kind)),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::styled("URL: ", gray),
        Span::styled(
            row.url.clone(),
            Style::default().fg(ratatui::style::Color::Blue),
        ),
    ]));

    let identity_label = match row.kind {
        IntegrationKind::Jira => "Username: ",
        IntegrationKind::Zendesk => "Email: ",
    };
    lines.push(Line::from(vec![
        Span::styled(identity_label, gray),
        Span::raw(row.identity().to_string()),
    ]));

    let destination_label = match row.kind {
        IntegrationKind::Jira => "Project: ",
        IntegrationKind::Zendesk => "Group: ",
    };
    lines.push(Line::from(vec![
        Span::styled(destination_label, gray),
        Span::raw(row.destination()),
    ]));

    // Never show the token itself
    lines.push(Line::from(vec![
        Span::styled("API token: ", gray),
        Span::raw("•".repeat(row.api_token.chars().count().min(16))),
    ]));

    let vuln = row.enable_software_vulnerabilities.unwrap_or(false);
    let policies = row.enable_failing_policies.unwrap_or(false);
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Vulnerability tickets: ", gray),
        Span::styled(on_off(vuln), Style::default().fg(toggle_color(vuln))),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Failing-policy tickets: ", gray),
        Span::styled(on_off(policies), Style::default().fg(toggle_color(policies))),
    ]));

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Row: ", gray),
        Span::raw(format!(
            "#{} ({} list index {})",
            row.table_index.unwrap_or(0),
            row.kind,
            row.original_index
        )),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
