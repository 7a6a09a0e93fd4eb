use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::ui::theme::{border_color, kind_color, toggle_color};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == app.selected;

            let kind_span = Span::styled(
                format!(" {:<8}", row.kind.display_name()),
                Style::default().fg(kind_color(row.kind)),
            );

            // Truncate the name to fit
            let max_name = area.width.saturating_sub(24) as usize;
            let name: String = row.name.chars().take(max_name).collect();
            let name_style = if selected {
                Style::default()
                    .fg(ratatui::style::Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let name_span = Span::styled(name, name_style);

            let vuln = row.enable_software_vulnerabilities.unwrap_or(false);
            let toggle_span = Span::styled(
                if vuln { " vuln" } else { "" },
                Style::default().fg(toggle_color(vuln)),
            );

            ListItem::new(Line::from(vec![kind_span, name_span, toggle_span]))
        })
        .collect();

    let title = if app.loading {
        " Ticket Integrations (loading...) "
    } else {
        " Ticket Integrations "
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color()))
            .title(title),
    );

    f.render_widget(list, area);
}
