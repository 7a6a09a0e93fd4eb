use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, CalendarInfo};
use crate::ui::theme::{border_color, toggle_color};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let gray = Style::default().fg(ratatui::style::Color::Gray);
    let mut lines: Vec<Line> = Vec::new();

    match &app.calendar {
        CalendarInfo::Global(Some(calendars)) if !calendars.is_empty() => {
            for cal in calendars {
                lines.push(Line::from(vec![
                    Span::styled("Service account: ", gray),
                    Span::raw(cal.email.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Domain: ", gray),
                    Span::raw(cal.domain.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Private key: ", gray),
                    Span::raw("(configured)"),
                ]));
                lines.push(Line::raw(""));
            }
        }
        CalendarInfo::Global(_) => {
            lines.push(Line::raw("No Google Calendar integration configured."));
        }
        CalendarInfo::Team(Some(settings)) => {
            lines.push(Line::from(vec![
                Span::styled("Calendar events: ", gray),
                Span::styled(
                    if settings.enable_calendar_events {
                        "enabled"
                    } else {
                        "disabled"
                    },
                    Style::default().fg(toggle_color(settings.enable_calendar_events)),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Resolution webhook: ", gray),
                Span::styled(
                    settings.resolution_webhook_url.clone(),
                    Style::default().fg(ratatui::style::Color::Blue),
                ),
            ]));
            lines.push(Line::raw(""));
            if settings.policies.is_empty() {
                lines.push(Line::raw("No policies scheduled."));
            } else {
                lines.push(Line::styled("Policies:", gray));
                for policy in &settings.policies {
                    let id = policy
                        .id
                        .map(|id| format!(" (#{id})"))
                        .unwrap_or_else(|| " (pending)".to_string());
                    lines.push(Line::raw(format!("  {}{}", policy.name, id)));
                }
            }
        }
        CalendarInfo::Team(None) => {
            lines.push(Line::raw("No calendar settings for this team."));
        }
    }

    let title = match app.team {
        Some(team_id) => format!(" Calendar — team {team_id} "),
        None => " Calendar ".to_string(),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color()))
                .title(title),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
