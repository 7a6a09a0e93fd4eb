pub mod calendar_panel;
pub mod detail_panel;
pub mod footer;
pub mod form_panel;
pub mod table_panel;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, ViewMode};

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // main content
            Constraint::Length(1), // footer
        ])
        .split(size);

    let main_area = vertical[0];
    let footer_area = vertical[1];

    match &app.view_mode {
        ViewMode::Table => {
            // Rows (60%) + Detail (40%)
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(main_area);

            table_panel::render(f, horizontal[0], app);
            detail_panel::render(f, horizontal[1], app);
        }
        ViewMode::Form => {
            // Keep the table visible behind the form for context
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(main_area);

            table_panel::render(f, horizontal[0], app);
            form_panel::render(f, horizontal[1], app);
        }
        ViewMode::Calendar => {
            calendar_panel::render(f, main_area, app);
        }
    }

    footer::render(f, footer_area, app);
}
