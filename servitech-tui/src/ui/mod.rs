use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Tabs},
    Frame,
};

mod detail_view;
mod dialogs;
mod list_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root[0], app);

    match app.current_view {
        View::IncidentList => list_view::render_list_view(frame, app, root[1]),
        View::IncidentDetail => detail_view::render_detail_view(frame, app, root[1]),
    }

    render_footer(frame, root[2], app);

    if let Some(screen) = &app.detail {
        if screen.model.stop_prompt_open() {
            dialogs::render_confirm_stop_dialog(frame, &screen.model);
        } else if screen.model.exit_prompt_open() {
            dialogs::render_confirm_exit_dialog(frame, &screen.model);
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " ServiTech ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.technician.name.clone(), Style::default().fg(Color::White)),
    ];
    if app.is_loading() {
        spans.push(Span::styled("  loading…", Style::default().fg(Color::DarkGray)));
    }

    let status = app
        .status_message
        .as_deref()
        .map(|msg| Line::from(Span::styled(msg, Style::default().fg(Color::Yellow))))
        .unwrap_or_default();

    frame.render_widget(Paragraph::new(vec![Line::from(spans), status]), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match app.current_view {
        View::IncidentList => &[
            ("Tab", "Switch list"),
            ("j/k", "Move"),
            ("Enter", "Open"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ],
        View::IncidentDetail => &[("Esc", "Back"), ("l", "Reload"), ("Ctrl+C", "Quit")],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(": {}  ", label)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
