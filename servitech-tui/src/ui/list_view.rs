use super::*;
use crate::app::{tab_index, tab_title, LIST_TABS};
use servitech_core::domain::models::{Incident, IncidentKind};

pub fn render_list_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(body);

    let titles: Vec<Line> = LIST_TABS
        .iter()
        .map(|state| {
            let count = app.incidents.get(state).map(Vec::len);
            match count {
                Some(n) => Line::from(format!(" {} ({}) ", tab_title(*state), n)),
                None => Line::from(format!(" {} ", tab_title(*state))),
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(tab_index(app.current_tab))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, chunks[0]);

    let incidents = app.visible_incidents();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} incidents ", tab_title(app.current_tab)))
        .padding(Padding::horizontal(1));

    if incidents.is_empty() {
        let text = if app.loading_tabs.contains(&app.current_tab) {
            "Loading…"
        } else {
            "No incidents here."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = incidents.iter().map(incident_row).collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn incident_row(incident: &Incident) -> ListItem<'_> {
    let kind = match incident.kind {
        Some(IncidentKind::OnSite) => "on site",
        Some(IncidentKind::Remote) => "remote",
        None => "",
    };
    let mut spans = vec![
        Span::styled(
            format!("#{:<6}", incident.id.as_i64()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(
            incident
                .description
                .as_deref()
                .unwrap_or("(no description)"),
        ),
    ];
    if !kind.is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", kind),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !incident.accumulated.is_zero() {
        spans.push(Span::styled(
            format!("  {}", incident.accumulated),
            Style::default().fg(Color::Green),
        ));
    }
    if incident.paused {
        spans.push(Span::styled("  paused", Style::default().fg(Color::Yellow)));
    }
    ListItem::new(Line::from(spans))
}
