use super::utils::format_timestamp;
use super::*;
use servitech_core::domain::{models::IncidentKind, IncidentDetail, SyncOp, TrackerPhase};

pub fn render_detail_view(frame: &mut Frame, app: &App, body: Rect) {
    let Some(screen) = &app.detail else {
        return;
    };
    let detail = &screen.model;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(body);

    render_info(frame, detail, chunks[0]);
    render_timer(frame, detail, chunks[1]);
    render_controls(frame, detail, chunks[2]);
}

fn render_info(frame: &mut Frame, detail: &IncidentDetail, area: Rect) {
    let title = format!(" Incident #{} ", detail.incident_id());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1));

    let Some(incident) = detail.incident() else {
        let text = match detail.last_error() {
            Some(e) => vec![
                Line::from(Span::styled(
                    format!("Could not load incident: {}", e),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled("[l] Retry", Style::default().fg(Color::Yellow))),
            ],
            None => vec![Line::from(Span::styled(
                "Loading incident…",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let kind = match incident.kind {
        Some(IncidentKind::OnSite) => "On site",
        Some(IncidentKind::Remote) => "Remote",
        None => "-",
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Description: ", label),
            Span::raw(incident.description.as_deref().unwrap_or("-")),
        ]),
        Line::from(vec![
            Span::styled("Address:     ", label),
            Span::raw(incident.address.as_deref().unwrap_or("-")),
        ]),
        Line::from(vec![
            Span::styled("Type:        ", label),
            Span::raw(kind),
            Span::styled("   State: ", label),
            Span::raw(incident.state.label()),
        ]),
        Line::from(vec![
            Span::styled("Reported:    ", label),
            Span::raw(format_timestamp(incident.reported_at)),
        ]),
        Line::from(vec![
            Span::styled("Started:     ", label),
            Span::raw(format_timestamp(incident.started_at)),
            Span::styled("   Finished: ", label),
            Span::raw(format_timestamp(incident.ended_at)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_timer(frame: &mut Frame, detail: &IncidentDetail, area: Rect) {
    let tracker = detail.tracker();
    let color = match tracker.phase() {
        TrackerPhase::NotStarted => Color::DarkGray,
        TrackerPhase::Running => Color::Green,
        TrackerPhase::Paused => Color::Yellow,
        TrackerPhase::Finalized => Color::Cyan,
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            tracker.display(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            tracker.status_label(),
            Style::default().fg(color),
        )),
    ];
    if let Some(op) = detail.in_flight() {
        lines.push(Line::from(Span::styled(
            format!("Waiting for server ({})…", op),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Time "))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_controls(frame: &mut Frame, detail: &IncidentDetail, area: Rect) {
    let mut lines = Vec::new();

    let actions: &[(&str, &str)] = match detail.tracker().phase() {
        _ if detail.incident().is_none() => &[],
        TrackerPhase::NotStarted => &[("s", "Start repair")],
        TrackerPhase::Running => &[("p", "Pause"), ("f", "Finish")],
        TrackerPhase::Paused => &[("r", "Resume"), ("f", "Finish")],
        TrackerPhase::Finalized => &[],
    };

    let busy = detail.is_busy();
    let mut spans = Vec::new();
    for (key, label) in actions {
        // Finish stays greyed out until something has been recorded.
        let disabled = busy || (*key == "f" && detail.tracker().elapsed().is_zero());
        let key_style = if disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };
        spans.push(Span::styled(format!("[{}] ", key), key_style));
        spans.push(Span::raw(format!("{}    ", label)));
    }
    lines.push(Line::from(spans));

    if let Some(error) = detail.last_error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    if detail.in_flight() == Some(SyncOp::Discard) {
        lines.push(Line::from(Span::styled(
            "Discarding recorded time…",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Actions ")),
        area,
    );
}
