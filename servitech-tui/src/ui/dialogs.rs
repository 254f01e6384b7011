use super::utils::centered_rect;
use super::*;
use servitech_core::domain::IncidentDetail;

pub fn render_confirm_stop_dialog(frame: &mut Frame, detail: &IncidentDetail) {
    let recorded = detail.tracker().display();
    render_confirm(
        frame,
        " Finish Incident? ",
        vec![
            Line::from(Span::styled(
                format!("Recorded time: {}", recorded),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                "The timer cannot be resumed afterwards.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        Color::Green,
    );
}

pub fn render_confirm_exit_dialog(frame: &mut Frame, detail: &IncidentDetail) {
    let recorded = detail.tracker().display();
    render_confirm(
        frame,
        " Leave Incident? ",
        vec![
            Line::from(Span::styled(
                "The timer is running.",
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                format!("Leaving discards {} and resets the incident.", recorded),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        Color::Red,
    );
}

fn render_confirm(frame: &mut Frame, title: &str, body: Vec<Line>, yes_color: Color) {
    let area = centered_rect(56, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut text = vec![Line::from("")];
    text.extend(body);
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("[y] Yes", Style::default().fg(yes_color)),
        Span::raw("    "),
        Span::styled("[n] No", Style::default().fg(Color::White)),
    ]));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
