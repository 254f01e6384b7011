use ratatui::layout::{Constraint, Direction, Layout, Rect};
use time::{format_description::BorrowedFormatItem, macros::format_description, PrimitiveDateTime};

const DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Backend timestamps are naive UTC.
pub fn format_timestamp(at: Option<PrimitiveDateTime>) -> String {
    at.and_then(|at| at.format(DATE_TIME).ok())
        .unwrap_or_else(|| "-".to_string())
}

/// Helper function to create a centered rectangle
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((r.width.saturating_sub(width)) / 2),
        ])
        .split(popup_layout[1])[1]
}
