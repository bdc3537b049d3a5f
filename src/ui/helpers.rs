use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::models::{Guide, Progress, SongRecord};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the guide modal.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// One `[n Label]` chip per guide. Unavailable guides are dimmed, the
/// preferred guide is highlighted.
pub(crate) fn guide_chips(song: &SongRecord, preferred: Guide) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(Guide::ALL.len() * 2);
    for (idx, guide) in Guide::ALL.into_iter().enumerate() {
        let mut style = if song.has_version(guide) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        };
        if guide == preferred {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("[{} {}]", idx + 1, guide.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Both progress toggles, with the active one lit.
pub(crate) fn progress_chips(state: Option<Progress>) -> Vec<Span<'static>> {
    let chip = |progress: Progress, key: &str| {
        let style = if state == Some(progress) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!("[{key}] {}", progress.label()), style)
    };
    vec![
        chip(Progress::Doing, "d"),
        Span::raw("  "),
        chip(Progress::Done, "x"),
    ]
}
