//! Header component: 2-row top bar.
//!
//! Row 1: title, connection badge, crop/stage label.
//! Row 2: last-updated footer text (or a loading marker).
//!
//! Not interactive.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    component::Component,
    render_state::{ConnectionVisual, RenderState},
    theme::{C_ACCENT, C_CONNECTED, C_DISCONNECTED, C_MUTED, C_SECONDARY},
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &RenderState) {
        frame.render_widget(Clear, area);
        if area.height < 2 {
            frame.render_widget(Paragraph::new(build_row1(state)), area);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        frame.render_widget(Paragraph::new(build_row1(state)), rows[0]);
        frame.render_widget(Paragraph::new(build_row2(state)), rows[1]);
    }

    fn min_height(&self) -> u16 {
        2
    }
}

fn build_row1(state: &RenderState) -> Line<'static> {
    let (dot, color) = match state.connection {
        ConnectionVisual::Connected => ("●", C_CONNECTED),
        ConnectionVisual::Disconnected => ("○", C_DISCONNECTED),
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            "farmdash",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(dot, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(state.connection.label(), Style::default().fg(color)),
    ];
    if !state.crop_label.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            state.crop_label.clone(),
            Style::default().fg(C_SECONDARY),
        ));
    }
    Line::from(spans)
}

fn build_row2(state: &RenderState) -> Line<'static> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(footer_text(state), Style::default().fg(C_MUTED)),
    ])
}

/// "Updated HH:MM:SS" once a poll has succeeded.
pub fn footer_text(state: &RenderState) -> String {
    match (state.loading, state.last_updated_at) {
        (true, _) => "Loading…".to_string(),
        (false, Some(at)) => format!("Updated {}", at.format("%H:%M:%S")),
        (false, None) => "Not updated yet".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_footer_text() {
        let mut state = RenderState::initial();
        assert_eq!(footer_text(&state), "Loading…");
        state.loading = false;
        assert_eq!(footer_text(&state), "Not updated yet");
        state.last_updated_at = Local.with_ymd_and_hms(2026, 3, 1, 14, 5, 9).single();
        assert_eq!(footer_text(&state), "Updated 14:05:09");
    }
}
