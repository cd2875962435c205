//! Relay panel: one card per relay with name, state and last run time.
//!
//! `m` toggles the motor, `l` the light.  The requested state is always the
//! opposite of what is displayed; the card only flips once the controller
//! answers.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use farm_proto::protocol::Device;

use crate::{
    action::Action,
    component::Component,
    intent::RenderHint,
    render_state::{RelayView, RenderState},
    theme::{
        style_border, style_skeleton, C_DISCONNECTED, C_MUTED, C_OFF, C_ON, C_PENDING, C_SECONDARY,
    },
};

pub struct RelayPanel;

impl RelayPanel {
    pub fn new() -> Self {
        Self
    }
}

/// Shown when the controller reports an empty name.
pub fn display_name(view: &RelayView, device: Device) -> String {
    if view.name.is_empty() {
        match device {
            Device::Motor => "Motor".to_string(),
            Device::Light => "Light".to_string(),
        }
    } else {
        view.name.clone()
    }
}

impl Component for RelayPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &RenderState) -> Vec<Action> {
        let device = match key.code {
            KeyCode::Char('m') => Device::Motor,
            KeyCode::Char('l') => Device::Light,
            _ => return Vec::new(),
        };
        vec![Action::Toggle {
            device,
            desired: !state.relay(device).on,
        }]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &RenderState) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        for (device, col) in Device::ALL.into_iter().zip(cols.iter()) {
            draw_card(frame, *col, device, state);
        }
    }

    fn min_height(&self) -> u16 {
        5
    }
}

fn draw_card(frame: &mut Frame, area: Rect, device: Device, state: &RenderState) {
    let view = state.relay(device);
    let key = match device {
        Device::Motor => "m",
        Device::Light => "l",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_border())
        .title(Span::styled(
            format!(" {} [{}] ", display_name(view, device), key),
            Style::default().fg(C_SECONDARY),
        ));

    if state.loading {
        let skeleton = Paragraph::new(vec![
            Line::from(Span::styled(" ░░░░░░", style_skeleton())),
            Line::from(Span::styled(" ░░░░░░░░░░", style_skeleton())),
        ])
        .block(block);
        frame.render_widget(skeleton, area);
        return;
    }

    let base_color = if view.on { C_ON } else { C_OFF };
    let (marker, marker_color) = match view.hint {
        RenderHint::Normal => ("", base_color),
        RenderHint::PendingVisible => (" ◔", C_PENDING),
        RenderHint::PendingHidden => ("  ", C_PENDING),
        RenderHint::TimedOut => (" ?", C_DISCONNECTED),
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                view.state_label(),
                Style::default().fg(base_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(marker, Style::default().fg(marker_color)),
        ]),
        Line::from(vec![
            Span::styled(" last run ", Style::default().fg(C_MUTED)),
            Span::styled(view.last_run.text().to_string(), Style::default().fg(C_SECONDARY)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_toggle_requests_opposite_of_displayed() {
        let mut panel = RelayPanel::new();
        let mut state = RenderState::initial();
        state.light.on = true;

        assert_eq!(
            panel.handle_key(key('m'), &state),
            vec![Action::Toggle {
                device: Device::Motor,
                desired: true
            }]
        );
        assert_eq!(
            panel.handle_key(key('l'), &state),
            vec![Action::Toggle {
                device: Device::Light,
                desired: false
            }]
        );
        assert!(panel.handle_key(key('x'), &state).is_empty());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut state = RenderState::initial();
        assert_eq!(display_name(&state.motor, Device::Motor), "Motor");
        state.light.name = "Grow Light".into();
        assert_eq!(display_name(&state.light, Device::Light), "Grow Light");
    }
}
