//! Rename form: modal editor for both relay names.
//!
//! Opens pre-filled with the names currently shown.  Tab / Shift-Tab switch
//! field, Enter submits both, Esc closes without sending anything.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use farm_proto::protocol::Device;

use crate::{
    action::Action,
    component::Component,
    render_state::RenderState,
    theme::{style_focused_border, style_input, C_MUTED, C_SECONDARY},
};

pub struct RenameForm {
    motor: Input,
    light: Input,
    focus: Device,
    open: bool,
}

impl RenameForm {
    pub fn new() -> Self {
        Self {
            motor: Input::default(),
            light: Input::default(),
            focus: Device::Motor,
            open: false,
        }
    }

    pub fn open(&mut self, state: &RenderState) {
        self.motor = Input::new(state.motor.name.clone());
        self.light = Input::new(state.light.name.clone());
        self.focus = Device::Motor;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            Device::Motor => &mut self.motor,
            Device::Light => &mut self.light,
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Device::Motor => Device::Light,
            Device::Light => Device::Motor,
        };
    }

    /// Centered popup area inside `area`.
    pub fn popup_area(area: Rect) -> Rect {
        let w = area.width.min(50);
        let h = area.height.min(6);
        Rect {
            x: area.x + (area.width - w) / 2,
            y: area.y + (area.height - h) / 2,
            width: w,
            height: h,
        }
    }
}

impl Default for RenameForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for RenameForm {
    fn handle_key(&mut self, key: KeyEvent, _state: &RenderState) -> Vec<Action> {
        if !self.open {
            return Vec::new();
        }
        match key.code {
            KeyCode::Esc => vec![Action::CloseRename],
            KeyCode::Enter => vec![Action::SubmitRename {
                motor_name: self.motor.value().to_string(),
                light_name: self.light.value().to_string(),
            }],
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.switch_focus();
                Vec::new()
            }
            _ => {
                self.focused_input().handle_event(&Event::Key(key));
                Vec::new()
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &RenderState) {
        if !self.open {
            return;
        }
        let popup = Self::popup_area(area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_focused_border())
            .title(Span::styled(" Rename relays ", Style::default().fg(C_SECONDARY)));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let field_w = inner.width.saturating_sub(9) as usize;
        for (row, device, input) in [
            (rows[0], Device::Motor, &self.motor),
            (rows[1], Device::Light, &self.light),
        ] {
            let focused = device == self.focus;
            let label = match device {
                Device::Motor => " Motor  ",
                Device::Light => " Light  ",
            };
            let scroll = input.visual_scroll(field_w);
            let value: String = input.value().chars().skip(scroll).collect();
            let value_style = if focused {
                style_input()
            } else {
                Style::default().fg(C_SECONDARY)
            };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(label, Style::default().fg(C_MUTED)),
                    Span::styled(value, value_style),
                ])),
                row,
            );
            if focused {
                let cursor_x = row.x + label.len() as u16 + (input.visual_cursor() - scroll) as u16;
                let max_x = row.x + row.width.saturating_sub(1);
                frame.set_cursor_position((cursor_x.min(max_x), row.y));
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Enter save  Tab switch  Esc cancel",
                Style::default().fg(C_MUTED),
            ))),
            rows[2],
        );
    }
}
