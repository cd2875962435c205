//! Toast overlay: draws the notifier's single slot in the top-right corner.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::notifier::{Severity, ToastState};
use crate::theme::{C_TOAST_ERROR, C_TOAST_SUCCESS};

fn style_for(severity: Severity) -> (&'static str, ratatui::style::Color) {
    match severity {
        Severity::Success => ("✓", C_TOAST_SUCCESS),
        Severity::Error => ("✗", C_TOAST_ERROR),
    }
}

pub fn draw(frame: &mut Frame, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    if area.height < 2 || area.width < 8 {
        return;
    }
    let max_width = (area.width / 2).clamp(20, 60).min(area.width);
    let msg_len = toast.message.chars().count() as u16;
    let w = (msg_len + 5).min(max_width);
    let x = area.x + area.width.saturating_sub(w + 1);
    let toast_area = Rect {
        x,
        y: area.y + 1,
        width: w,
        height: 1,
    };

    let (icon, color) = style_for(toast.severity);
    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(
            format!(" {} {} ", icon, toast.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )])),
        toast_area,
    );
}
