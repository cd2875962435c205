//! Color palette and style constants for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_ACCENT: Color = Color::Rgb(120, 190, 90);
pub const C_ON: Color = Color::Rgb(80, 200, 120);
pub const C_OFF: Color = Color::Rgb(115, 115, 138);
pub const C_CONNECTED: Color = Color::Rgb(80, 200, 120);
pub const C_DISCONNECTED: Color = Color::Rgb(255, 95, 95);
pub const C_PENDING: Color = Color::Rgb(255, 184, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SKELETON: Color = Color::Rgb(44, 44, 58);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_WATER: Color = Color::Rgb(80, 160, 220);
pub const C_POWER: Color = Color::Rgb(255, 200, 80);
pub const C_GAUGE_DRY: Color = Color::Rgb(158, 96, 46);
pub const C_GAUGE_WET: Color = Color::Rgb(60, 150, 210);
pub const C_INPUT_BG: Color = Color::Rgb(20, 20, 32);
pub const C_INPUT_FG: Color = Color::Rgb(255, 200, 80);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_RENAME: Color = Color::Rgb(255, 200, 80);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_skeleton() -> Style {
    Style::default().fg(C_SKELETON)
}

pub fn style_value() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_input() -> Style {
    Style::default().fg(C_INPUT_FG).bg(C_INPUT_BG)
}

/// Blend between the dry and wet gauge colours by fill ratio.
pub fn gauge_color(ratio: f64) -> Color {
    let t = ratio.clamp(0.0, 1.0);
    let (ar, ag, ab) = rgb(C_GAUGE_DRY);
    let (br, bg, bb) = rgb(C_GAUGE_WET);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color::Rgb(lerp(ar, br), lerp(ag, bg), lerp(ab, bb))
}

fn rgb(c: Color) -> (u8, u8, u8) {
    match c {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    }
}
