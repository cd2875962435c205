//! Telemetry panel: soil moisture gauge plus the derived readings.
//!
//! While loading, every value cell is drawn as a skeleton bar and the gauge
//! stays empty.  After that, unknown values show the placeholder.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    component::Component,
    render_state::{Reading, RenderState},
    theme::{
        gauge_color, style_border, style_skeleton, style_value, C_MUTED, C_POWER, C_SECONDARY,
        C_WATER,
    },
};

const LABEL_W: usize = 18;

pub struct TelemetryPanel;

impl TelemetryPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for TelemetryPanel {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &RenderState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_border())
            .title(Span::styled(" Field ", Style::default().fg(C_SECONDARY)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        draw_gauge(frame, rows[0], state);

        let readings: [(&str, &Reading, Style); 5] = [
            ("Crop stress", &state.csi, style_value()),
            ("Water (24h)", &state.water_24h, Style::default().fg(C_WATER)),
            ("Power (24h)", &state.power_24h, Style::default().fg(C_POWER)),
            ("Water forecast", &state.predicted_water, Style::default().fg(C_WATER)),
            ("Power forecast", &state.predicted_power, Style::default().fg(C_POWER)),
        ];
        let lines: Vec<Line> = readings
            .iter()
            .map(|(label, reading, style)| reading_line(label, reading, *style, state.loading))
            .collect();
        frame.render_widget(Paragraph::new(lines), rows[1]);
    }

    fn min_height(&self) -> u16 {
        9
    }
}

fn reading_line(label: &str, reading: &Reading, style: Style, loading: bool) -> Line<'static> {
    let value = if loading {
        Span::styled("░░░░░░", style_skeleton())
    } else if reading.is_known() {
        Span::styled(reading.text().to_string(), style)
    } else {
        Span::styled(reading.text().to_string(), Style::default().fg(C_MUTED))
    };
    Line::from(vec![
        Span::styled(format!(" {:<LABEL_W$}", label), Style::default().fg(C_SECONDARY)),
        value,
    ])
}

fn draw_gauge(frame: &mut Frame, area: Rect, state: &RenderState) {
    let ratio = state.gauge_ratio();
    let label = if state.loading {
        "░░░░".to_string()
    } else {
        state.moisture.text().to_string()
    };
    let header = Line::from(vec![
        Span::styled(format!(" {:<LABEL_W$}", "Soil moisture"), Style::default().fg(C_SECONDARY)),
        Span::styled(label, style_value()),
    ]);

    let bar_w = (area.width as usize).saturating_sub(2);
    let bar = Line::from(vec![
        Span::raw(" "),
        Span::styled(smooth_bar(ratio, bar_w), Style::default().fg(gauge_color(ratio))),
    ]);
    frame.render_widget(Paragraph::new(vec![header, bar]), area);
}

/// Sub-block progress bar of `width` cells for a 0..=1 ratio.
pub fn smooth_bar(ratio: f64, width: usize) -> String {
    const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
    if width == 0 {
        return String::new();
    }
    let eighths = (ratio.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full = eighths / 8;
    let partial = eighths % 8;
    let mut bar = String::with_capacity(width + 2);
    for _ in 0..full {
        bar.push('█');
    }
    if full < width {
        bar.push(BLOCKS[partial]);
        for _ in (full + 1)..width {
            bar.push('·');
        }
    }
    bar
}
