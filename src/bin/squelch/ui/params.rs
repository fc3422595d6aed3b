//! Knob panel widget - the active knob-set with value and knob positions

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use squelch::KnobMode;

use super::state::{KnobView, RigSnapshot};

pub fn render_params(frame: &mut Frame, area: Rect, state: &RigSnapshot) {
    let mode = match state.knob_mode {
        KnobMode::Pickup => "pickup",
        KnobMode::Scale => "scale",
    };
    let block = Block::default()
        .title(format!(
            " knobs {}/{} ({}) ",
            state.knobset + 1,
            state.knobset_count,
            mode
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.knobs.is_empty() {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(2); state.knobs.len()])
        .split(inner);

    for (knob, row) in state.knobs.iter().zip(rows.iter()) {
        render_knob(frame, *row, knob);
    }
}

fn render_knob(frame: &mut Frame, area: Rect, knob: &KnobView) {
    let width = area.width.saturating_sub(20).max(8) as usize;
    let value_at = marker(knob.value_position, width);
    let knob_at = marker(knob.knob_position, width);

    // ● value, ○ knob; they coincide once tracking
    let bar: String = (0..width)
        .map(|i| match (i == value_at, i == knob_at) {
            (true, _) => '●',
            (false, true) => '○',
            _ => '─',
        })
        .collect();

    let color = if knob.tracking { Color::Green } else { Color::Yellow };
    let line = Line::from(vec![
        Span::styled(format!(" {:<9}", knob.name), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:>6}  ", knob.display), Style::default().fg(Color::White)),
        Span::styled(bar, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn marker(position: f32, width: usize) -> usize {
    ((position.clamp(0.0, 1.0) * (width - 1) as f32).round() as usize).min(width - 1)
}
