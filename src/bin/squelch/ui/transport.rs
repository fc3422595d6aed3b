//! Transport bar widget - tempo, play state, step lights and voice stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::RigSnapshot;

pub fn render_transport(frame: &mut Frame, area: Rect, state: &RigSnapshot) {
    let block = Block::default().title(" squelch ").borders(Borders::ALL);

    let play_symbol = if state.playing { "▶" } else { "⏸" };
    let play_state = if state.playing { "Playing" } else { "Stopped" };
    let note = state
        .current_note
        .map_or_else(|| "--".to_string(), |n| n.to_string());

    let status = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", state.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state),
            Style::default().fg(if state.playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("seq {}  transpose {:+}  note {}  ", state.pattern_index, state.transpose, note),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", state.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "notes {} / released {}",
                state.stats.notes_started, state.stats.notes_released
            ),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(vec![status, step_lights(state)]).block(block);
    frame.render_widget(paragraph, area);
}

/// One cell per step: lit on the playhead, dim on rests, beat starts marked
fn step_lights(state: &RigSnapshot) -> Line<'static> {
    let beat = state.steps_per_beat.max(1) as usize;
    let mut spans = vec![Span::raw(" ")];
    for (i, &note) in state.pattern_notes.iter().enumerate() {
        let symbol = if note == 0 { "·" } else { "■" };
        let style = if i == state.step {
            Style::default().fg(Color::Green)
        } else if i % beat == 0 {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{} ", symbol), style));
    }
    Line::from(spans)
}
