//! TUI module for squelch
//!
//! Runs the single control loop: keyboard in, rig poll, draw.

mod params;
pub mod state;
mod transport;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use squelch::{sequencing::StepInfo, synth::SynthMessage, KnobMode};

use crate::rig::{Rig, KNOB_COUNT, TRANSPOSE_KEYS};
use params::render_params;
use state::RigSnapshot;
use transport::render_transport;

/// How far one key press turns a knob
const KNOB_STEP: f32 = 0.02;

/// Keys that play live notes: (key, midi note)
const NOTE_KEYS: [(char, u8); 8] = [
    ('z', 36),
    ('x', 38),
    ('c', 39),
    ('v', 41),
    ('b', 43),
    ('n', 46),
    ('m', 48),
    (',', 51),
];

/// UI application state
pub struct UiApp {
    rig: Arc<Mutex<Rig>>,
    notes_tx: Producer<SynthMessage>,
    step_rx: Consumer<StepInfo>,
    knobs: [f32; KNOB_COUNT],
    last_step: usize,
    snapshot: Option<RigSnapshot>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        rig: Arc<Mutex<Rig>>,
        notes_tx: Producer<SynthMessage>,
        step_rx: Consumer<StepInfo>,
    ) -> Self {
        Self {
            rig,
            notes_tx,
            step_rx,
            knobs: [0.5; KNOB_COUNT],
            last_step: 0,
            snapshot: None,
            should_quit: false,
        }
    }

    /// Run the control loop until quit
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_rig()?;
            self.poll_steps();

            terminal.draw(|frame| self.render(frame))?;

            // Short poll keeps the sequencer deadlines tight
            if event::poll(Duration::from_millis(2))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }

        let mut rig = self.lock_rig()?;
        let rig = &mut *rig;
        if rig.engine.sequencer.is_playing() {
            rig.toggle_transport();
        }
        Ok(())
    }

    fn lock_rig(&self) -> EyreResult<std::sync::MutexGuard<'_, Rig>> {
        self.rig.lock().map_err(|_| eyre!("rig lock poisoned"))
    }

    fn poll_rig(&mut self) -> EyreResult<()> {
        let knobs = self.knobs;
        let last_step = self.last_step;
        let mut rig = self.lock_rig()?;
        rig.poll(&knobs);
        let snapshot = RigSnapshot::capture(&rig, &knobs, last_step);
        drop(rig);
        self.snapshot = Some(snapshot);
        Ok(())
    }

    fn poll_steps(&mut self) {
        while let Ok(info) = self.step_rx.pop() {
            if info.playing {
                self.last_step = info.step;
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.lock_rig()?.toggle_transport(),
            KeyCode::Tab => {
                self.lock_rig()?.params.next_knobset();
            }
            KeyCode::Char('`') => {
                let mut rig = self.lock_rig()?;
                let mode = match rig.params.mode() {
                    KnobMode::Pickup => KnobMode::Scale,
                    KnobMode::Scale => KnobMode::Pickup,
                };
                rig.params.set_mode(mode);
            }
            KeyCode::Char('a') => self.turn(0, KNOB_STEP),
            KeyCode::Char('s') => self.turn(0, -KNOB_STEP),
            KeyCode::Char('d') => self.turn(1, KNOB_STEP),
            KeyCode::Char('f') => self.turn(1, -KNOB_STEP),
            KeyCode::Char('r') => {
                let _ = self.notes_tx.push(SynthMessage::AllNotesOff);
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                if let Some(&semitones) = TRANSPOSE_KEYS.get(index) {
                    self.lock_rig()?.engine.sequencer.set_transpose(semitones);
                }
            }
            KeyCode::Char(c) => {
                if let Some(&(_, note)) = NOTE_KEYS.iter().find(|(k, _)| *k == c) {
                    let _ = self.notes_tx.push(SynthMessage::NoteOn { note, velocity: 100 });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn turn(&mut self, knob: usize, amount: f32) {
        if let Some(position) = self.knobs.get_mut(knob) {
            *position = (*position + amount).clamp(0.0, 1.0);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let Some(state) = &self.snapshot else {
            return;
        };
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Transport + step lights
                Constraint::Min(6),    // Knob panel
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_transport(frame, chunks[0], state);
        render_params(frame, chunks[1], state);

        let help = Paragraph::new(
            " [Q] Quit  [Space] Play/Stop  [Tab] Knob-set  [A/S] [D/F] Knobs  [`] Mode  [1-9] Transpose  [Z..,] Notes",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
