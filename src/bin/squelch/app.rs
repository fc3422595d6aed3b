//! Squelch - application builder and runner

use std::sync::{Arc, Mutex};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{info, warn};

use squelch::{
    dsp::Wavetables,
    sequencing::{MonotonicClock, SequencerConfig, StepInfo, StepSequencer},
    synth::{BassVoice, SynthMessage, VoiceConfig},
    KnobMode, MAX_BLOCK_SIZE,
};

use super::patterns;
use super::rig::{Engine, Rig};
use super::ui::UiApp;

/// Main application builder
pub struct Squelch {
    sequencer: SequencerConfig,
    pattern: usize,
    knob_mode: KnobMode,
}

impl Squelch {
    pub fn new() -> Self {
        Self {
            sequencer: SequencerConfig::default(),
            pattern: 0,
            knob_mode: KnobMode::Pickup,
        }
    }

    pub fn bpm(mut self, bpm: f32) -> Self {
        self.sequencer = self.sequencer.with_bpm(bpm);
        self
    }

    pub fn steps_per_beat(mut self, steps_per_beat: u32) -> Self {
        self.sequencer = self.sequencer.with_steps_per_beat(steps_per_beat);
        self
    }

    pub fn pattern(mut self, index: usize) -> Self {
        self.pattern = index;
        self
    }

    pub fn knob_mode(mut self, mode: KnobMode) -> Self {
        self.knob_mode = mode;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(sample_rate, channels, "audio device opened");

        let mut sequencer = StepSequencer::new(
            MonotonicClock::new(),
            patterns::builtin().wrap_err("built-in patterns are malformed")?,
            self.sequencer,
        )?;
        sequencer.set_pattern(self.pattern);

        // Step ticks for the display, pushed from inside the sequencer
        let (mut step_tx, step_rx) = RingBuffer::<StepInfo>::new(64);
        sequencer.on_step(move |info| {
            let _ = step_tx.push(info);
        });

        let voice = BassVoice::new(
            Arc::new(Wavetables::default()),
            sample_rate,
            VoiceConfig::default(),
        );

        let (notes_tx, notes_rx) = RingBuffer::<SynthMessage>::new(64);
        let rig = Rig::new(Engine { voice, sequencer }, self.knob_mode, notes_rx)?;
        let rig = Arc::new(Mutex::new(rig));

        let rig_audio = Arc::clone(&rig);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                // A poisoned lock means the control loop panicked; play silence
                let Ok(mut rig) = rig_audio.lock() else {
                    data.fill(0.0);
                    return;
                };

                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    rig.render(block);

                    // Mono to all channels
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| warn!(%err, "audio stream error"),
            None,
        )?;

        stream.play().wrap_err("failed to start audio stream")?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(rig, notes_tx, step_rx).run(&mut terminal);
        ratatui::restore();

        result
    }
}

impl Default for Squelch {
    fn default() -> Self {
        Self::new()
    }
}
