//! Rig - voice, transport and knobs behind one lock

use rtrb::Consumer;

use squelch::{
    params::{DisplayFormat, Param, ParamSet, ParamSetError, ParamTarget},
    sequencing::StepSequencer,
    synth::{BassVoice, SynthMessage, VoiceParam},
    KnobMode,
};

/// Physical knobs on the panel
pub const KNOB_COUNT: usize = 2;

/// Semitone offsets for the transpose keys 1..9
pub const TRANSPOSE_KEYS: [i32; 9] = [0, 2, 4, 5, 7, 9, 11, 12, 14];

/// Everything a parameter can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigParam {
    Voice(VoiceParam),
    Bpm,
    Pattern,
}

/// The sound-producing half of the rig
pub struct Engine {
    pub voice: BassVoice,
    pub sequencer: StepSequencer,
}

impl ParamTarget for Engine {
    type Field = RigParam;

    fn set_field(&mut self, field: RigParam, value: f32) {
        match field {
            RigParam::Voice(field) => self.voice.set_field(field, value),
            RigParam::Bpm => self.sequencer.set_bpm(value.round()),
            RigParam::Pattern => self.sequencer.set_pattern(value.round().max(0.0) as usize),
        }
    }

    fn field(&self, field: RigParam) -> f32 {
        match field {
            RigParam::Voice(field) => self.voice.field(field),
            RigParam::Bpm => self.sequencer.bpm(),
            RigParam::Pattern => self.sequencer.pattern_index() as f32,
        }
    }
}

pub struct Rig {
    pub engine: Engine,
    pub params: ParamSet<RigParam>,
    notes_rx: Consumer<SynthMessage>,
}

impl Rig {
    pub fn new(
        mut engine: Engine,
        mode: KnobMode,
        notes_rx: Consumer<SynthMessage>,
    ) -> Result<Self, ParamSetError> {
        let params = ParamSet::new(panel_params(&engine), KNOB_COUNT)?.with_mode(mode);
        params.apply_all(&mut engine);
        Ok(Self {
            engine,
            params,
            notes_rx,
        })
    }

    /// One pass of the control loop: knobs, transport, then live notes.
    pub fn poll(&mut self, knobs: &[f32]) {
        let Rig {
            engine,
            params,
            notes_rx,
        } = self;

        params.update_controls(knobs);
        params.apply_active_set(engine);

        let Engine { voice, sequencer } = engine;
        voice.set_secs_per_step(sequencer.secs_per_step() as f32);
        sequencer.update(voice);
        voice.drain_messages(notes_rx);
    }

    pub fn toggle_transport(&mut self) {
        let Engine { voice, sequencer } = &mut self.engine;
        if sequencer.is_playing() {
            sequencer.stop(voice);
        } else {
            sequencer.start();
        }
    }

    /// Render mono audio. Called from the audio callback.
    pub fn render(&mut self, out: &mut [f32]) {
        self.engine.voice.render_block(out);
    }
}

/// The panel, two knobs per set.
fn panel_params(engine: &Engine) -> Vec<Param<RigParam>> {
    let int = |width| DisplayFormat::Integer { width };
    let dec = DisplayFormat::Decimal { precision: 2 };
    let voice = RigParam::Voice;
    let last_pattern = engine.sequencer.pattern_count().saturating_sub(1) as f32;

    vec![
        Param::new("cutoff", 4000.0, 200.0, 6000.0, int(4)).bound_to(voice(VoiceParam::Cutoff)),
        Param::new("envmod", 0.5, 0.0, 1.0, dec).bound_to(voice(VoiceParam::EnvDepth)),
        Param::new("resQ", 1.0, 0.5, 4.0, dec).bound_to(voice(VoiceParam::Resonance)),
        Param::new("decay", 0.5, 0.0, 1.0, dec).bound_to(voice(VoiceParam::Decay)),
        Param::new("drive", 0.5, 0.0, 1.0, dec).bound_to(voice(VoiceParam::Drive)),
        Param::new("drivemix", 0.2, 0.0, 1.0, dec).bound_to(voice(VoiceParam::DriveMix)),
        Param::new("delay", 0.3, 0.0, 1.0, dec).bound_to(voice(VoiceParam::DelayMix)),
        Param::new("dtime", 0.75, 0.25, 4.0, dec).bound_to(voice(VoiceParam::DelayTime)),
        Param::new("wave", 0.0, 0.0, 1.0, int(1)).bound_to(voice(VoiceParam::Waveform)),
        Param::new("accent", 0.5, 0.0, 1.0, dec).bound_to(voice(VoiceParam::Accent)),
        Param::new("seq", engine.sequencer.pattern_index() as f32, 0.0, last_pattern, int(1))
            .bound_to(RigParam::Pattern),
        Param::new("bpm", engine.sequencer.bpm(), 40.0, 200.0, int(3)).bound_to(RigParam::Bpm),
    ]
}
