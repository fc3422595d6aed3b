/*
Knob Pickup
===========

A panel with two knobs and ten parameters has to share each knob between
several parameters. The parameters are grouped into knob-sets of `knobs`
parameters each; one set is active at a time and the physical knobs edit it.

The trouble starts when the active set changes. The knob still sits where
the previous parameter left it, and letting it write straight through would
make the new parameter jump. Two reconciliation modes deal with that:

PICKUP
    The knob is ignored until its position "picks up" the parameter: either
    it lands within `tolerance` (a fraction of the parameter's span) of the
    current value, or it passes over the value between two polls. From then
    on the parameter follows the knob 1:1 until the active set changes.

        value        ●                     param
        knob   ○──○──○──●══●══●            (picked up, now tracking)

    While tracking, movements smaller than `jitter × tolerance × span` are
    dropped so a noisy pot does not make the value shimmer.

SCALE
    The parameter moves as soon as the knob moves, by the knob's delta
    scaled by how much room each side has left in the direction of travel:

        moving up:    change = Δ × (max − value) / (max − knob)
        moving down:  change = Δ × (value − min) / (knob − min)

    Knob and value arrive at the end stop together, so a bounded pot behaves
    like an endless encoder without ever jumping. Once knob and value meet
    (within tolerance) the knob tracks 1:1. No room left on the knob side
    means no change.

Either way, switching the active knob-set clears every knob's tracking
flag. That is the only thing standing between a previously tracked knob and
a jump on the newly selected parameter.
*/

use std::fmt;

use tracing::{info, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::param::{Param, ParamTarget};

/// Default pickup window, as a fraction of a parameter's span.
pub const DEFAULT_TOLERANCE: f32 = 0.05;
/// Default jitter filter, as a fraction of the pickup window.
pub const DEFAULT_JITTER: f32 = 0.1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnobMode {
    #[default]
    Pickup,
    Scale,
}

#[derive(Debug, Clone, Copy, Default)]
struct KnobState {
    tracking: bool,
    last_position: Option<f32>,
}

/// Errors that can occur when building a parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSetError {
    /// No parameters were supplied
    Empty,
    /// Zero knobs cannot address any parameter
    NoKnobs,
    /// Parameter count is not a multiple of the knob count
    RaggedKnobSets { params: usize, knobs: usize },
}

impl fmt::Display for ParamSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSetError::Empty => write!(f, "parameter set has no parameters"),
            ParamSetError::NoKnobs => write!(f, "parameter set needs at least one knob"),
            ParamSetError::RaggedKnobSets { params, knobs } => write!(
                f,
                "{} parameters do not divide into knob-sets of {} knobs",
                params, knobs
            ),
        }
    }
}

impl std::error::Error for ParamSetError {}

/// Ordered parameters shared between a smaller number of physical knobs.
#[derive(Debug, Clone)]
pub struct ParamSet<F> {
    params: Vec<Param<F>>,
    knob_count: usize,
    active: usize,
    mode: KnobMode,
    tolerance: f32,
    jitter: f32,
    knobs: Vec<KnobState>,
}

impl<F: Copy> ParamSet<F> {
    pub fn new(params: Vec<Param<F>>, knob_count: usize) -> Result<Self, ParamSetError> {
        if knob_count == 0 {
            return Err(ParamSetError::NoKnobs);
        }
        if params.is_empty() {
            return Err(ParamSetError::Empty);
        }
        if params.len() % knob_count != 0 {
            return Err(ParamSetError::RaggedKnobSets {
                params: params.len(),
                knobs: knob_count,
            });
        }

        Ok(Self {
            params,
            knob_count,
            active: 0,
            mode: KnobMode::Pickup,
            tolerance: DEFAULT_TOLERANCE,
            jitter: DEFAULT_JITTER,
            knobs: vec![KnobState::default(); knob_count],
        })
    }

    pub fn with_mode(mut self, mode: KnobMode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Pickup window as a fraction of span (0.0..=1.0).
    pub fn with_pickup_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.clamp(0.0, 1.0);
        self
    }

    /// Jitter filter as a fraction of the pickup window. 0 disables it.
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    pub fn mode(&self) -> KnobMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: KnobMode) {
        if mode != self.mode {
            self.mode = mode;
            self.reset_tracking();
        }
    }

    pub fn knob_count(&self) -> usize {
        self.knob_count
    }

    pub fn knobset_count(&self) -> usize {
        self.params.len() / self.knob_count
    }

    pub fn active_knobset(&self) -> usize {
        self.active
    }

    /// Make `index` (wrapped) the active knob-set. Changing sets drops all tracking.
    pub fn select_knobset(&mut self, index: usize) {
        let index = index % self.knobset_count();
        if index != self.active {
            self.active = index;
            self.reset_tracking();
            info!(knobset = index, "knob-set selected");
        }
    }

    /// Advance to the next knob-set, wrapping, and return its index.
    pub fn next_knobset(&mut self) -> usize {
        self.select_knobset(self.active + 1);
        self.active
    }

    pub fn is_tracking(&self, knob: usize) -> bool {
        self.knobs.get(knob).is_some_and(|k| k.tracking)
    }

    fn reset_tracking(&mut self) {
        for knob in &mut self.knobs {
            knob.tracking = false;
        }
    }

    pub fn params(&self) -> &[Param<F>] {
        &self.params
    }

    pub fn active_params(&self) -> &[Param<F>] {
        let start = self.active * self.knob_count;
        &self.params[start..start + self.knob_count]
    }

    pub fn param_for_name(&self, name: &str) -> Option<&Param<F>> {
        self.params.iter().find(|p| p.name() == name)
    }

    pub fn param_for_name_mut(&mut self, name: &str) -> Option<&mut Param<F>> {
        self.params.iter_mut().find(|p| p.name() == name)
    }

    /// Feed the latest knob positions (normalized 0.0..=1.0, one per knob).
    ///
    /// Extra positions are ignored; missing ones leave their knob untouched.
    pub fn update_controls(&mut self, positions: &[f32]) {
        let base = self.active * self.knob_count;
        let (mode, tolerance, jitter) = (self.mode, self.tolerance, self.jitter);

        for (knob, &raw) in positions.iter().take(self.knob_count).enumerate() {
            if raw.is_nan() {
                continue;
            }
            let position = raw.clamp(0.0, 1.0);
            let param = &mut self.params[base + knob];
            let state = &mut self.knobs[knob];

            match mode {
                KnobMode::Pickup => pickup(param, state, knob, position, tolerance, jitter),
                KnobMode::Scale => scale(param, state, knob, position, tolerance),
            }
            state.last_position = Some(position);
        }
    }

    /// Write the active knob-set's bound values into `target`.
    pub fn apply_active_set<T>(&self, target: &mut T)
    where
        T: ParamTarget<Field = F> + ?Sized,
    {
        for param in self.active_params() {
            param.apply(target);
        }
    }

    /// Write every bound value into `target`.
    pub fn apply_all<T>(&self, target: &mut T)
    where
        T: ParamTarget<Field = F> + ?Sized,
    {
        for param in &self.params {
            param.apply(target);
        }
    }

    /// Refresh every bound parameter from `target`'s current field values.
    pub fn capture_all<T>(&mut self, target: &T)
    where
        T: ParamTarget<Field = F> + ?Sized,
    {
        for param in &mut self.params {
            param.capture(target);
        }
    }
}

fn pickup<F: Copy>(
    param: &mut Param<F>,
    state: &mut KnobState,
    knob: usize,
    position: f32,
    tolerance: f32,
    jitter: f32,
) {
    let span = param.span();
    if span <= 0.0 {
        return;
    }

    let implied = param.value_for(position);
    if state.tracking {
        // End stops always land exactly, however small the last move
        let at_end_stop = position <= 0.0 || position >= 1.0;
        if at_end_stop || (implied - param.value()).abs() >= jitter * tolerance * span {
            param.set_value(implied);
        }
        return;
    }

    let gap = implied - param.value();
    let within = gap == 0.0 || gap.abs() < tolerance * span;
    let crossed = state.last_position.is_some_and(|last| {
        let previous_gap = param.value_for(last) - param.value();
        (previous_gap < 0.0) != (gap < 0.0)
    });

    if within || crossed {
        state.tracking = true;
        param.set_value(implied);
        trace!(knob, param = param.name(), value = implied, "knob picked up");
    }
}

fn scale<F: Copy>(
    param: &mut Param<F>,
    state: &mut KnobState,
    knob: usize,
    position: f32,
    tolerance: f32,
) {
    let span = param.span();
    if span <= 0.0 {
        return;
    }

    let implied = param.value_for(position);
    if state.tracking {
        param.set_value(implied);
        return;
    }

    let value = param.value();
    if implied == value || (implied - value).abs() < tolerance * span {
        state.tracking = true;
        param.set_value(implied);
        trace!(knob, param = param.name(), value = implied, "knob met value");
        return;
    }

    let Some(last) = state.last_position else {
        return;
    };
    let previous = param.value_for(last);
    let delta = implied - previous;

    let change = if delta > 0.0 {
        let room = param.max() - previous;
        if room > 0.0 {
            delta * (param.max() - value) / room
        } else {
            0.0
        }
    } else if delta < 0.0 {
        let room = previous - param.min();
        if room > 0.0 {
            delta * (value - param.min()) / room
        } else {
            0.0
        }
    } else {
        0.0
    };

    if change != 0.0 {
        param.set_value(value + change);
        trace!(knob, param = param.name(), value = param.value(), "knob scaled");
    }
}
