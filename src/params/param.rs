#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Something whose fields a [`Param`] can write into.
///
/// Each implementor names its bindable fields with a small `Copy` enum, so a
/// binding to a field that does not exist fails to compile instead of being
/// silently ignored at runtime.
pub trait ParamTarget {
    type Field: Copy;

    fn set_field(&mut self, field: Self::Field, value: f32);

    fn field(&self, field: Self::Field) -> f32;
}

/// How a parameter value is rendered as text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Rounded to an integer, right-aligned in `width` columns.
    Integer { width: usize },
    /// Fixed-point with `precision` decimals.
    Decimal { precision: usize },
}

impl DisplayFormat {
    pub fn format(&self, value: f32) -> String {
        match *self {
            DisplayFormat::Integer { width } => {
                format!("{:>width$}", value.round() as i64, width = width)
            }
            DisplayFormat::Decimal { precision } => {
                format!("{:.precision$}", value, precision = precision)
            }
        }
    }
}

/// A bounded, named value with an optional binding to a target field.
///
/// `min <= value <= max` holds after every mutation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Param<F> {
    name: String,
    value: f32,
    min: f32,
    max: f32,
    format: DisplayFormat,
    target: Option<F>,
}

impl<F: Copy> Param<F> {
    /// Unbound parameter. Reversed bounds are swapped; `value` is clamped.
    /// A NaN bound collapses onto the other one, a NaN value onto `min`.
    pub fn new(name: impl Into<String>, value: f32, min: f32, max: f32, format: DisplayFormat) -> Self {
        let (min, max) = match (min.is_nan(), max.is_nan()) {
            (false, false) => (min.min(max), min.max(max)),
            (true, false) => (max, max),
            (false, true) => (min, min),
            (true, true) => (0.0, 0.0),
        };
        let value = if value.is_nan() { min } else { value.clamp(min, max) };
        Self {
            name: name.into(),
            value,
            min,
            max,
            format,
            target: None,
        }
    }

    /// Bind this parameter to a field of its target.
    pub fn bound_to(mut self, field: F) -> Self {
        self.target = Some(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn format(&self) -> DisplayFormat {
        self.format
    }

    pub fn target(&self) -> Option<F> {
        self.target
    }

    /// Value a control at `normalized` (0.0..=1.0) would select.
    #[inline]
    pub fn value_for(&self, normalized: f32) -> f32 {
        self.min + self.span() * normalized.clamp(0.0, 1.0)
    }

    /// Where the current value sits on a 0.0..=1.0 control. Zero span reads as 0.0.
    pub fn normalized_position(&self) -> f32 {
        let span = self.span();
        if span > 0.0 {
            (self.value - self.min) / span
        } else {
            0.0
        }
    }

    pub fn set_value(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.value = value.clamp(self.min, self.max);
    }

    pub fn display(&self) -> String {
        self.format.format(self.value)
    }

    /// Write the value into the bound field, if any.
    pub fn apply<T>(&self, target: &mut T)
    where
        T: ParamTarget<Field = F> + ?Sized,
    {
        if let Some(field) = self.target {
            target.set_field(field, self.value);
        }
    }

    /// Pull the bound field's current value back into the parameter.
    pub fn capture<T>(&mut self, target: &T)
    where
        T: ParamTarget<Field = F> + ?Sized,
    {
        if let Some(field) = self.target {
            self.set_value(target.field(field));
        }
    }
}
