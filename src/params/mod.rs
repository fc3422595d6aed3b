//! Named, bounded parameters and the knob tracker that edits them.
//!
//! A [`ParamSet`] maps a handful of physical controls onto a larger list of
//! [`Param`]s, one knob-set at a time, without letting a value jump when the
//! active set changes. Parameters write into their targets through the
//! [`ParamTarget`] trait, so each binding names a real field.

pub mod param;
pub mod set;

pub use param::{DisplayFormat, Param, ParamTarget};
pub use set::{KnobMode, ParamSet, ParamSetError};
