//! The optimization engine.
//!
//! A [`Schedule`] hands out one [`ParameterSet`] per step, the [`ShapeGenerator`] turns it into a
//! random [`Candidate`], the scorer compares it against the target over the candidate's bounding
//! box only, and the [`Engine`] accepts or rejects it under its [`Cooling`] rule.

pub mod parameters;
pub use parameters::{FocusField, ParameterSet};

pub mod schedule;
pub use schedule::{Schedule, ScheduleConfig, ScheduleItem};

pub mod generator;
pub use generator::{Candidate, ShapeGenerator, ShapeWeights};

pub mod scorer;
pub use scorer::{pixel_score_diff, score_candidate, score_region};

pub mod annealing;
pub use annealing::{Cooling, Engine, EngineConfig, EngineState, StepOutcome};

#[cfg(test)] mod tests;
