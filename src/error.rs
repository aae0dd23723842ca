//! Crate error type.
//!
//! Only configuration and I/O can fail. Degenerate geometry, candidates outside the canvas
//! and zero-alpha compositing have defined neutral results, and a running
//! [`Engine`](crate::solver::Engine) step never returns an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A phase is not usable: empty focus field, `area_lb > area_ub`, `penalty < 1`, ...
  /// Raised while building a [`Schedule`](crate::solver::Schedule), before the run loop starts.
  #[error("invalid parameter set in phase #{phase}: {reason}")]
  InvalidParameterSet { phase: usize, reason: String },

  #[error("schedule has no phases")]
  EmptySchedule,

  #[error("color palette is empty")]
  EmptyPalette,

  #[error("invalid color: {0:?}")]
  InvalidColor(String),

  #[error("invalid shape weights: {0}")]
  InvalidShapeWeights(#[from] rand::distributions::WeightedError),

  #[error("image has zero area")]
  EmptyImage,

  #[error(transparent)]
  Image(#[from] image::ImageError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
