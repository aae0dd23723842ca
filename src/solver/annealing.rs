use {
  super::{
    generator::{Candidate, ShapeGenerator, ShapeWeights},
    schedule::Schedule,
    scorer::score_candidate,
  },
  crate::{
    color::ColorSource,
    drawing::{ImageSource, Surface},
    error::{Error, Result},
    geometry::BoundingBox,
  },
  image::RgbaImage,
  rand::prelude::*,
  rand_pcg::Pcg64,
};

/// Acceptance rule for candidates that do not improve the solution.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Cooling {
  /// Only strict improvements are accepted.
  #[default]
  Greedy,
  /// Regressions pass with probability `exp(-diff / T)`;
  /// `T` is multiplied by `decay` every `interval` steps.
  Metropolis {
    initial_temperature: f64,
    decay: f64,
    interval: u64,
  },
}

impl Cooling {
  pub fn metropolis(initial_temperature: f64) -> Self {
    Cooling::Metropolis { initial_temperature, decay: 0.95, interval: 100 }
  }

  pub fn initial_temperature(&self) -> f64 {
    match self {
      Cooling::Greedy => 0.0,
      Cooling::Metropolis { initial_temperature, .. } => *initial_temperature,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
  pub cooling: Cooling,
  pub shape_weights: ShapeWeights,
  pub color_source: ColorSource,
  /// Fixed seed for reproducible runs, entropy otherwise.
  pub seed: Option<u64>,
}

impl EngineConfig {
  pub fn with_cooling(self, cooling: Cooling) -> Self {
    Self { cooling, ..self }
  }

  pub fn with_shape_weights(self, shape_weights: ShapeWeights) -> Self {
    Self { shape_weights, ..self }
  }

  pub fn with_color_source(self, color_source: ColorSource) -> Self {
    Self { color_source, ..self }
  }

  pub fn with_seed(self, seed: u64) -> Self {
    Self { seed: Some(seed), ..self }
  }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
  Idle,
  Running,
  Done,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StepOutcome {
  Accepted { score: f64 },
  Rejected { score: f64 },
  /// The schedule is exhausted, nothing was generated.
  Done,
}

/// The annealing controller: owns the run state and performs one candidate per [`step`](Engine::step).
pub struct Engine {
  original: Surface,
  solution: Surface,
  scratch: Surface,
  canvas: BoundingBox,
  schedule: Schedule,
  generator: ShapeGenerator,
  cooling: Cooling,
  rng: Pcg64,
  temperature: f64,
  iteration: u64,
  accepted: u64,
  state: EngineState,
}

impl Engine {
  pub fn new(source: &impl ImageSource, schedule: Schedule, config: EngineConfig) -> Result<Self> {
    let canvas = BoundingBox::from_size(source.width(), source.height());
    if canvas.is_empty() {
      return Err(Error::EmptyImage);
    }
    let rng = match config.seed {
      Some(seed) => Pcg64::seed_from_u64(seed),
      None => Pcg64::from_entropy(),
    };
    log::info!(
      "engine: {}x{} canvas, {} phases{}, {:?}",
      canvas.width, canvas.height,
      schedule.items().len(),
      if schedule.loop_last() { " (last one looping)" } else { "" },
      config.cooling
    );
    Ok(Self {
      original: Surface::from_source(source),
      solution: Surface::new(canvas.width, canvas.height),
      scratch: Surface::new(canvas.width, canvas.height),
      canvas,
      generator: ShapeGenerator::new(canvas, config.shape_weights, config.color_source)?,
      schedule,
      temperature: config.cooling.initial_temperature(),
      cooling: config.cooling,
      rng,
      iteration: 0,
      accepted: 0,
      state: EngineState::Idle,
    })
  }

  /// Generates, scores and resolves one candidate.
  pub fn step(&mut self) -> StepOutcome {
    let params = match self.schedule.next() {
      Some(params) => params,
      None => {
        if self.state != EngineState::Done {
          log::debug!("engine: schedule exhausted after {} iterations", self.iteration);
        }
        self.state = EngineState::Done;
        return StepOutcome::Done;
      }
    };
    self.state = EngineState::Running;

    let candidate = self.generator.generate(&params, &mut self.rng);
    let scored = score_candidate(
      &candidate,
      params.penalty,
      &mut self.original,
      &mut self.solution,
      &mut self.scratch
    );
    let outcome = match scored {
      // off the canvas, no draw
      None => StepOutcome::Rejected { score: 0.0 },
      Some(score) if self.accept(score) => {
        self.commit(&candidate);
        StepOutcome::Accepted { score }
      }
      Some(score) => StepOutcome::Rejected { score },
    };

    self.iteration += 1;
    self.cool();
    log::trace!("step #{}: {:?} {:?}", self.iteration, candidate.shape.kind(), outcome);
    outcome
  }

  fn accept(&mut self, score: f64) -> bool {
    if score < 0.0 {
      return true;
    }
    match self.cooling {
      Cooling::Metropolis { .. } if self.temperature > 0.0 =>
        self.rng.gen::<f64>() < (-score / self.temperature).exp(),
      _ => false
    }
  }

  fn commit(&mut self, candidate: &Candidate) {
    candidate.shape.paint(&mut self.solution, candidate.color);
    self.accepted += 1;
  }

  fn cool(&mut self) {
    if let Cooling::Metropolis { decay, interval, .. } = self.cooling {
      if interval > 0 && self.iteration % interval == 0 {
        self.temperature *= decay;
        log::debug!("iteration {}: temperature {:.4}", self.iteration, self.temperature);
      }
    }
  }

  pub fn temperature(&self) -> f64 { self.temperature }
  pub fn iteration(&self) -> u64 { self.iteration }
  pub fn accepted(&self) -> u64 { self.accepted }
  pub fn state(&self) -> EngineState { self.state }
  pub fn phase(&self) -> usize { self.schedule.phase() }
  pub fn canvas(&self) -> BoundingBox { self.canvas }

  pub fn solution(&self) -> &Surface {
    &self.solution
  }

  pub fn solution_image(&self) -> &RgbaImage {
    self.solution.image()
  }

  pub fn into_solution_image(self) -> RgbaImage {
    self.solution.into_image()
  }

  /// Mean absolute RGB error of the solution against the target, over the whole canvas.
  pub fn mean_error(&self) -> f64 {
    self.solution.mean_error(&self.original)
  }

  /// Bytes held by the three surfaces.
  pub fn size_bytes(&self) -> usize {
    self.original.size_bytes() + self.solution.size_bytes() + self.scratch.size_bytes()
  }
}
