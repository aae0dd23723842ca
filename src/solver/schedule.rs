use {
  super::parameters::{FocusField, ParameterSet},
  crate::{
    error::{Error, Result},
    geometry::BoundingBox,
  },
  std::ops::RangeInclusive,
};

/// One phase: a parameter set used for `iteration_count` steps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScheduleItem {
  pub parameter_set: ParameterSet,
  pub iteration_count: u64,
}

impl ScheduleItem {
  pub fn new(parameter_set: ParameterSet, iteration_count: u64) -> Self {
    Self { parameter_set, iteration_count }
  }
}

/// Ordered phases consumed one step at a time, optionally repeating the last one forever.
#[derive(Debug, Clone)]
pub struct Schedule {
  items: Vec<ScheduleItem>,
  loop_last: bool,
  phase: usize,
  remaining: u64,
}

impl Schedule {
  /// Every parameter set is validated here, never during iteration.
  pub fn new(items: Vec<ScheduleItem>, loop_last: bool) -> Result<Self> {
    if items.is_empty() {
      return Err(Error::EmptySchedule);
    }
    items.iter()
      .enumerate()
      .try_for_each(|(phase, item)| item.parameter_set.validate(phase))?;
    let remaining = items[0].iteration_count;
    Ok(Self { items, loop_last, phase: 0, remaining })
  }

  /// Coarse-to-fine schedule for a `width × height` canvas, see [`ScheduleConfig`].
  pub fn subdivided(width: u32, height: u32, config: &ScheduleConfig) -> Result<Self> {
    let canvas = BoundingBox::from_size(width, height);
    let mut items = vec![];

    for cells in std::iter::successors(Some(1u32), |n| n.checked_mul(2)) {
      let cell_area = canvas.area() as f64 / (cells as f64 * cells as f64);
      if cell_area < config.min_cell_area || cells > width.min(height) {
        break;
      }
      let (lb, ub) = (*config.cell_area_fraction.start(), *config.cell_area_fraction.end());
      itertools::iproduct!(0..cells, 0..cells)
        .map(|(row, col)| grid_cell(canvas, cells, col, row))
        .for_each(|cell| items.push(ScheduleItem::new(
          ParameterSet::new(
            FocusField(cell),
            cell_area * lb..=cell_area * ub,
            config.alpha,
            config.penalty
          ),
          config.phase_iterations
        )));
    }

    items.push(ScheduleItem::new(
      ParameterSet::new(FocusField(canvas), config.final_area.clone(), config.alpha, config.penalty),
      config.final_iterations
    ));
    log::debug!("schedule for {}x{}: {} phases", width, height, items.len());
    Self::new(items, config.loop_last)
  }

  pub fn is_done(&self) -> bool {
    !self.loop_last && self.phase >= self.items.len()
  }

  /// Index of the current phase; past the end once finite phases are exhausted.
  pub fn phase(&self) -> usize {
    self.phase
  }

  pub fn items(&self) -> &[ScheduleItem] {
    &self.items
  }

  pub fn loop_last(&self) -> bool {
    self.loop_last
  }

  /// Rewinds to the first phase.
  pub fn reset(&mut self) {
    self.phase = 0;
    self.remaining = self.items[0].iteration_count;
  }
}

/// Yields the parameter set for the next step, `None` once every phase is exhausted.
/// With `loop_last` the final phase is repeated forever and `None` is never returned.
impl Iterator for Schedule {
  type Item = ParameterSet;

  fn next(&mut self) -> Option<ParameterSet> {
    while let Some(item) = self.items.get(self.phase) {
      if self.remaining > 0 {
        self.remaining -= 1;
        return Some(item.parameter_set);
      }
      self.phase += 1;
      self.remaining = self.items.get(self.phase).map_or(0, |item| item.iteration_count);
      if self.phase < self.items.len() {
        log::debug!("schedule: entering phase #{}", self.phase);
      }
    }
    self.loop_last
      .then(|| self.items.last().map(|item| item.parameter_set))
      .flatten()
  }
}

/// `n × n` grid cell, rounding so that neighbouring cells tile the canvas.
fn grid_cell(canvas: BoundingBox, n: u32, col: u32, row: u32) -> BoundingBox {
  let split = |extent: u32, i: u32| (extent as u64 * i as u64 / n as u64) as i32;
  let (x0, x1) = (split(canvas.width, col), split(canvas.width, col + 1));
  let (y0, y1) = (split(canvas.height, row), split(canvas.height, row + 1));
  BoundingBox::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
}

/// Knobs of [`Schedule::subdivided`].
///
/// The canvas is split in `1×1, 2×2, 4×4, …` grids while a cell keeps at least
/// `min_cell_area` pixels. Every cell of every level is one phase focused on the cell, with
/// shape areas drawn from `cell_area_fraction` of the cell area. A whole-canvas phase with
/// `final_area` runs last.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
  pub min_cell_area: f64,
  pub cell_area_fraction: RangeInclusive<f64>,
  pub phase_iterations: u64,
  pub final_area: RangeInclusive<f64>,
  pub final_iterations: u64,
  pub alpha: f64,
  pub penalty: f64,
  pub loop_last: bool,
}

impl Default for ScheduleConfig {
  fn default() -> Self {
    Self {
      min_cell_area: 1000.0,
      cell_area_fraction: 0.01..=0.1,
      phase_iterations: 500,
      final_area: 10.0..=100.0,
      final_iterations: 1,
      alpha: 0.1,
      penalty: 3.0,
      loop_last: true,
    }
  }
}

impl ScheduleConfig {
  pub fn with_min_cell_area(self, min_cell_area: f64) -> Self {
    Self { min_cell_area, ..self }
  }

  pub fn with_cell_area_fraction(self, cell_area_fraction: RangeInclusive<f64>) -> Self {
    Self { cell_area_fraction, ..self }
  }

  pub fn with_phase_iterations(self, phase_iterations: u64) -> Self {
    Self { phase_iterations, ..self }
  }

  pub fn with_final_area(self, final_area: RangeInclusive<f64>) -> Self {
    Self { final_area, ..self }
  }

  pub fn with_final_iterations(self, final_iterations: u64) -> Self {
    Self { final_iterations, ..self }
  }

  pub fn with_alpha(self, alpha: f64) -> Self {
    Self { alpha, ..self }
  }

  pub fn with_penalty(self, penalty: f64) -> Self {
    Self { penalty, ..self }
  }

  pub fn with_loop_last(self, loop_last: bool) -> Self {
    Self { loop_last, ..self }
  }
}
