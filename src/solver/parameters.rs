use {
  crate::{
    error::{Error, Result},
    geometry::{BoundingBox, Point},
  },
  rand::Rng,
  std::ops::RangeInclusive,
};

/// The region candidate anchors are sampled from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FocusField(pub BoundingBox);

impl FocusField {
  pub fn new(x0: i32, y0: i32, width: u32, height: u32) -> Self {
    Self(BoundingBox::new(x0, y0, width, height))
  }

  pub fn bounding_box(&self) -> BoundingBox {
    self.0
  }

  /// Uniform point in `[x0, x0 + width) × [y0, y0 + height)`. The field must not be empty.
  pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
    let BoundingBox { x0, y0, .. } = self.0;
    Point::new(
      rng.gen_range(x0 as f64..self.0.x1() as f64),
      rng.gen_range(y0 as f64..self.0.y1() as f64),
    )
  }
}

/// Everything one phase of the search needs: where, how large, how opaque,
/// and how hard regressions are punished.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParameterSet {
  pub focus_field: FocusField,
  pub area_lb: f64,
  pub area_ub: f64,
  pub alpha: f64,
  /// Weight of channels that move away from the target, `>= 1`.
  pub penalty: f64,
}

impl ParameterSet {
  pub fn new(focus_field: FocusField, area: RangeInclusive<f64>, alpha: f64, penalty: f64) -> Self {
    Self {
      focus_field,
      area_lb: *area.start(),
      area_ub: *area.end(),
      alpha,
      penalty
    }
  }

  pub fn area_range(&self) -> RangeInclusive<f64> {
    self.area_lb..=self.area_ub
  }

  /// Uniform target area in `[area_lb, area_ub]`.
  pub fn sample_area<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    rng.gen_range(self.area_range())
  }

  pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
    self.focus_field.sample_point(rng)
  }

  /// `phase` only labels the error.
  pub fn validate(&self, phase: usize) -> Result<()> {
    let invalid = |reason: String| Err(Error::InvalidParameterSet { phase, reason });
    if self.focus_field.0.is_empty() {
      return invalid(format!("empty focus field {:?}", self.focus_field.0));
    }
    if !(self.area_lb > 0.0 && self.area_lb <= self.area_ub && self.area_ub.is_finite()) {
      return invalid(format!("area range [{}, {}]", self.area_lb, self.area_ub));
    }
    if !(0.0..=1.0).contains(&self.alpha) {
      return invalid(format!("alpha {} outside of [0, 1]", self.alpha));
    }
    if !(self.penalty >= 1.0 && self.penalty.is_finite()) {
      return invalid(format!("penalty {} below 1", self.penalty));
    }
    Ok(())
  }
}
