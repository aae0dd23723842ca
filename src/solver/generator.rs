use {
  super::parameters::ParameterSet,
  crate::{
    color::{Color, ColorSource},
    error::Result,
    geometry::{BoundingBox, Circle, Point, Rectangle, Shape, ShapeKind, Triangle, V2},
    util::{random_factors, random_sign},
  },
  rand::{distributions::WeightedIndex, prelude::*},
  std::f64::consts::PI,
};

// keeps the side product 2A/sin(γ) finite
const MIN_VERTEX_ANGLE_SIN: f64 = 1e-6;

/// Relative odds of each [`ShapeKind`], in [`ShapeKind::ALL`] order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeWeights {
  pub triangle: f64,
  pub rectangle: f64,
  pub circle: f64,
}

impl Default for ShapeWeights {
  fn default() -> Self {
    Self { triangle: 1.0, rectangle: 1.0, circle: 1.0 }
  }
}

impl ShapeWeights {
  pub fn as_array(&self) -> [f64; 3] {
    [self.triangle, self.rectangle, self.circle]
  }
}

/// One proposal: shape and fill color, discarded after the accept/reject decision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Candidate {
  pub shape: Shape,
  pub color: Color,
}

/// Produces random candidates consistent with a [`ParameterSet`].
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
  kinds: WeightedIndex<f64>,
  color_source: ColorSource,
  canvas: BoundingBox,
}

impl ShapeGenerator {
  pub fn new(canvas: BoundingBox, weights: ShapeWeights, color_source: ColorSource) -> Result<Self> {
    Ok(Self {
      kinds: WeightedIndex::new(weights.as_array())?,
      color_source,
      canvas
    })
  }

  pub fn color_source(&self) -> &ColorSource {
    &self.color_source
  }

  pub fn generate<R: Rng + ?Sized>(&self, params: &ParameterSet, rng: &mut R) -> Candidate {
    let kind = ShapeKind::ALL[self.kinds.sample(rng)];
    Candidate {
      shape: self.generate_shape(kind, params, rng),
      color: self.color_source.sample(params.alpha, rng),
    }
  }

  pub fn generate_shape<R: Rng + ?Sized>(&self, kind: ShapeKind, params: &ParameterSet, rng: &mut R) -> Shape {
    let area = params.sample_area(rng);
    let anchor = params.sample_point(rng);
    match kind {
      ShapeKind::Triangle => triangle(anchor, area, rng).into(),
      ShapeKind::Rectangle => self.rectangle(anchor, area, rng).into(),
      ShapeKind::Circle => Circle::new(anchor, (area / PI).sqrt()).into(),
    }
  }

  /// `anchor` is the top-left corner, moved up and left where the rectangle would
  /// otherwise stick out of the canvas.
  fn rectangle<R: Rng + ?Sized>(&self, anchor: Point, area: f64, rng: &mut R) -> Rectangle {
    let [width, height]: [f64; 2] = match random_factors(area, 2, rng)[..] {
      [w, h] => [w, h],
      _ => [area.sqrt(); 2],
    };
    let fit = |p: f64, extent: f64, lo: i32, hi: i32| p.min(hi as f64 - extent).max(lo as f64);
    Rectangle::new(
      fit(anchor.x, width, self.canvas.x0, self.canvas.x1()),
      fit(anchor.y, height, self.canvas.y0, self.canvas.y1()),
      width,
      height
    )
  }
}

/// `area = ½·a·b·sin(γ)`: pick the vertex angle γ at `p1`, split `a·b` randomly,
/// then cast the two sides from `p1`.
fn triangle<R: Rng + ?Sized>(p1: Point, area: f64, rng: &mut R) -> Triangle {
  let gamma = loop {
    let gamma = rng.gen_range(0.0..PI);
    if gamma.sin() > MIN_VERTEX_ANGLE_SIN {
      break gamma;
    }
  };
  let product = 2.0 * area / gamma.sin();
  let (a, b) = match random_factors(product, 2, rng)[..] {
    [a, b] => (a, b),
    _ => (product.sqrt(), product.sqrt()),
  };

  let theta = rng.gen_range(0.0..2.0 * PI);
  let phi = theta + random_sign(rng) * gamma;
  let cast = |angle: f64, length: f64| p1 + V2::new(angle.cos(), angle.sin()) * length;
  Triangle::new(p1, cast(theta, a), cast(phi, b))
}
