//! .
//!
//! The origin of coordinate system is in top-left corner, one unit is one pixel.
//! Pixel `(x, y)` covers the square `[x, x + 1) × [y, y + 1)` and is sampled at its center.

use {
  std::ops::Range,
  euclid::{Point2D, Vector2D, Box2D},
};

pub mod shapes;
pub use shapes::*;


/// Pixel coordinate basis
#[derive(Debug, Copy, Clone)]
pub struct PixelSpace;

pub type Point = Point2D<f64, PixelSpace>;
pub type V2 = Vector2D<f64, PixelSpace>;

/// Determinants below this are treated as parallel segments.
pub const DET_EPSILON: f64 = 1e-9;

/// Ordered pair of points, used for intersection math only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSegment {
  pub p: Point,
  pub q: Point,
}

impl LineSegment {
  pub fn new(p: Point, q: Point) -> Self {
    Self { p, q }
  }

  pub fn length(&self) -> f64 {
    (self.q - self.p).length()
  }

  /// Solves `p + t·(q - p) = other.p + u·(other.q - other.p)` by Cramer's rule.
  /// The segments intersect iff both `t` and `u` lie in `[0, 1]`.
  /// Parallel and collinear segments never intersect.
  pub fn intersection(&self, other: &LineSegment) -> Option<Point> {
    let (x1, y1, x2, y2) = (self.p.x, self.p.y, self.q.x, self.q.y);
    let (x3, y3, x4, y4) = (other.p.x, other.p.y, other.q.x, other.q.y);

    let det = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if det.abs() < DET_EPSILON {
      return None;
    }
    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / det;
    let u = ((x1 - x3) * (y1 - y2) - (y1 - y3) * (x1 - x2)) / det;

    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u))
      .then(|| self.p + (self.q - self.p) * t)
  }
}

/// Integer-aligned rectangle `[x0, x0 + width) × [y0, y0 + height)`.
/// A box with zero area denotes "no region".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
  pub x0: i32,
  pub y0: i32,
  pub width: u32,
  pub height: u32,
}

impl BoundingBox {
  pub fn new(x0: i32, y0: i32, width: u32, height: u32) -> Self {
    Self { x0, y0, width, height }
  }

  /// Box anchored in the origin, e.g. the whole canvas.
  pub fn from_size(width: u32, height: u32) -> Self {
    Self::new(0, 0, width, height)
  }

  /// Smallest integer box containing `[min_x, max_x] × [min_y, max_y]`,
  /// or `None` if it has zero area.
  pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Self> {
    let (x0, y0) = (min_x.floor(), min_y.floor());
    let (x1, y1) = (max_x.ceil(), max_y.ceil());
    // negated to also reject NaN
    if !(x1 > x0 && y1 > y0) {
      return None;
    }
    Some(Self::new(x0 as i32, y0 as i32, (x1 - x0) as u32, (y1 - y0) as u32))
  }

  /// Bounding box of a point cloud, `None` if the cloud is empty or flat.
  pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
    let mut points = points.into_iter().peekable();
    points.peek()?;
    let bounds: Box2D<f64, PixelSpace> = Box2D::from_points(points);
    Self::from_extents(bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y)
  }

  pub fn x1(&self) -> i32 { self.x0 + self.width as i32 }
  pub fn y1(&self) -> i32 { self.y0 + self.height as i32 }

  pub fn x_range(&self) -> Range<i32> { self.x0..self.x1() }
  pub fn y_range(&self) -> Range<i32> { self.y0..self.y1() }

  pub fn area(&self) -> u64 {
    self.width as u64 * self.height as u64
  }

  pub fn is_empty(&self) -> bool {
    self.area() == 0
  }

  /// Every integer coordinate inside the box exactly once, row by row.
  /// Each call starts a fresh enumeration.
  pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + Clone {
    itertools::iproduct!(self.y_range(), self.x_range())
      .map(|(y, x)| (x, y))
  }

  pub fn contains(&self, x: i32, y: i32) -> bool {
    self.x_range().contains(&x) && self.y_range().contains(&y)
  }

  /// Closed containment test, border included.
  pub fn contains_point(&self, point: Point) -> bool {
    point.x >= self.x0 as f64 && point.x <= self.x1() as f64 &&
    point.y >= self.y0 as f64 && point.y <= self.y1() as f64
  }

  pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
    let (x0, y0) = (self.x0.max(other.x0), self.y0.max(other.y0));
    let (x1, y1) = (self.x1().min(other.x1()), self.y1().min(other.y1()));
    (x1 > x0 && y1 > y0)
      .then(|| BoundingBox::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
  }

  /// Smallest box containing both; empty boxes are ignored.
  pub fn union(&self, other: &BoundingBox) -> BoundingBox {
    match (self.is_empty(), other.is_empty()) {
      (true, _) => *other,
      (_, true) => *self,
      _ => {
        let (x0, y0) = (self.x0.min(other.x0), self.y0.min(other.y0));
        let (x1, y1) = (self.x1().max(other.x1()), self.y1().max(other.y1()));
        BoundingBox::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
      }
    }
  }

  /// Top-left, top-right, bottom-right, bottom-left.
  pub fn corners(&self) -> [Point; 4] {
    let (x0, y0) = (self.x0 as f64, self.y0 as f64);
    let (x1, y1) = (self.x1() as f64, self.y1() as f64);
    [
      Point::new(x0, y0),
      Point::new(x1, y0),
      Point::new(x1, y1),
      Point::new(x0, y1),
    ]
  }

  /// The four border segments: top, right, bottom, left.
  pub fn edges(&self) -> [LineSegment; 4] {
    let [tl, tr, br, bl] = self.corners();
    [
      LineSegment::new(tl, tr),
      LineSegment::new(tr, br),
      LineSegment::new(br, bl),
      LineSegment::new(bl, tl),
    ]
  }
}
