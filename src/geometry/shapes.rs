use {
  super::{BoundingBox, LineSegment, Point, V2},
  std::f64::consts::PI,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
  pub p1: Point,
  pub p2: Point,
  pub p3: Point,
}

/// Axis-aligned, `(x0, y0)` is the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
  pub x0: f64,
  pub y0: f64,
  pub width: f64,
  pub height: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
  pub origin: Point,
  pub radius: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
  Triangle,
  Rectangle,
  Circle,
}

impl ShapeKind {
  pub const ALL: [ShapeKind; 3] = [ShapeKind::Triangle, ShapeKind::Rectangle, ShapeKind::Circle];
}

/// A candidate primitive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
  Triangle(Triangle),
  Rectangle(Rectangle),
  Circle(Circle),
}

impl Triangle {
  pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
    Self { p1, p2, p3 }
  }

  pub fn vertices(&self) -> [Point; 3] {
    [self.p1, self.p2, self.p3]
  }

  pub fn sides(&self) -> [LineSegment; 3] {
    [
      LineSegment::new(self.p1, self.p2),
      LineSegment::new(self.p2, self.p3),
      LineSegment::new(self.p3, self.p1),
    ]
  }

  pub fn area(&self) -> f64 {
    0.5 * (self.p2 - self.p1).cross(self.p3 - self.p1).abs()
  }

  /// Collects the vertices inside the canvas, every crossing of a side with a canvas border,
  /// and the canvas corners covered by the triangle; the result is the box around that cloud.
  pub fn canvas_intersection(&self, canvas: BoundingBox) -> Option<BoundingBox> {
    let vertices = self.vertices().into_iter()
      .filter(|p| canvas.contains_point(*p));
    let crossings = itertools::iproduct!(self.sides(), canvas.edges())
      .filter_map(|(side, border)| side.intersection(&border));
    let corners = canvas.corners().into_iter()
      .filter(|corner| self.sdf(*corner) <= 0.0);

    BoundingBox::from_points(vertices.chain(crossings).chain(corners))
  }

  /// Exact euclidean distance to the boundary, negative inside.
  /// Degenerate (zero area) triangles have no interior.
  pub fn sdf(&self, pixel: Point) -> f64 {
    let orientation = (self.p2 - self.p1).cross(self.p3 - self.p1);
    let mut inside = orientation != 0.0;
    let mut dist_sq = f64::MAX;

    for LineSegment { p, q } in self.sides() {
      let edge = q - p;
      let v = pixel - p;
      let len_sq = edge.square_length();
      let t = if len_sq > 0.0 { (v.dot(edge) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
      dist_sq = dist_sq.min((v - edge * t).square_length());
      if edge.cross(v) * orientation < 0.0 {
        inside = false;
      }
    }

    let dist = dist_sq.sqrt();
    if inside { -dist } else { dist }
  }
}

impl Rectangle {
  pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
    Self { x0, y0, width, height }
  }

  pub fn center(&self) -> Point {
    Point::new(self.x0 + self.width / 2.0, self.y0 + self.height / 2.0)
  }

  pub fn area(&self) -> f64 {
    self.width * self.height
  }

  pub fn canvas_intersection(&self, canvas: BoundingBox) -> Option<BoundingBox> {
    let left = self.x0.max(canvas.x0 as f64);
    let top = self.y0.max(canvas.y0 as f64);
    let right = (self.x0 + self.width).min(canvas.x1() as f64);
    let bottom = (self.y0 + self.height).min(canvas.y1() as f64);
    BoundingBox::from_extents(left, top, right, bottom)
  }

  pub fn sdf(&self, pixel: Point) -> f64 {
    let half = V2::new(self.width, self.height) / 2.0;
    let dist = (pixel - self.center()).abs() - half;
    let outside_dist = dist
      .max(V2::zero())
      .length();
    let inside_dist = dist.x
      .max(dist.y)
      .min(0.0);
    outside_dist + inside_dist
  }
}

impl Circle {
  pub fn new(origin: Point, radius: f64) -> Self {
    Self { origin, radius }
  }

  pub fn area(&self) -> f64 {
    PI * self.radius * self.radius
  }

  /// `None` when the disc stays clear of the canvas, also past a corner.
  pub fn canvas_intersection(&self, canvas: BoundingBox) -> Option<BoundingBox> {
    let nearest = Point::new(
      self.origin.x.clamp(canvas.x0 as f64, canvas.x1() as f64),
      self.origin.y.clamp(canvas.y0 as f64, canvas.y1() as f64),
    );
    if (nearest - self.origin).length() >= self.radius {
      return None;
    }
    let left = (self.origin.x - self.radius).max(canvas.x0 as f64);
    let top = (self.origin.y - self.radius).max(canvas.y0 as f64);
    let right = (self.origin.x + self.radius).min(canvas.x1() as f64);
    let bottom = (self.origin.y + self.radius).min(canvas.y1() as f64);
    BoundingBox::from_extents(left, top, right, bottom)
  }

  pub fn sdf(&self, pixel: Point) -> f64 {
    (pixel - self.origin).length() - self.radius
  }
}

impl Shape {
  pub fn kind(&self) -> ShapeKind {
    match self {
      Shape::Triangle(_) => ShapeKind::Triangle,
      Shape::Rectangle(_) => ShapeKind::Rectangle,
      Shape::Circle(_) => ShapeKind::Circle,
    }
  }

  pub fn area(&self) -> f64 {
    match self {
      Shape::Triangle(s) => s.area(),
      Shape::Rectangle(s) => s.area(),
      Shape::Circle(s) => s.area(),
    }
  }

  /// Canvas-clipped bounding box, `None` exactly when the shape does not overlap `canvas`.
  pub fn canvas_intersection(&self, canvas: BoundingBox) -> Option<BoundingBox> {
    match self {
      Shape::Triangle(s) => s.canvas_intersection(canvas),
      Shape::Rectangle(s) => s.canvas_intersection(canvas),
      Shape::Circle(s) => s.canvas_intersection(canvas),
    }
  }

  /// Signed distance function
  pub fn sdf(&self, pixel: Point) -> f64 {
    match self {
      Shape::Triangle(s) => s.sdf(pixel),
      Shape::Rectangle(s) => s.sdf(pixel),
      Shape::Circle(s) => s.sdf(pixel),
    }
  }
}

impl From<Triangle> for Shape {
  fn from(s: Triangle) -> Self { Shape::Triangle(s) }
}

impl From<Rectangle> for Shape {
  fn from(s: Rectangle) -> Self { Shape::Rectangle(s) }
}

impl From<Circle> for Shape {
  fn from(s: Circle) -> Self { Shape::Circle(s) }
}
