use {
  super::{ImageSource, RasterSurface, sdf_coverage},
  crate::{
    color::{blend, Color},
    geometry::{BoundingBox, Point, Shape},
  },
  image::{Rgba, RgbaImage},
};

/// [`RasterSurface`] backed by an `RgbaImage`.
pub struct Surface {
  image: RgbaImage,
  snapshot: Vec<Color>,
  snapshot_box: Option<BoundingBox>,
  snapshot_loads: u64,
  dirty: bool,
  // everything outside is transparent black
  occupied: Option<BoundingBox>,
}

impl Surface {
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      image: RgbaImage::new(width, height),
      snapshot: vec![],
      snapshot_box: None,
      snapshot_loads: 0,
      dirty: true,
      occupied: None,
    }
  }

  /// Copy of the whole source image.
  pub fn from_source(source: &impl ImageSource) -> Self {
    let mut surface = Self::new(source.width(), source.height());
    surface.image.enumerate_pixels_mut()
      .for_each(|(x, y, pixel)| *pixel = source.pixel(x, y).to_rgba8());
    surface.occupied = Some(surface.bounds());
    surface
  }

  pub fn image(&self) -> &RgbaImage {
    &self.image
  }

  pub fn into_image(self) -> RgbaImage {
    self.image
  }

  pub fn size_bytes(&self) -> usize {
    self.image.as_raw().len()
  }

  /// How many times a snapshot was actually materialized.
  pub fn snapshot_loads(&self) -> u64 {
    self.snapshot_loads
  }

  /// Mean absolute per-channel RGB difference to `target`, alpha ignored.
  /// Both surfaces must have the same dimensions.
  pub fn mean_error(&self, target: &Surface) -> f64 {
    use rayon::prelude::*;

    debug_assert_eq!(self.dimensions(), target.dimensions());
    let pixel_count = self.bounds().area();
    if pixel_count == 0 {
      return 0.0;
    }
    let total: u64 = self.image.as_raw().par_chunks_exact(4)
      .zip(target.image.as_raw().par_chunks_exact(4))
      .map(|(p, q)| p[..3].iter()
        .zip(&q[..3])
        .map(|(a, b)| a.abs_diff(*b) as u64)
        .sum::<u64>())
      .sum();
    total as f64 / (3 * pixel_count) as f64
  }

  fn mark_painted(&mut self, region: BoundingBox) {
    self.dirty = true;
    self.occupied = Some(self.occupied.map_or(region, |occupied| occupied.union(&region)));
  }
}

impl RasterSurface for Surface {
  fn set_dimensions(&mut self, width: u32, height: u32) {
    *self = Self::new(width, height);
  }

  fn dimensions(&self) -> (u32, u32) {
    self.image.dimensions()
  }

  fn clear(&mut self) {
    // only the painted region can be non-transparent
    if let Some(region) = self.occupied.take() {
      region.pixels().for_each(|(x, y)|
        *self.image.get_pixel_mut(x as u32, y as u32) = Rgba([0, 0, 0, 0])
      );
      self.dirty = true;
    }
  }

  fn paint(&mut self, shape: &Shape, color: Color) {
    let region = match shape.canvas_intersection(self.bounds()) {
      Some(region) => region,
      None => return // no overlap with the surface at all
    };
    if color.is_transparent() {
      return;
    }

    region.pixels().for_each(|(x, y)| {
      let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
      // quantized like a stored pixel, so painting agrees with a scratch copy of the same shape
      let source = Color::from(color.with_alpha(color.a * sdf_coverage(shape.sdf(center))).to_rgba8());
      if source.is_transparent() {
        return;
      }
      let pixel = self.image.get_pixel_mut(x as u32, y as u32);
      *pixel = blend((*pixel).into(), source).to_rgba8();
    });
    self.mark_painted(region);
  }

  fn load_data(&mut self, region: BoundingBox) {
    let region = region.intersection(&self.bounds()).unwrap_or_default();
    if !self.dirty && self.snapshot_box == Some(region) {
      return;
    }
    self.snapshot.clear();
    self.snapshot.extend(region.pixels()
      .map(|(x, y)| Color::from(*self.image.get_pixel(x as u32, y as u32))));
    self.snapshot_box = Some(region);
    self.snapshot_loads += 1;
    self.dirty = false;
  }

  fn get_pixel(&self, x: i32, y: i32) -> Color {
    match self.snapshot_box {
      Some(region) if region.contains(x, y) => {
        let index = (y - region.y0) as usize * region.width as usize + (x - region.x0) as usize;
        self.snapshot[index]
      }
      _ => Color::TRANSPARENT
    }
  }
}
