use {
  crate::{
    color::Color,
    geometry::{BoundingBox, Shape},
  },
  image::{DynamicImage, GenericImageView, RgbaImage},
};

mod surface;
pub use surface::Surface;

/// Read-only target image, fully loaded before the run starts.
pub trait ImageSource {
  fn width(&self) -> u32;
  fn height(&self) -> u32;
  fn pixel(&self, x: u32, y: u32) -> Color;
}

impl ImageSource for RgbaImage {
  fn width(&self) -> u32 { GenericImageView::width(self) }
  fn height(&self) -> u32 { GenericImageView::height(self) }
  fn pixel(&self, x: u32, y: u32) -> Color { (*self.get_pixel(x, y)).into() }
}

impl ImageSource for DynamicImage {
  fn width(&self) -> u32 { GenericImageView::width(self) }
  fn height(&self) -> u32 { GenericImageView::height(self) }
  fn pixel(&self, x: u32, y: u32) -> Color { GenericImageView::get_pixel(self, x, y).into() }
}

/// A paintable pixel buffer with a cached rectangular snapshot for reading.
pub trait RasterSurface {
  /// Resizes and clears the surface.
  fn set_dimensions(&mut self, width: u32, height: u32);
  fn dimensions(&self) -> (u32, u32);
  fn bounds(&self) -> BoundingBox {
    let (width, height) = self.dimensions();
    BoundingBox::from_size(width, height)
  }
  /// Makes every pixel transparent black.
  fn clear(&mut self);
  /// Source-over composites `shape` filled with `color`, marks the surface dirty.
  fn paint(&mut self, shape: &Shape, color: Color);
  /// Materializes the pixels of `region` (clipped to the surface) for [`get_pixel`](Self::get_pixel).
  /// Skipped if the surface is clean and `region` equals the last loaded one.
  fn load_data(&mut self, region: BoundingBox);
  /// Pixel from the last snapshot, transparent outside of it.
  fn get_pixel(&self, x: i32, y: i32) -> Color;
}

impl Shape {
  pub fn paint(&self, surface: &mut impl RasterSurface, color: Color) {
    surface.paint(self, color)
  }
}

/// Fraction of a pixel covered by a shape, given the signed distance from the pixel center
/// to the shape boundary. A linear ramp one pixel wide, centered on the boundary.
pub fn sdf_coverage(sdf: f64) -> f64 {
  (0.5 - sdf).clamp(0.0, 1.0)
}
