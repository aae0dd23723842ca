//! RGBA colors and source-over compositing.
//!
//! Channels are kept as `f64` in `[0, 255]` so that blended intermediates are not quantized,
//! alpha is normalized to `[0, 1]`.

use {
  image::Rgba,
  rand::Rng,
};

pub mod palette;
pub use palette::Palette;


#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Color {
  pub r: f64,
  pub g: f64,
  pub b: f64,
  pub a: f64,
}

impl Color {
  pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

  /// Alpha is accepted either in `[0, 1]`, or on a `0..=255` scale: anything above 1 is
  /// divided by 255. Exactly `1.0` is therefore opaque, not `1/255`.
  pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
    let a = if a > 1.0 { a / 255.0 } else { a };
    Self { r, g, b, a: a.clamp(0.0, 1.0) }
  }

  /// Opaque color
  pub fn rgb(r: f64, g: f64, b: f64) -> Self {
    Self::new(r, g, b, 1.0)
  }

  pub fn with_alpha(self, a: f64) -> Self {
    Self::new(self.r, self.g, self.b, a)
  }

  pub fn channels(&self) -> [f64; 3] {
    [self.r, self.g, self.b]
  }

  pub fn is_transparent(&self) -> bool {
    self.a <= 0.0
  }

  pub fn to_rgba8(&self) -> Rgba<u8> {
    let q = |c: f64| c.round().clamp(0.0, 255.0) as u8;
    Rgba([q(self.r), q(self.g), q(self.b), q(self.a * 255.0)])
  }
}

/// Stored pixels always carry alpha on the `0..=255` scale.
impl From<Rgba<u8>> for Color {
  fn from(Rgba([r, g, b, a]): Rgba<u8>) -> Self {
    Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 / 255.0 }
  }
}

/// Source-over compositing of `source` atop `backdrop`.
/// Blending two fully transparent colors yields [`Color::TRANSPARENT`].
pub fn blend(backdrop: Color, source: Color) -> Color {
  let a = source.a + backdrop.a * (1.0 - source.a);
  if a <= 0.0 {
    return Color::TRANSPARENT;
  }
  if source.a <= 0.0 {
    return backdrop;
  }
  if source.a >= 1.0 {
    return source;
  }
  let channel = |cb: f64, cs: f64|
    (cs * source.a + cb * backdrop.a * (1.0 - source.a)) / a;
  Color {
    r: channel(backdrop.r, source.r),
    g: channel(backdrop.g, source.g),
    b: channel(backdrop.b, source.b),
    a
  }
}

/// Where candidate colors come from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColorSource {
  /// Uniform random R, G, B.
  #[default]
  Random,
  /// Uniform pick from a fixed palette.
  Palette(Palette),
}

impl ColorSource {
  /// The caller decides the alpha, palette alpha is overridden.
  pub fn sample<R: Rng + ?Sized>(&self, alpha: f64, rng: &mut R) -> Color {
    match self {
      ColorSource::Random => Color::new(
        rng.gen_range(0..=255u8) as f64,
        rng.gen_range(0..=255u8) as f64,
        rng.gen_range(0..=255u8) as f64,
        alpha
      ),
      ColorSource::Palette(palette) => palette.pick(rng).with_alpha(alpha),
    }
  }
}
