use {
  super::Color,
  crate::{
    drawing::ImageSource,
    error::{Error, Result},
    geometry::BoundingBox,
  },
  itertools::Itertools,
  rand::Rng,
  serde::Deserialize,
  std::{cmp::Reverse, fs, path::Path, str::FromStr},
};

/// Non-empty list of opaque colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
  colors: Vec<Color>,
}

/// `{ "palette": ["#ff8800", "#03f", ...] }`, other keys are ignored.
#[derive(Debug, Deserialize)]
struct PaletteFile {
  palette: Vec<String>,
}

impl Palette {
  pub fn new(colors: Vec<Color>) -> Result<Self> {
    if colors.is_empty() {
      return Err(Error::EmptyPalette);
    }
    Ok(Self { colors })
  }

  pub fn from_hex<S: AsRef<str>>(codes: impl IntoIterator<Item = S>) -> Result<Self> {
    let colors = codes.into_iter()
      .map(|code| code.as_ref().parse())
      .collect::<Result<Vec<Color>>>()?;
    Self::new(colors)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let file: PaletteFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    Self::from_hex(file.palette)
  }

  /// Up to `size` dominant colors of the image.
  ///
  /// Pixels are binned by the 3 highest bits of each channel; the most populated bins are
  /// averaged, most populated first.
  pub fn dominant(source: &impl ImageSource, size: usize) -> Result<Self> {
    #[derive(Clone, Copy, Default)]
    struct Bin {
      count: u64,
      sum: [f64; 3],
    }

    let mut bins = vec![Bin::default(); 8 * 8 * 8];
    BoundingBox::from_size(source.width(), source.height())
      .pixels()
      .map(|(x, y)| source.pixel(x as u32, y as u32))
      .for_each(|color| {
        let [r, g, b] = color.channels().map(|c| (c.clamp(0.0, 255.0) as usize) >> 5);
        let bin = &mut bins[(r << 6) | (g << 3) | b];
        bin.count += 1;
        bin.sum.iter_mut()
          .zip(color.channels())
          .for_each(|(sum, c)| *sum += c);
      });

    let colors = bins.into_iter()
      .filter(|bin| bin.count > 0)
      .sorted_by_key(|bin| Reverse(bin.count))
      .take(size)
      .map(|bin| {
        let [r, g, b] = bin.sum.map(|sum| (sum / bin.count as f64).round());
        Color::rgb(r, g, b)
      })
      .collect();
    Self::new(colors)
  }

  pub fn colors(&self) -> &[Color] {
    &self.colors
  }

  pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
    self.colors[rng.gen_range(0..self.colors.len())]
  }
}

/// `#rrggbb` or shorthand `#rgb`, the `#` is optional. Always opaque.
impl FromStr for Color {
  type Err = Error;

  fn from_str(code: &str) -> Result<Self> {
    let invalid = || Error::InvalidColor(code.to_string());
    let hex = code.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(invalid());
    }
    let hex = match hex.len() {
      3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
      6 => hex.to_string(),
      _ => return Err(invalid())
    };
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16)
      .map(|c| c as f64)
      .map_err(|_| invalid());
    Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
  }
}
