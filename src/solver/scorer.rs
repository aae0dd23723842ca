use {
  super::generator::Candidate,
  crate::{
    color::{blend, Color},
    drawing::RasterSurface,
    geometry::BoundingBox,
  },
};

/// Weighted change of the RGB distance to `original` when `candidate` is composited over `solution`.
///
/// Per channel `|original - blended| - |original - solution|`: negative moves closer and counts
/// once, zero or positive moves away and is multiplied by `penalty`.
pub fn pixel_score_diff(original: Color, solution: Color, candidate: Color, penalty: f64) -> f64 {
  let blended = blend(solution, candidate);
  itertools::izip!(original.channels(), solution.channels(), blended.channels())
    .map(|(o, s, b)| {
      let factor = (o - b).abs() - (o - s).abs();
      if factor < 0.0 { factor } else { factor * penalty }
    })
    .sum()
}

/// Score of whatever `scratch` holds, restricted to `region`. `None` scores a neutral 0.
///
/// Each surface is snapshotted once for the whole region; pixels left transparent
/// on `scratch` are not covered by the candidate and skipped.
pub fn score_region<S: RasterSurface>(
  region: Option<BoundingBox>,
  penalty: f64,
  original: &mut S,
  solution: &mut S,
  scratch: &mut S
) -> f64 {
  let region = match region {
    Some(region) => region,
    None => return 0.0
  };
  original.load_data(region);
  solution.load_data(region);
  scratch.load_data(region);

  region.pixels()
    .filter_map(|(x, y)| {
      let candidate = scratch.get_pixel(x, y);
      (!candidate.is_transparent()).then(|| pixel_score_diff(
        original.get_pixel(x, y),
        solution.get_pixel(x, y),
        candidate,
        penalty
      ))
    })
    .sum()
}

/// Renders `candidate` alone into a cleared `scratch` and scores it.
/// `None` if the candidate does not overlap the canvas; nothing is painted then.
pub fn score_candidate<S: RasterSurface>(
  candidate: &Candidate,
  penalty: f64,
  original: &mut S,
  solution: &mut S,
  scratch: &mut S
) -> Option<f64> {
  let region = candidate.shape.canvas_intersection(scratch.bounds())?;
  scratch.clear();
  candidate.shape.paint(scratch, candidate.color);
  Some(score_region(Some(region), penalty, original, solution, scratch))
}
