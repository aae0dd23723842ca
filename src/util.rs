use {
  num_traits::Float,
  rand::{
    distributions::{Distribution, Open01},
    Rng
  },
};

/// Splits `target` into `n` random positive factors whose product is `target`.
///
/// Draws `n` values in `(0, 1)` with product `p`, then scales each by `(target / p)^(1/n)`.
pub fn random_factors<F, R>(target: F, n: usize, rng: &mut R) -> Vec<F>
  where F: Float,
        Open01: Distribution<F>,
        R: Rng + ?Sized
{
  if n == 0 {
    return vec![];
  }
  let values = (0..n)
    .map(|_| rng.sample(Open01))
    .collect::<Vec<F>>();
  let product = values.iter().fold(F::one(), |acc, &v| acc * v);
  let scale = (target / product).powf(F::one() / F::from(n).unwrap_or_else(F::one));
  values.into_iter()
    .map(|v| v * scale)
    .collect()
}

/// `1` or `-1` with equal probability.
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
  if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}
