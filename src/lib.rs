//! Approximates a raster image with semi-transparent triangles, rectangles and circles.
//!
//! Every step proposes one random primitive, scores it only over its canvas-clipped bounding
//! box, and either commits it to the solution or throws it away. Candidates get smaller and more
//! localized as the [`solver::Schedule`] moves from coarse to fine phases; acceptance is either
//! greedy or follows the Metropolis criterion with a decaying temperature.
//!
//! # Basic usage
//! ```no_run
//! # use shape_annealing::{
//! #   error::Result,
//! #   solver::{Cooling, Engine, EngineConfig, Schedule, ScheduleConfig},
//! # };
//! # fn main() -> Result<()> {
//! let target = image::open("target.png")?.to_rgba8();
//!
//! // 1×1, 2×2, 4×4, .. grid phases while a cell keeps 1000 px, then a looping fine phase
//! let schedule = Schedule::subdivided(target.width(), target.height(), &ScheduleConfig::default())?;
//! let mut engine = Engine::new(&target, schedule, EngineConfig::default()
//!   .with_cooling(Cooling::metropolis(100.0))
//!   .with_seed(0))?;
//!
//! // one step per tick, the driver decides when to stop
//! for _ in 0..100_000 {
//!   engine.step();
//! }
//! engine.solution_image().save("out.png")?;
//! #   Ok(())
//! # }
//! ```
//!
//! # Rendering
//! Shapes are rasterized through their signed distance functions: each pixel is covered by
//! `clamp(0.5 - sdf(center), 0, 1)`, so edges get a one pixel wide antialiasing ramp and
//! integer-aligned rectangles are filled exactly. The same rule is used for the scratch copy a
//! candidate is scored on and for the final commit into the solution.
//!
//! A custom target only needs [`drawing::ImageSource`]; surfaces implement
//! [`drawing::RasterSurface`].

pub mod error;
pub mod geometry;
pub mod color;
pub mod drawing;
pub mod solver;
pub mod util;
