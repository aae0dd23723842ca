use {
  super::*,
  crate::{
    color::{Color, ColorSource},
    drawing::Surface,
    error::{Error, Result},
    geometry::{BoundingBox, Circle, Point, Rectangle, Shape, ShapeKind},
  },
  image::{Rgba, RgbaImage},
  rand::prelude::*,
};

fn params(area: std::ops::RangeInclusive<f64>) -> ParameterSet {
  ParameterSet::new(FocusField::new(0, 0, 10, 10), area, 0.5, 2.0)
}

fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
  RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

#[test] fn pixel_score_sign() {
  let original = Color::rgb(200.0, 50.0, 50.0);
  let solution = Color::rgb(100.0, 50.0, 50.0);
  // moving the red channel onto the target improves, the others are unchanged
  assert_eq!(pixel_score_diff(original, solution, Color::rgb(200.0, 50.0, 50.0), 3.0), -100.0);
  // regressions are amplified by the penalty
  assert_eq!(pixel_score_diff(original, solution, Color::rgb(0.0, 50.0, 50.0), 3.0), 300.0);
  assert_eq!(pixel_score_diff(original, solution, Color::rgb(0.0, 50.0, 50.0), 1.0), 100.0);
}

#[test] fn score_candidate_over_region() {
  let mut original = Surface::from_source(&uniform(4, 4, [200, 50, 50]));
  let mut solution = Surface::from_source(&uniform(4, 4, [100, 50, 50]));
  let mut scratch = Surface::new(4, 4);

  let improving = Candidate {
    shape: Rectangle::new(0.0, 0.0, 1.0, 1.0).into(),
    color: Color::rgb(200.0, 50.0, 50.0),
  };
  let score = score_candidate(&improving, 3.0, &mut original, &mut solution, &mut scratch);
  assert_eq!(score, Some(-100.0));

  let regressing = Candidate {
    shape: Rectangle::new(1.0, 1.0, 2.0, 2.0).into(),
    color: Color::rgb(0.0, 50.0, 50.0),
  };
  let score = score_candidate(&regressing, 3.0, &mut original, &mut solution, &mut scratch);
  assert_eq!(score, Some(4.0 * 300.0));
  // the first candidate is gone from the scratch surface
  assert_eq!(*scratch.image().get_pixel(0, 0), Rgba([0, 0, 0, 0]));

  let outside = Candidate {
    shape: Circle::new(Point::new(1000.0, 1000.0), 5.0).into(),
    color: Color::rgb(0.0, 0.0, 0.0),
  };
  assert_eq!(score_candidate(&outside, 3.0, &mut original, &mut solution, &mut scratch), None);
  // the scratch surface is left as it was
  assert_eq!(*scratch.image().get_pixel(1, 1), Rgba([0, 50, 50, 255]));
  assert_eq!(score_region(None, 3.0, &mut original, &mut solution, &mut scratch), 0.0);
}

#[test] fn schedule_phases() -> Result<()> {
  let (a, b) = (params(1.0..=2.0), params(3.0..=4.0));
  let mut schedule = Schedule::new(vec![ScheduleItem::new(a, 2), ScheduleItem::new(b, 3)], false)?;
  let sets = schedule.by_ref().collect::<Vec<_>>();
  assert_eq!(sets, vec![a, a, b, b, b]);
  assert!(schedule.is_done());
  assert_eq!(schedule.next(), None);

  schedule.reset();
  assert!(!schedule.is_done());
  assert_eq!(schedule.next(), Some(a));
  Ok(())
}

#[test] fn schedule_skips_empty_phases() -> Result<()> {
  let (a, b) = (params(1.0..=2.0), params(3.0..=4.0));
  let mut schedule = Schedule::new(vec![ScheduleItem::new(a, 0), ScheduleItem::new(b, 1)], false)?;
  assert_eq!(schedule.next(), Some(b));
  assert_eq!(schedule.next(), None);
  Ok(())
}

#[test] fn schedule_loops_last_phase() -> Result<()> {
  let (a, b) = (params(1.0..=2.0), params(3.0..=4.0));
  let mut schedule = Schedule::new(vec![ScheduleItem::new(a, 3), ScheduleItem::new(b, 2)], true)?;
  (0..5).for_each(|_| { schedule.next(); });
  for _ in 0..10_000 {
    assert_eq!(schedule.next(), Some(b));
  }
  assert!(!schedule.is_done());
  Ok(())
}

#[test] fn schedule_rejects_invalid_parameters() {
  let valid = ScheduleItem::new(params(1.0..=2.0), 1);
  let invalid = [
    params(5.0..=2.0),
    params(0.0..=2.0),
    ParameterSet::new(FocusField::new(0, 0, 0, 10), 1.0..=2.0, 0.5, 2.0),
    ParameterSet::new(FocusField::new(0, 0, 10, 10), 1.0..=2.0, 1.5, 2.0),
    ParameterSet::new(FocusField::new(0, 0, 10, 10), 1.0..=2.0, 0.5, 0.5),
  ];
  for parameter_set in invalid {
    let schedule = Schedule::new(vec![valid, ScheduleItem::new(parameter_set, 1)], true);
    assert!(matches!(schedule, Err(Error::InvalidParameterSet { phase: 1, .. })), "{:?}", parameter_set);
  }
  assert!(matches!(Schedule::new(vec![], true), Err(Error::EmptySchedule)));
}

#[test] fn subdivided_schedule() -> Result<()> {
  let schedule = Schedule::subdivided(100, 100, &ScheduleConfig::default())?;
  let items = schedule.items();
  // 1×1, then 2×2 cells of 2500 px; 4×4 cells would fall below 1000 px
  assert_eq!(items.len(), 1 + 4 + 1);
  assert!(schedule.loop_last());

  let first = items[0].parameter_set;
  assert_eq!(first.focus_field.bounding_box(), BoundingBox::new(0, 0, 100, 100));
  assert!((first.area_lb - 100.0).abs() < 1e-9 && (first.area_ub - 1000.0).abs() < 1e-9);

  let cells = items[1..5].iter()
    .map(|item| item.parameter_set.focus_field.bounding_box())
    .collect::<Vec<_>>();
  assert_eq!(cells, vec![
    BoundingBox::new(0, 0, 50, 50),
    BoundingBox::new(50, 0, 50, 50),
    BoundingBox::new(0, 50, 50, 50),
    BoundingBox::new(50, 50, 50, 50),
  ]);

  let last = items[5].parameter_set;
  assert_eq!(last.focus_field.bounding_box(), BoundingBox::new(0, 0, 100, 100));
  assert_eq!(last.area_range(), 10.0..=100.0);
  Ok(())
}

#[test] fn subdivided_cells_tile_the_canvas() -> Result<()> {
  let config = ScheduleConfig::default().with_min_cell_area(1.0);
  let schedule = Schedule::subdivided(33, 65, &config)?;
  // levels 1, 2, 4, .., 32 cells per axis, plus the final phase
  let levels = 6;
  assert_eq!(schedule.items().len(), (0..levels).map(|l| 4usize.pow(l)).sum::<usize>() + 1);

  let covered = schedule.items()[..schedule.items().len() - 1].iter()
    .map(|item| item.parameter_set.focus_field.bounding_box().area())
    .sum::<u64>();
  assert_eq!(covered, levels as u64 * 33 * 65);
  Ok(())
}

#[test] fn subdivided_empty_canvas() {
  let schedule = Schedule::subdivided(0, 10, &ScheduleConfig::default());
  assert!(matches!(schedule, Err(Error::InvalidParameterSet { .. })));
}

#[test] fn generated_shapes_match_parameters() -> Result<()> {
  let mut rng = rand_pcg::Pcg64::seed_from_u64(3);
  let generator = ShapeGenerator::new(BoundingBox::from_size(200, 200), ShapeWeights::default(), ColorSource::Random)?;
  let params = ParameterSet::new(FocusField::new(50, 50, 100, 100), 100.0..=400.0, 0.3, 2.0);
  let focus = params.focus_field.bounding_box();

  for kind in ShapeKind::ALL {
    for _ in 0..200 {
      let shape = generator.generate_shape(kind, &params, &mut rng);
      assert_eq!(shape.kind(), kind);
      let area = shape.area();
      assert!(area > 100.0 * (1.0 - 1e-6) && area < 400.0 * (1.0 + 1e-6), "{:?} {}", shape, area);

      match shape {
        Shape::Triangle(t) => assert!(focus.contains_point(t.p1)),
        Shape::Circle(c) => assert!(focus.contains_point(c.origin)),
        Shape::Rectangle(r) => {
          assert!(r.x0 >= 0.0 && r.y0 >= 0.0);
          if r.width <= 200.0 { assert!(r.x0 + r.width <= 200.0 + 1e-9); }
          if r.height <= 200.0 { assert!(r.y0 + r.height <= 200.0 + 1e-9); }
        }
      }
    }
  }
  Ok(())
}

#[test] fn generated_kinds_and_colors() -> Result<()> {
  let mut rng = rand_pcg::Pcg64::seed_from_u64(4);
  let canvas = BoundingBox::from_size(64, 64);
  let params = ParameterSet::new(FocusField(canvas), 10.0..=20.0, 0.3, 2.0);

  let generator = ShapeGenerator::new(canvas, ShapeWeights::default(), ColorSource::Random)?;
  let mut counts = [0; 3];
  for _ in 0..3000 {
    let candidate = generator.generate(&params, &mut rng);
    assert_eq!(candidate.color.a, 0.3);
    counts[ShapeKind::ALL.iter().position(|&k| k == candidate.shape.kind()).unwrap_or(0)] += 1;
  }
  assert!(counts.iter().all(|&n| (850..=1150).contains(&n)), "{:?}", counts);

  let weights = ShapeWeights { triangle: 0.0, rectangle: 1.0, circle: 0.0 };
  let generator = ShapeGenerator::new(canvas, weights, ColorSource::Random)?;
  assert!((0..100).all(|_| generator.generate(&params, &mut rng).shape.kind() == ShapeKind::Rectangle));

  let zero = ShapeWeights { triangle: 0.0, rectangle: 0.0, circle: 0.0 };
  assert!(matches!(ShapeGenerator::new(canvas, zero, ColorSource::Random), Err(Error::InvalidShapeWeights(_))));
  Ok(())
}

#[test] fn engine_lifecycle() -> Result<()> {
  let target = uniform(16, 16, [10, 20, 30]);
  let schedule = Schedule::new(vec![ScheduleItem::new(params(5.0..=20.0), 5)], false)?;
  let mut engine = Engine::new(&target, schedule, EngineConfig::default().with_seed(0))?;
  assert_eq!(engine.state(), EngineState::Idle);

  for _ in 0..5 {
    assert_ne!(engine.step(), StepOutcome::Done);
    assert_eq!(engine.state(), EngineState::Running);
  }
  assert_eq!(engine.step(), StepOutcome::Done);
  assert_eq!(engine.state(), EngineState::Done);
  assert_eq!(engine.iteration(), 5);
  assert_eq!(engine.temperature(), 0.0);
  Ok(())
}

#[test] fn engine_rejects_empty_image() -> Result<()> {
  let schedule = Schedule::new(vec![ScheduleItem::new(params(5.0..=20.0), 5)], false)?;
  let engine = Engine::new(&RgbaImage::new(0, 0), schedule, EngineConfig::default());
  assert!(matches!(engine, Err(Error::EmptyImage)));
  Ok(())
}

#[test] fn metropolis_temperature_decay() -> Result<()> {
  let target = uniform(16, 16, [10, 20, 30]);
  let schedule = Schedule::new(vec![ScheduleItem::new(params(5.0..=20.0), 1)], true)?;
  let config = EngineConfig::default()
    .with_cooling(Cooling::metropolis(50.0))
    .with_seed(1);
  let mut engine = Engine::new(&target, schedule, config)?;
  assert_eq!(engine.temperature(), 50.0);

  (0..99).for_each(|_| { engine.step(); });
  assert_eq!(engine.temperature(), 50.0);
  engine.step();
  assert_eq!(engine.temperature(), 50.0 * 0.95);
  (0..150).for_each(|_| { engine.step(); });
  assert_eq!(engine.temperature(), 50.0 * 0.95 * 0.95);
  assert_eq!(engine.iteration(), 250);
  Ok(())
}

#[test] fn greedy_converges_on_uniform_target() -> Result<()> {
  let target = uniform(32, 32, [180, 60, 30]);
  let config = ScheduleConfig::default()
    .with_min_cell_area(64.0)
    .with_cell_area_fraction(0.05..=0.3)
    .with_phase_iterations(100)
    .with_alpha(0.5);
  let schedule = Schedule::subdivided(32, 32, &config)?;
  let mut engine = Engine::new(&target, schedule, EngineConfig::default().with_seed(7))?;

  let initial = engine.mean_error();
  assert_eq!(initial, 90.0);

  let mut previous = initial;
  for _ in 0..20 {
    for _ in 0..200 {
      match engine.step() {
        StepOutcome::Accepted { score } => assert!(score < 0.0),
        StepOutcome::Rejected { score } => assert!(score >= 0.0),
        StepOutcome::Done => unreachable!("the last phase loops"),
      }
    }
    let error = engine.mean_error();
    assert!(error <= previous + 1.0, "{} -> {}", previous, error);
    previous = error;
  }
  assert!(engine.accepted() > 0);
  assert!(previous < initial / 2.0, "{} -> {}", initial, previous);
  Ok(())
}

/// Black target and a black (blank) solution: any colored candidate can only move away.
fn regressing_engine(cooling: Cooling) -> Result<Engine> {
  let target = uniform(16, 16, [0, 0, 0]);
  let phase = ParameterSet::new(FocusField::new(0, 0, 16, 16), 4.0..=16.0, 1.0, 1.0);
  let schedule = Schedule::new(vec![ScheduleItem::new(phase, 1)], true)?;
  Engine::new(&target, schedule, EngineConfig::default().with_cooling(cooling).with_seed(5))
}

fn uphill_acceptances(engine: &mut Engine, steps: usize) -> usize {
  (0..steps)
    .filter(|_| matches!(engine.step(), StepOutcome::Accepted { score } if score > 0.0))
    .count()
}

#[test] fn metropolis_accepts_regressions_while_hot() -> Result<()> {
  let cooling = Cooling::Metropolis { initial_temperature: 1e6, decay: 0.01, interval: 100 };
  let mut engine = regressing_engine(cooling)?;

  let hot = uphill_acceptances(&mut engine, 100);
  assert!(hot > 20, "{}", hot);
  // three decays later T = 1, far below a typical regression
  uphill_acceptances(&mut engine, 200);
  assert_eq!(engine.temperature(), 1e6 * 0.01 * 0.01 * 0.01);
  let cold = uphill_acceptances(&mut engine, 100);
  assert!(cold < hot / 4, "{} -> {}", hot, cold);
  Ok(())
}

#[test] fn regressions_rejected_without_temperature() -> Result<()> {
  let frozen = Cooling::Metropolis { initial_temperature: 0.0, decay: 0.95, interval: 100 };
  for cooling in [Cooling::Greedy, frozen] {
    let mut engine = regressing_engine(cooling)?;
    for _ in 0..300 {
      if let StepOutcome::Accepted { score } = engine.step() {
        assert!(score < 0.0, "{:?} accepted {}", cooling, score);
      }
    }
  }
  Ok(())
}

#[test] fn circles_past_the_corner_are_skipped() -> Result<()> {
  let target = uniform(16, 16, [20, 20, 20]);
  // radius √(75/π) ≈ 4.89, while the canvas corner is at least √32 away
  let phase = ParameterSet::new(FocusField::new(-5, -5, 1, 1), 75.0..=75.0, 0.5, 1.0);
  let schedule = Schedule::new(vec![ScheduleItem::new(phase, 1)], true)?;
  let config = EngineConfig::default()
    .with_cooling(Cooling::metropolis(50.0))
    .with_shape_weights(ShapeWeights { triangle: 0.0, rectangle: 0.0, circle: 1.0 })
    .with_seed(2);
  let mut engine = Engine::new(&target, schedule, config)?;

  for _ in 0..100 {
    assert_eq!(engine.step(), StepOutcome::Rejected { score: 0.0 });
  }
  assert_eq!(engine.accepted(), 0);
  assert_eq!(engine.mean_error(), 20.0);
  Ok(())
}
