use {
  anyhow::{Context, Result},
  clap::Parser,
  shape_annealing::{
    color::{ColorSource, Palette},
    solver::{Cooling, Engine, EngineConfig, Schedule, ScheduleConfig, ShapeWeights, StepOutcome},
  },
  std::path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(name = "shape-annealing")]
#[command(author, version, about = "Approximate an image with semi-transparent shapes")]
struct Args {
  /// Target image
  input: PathBuf,

  /// Where the solution is written, PNG
  #[arg(short, long, default_value = "out.png")]
  output: PathBuf,

  /// JSON palette file, `{ "palette": ["#rrggbb", ..] }`
  #[arg(long, conflicts_with = "palette_size")]
  palette: Option<PathBuf>,

  /// Extract a palette of this many dominant colors from the target
  #[arg(long)]
  palette_size: Option<usize>,

  /// Number of steps to run
  #[arg(short, long, default_value_t = 100_000)]
  ticks: u64,

  #[arg(long)]
  seed: Option<u64>,

  /// Initial temperature of the Metropolis criterion, 0 for greedy hill climbing
  #[arg(long, default_value_t = 0.0)]
  temperature: f64,

  #[arg(long, default_value_t = 0.95)]
  decay: f64,

  /// Steps between temperature decays
  #[arg(long, default_value_t = 100)]
  decay_interval: u64,

  #[arg(long, default_value_t = 0.1)]
  alpha: f64,

  /// Weight of channels a candidate moves away from the target, at least 1
  #[arg(long, default_value_t = 3.0)]
  penalty: f64,

  /// Grid subdivision stops once a cell would be smaller than this
  #[arg(long, default_value_t = 1000.0)]
  min_cell_area: f64,

  #[arg(long, default_value_t = 500)]
  phase_iterations: u64,

  #[arg(long, default_value_t = 10.0)]
  final_area_min: f64,

  #[arg(long, default_value_t = 100.0)]
  final_area_max: f64,

  #[arg(long, default_value_t = 1.0)]
  triangle_weight: f64,

  #[arg(long, default_value_t = 1.0)]
  rectangle_weight: f64,

  #[arg(long, default_value_t = 1.0)]
  circle_weight: f64,

  /// Save an intermediate frame every N steps, 0 disables
  #[arg(long, default_value_t = 0)]
  frame_interval: u64,

  #[arg(long, default_value = "frames")]
  frames_dir: PathBuf,

  #[arg(long, default_value_t = 1000)]
  log_interval: u64,
}

fn color_source(args: &Args, target: &image::RgbaImage) -> Result<ColorSource> {
  Ok(match (&args.palette, args.palette_size) {
    (Some(path), _) => ColorSource::Palette(Palette::load(path)
      .with_context(|| format!("loading palette {}", path.display()))?),
    (None, Some(size)) => ColorSource::Palette(Palette::dominant(target, size)?),
    (None, None) => ColorSource::Random,
  })
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args = Args::parse();

  let target = image::open(&args.input)
    .with_context(|| format!("opening {}", args.input.display()))?
    .to_rgba8();
  let (width, height) = target.dimensions();

  let schedule_config = ScheduleConfig::default()
    .with_min_cell_area(args.min_cell_area)
    .with_phase_iterations(args.phase_iterations)
    .with_final_area(args.final_area_min..=args.final_area_max)
    .with_alpha(args.alpha)
    .with_penalty(args.penalty);
  let schedule = Schedule::subdivided(width, height, &schedule_config)?;

  let cooling = if args.temperature > 0.0 {
    Cooling::Metropolis {
      initial_temperature: args.temperature,
      decay: args.decay,
      interval: args.decay_interval
    }
  } else {
    Cooling::Greedy
  };
  let mut config = EngineConfig::default()
    .with_cooling(cooling)
    .with_shape_weights(ShapeWeights {
      triangle: args.triangle_weight,
      rectangle: args.rectangle_weight,
      circle: args.circle_weight,
    })
    .with_color_source(color_source(&args, &target)?);
  if let Some(seed) = args.seed {
    config = config.with_seed(seed);
  }

  let mut engine = Engine::new(&target, schedule, config)?;
  {
    use humansize::{FileSize, file_size_opts as options};
    log::info!("surfaces: {}", engine.size_bytes().file_size(options::BINARY).map_err(anyhow::Error::msg)?);
  }

  if args.frame_interval > 0 {
    std::fs::create_dir_all(&args.frames_dir)
      .with_context(|| format!("creating {}", args.frames_dir.display()))?;
  }

  let time = std::time::Instant::now();
  for tick in 1..=args.ticks {
    if engine.step() == StepOutcome::Done {
      log::info!("schedule finished after {} ticks", tick - 1);
      break;
    }
    if args.log_interval > 0 && tick % args.log_interval == 0 {
      log::info!(
        "tick {}: phase #{}, {} accepted, temperature {:.3}, mean error {:.3}",
        tick, engine.phase(), engine.accepted(), engine.temperature(), engine.mean_error()
      );
    }
    if args.frame_interval > 0 && tick % args.frame_interval == 0 {
      let path = args.frames_dir.join(format!("frame_{:08}.png", tick));
      engine.solution_image().save(&path)
        .with_context(|| format!("saving {}", path.display()))?;
    }
  }

  log::info!(
    "{} steps, {} accepted, mean error {:.3}, {:.2?}",
    engine.iteration(), engine.accepted(), engine.mean_error(), time.elapsed()
  );
  engine.solution_image().save(&args.output)
    .with_context(|| format!("saving {}", args.output.display()))?;
  Ok(())
}
