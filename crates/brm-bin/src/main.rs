// Headless runner for Bouncy Road charts

mod autoplay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brm_audio::SimulatedTrack;
use brm_config::ChartFile;
use brm_play::Engine;
use brm_types::PlayState;
use clap::{Parser, Subcommand};
use log::{info, warn};

use autoplay::AutoPlayer;

#[derive(Parser, Debug)]
#[command(name = "brm", about = "Headless Bouncy Road chart runner")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plays a chart with simulated input and prints the score as JSON.
    Simulate {
        /// Chart JSON file.
        chart: PathBuf,

        /// Frames per simulated second.
        #[arg(long, env = "BRM_FPS", default_value_t = 60)]
        fps: u32,

        /// Beat to start playback from.
        #[arg(long)]
        start_beat: Option<f64>,

        /// Loop the simulated music track.
        #[arg(long)]
        loop_music: bool,

        /// Shift every simulated press by this many milliseconds.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_ms: f64,

        /// Skip every K-th expected input (0 hits everything).
        #[arg(long, default_value_t = 0)]
        miss_every: usize,

        /// Give up after this many simulated seconds.
        #[arg(long, default_value_t = 600.0)]
        max_seconds: f64,
    },
    /// Prints chart statistics.
    Info {
        /// Chart JSON file.
        chart: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Simulate {
            chart,
            fps,
            start_beat,
            loop_music,
            offset_ms,
            miss_every,
            max_seconds,
        } => simulate(
            &chart,
            SimulateOptions {
                fps,
                start_beat,
                loop_music,
                offset_ms,
                miss_every,
                max_seconds,
            },
        ),
        Command::Info { chart } => print_info(&chart),
    }
}

struct SimulateOptions {
    fps: u32,
    start_beat: Option<f64>,
    loop_music: bool,
    offset_ms: f64,
    miss_every: usize,
    max_seconds: f64,
}

fn load_engine(path: &Path) -> Result<(ChartFile, Engine)> {
    let chart = ChartFile::load_from(path)?;
    let engine = Engine::from_chart(&chart)
        .with_context(|| format!("invalid chart {}", path.display()))?;
    Ok((chart, engine))
}

fn simulate(path: &Path, options: SimulateOptions) -> Result<()> {
    let (chart, mut engine) = load_engine(path)?;
    engine.set_requires_player_input(false);
    if let Some(beat) = options.start_beat {
        engine.set_playback_start(beat);
    }
    if let Some(music) = chart.music {
        let looping = music.looping || options.loop_music;
        engine.set_music(Some(Box::new(SimulatedTrack::new(music.duration, looping))));
    }

    let delta = 1.0 / options.fps.max(1) as f64;
    let mut player = AutoPlayer::new(options.offset_ms / 1000.0, options.miss_every);
    engine.set_play_state(PlayState::Playing)?;

    let mut elapsed = 0.0;
    while engine.play_state() != PlayState::Stopped {
        if elapsed >= options.max_seconds {
            warn!("stopping after {elapsed:.1}s without reaching the chart end");
            engine.set_play_state(PlayState::Stopped)?;
            break;
        }
        engine.update(delta);
        player.step(&mut engine);
        elapsed += delta;
    }
    info!(
        "simulation finished: {} pressed, {} skipped, {elapsed:.1}s",
        player.pressed(),
        player.missed()
    );

    let score = engine.compute_score();
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}

fn print_info(path: &Path) -> Result<()> {
    let (_, engine) = load_engine(path)?;
    let stats = engine.stats();
    println!("title: {}", engine.results_text().title);
    println!("difficulty: {}", engine.difficulty_string());
    println!("tracks: {}", engine.track_count());
    println!("bouncers: {}", engine.bouncer_count());
    println!("events: {}", engine.events().len());
    println!("tempo changes: {}", engine.tempos().len());
    println!("duration: {} beats", stats.duration);
    println!("last point: {} beats", stats.last_point);
    println!("expected inputs: {}", stats.expected_inputs);
    if stats.has_skill_star() {
        println!("skill star: beat {}", stats.skill_star_beat);
    }
    if stats.events_touch_track_top {
        println!("events reach the top track");
    }
    Ok(())
}
