//! Stress Engine CLI
//!
//! Neuro-adaptive difficulty engine driven by facial and keyboard stress
//! signals.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use stress_engine::{
    AnalyzeFaceRequest, BoundingBox, Config, Engine, FaceObservation, FrameSize,
    KeyboardStressRequest, NoiseSource, ResetRequest, TypingTelemetry, UpdateDifficultyRequest,
    VERSION,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stress-engine")]
#[command(version = VERSION)]
#[command(about = "Adaptive difficulty from facial and keyboard stress signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a synthetic player session through the full adaptation loop
    Simulate {
        /// Number of frames to simulate
        #[arg(long, default_value = "30")]
        steps: u32,

        /// Player identifier
        #[arg(long)]
        player: Option<String>,

        /// Seed for both the simulated player and the estimator noise
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score a single typing-telemetry snapshot
    Score {
        /// Average key hold duration in milliseconds
        #[arg(long, default_value = "0")]
        avg_press_duration: f64,

        /// Variance of inter-key speed
        #[arg(long, default_value = "0")]
        speed_variance: f64,

        /// Fraction of keystrokes that were corrections
        #[arg(long, default_value = "0")]
        error_rate: f64,
    },

    /// Analyze a face observation from a JSON request file
    Analyze {
        /// Path to a JSON-encoded analyze-face request
        #[arg(long, short)]
        input: PathBuf,
    },

    /// Show configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            steps,
            player,
            seed,
        } => cmd_simulate(steps, player, seed),
        Commands::Score {
            avg_press_duration,
            speed_variance,
            error_rate,
        } => cmd_score(avg_press_duration, speed_variance, error_rate),
        Commands::Analyze { input } => cmd_analyze(&input),
        Commands::Config => cmd_config(),
    }
}

fn cmd_simulate(steps: u32, player: Option<String>, seed: Option<u64>) -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let player_id = player.unwrap_or_else(|| config.default_player_id.clone());

    let noise = match seed.or(config.noise_seed) {
        Some(seed) => NoiseSource::seeded(seed),
        None => NoiseSource::from_entropy(),
    };
    let engine = Engine::with_noise(noise);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or(0xfaced));

    let frame = FrameSize::new(640.0, 480.0);
    let mut face = BoundingBox::new(270.0, 160.0, 100.0, 140.0);

    println!("Simulating {steps} frames for player '{player_id}'");
    println!("{:>4}  {:>8}  {:>8}  {:>8}  {:>10}  {}", "step", "facial", "keys", "combined", "difficulty", "advice");

    for step in 0..steps {
        // Wander the face around the frame; occasionally lose it entirely.
        let face_visible = rng.gen_range(0.0..1.0) > 0.05;
        face.x = (face.x + rng.gen_range(-25.0..25.0)).clamp(0.0, frame.width - face.width);
        face.y = (face.y + rng.gen_range(-15.0..15.0)).clamp(0.0, frame.height - face.height);

        let facial = engine.analyze_face(&AnalyzeFaceRequest {
            player_id: player_id.clone(),
            observation: face_visible.then_some(FaceObservation::BoundingBox(face)),
            frame,
        });

        let keyboard = engine.keyboard_stress(&KeyboardStressRequest {
            player_id: player_id.clone(),
            telemetry: TypingTelemetry {
                avg_press_duration: rng.gen_range(80.0..400.0),
                speed_variance: rng.gen_range(0.0..80.0),
                error_rate: rng.gen_range(0.0..0.4),
            },
        });

        let update = engine.update_difficulty(&UpdateDifficultyRequest {
            player_id: player_id.clone(),
            facial_stress: facial.stress_score,
            keyboard_stress: keyboard.keyboard_stress,
        });

        println!(
            "{:>4}  {:>8.3}  {:>8.3}  {:>8.3}  {:>10.3}  {:?}",
            step,
            facial.stress_score,
            keyboard.keyboard_stress,
            update.combined_stress,
            update.difficulty,
            update.recommendation
        );
    }

    println!();
    println!("{}", engine.log().summary());

    engine.reset(&ResetRequest { player_id });
    Ok(())
}

fn cmd_score(avg_press_duration: f64, speed_variance: f64, error_rate: f64) -> anyhow::Result<()> {
    let engine = Engine::new(&Config::load().context("failed to load configuration")?);

    let response = engine.keyboard_stress(&KeyboardStressRequest {
        player_id: "cli".to_string(),
        telemetry: TypingTelemetry {
            avg_press_duration,
            speed_variance,
            error_rate,
        },
    });

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_analyze(input: &PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request: AnalyzeFaceRequest =
        serde_json::from_str(&content).context("invalid analyze-face request")?;

    let engine = Engine::new(&Config::load().context("failed to load configuration")?);
    let response = engine.analyze_face(&request);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    println!("Configuration file: {}", Config::config_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
