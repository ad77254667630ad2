//! Headless session runner (default binary).
//!
//! Drives one seeded game with a fixed frame length and a scripted action
//! pattern, then prints the final board. Handy for replays and for checking a
//! config file before a host loads it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use falling_blocks::core::GameController;
use falling_blocks::types::{GameAction, GameConfig};

/// Run a falling-block session without a display.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file; missing fields take the reference defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the piece sequence.
    #[arg(short, long, default_value_t = 1)]
    seed: u32,

    /// Elapsed time fed to the controller per frame, in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u32,

    /// Stop after this many frames even if the game is still running.
    #[arg(long, default_value_t = 100_000)]
    max_frames: u32,

    /// Actions applied in turn, one after every gravity step.
    #[arg(
        long,
        value_delimiter = ',',
        default_values = ["left", "left", "rotate", "right", "right", "right", "right"]
    )]
    script: Vec<String>,

    /// Print the final snapshot as JSON instead of the text board.
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    GameConfig::from_json_str(&text).with_context(|| format!("loading config {}", path.display()))
}

fn parse_script(script: &[String]) -> Result<Vec<GameAction>> {
    script
        .iter()
        .map(|s| GameAction::from_str(s.trim()).with_context(|| format!("unknown action {s:?}")))
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let script = parse_script(&args.script)?;

    let mut game = GameController::new(config, args.seed).context("starting session")?;

    let mut frames = 0u32;
    let mut steps = 0usize;
    while frames < args.max_frames && !game.is_over() {
        frames += 1;
        if game.on_tick(args.frame_ms) && !script.is_empty() {
            game.apply_action(script[steps % script.len()]);
            steps += 1;
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&game.snapshot()).context("encoding snapshot")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "status={} frames={} pieces={} rows_removed={}",
        game.status().as_str(),
        frames,
        game.pieces_committed(),
        game.rows_removed()
    );
    print!("{}", game.board());
    Ok(())
}
