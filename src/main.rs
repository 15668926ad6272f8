//! Dodger entry point
//!
//! Runs rounds against the in-memory host at the fixed simulation rate,
//! with a simple autopilot steering the player, and reports the scores.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;

use dodger::consts::*;
use dodger::host::{Host, Sprite};
use dodger::{Director, HeadlessHost, HostEvent, Tuning, secs_to_ticks};

#[derive(Parser, Debug)]
#[command(about = "Play Dodger headlessly", version)]
struct Args {
    /// Seed for the round seed stream
    #[arg(long, default_value_t = 2024)]
    seed: u64,
    /// Scene width in points
    #[arg(long, default_value_t = DEFAULT_SCENE_WIDTH)]
    width: f32,
    /// Scene height in points
    #[arg(long, default_value_t = DEFAULT_SCENE_HEIGHT)]
    height: f32,
    /// Simulated seconds before giving up
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Rounds to play (restarts after each game over)
    #[arg(long, default_value_t = 3)]
    rounds: u32,
    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Leave the player where it starts
    #[arg(long)]
    no_autopilot: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.width <= 0.0 || args.height <= 0.0 {
        bail!("scene size must be positive (got {}x{})", args.width, args.height);
    }
    if args.seconds <= 0.0 {
        bail!("--seconds must be positive");
    }

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    log::info!("Dodger (headless) starting, seed {}", args.seed);
    let host = HeadlessHost::new(Vec2::new(args.width, args.height));
    let mut director = Director::new(host, tuning, args.seed);

    let play = director
        .host()
        .entities()
        .find(|e| matches!(e.sprite, Sprite::Button { .. }))
        .map(|e| e.position)
        .context("start menu has no PLAY button")?;
    director.host_mut().push_input(HostEvent::PointerDown(play));

    let mut scores: Vec<u64> = Vec::new();
    let center = Vec2::new(args.width, args.height) / 2.0;

    for _ in 0..secs_to_ticks(args.seconds) {
        if !args.no_autopilot {
            if let Some(x) = autopilot_target(&director) {
                director
                    .host_mut()
                    .push_input(HostEvent::PointerMoved(Vec2::new(x, center.y)));
            }
        }

        let events = director.host_mut().step();
        director.handle_all(events);

        let Some(round) = director.round() else {
            continue;
        };
        if round.is_game_over() && scores.len() < director.rounds_started() as usize {
            scores.push(round.state().score);
            if scores.len() >= args.rounds as usize {
                break;
            }
            director.host_mut().push_input(HostEvent::PointerDown(center));
        }
    }

    let unfinished = director
        .round()
        .filter(|r| !r.is_game_over())
        .map(|r| r.state().score);

    for (i, score) in scores.iter().enumerate() {
        println!("Round {}: {}", i + 1, score);
    }
    if let Some(score) = unfinished {
        println!("Round {} still running at {}", scores.len() + 1, score);
    }
    if let Some(best) = scores.iter().copied().chain(unfinished).max() {
        println!("Best: {}", best);
    }
    Ok(())
}

/// Pick the x with the most horizontal clearance from obstacles that are
/// about to reach the player's row, preferring small moves on ties.
fn autopilot_target(director: &Director<HeadlessHost>) -> Option<f32> {
    let round = director.round()?;
    if round.is_game_over() {
        return None;
    }
    let player = round.player();
    let width = director.host().scene_size().x;
    let danger_height = player.position.y + 350.0;

    let threats: Vec<f32> = round
        .obstacles()
        .iter()
        .filter_map(|o| director.host().entity(o.entity))
        .filter(|e| e.position.y > player.position.y - e.size.y && e.position.y < danger_height)
        .map(|e| e.position.x)
        .collect();
    if threats.is_empty() {
        return None;
    }

    let half = player.size / 2.0;
    let mut best = (f32::MIN, player.position.x);
    let mut x = half;
    while x <= width - half {
        let clearance = threats
            .iter()
            .map(|t| (t - x).abs())
            .fold(f32::MAX, f32::min);
        let score = clearance.min(120.0) - (x - player.position.x).abs() * 0.05;
        if score > best.0 {
            best = (score, x);
        }
        x += 5.0;
    }
    Some(best.1)
}
