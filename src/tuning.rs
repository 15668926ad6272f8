//! Data-driven game balance
//!
//! Every constant the round and menu scenes depend on lives here so a JSON
//! file can override them without touching code. Missing fields fall back
//! to the defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Longest duration any tuning value may ask for, seconds
pub const MAX_DURATION_SECS: f32 = 3600.0;

/// Balance and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player sprite edge length (square)
    pub player_size: f32,
    /// Fixed vertical position of the player center
    pub player_y: f32,

    // === Obstacles ===
    /// Obstacle sprite edge length (square)
    pub obstacle_size: f32,
    /// Number of interchangeable obstacle visuals
    pub obstacle_variants: u8,
    /// Distance above the top / below the bottom edge where obstacles start / end
    pub obstacle_margin: f32,

    // === Difficulty ===
    /// Seconds an obstacle takes to fall at round start
    pub initial_fall_duration: f32,
    /// Fall duration never drops below this
    pub min_fall_duration: f32,
    /// Fall duration reduction per difficulty step
    pub fall_duration_step: f32,
    /// Seconds between spawns at round start
    pub initial_spawn_interval: f32,
    /// Spawn interval never drops below this
    pub min_spawn_interval: f32,
    /// Spawn interval reduction per difficulty step
    pub spawn_interval_step: f32,
    /// A difficulty step happens every time the score is a multiple of this
    pub difficulty_every: u64,

    // === Scoring ===
    /// Seconds per point
    pub score_interval: f32,

    // === Scenes ===
    /// Fade duration for scene transitions
    pub transition_fade: f32,
    /// After game over, any tap restarts (otherwise only taps on the label)
    pub restart_tap_anywhere: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 60.0,
            player_y: 100.0,

            obstacle_size: 50.0,
            obstacle_variants: 3,
            obstacle_margin: 50.0,

            initial_fall_duration: 4.0,
            min_fall_duration: 1.5,
            fall_duration_step: 0.3,
            initial_spawn_interval: 1.0,
            min_spawn_interval: 0.4,
            spawn_interval_step: 0.1,
            difficulty_every: 10,

            score_interval: 0.5,

            transition_fade: 0.5,
            restart_tap_anywhere: true,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("parse tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("read tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)
            .with_context(|| format!("load tuning from {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break round invariants
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("initial_fall_duration", self.initial_fall_duration),
            ("min_fall_duration", self.min_fall_duration),
            ("fall_duration_step", self.fall_duration_step),
            ("initial_spawn_interval", self.initial_spawn_interval),
            ("min_spawn_interval", self.min_spawn_interval),
            ("spawn_interval_step", self.spawn_interval_step),
            ("score_interval", self.score_interval),
            ("transition_fade", self.transition_fade),
        ];
        for (name, secs) in durations {
            if !secs.is_finite() || secs > MAX_DURATION_SECS {
                bail!("{name} must be finite and at most {MAX_DURATION_SECS}s (got {secs})");
            }
        }
        let lengths = [
            ("player_size", self.player_size),
            ("player_y", self.player_y),
            ("obstacle_size", self.obstacle_size),
            ("obstacle_margin", self.obstacle_margin),
        ];
        for (name, value) in lengths {
            if !value.is_finite() {
                bail!("{name} must be finite (got {value})");
            }
        }
        if self.player_size <= 0.0 || self.obstacle_size <= 0.0 {
            bail!("entity sizes must be positive");
        }
        if self.obstacle_variants == 0 {
            bail!("obstacle_variants must be at least 1");
        }
        if self.min_fall_duration <= 0.0 || self.min_spawn_interval <= 0.0 {
            bail!("minimum fall duration and spawn interval must be positive");
        }
        if self.initial_fall_duration < self.min_fall_duration {
            bail!(
                "initial_fall_duration {} is below min_fall_duration {}",
                self.initial_fall_duration,
                self.min_fall_duration
            );
        }
        if self.initial_spawn_interval < self.min_spawn_interval {
            bail!(
                "initial_spawn_interval {} is below min_spawn_interval {}",
                self.initial_spawn_interval,
                self.min_spawn_interval
            );
        }
        if self.fall_duration_step < 0.0 || self.spawn_interval_step < 0.0 {
            bail!("difficulty steps must not be negative");
        }
        if self.score_interval <= 0.0 {
            bail!("score_interval must be positive");
        }
        if self.difficulty_every == 0 {
            bail!("difficulty_every must be at least 1");
        }
        if self.transition_fade < 0.0 {
            bail!("transition_fade must not be negative");
        }
        Ok(())
    }

    #[inline]
    pub fn player_half_width(&self) -> f32 {
        self.player_size / 2.0
    }

    #[inline]
    pub fn obstacle_half_width(&self) -> f32 {
        self.obstacle_size / 2.0
    }
}
