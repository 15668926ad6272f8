//! Dodger - a dodge-the-falling-obstacles arcade game
//!
//! Core modules:
//! - `sim`: Round and menu state machines, timers, contact filtering
//! - `host`: Collaborator traits the rendering/input host implements
//! - `headless`: In-memory host used by the CLI and tests
//! - `tuning`: Data-driven game balance
//! - `geom`: Axis-aligned rectangles and clamping

pub mod geom;
pub mod headless;
pub mod host;
pub mod sim;
pub mod tuning;

pub use headless::HeadlessHost;
pub use host::{Host, HostEvent, SceneKind, Transition};
pub use sim::{Director, MenuScene, RoundScene, RoundState};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Default scene size (portrait phone, points)
    pub const DEFAULT_SCENE_WIDTH: f32 = 390.0;
    pub const DEFAULT_SCENE_HEIGHT: f32 = 844.0;

    /// Label font sizes
    pub const SCORE_FONT_SIZE: f32 = 28.0;
    pub const GAME_OVER_FONT_SIZE: f32 = 40.0;
    pub const TITLE_FONT_SIZE: f32 = 50.0;
    pub const BUTTON_FONT_SIZE: f32 = 28.0;

    /// Score label sits this far below the top edge
    pub const SCORE_TOP_INSET: f32 = 60.0;
}

/// Convert a duration in seconds to whole simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    ((secs / consts::SIM_DT).round() as u64).max(1)
}
