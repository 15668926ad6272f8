//! Host collaborator contract
//!
//! Rendering, input capture, animation and contact detection belong to the
//! host. The scenes only talk to it through these traits and receive its
//! notifications as [`HostEvent`]s. Everything here is single-threaded: the
//! host serializes events and calls back into the scenes one at a time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::physics::{Contact, PhysicsBody};

/// Opaque handle to a visual entity owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u32);

/// What an entity looks like
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    /// Full-scene backdrop
    Background,
    Player,
    /// One of the interchangeable obstacle images
    Obstacle { variant: u8 },
    Label { text: String, font_size: f32 },
    /// Rounded, filled, outlined rectangle
    Button { corner_radius: f32 },
    /// Translucent rounded rectangle drawn behind a button
    Glow { corner_radius: f32, alpha: f32 },
}

/// Approximate extent of a single-line label, for hit tests
pub fn label_size(text: &str, font_size: f32) -> Vec2 {
    Vec2::new(text.chars().count() as f32 * font_size * 0.6, font_size)
}

/// Everything the host needs to create an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub sprite: Sprite,
    pub position: Vec2,
    pub size: Vec2,
    pub z: i32,
    /// Contact participation, if any
    pub body: Option<PhysicsBody>,
}

impl EntitySpec {
    pub fn new(sprite: Sprite, position: Vec2, size: Vec2) -> Self {
        Self {
            sprite,
            position,
            size,
            z: 0,
            body: None,
        }
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Host-driven animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// Linear move; the host raises [`HostEvent::MotionFinished`] on arrival
    MoveTo { target: Vec2, duration: f32 },
    /// Scale to `to` and back to 1.0, forever; each half takes `duration`
    PulseScale { to: f32, duration: f32 },
    /// Fade alpha to `high` then `low`, forever; each half takes `duration`
    PulseAlpha { high: f32, low: f32, duration: f32 },
}

/// Scenes the presenter can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    Start,
    Game,
}

/// Visual style of a scene change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Transition {
    Fade { duration: f32 },
}

/// Notifications from the host, delivered one at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMoved(Vec2),
    PointerDown(Vec2),
    TimerFired(TimerHandle),
    ContactBegan(Contact),
    MotionFinished(EntityId),
}

/// Spawn, move and remove visual entities
pub trait EntityHost {
    fn add_entity(&mut self, spec: EntitySpec) -> EntityId;
    /// Unknown ids are ignored
    fn remove_entity(&mut self, id: EntityId);
    fn update_position(&mut self, id: EntityId, position: Vec2);
    fn set_text(&mut self, id: EntityId, text: &str);
    fn run_animation(&mut self, id: EntityId, animation: Animation);
}

/// Repeating and one-shot timers.
///
/// A timer first fires one full `interval` after it is scheduled.
pub trait TimerScheduler {
    fn schedule(&mut self, interval: f32, repeating: bool) -> TimerHandle;
    /// Unknown or already-cancelled handles are ignored
    fn cancel(&mut self, handle: TimerHandle);
}

/// Swaps the visible scene
pub trait ScenePresenter {
    fn present(&mut self, scene: SceneKind, transition: Transition);
}

/// Everything a scene needs from its host
pub trait Host: EntityHost + TimerScheduler + ScenePresenter {
    /// Current scene size in points
    fn scene_size(&self) -> Vec2;
}
