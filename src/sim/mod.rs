//! Scene state machines
//!
//! All gameplay logic lives here. Like the rest of the core it is
//! single-threaded and host-agnostic:
//! - Seeded RNG only
//! - Timers are host handles, never threads
//! - No rendering or platform dependencies

pub mod director;
pub mod menu;
pub mod physics;
pub mod round;
pub mod timer;

pub use director::{ActiveScene, Director, SceneRequest};
pub use menu::MenuScene;
pub use physics::{Contact, ContactBody, PhysicsBody, category};
pub use round::{Obstacle, Player, RoundPhase, RoundScene, RoundState};
pub use timer::TimerQueue;
