//! Round state machine (the game scene)
//!
//! A round is `Active` from [`RoundScene::start`] until the first
//! player/obstacle contact, then `GameOver` for good. Playing again means
//! building a brand-new `RoundScene`; nothing here is ever reset in place.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::SceneRequest;
use super::physics::{Contact, PhysicsBody, category};
use crate::consts::*;
use crate::geom::{Rect, clamp_to_range};
use crate::host::{Animation, EntityId, EntitySpec, Host, HostEvent, Sprite, TimerHandle, label_size};
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Active,
    GameOver,
}

/// Counters mutated by the timers and by the round-ending contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Points scored (one per score tick)
    pub score: u64,
    /// Seconds a newly spawned obstacle takes to fall
    pub obstacle_speed: f32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    pub is_game_over: bool,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            obstacle_speed: tuning.initial_fall_duration,
            spawn_interval: tuning.initial_spawn_interval,
            is_game_over: false,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        if self.is_game_over {
            RoundPhase::GameOver
        } else {
            RoundPhase::Active
        }
    }

    /// Tighten fall duration and spawn interval, clamped at their floors
    pub fn tighten(&mut self, tuning: &Tuning) {
        self.obstacle_speed = (self.obstacle_speed - tuning.fall_duration_step)
            .max(tuning.min_fall_duration);
        self.spawn_interval = (self.spawn_interval - tuning.spawn_interval_step)
            .max(tuning.min_spawn_interval);
    }
}

/// The player sprite; only x ever changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub entity: EntityId,
    pub position: Vec2,
    pub size: f32,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, Vec2::splat(self.size))
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub entity: EntityId,
    pub variant: u8,
    /// Where it appeared, just above the top edge
    pub spawn_position: Vec2,
    pub size: f32,
    /// Seconds to reach the bottom, fixed at spawn time
    pub fall_duration: f32,
}

/// The active game scene
#[derive(Debug)]
pub struct RoundScene {
    tuning: Tuning,
    scene_size: Vec2,
    seed: u64,
    rng: Pcg32,
    state: RoundState,
    player: Player,
    /// Live obstacles, in spawn order
    obstacles: Vec<Obstacle>,
    background: EntityId,
    score_label: EntityId,
    game_over_label: Option<EntityId>,
    spawn_timer: Option<TimerHandle>,
    score_timer: Option<TimerHandle>,
}

impl RoundScene {
    /// Build the scene and start the spawn and score timers
    pub fn start<H: Host>(host: &mut H, tuning: &Tuning, seed: u64) -> Self {
        let size = host.scene_size();

        let background = host.add_entity(
            EntitySpec::new(Sprite::Background, size / 2.0, size).with_z(-1),
        );

        let player_pos = Vec2::new(size.x / 2.0, tuning.player_y);
        let player_entity = host.add_entity(
            EntitySpec::new(Sprite::Player, player_pos, Vec2::splat(tuning.player_size))
                .with_body(PhysicsBody::player()),
        );

        let score_label = host.add_entity(EntitySpec::new(
            Sprite::Label {
                text: "0".to_string(),
                font_size: SCORE_FONT_SIZE,
            },
            Vec2::new(size.x / 2.0, size.y - SCORE_TOP_INSET),
            label_size("0", SCORE_FONT_SIZE),
        ));

        let state = RoundState::new(tuning);
        let spawn_timer = host.schedule(state.spawn_interval, true);
        let score_timer = host.schedule(tuning.score_interval, true);

        log::info!(
            "Round started (seed {}, scene {}x{}, fall {:.1}s, spawn every {:.1}s)",
            seed,
            size.x,
            size.y,
            state.obstacle_speed,
            state.spawn_interval
        );

        Self {
            tuning: tuning.clone(),
            scene_size: size,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state,
            player: Player {
                entity: player_entity,
                position: player_pos,
                size: tuning.player_size,
            },
            obstacles: Vec::new(),
            background,
            score_label,
            game_over_label: None,
            spawn_timer: Some(spawn_timer),
            score_timer: Some(score_timer),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over
    }

    pub fn spawn_timer(&self) -> Option<TimerHandle> {
        self.spawn_timer
    }

    pub fn score_timer(&self) -> Option<TimerHandle> {
        self.score_timer
    }

    /// Route one host notification
    pub fn handle_event<H: Host>(&mut self, host: &mut H, event: HostEvent) -> Option<SceneRequest> {
        match event {
            HostEvent::PointerMoved(point) => self.on_pointer_move(host, point.x),
            HostEvent::PointerDown(point) => return self.on_pointer_tap(point),
            HostEvent::TimerFired(handle) => self.on_timer(host, handle),
            HostEvent::ContactBegan(contact) => self.on_contact(host, contact),
            HostEvent::MotionFinished(entity) => self.on_motion_finished(host, entity),
        }
        None
    }

    /// Dispatch a timer firing; stale handles are ignored
    pub fn on_timer<H: Host>(&mut self, host: &mut H, handle: TimerHandle) {
        if self.score_timer == Some(handle) {
            self.on_score_tick(host);
        } else if self.spawn_timer == Some(handle) {
            self.on_spawn_tick(host);
        } else {
            log::debug!("Ignoring stale timer {:?}", handle);
        }
    }

    /// Follow the pointer horizontally, clamped so the player stays on screen
    pub fn on_pointer_move<H: Host>(&mut self, host: &mut H, x: f32) {
        if self.state.is_game_over {
            return;
        }
        let half = self.player.size / 2.0;
        self.player.position.x = clamp_to_range(x, half, self.scene_size.x - half);
        host.update_position(self.player.entity, self.player.position);
    }

    pub fn on_score_tick<H: Host>(&mut self, host: &mut H) {
        if self.state.is_game_over {
            return;
        }
        self.state.score += 1;
        host.set_text(self.score_label, &self.state.score.to_string());

        if self.state.score % self.tuning.difficulty_every == 0 {
            self.difficulty_step(host);
        }
    }

    /// Speed things up and restart the spawn timer with the new period.
    ///
    /// The old timer's remaining wait is discarded, so the next spawn comes
    /// one full new interval from now.
    pub fn difficulty_step<H: Host>(&mut self, host: &mut H) {
        if self.state.is_game_over {
            return;
        }
        self.state.tighten(&self.tuning);

        if let Some(old) = self.spawn_timer.take() {
            host.cancel(old);
        }
        self.spawn_timer = Some(host.schedule(self.state.spawn_interval, true));

        log::info!(
            "Difficulty up at score {}: fall {:.2}s, spawn every {:.2}s",
            self.state.score,
            self.state.obstacle_speed,
            self.state.spawn_interval
        );
    }

    pub fn on_spawn_tick<H: Host>(&mut self, host: &mut H) {
        if self.state.is_game_over {
            return;
        }
        let size = self.tuning.obstacle_size;
        let half = size / 2.0;
        let (lo, hi) = (half, self.scene_size.x - half);
        let x = if lo <= hi {
            self.rng.random_range(lo..=hi)
        } else {
            self.scene_size.x / 2.0
        };
        let variant = self.rng.random_range(0..self.tuning.obstacle_variants.max(1));

        let margin = self.tuning.obstacle_margin;
        let spawn_position = Vec2::new(x, self.scene_size.y + margin);
        let entity = host.add_entity(
            EntitySpec::new(Sprite::Obstacle { variant }, spawn_position, Vec2::splat(size))
                .with_body(PhysicsBody::obstacle()),
        );
        host.run_animation(
            entity,
            Animation::MoveTo {
                target: Vec2::new(x, -margin),
                duration: self.state.obstacle_speed,
            },
        );

        log::debug!("Spawned obstacle {:?} (variant {}) at x={:.1}", entity, variant, x);
        self.obstacles.push(Obstacle {
            entity,
            variant,
            spawn_position,
            size,
            fall_duration: self.state.obstacle_speed,
        });
    }

    /// An obstacle finished falling off the bottom edge
    pub fn on_motion_finished<H: Host>(&mut self, host: &mut H, entity: EntityId) {
        self.remove_obstacle(host, entity);
    }

    pub fn on_contact<H: Host>(&mut self, host: &mut H, contact: Contact) {
        if !contact.is_player_obstacle() {
            log::debug!("Ignoring contact mask {:#b}", contact.mask());
            return;
        }
        if self.state.is_game_over {
            return;
        }
        let (Some(player), Some(obstacle)) = (
            contact.body_in(category::PLAYER),
            contact.body_in(category::OBSTACLE),
        ) else {
            return;
        };
        // Bodies left over from a previous scene must not end this round
        if player.entity != self.player.entity
            || !self.obstacles.iter().any(|o| o.entity == obstacle.entity)
        {
            log::debug!(
                "Ignoring contact between foreign bodies {:?} and {:?}",
                player.entity,
                obstacle.entity
            );
            return;
        }
        self.remove_obstacle(host, obstacle.entity);
        self.end_round(host);
    }

    /// Stop both timers and show the game-over label. Later calls do nothing.
    pub fn end_round<H: Host>(&mut self, host: &mut H) {
        if self.state.is_game_over {
            return;
        }
        self.state.is_game_over = true;

        if let Some(handle) = self.spawn_timer.take() {
            host.cancel(handle);
        }
        if let Some(handle) = self.score_timer.take() {
            host.cancel(handle);
        }

        let center = self.scene_size / 2.0;
        self.game_over_label = Some(host.add_entity(
            EntitySpec::new(
                Sprite::Label {
                    text: "GAME OVER".to_string(),
                    font_size: GAME_OVER_FONT_SIZE,
                },
                center,
                label_size("GAME OVER", GAME_OVER_FONT_SIZE),
            )
            .with_z(10),
        ));

        log::info!("Game over with score {}", self.state.score);
    }

    /// After game over, a tap asks for a fresh round
    pub fn on_pointer_tap(&self, point: Vec2) -> Option<SceneRequest> {
        if !self.state.is_game_over {
            return None;
        }
        if self.tuning.restart_tap_anywhere || self.game_over_bounds().contains(point) {
            Some(SceneRequest::NewRound)
        } else {
            None
        }
    }

    fn game_over_bounds(&self) -> Rect {
        Rect::new(
            self.scene_size / 2.0,
            label_size("GAME OVER", GAME_OVER_FONT_SIZE),
        )
    }

    fn remove_obstacle<H: Host>(&mut self, host: &mut H, entity: EntityId) {
        if let Some(idx) = self.obstacles.iter().position(|o| o.entity == entity) {
            self.obstacles.remove(idx);
            host.remove_entity(entity);
        }
    }

    /// Remove every entity and timer this scene created
    pub fn teardown<H: Host>(&mut self, host: &mut H) {
        for handle in [self.spawn_timer.take(), self.score_timer.take()]
            .into_iter()
            .flatten()
        {
            host.cancel(handle);
        }
        for obstacle in self.obstacles.drain(..) {
            host.remove_entity(obstacle.entity);
        }
        if let Some(label) = self.game_over_label.take() {
            host.remove_entity(label);
        }
        host.remove_entity(self.score_label);
        host.remove_entity(self.player.entity);
        host.remove_entity(self.background);
    }
}
