//! Scene director
//!
//! Owns the host and the active scene, routes host events to it and carries
//! out the scene changes it asks for. A scene change tears the old scene
//! down completely and builds a fresh one.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::menu::MenuScene;
use super::round::RoundScene;
use crate::host::{Host, HostEvent, SceneKind, Transition};
use crate::tuning::Tuning;

/// What a scene wants to happen next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    /// Replace the current scene with a brand-new round
    NewRound,
}

#[derive(Debug)]
pub enum ActiveScene {
    Menu(MenuScene),
    Round(RoundScene),
}

impl ActiveScene {
    pub fn kind(&self) -> SceneKind {
        match self {
            ActiveScene::Menu(_) => SceneKind::Start,
            ActiveScene::Round(_) => SceneKind::Game,
        }
    }
}

pub struct Director<H: Host> {
    host: H,
    tuning: Tuning,
    scene: ActiveScene,
    /// Source of per-round seeds
    seeds: Pcg32,
    rounds_started: u32,
}

impl<H: Host> Director<H> {
    /// Start on the menu. The host is assumed to already show the start
    /// scene, so nothing is presented here.
    pub fn new(mut host: H, tuning: Tuning, seed: u64) -> Self {
        let scene = ActiveScene::Menu(MenuScene::start(&mut host));
        Self {
            host,
            tuning,
            scene,
            seeds: Pcg32::seed_from_u64(seed),
            rounds_started: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scene(&self) -> &ActiveScene {
        &self.scene
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The active round, if the game scene is showing
    pub fn round(&self) -> Option<&RoundScene> {
        match &self.scene {
            ActiveScene::Round(round) => Some(round),
            ActiveScene::Menu(_) => None,
        }
    }

    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    /// Deliver one host event to the active scene
    pub fn handle(&mut self, event: HostEvent) {
        let request = match &mut self.scene {
            ActiveScene::Menu(menu) => menu.handle_event(&mut self.host, event),
            ActiveScene::Round(round) => round.handle_event(&mut self.host, event),
        };
        if let Some(request) = request {
            self.fulfil(request);
        }
    }

    pub fn handle_all(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    fn fulfil(&mut self, request: SceneRequest) {
        match request {
            SceneRequest::NewRound => {
                match &mut self.scene {
                    ActiveScene::Menu(menu) => menu.teardown(&mut self.host),
                    ActiveScene::Round(round) => round.teardown(&mut self.host),
                }

                self.host.present(
                    SceneKind::Game,
                    Transition::Fade {
                        duration: self.tuning.transition_fade,
                    },
                );
                let seed = self.seeds.random::<u64>();
                self.rounds_started += 1;
                log::info!("Starting round {}", self.rounds_started);
                self.scene = ActiveScene::Round(RoundScene::start(&mut self.host, &self.tuning, seed));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use crate::sim::physics::{Contact, ContactBody, category};
    use glam::Vec2;

    fn director() -> Director<HeadlessHost> {
        Director::new(HeadlessHost::new(Vec2::new(400.0, 800.0)), Tuning::default(), 1)
    }

    fn run(director: &mut Director<HeadlessHost>, steps: usize) {
        for _ in 0..steps {
            let events = director.host_mut().step();
            director.handle_all(events);
        }
    }

    /// Contact between the current player and its oldest obstacle
    fn contact_in_current_round(director: &Director<HeadlessHost>) -> Contact {
        let round = director.round().expect("round active");
        Contact {
            a: ContactBody {
                entity: round.player().entity,
                category: category::PLAYER,
            },
            b: ContactBody {
                entity: round.obstacles().first().expect("obstacle spawned").entity,
                category: category::OBSTACLE,
            },
        }
    }

    fn end_current_round(director: &mut Director<HeadlessHost>) {
        // First spawn after 1 s; nothing reaches the player that early
        run(director, 121);
        let contact = contact_in_current_round(director);
        director.handle(HostEvent::ContactBegan(contact));
    }

    #[test]
    fn test_menu_miss_requests_nothing() {
        let mut director = director();
        director.handle(HostEvent::PointerDown(Vec2::new(10.0, 10.0)));
        assert_eq!(director.scene().kind(), SceneKind::Start);
        assert!(director.host().presented().is_empty());
    }

    #[test]
    fn test_menu_hit_presents_one_fresh_round() {
        let mut director = director();
        director.handle(HostEvent::PointerDown(Vec2::new(200.0, 360.0)));

        assert_eq!(director.host().presented(), &[(SceneKind::Game, Transition::Fade { duration: 0.5 })]);
        let round = director.round().expect("round active");
        assert!(!round.is_game_over());
        assert_eq!(round.state().score, 0);
        // Menu entities are gone; only the round's three remain
        assert_eq!(director.host().entity_count(), 3);
        assert_eq!(director.rounds_started(), 1);
    }

    #[test]
    fn test_full_session_presents_twice() {
        let mut director = director();
        director.handle(HostEvent::PointerDown(Vec2::new(200.0, 360.0)));

        // Taps during play do nothing
        director.handle(HostEvent::PointerDown(Vec2::new(200.0, 400.0)));
        assert_eq!(director.host().presented().len(), 1);

        end_current_round(&mut director);
        assert!(director.round().unwrap().is_game_over());
        let old_seed = director.round().unwrap().seed();

        director.handle(HostEvent::PointerDown(Vec2::new(1.0, 1.0)));
        assert_eq!(director.host().presented().len(), 2);
        let round = director.round().unwrap();
        assert!(!round.is_game_over());
        assert_ne!(round.seed(), old_seed);
        assert_eq!(director.host().entity_count(), 3);
        assert_eq!(director.host().timers().len(), 2);
    }

    #[test]
    fn test_stale_contact_in_restart_batch_spares_new_round() {
        let mut director = director();
        director.handle(HostEvent::PointerDown(Vec2::new(200.0, 360.0)));
        run(&mut director, 241);

        // Old round: one obstacle ends it, another is still falling
        let ending = contact_in_current_round(&director);
        let mut leftover = ending;
        leftover.b.entity = director.round().unwrap().obstacles()[1].entity;
        director.handle(HostEvent::ContactBegan(ending));
        assert!(director.round().unwrap().is_game_over());

        // Restart tap and a contact from the old scene arrive together
        director.handle_all([
            HostEvent::PointerDown(Vec2::new(1.0, 1.0)),
            HostEvent::ContactBegan(leftover),
        ]);

        assert_eq!(director.rounds_started(), 2);
        let round = director.round().unwrap();
        assert!(!round.is_game_over());
        assert_eq!(round.state().score, 0);
        assert_eq!(director.host().timers().len(), 2);
    }
}
