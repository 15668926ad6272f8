//! In-memory host
//!
//! Implements the host traits without any window or GPU: entities live in a
//! map, timers in a [`TimerQueue`], linear motions are integrated per step,
//! and overlapping contact bodies raise contact-begin events. Used by the
//! CLI and by tests.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use crate::geom::Rect;
use crate::host::{
    Animation, EntityHost, EntityId, EntitySpec, Host, HostEvent, SceneKind, ScenePresenter,
    Sprite, TimerHandle, TimerScheduler, Transition,
};
use crate::secs_to_ticks;
use crate::sim::physics::{Contact, ContactBody, PhysicsBody};
use crate::sim::timer::TimerQueue;

/// A linear move in progress
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub from: Vec2,
    pub target: Vec2,
    pub total_ticks: u64,
    pub elapsed_ticks: u64,
}

impl Motion {
    fn advance(&mut self) -> Vec2 {
        self.elapsed_ticks = (self.elapsed_ticks + 1).min(self.total_ticks);
        let t = self.elapsed_ticks as f32 / self.total_ticks as f32;
        self.from.lerp(self.target, t)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ticks >= self.total_ticks
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessEntity {
    pub id: EntityId,
    pub sprite: Sprite,
    pub position: Vec2,
    pub size: Vec2,
    pub z: i32,
    pub body: Option<PhysicsBody>,
    pub motion: Option<Motion>,
    /// Cosmetic looping animations (recorded, not simulated)
    pub pulses: Vec<Animation>,
}

impl HeadlessEntity {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

#[derive(Debug)]
pub struct HeadlessHost {
    size: Vec2,
    entities: BTreeMap<EntityId, HeadlessEntity>,
    next_id: u32,
    timers: TimerQueue,
    /// Body pairs overlapping at the end of the last step
    touching: BTreeSet<(EntityId, EntityId)>,
    /// Input queued for the next step
    pending: Vec<HostEvent>,
    presented: Vec<(SceneKind, Transition)>,
}

impl HeadlessHost {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            entities: BTreeMap::new(),
            next_id: 1,
            timers: TimerQueue::new(),
            touching: BTreeSet::new(),
            pending: Vec::new(),
            presented: Vec::new(),
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&HeadlessEntity> {
        self.entities.get(&id)
    }

    /// Entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = &HeadlessEntity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Scene changes requested so far
    pub fn presented(&self) -> &[(SceneKind, Transition)] {
        &self.presented
    }

    /// Queue a pointer event for delivery at the start of the next step
    pub fn push_input(&mut self, event: HostEvent) {
        self.pending.push(event);
    }

    /// Advance one simulation tick and return the raised events in order:
    /// queued input, timers, finished motions, new contacts.
    pub fn step(&mut self) -> Vec<HostEvent> {
        let mut events: Vec<HostEvent> = self.pending.drain(..).collect();

        events.extend(self.timers.advance().into_iter().map(HostEvent::TimerFired));

        for entity in self.entities.values_mut() {
            if let Some(motion) = entity.motion.as_mut() {
                entity.position = motion.advance();
                if motion.is_done() {
                    entity.motion = None;
                    events.push(HostEvent::MotionFinished(entity.id));
                }
            }
        }

        events.extend(self.detect_contacts().into_iter().map(HostEvent::ContactBegan));
        events
    }

    /// Report pairs that started overlapping since the last step
    fn detect_contacts(&mut self) -> Vec<Contact> {
        let bodies: Vec<(EntityId, PhysicsBody, Rect)> = self
            .entities
            .values()
            .filter_map(|e| e.body.map(|body| (e.id, body, e.bounds())))
            .collect();

        let mut touching = BTreeSet::new();
        let mut began = Vec::new();
        for (i, (id_a, body_a, rect_a)) in bodies.iter().enumerate() {
            for (id_b, body_b, rect_b) in &bodies[i + 1..] {
                if !body_a.tests_contact_with(body_b) || !rect_a.overlaps(rect_b) {
                    continue;
                }
                let pair = (*id_a, *id_b);
                if !self.touching.contains(&pair) {
                    began.push(Contact {
                        a: ContactBody {
                            entity: *id_a,
                            category: body_a.category,
                        },
                        b: ContactBody {
                            entity: *id_b,
                            category: body_b.category,
                        },
                    });
                }
                touching.insert(pair);
            }
        }
        self.touching = touching;
        began
    }
}

impl EntityHost for HeadlessHost {
    fn add_entity(&mut self, spec: EntitySpec) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            HeadlessEntity {
                id,
                sprite: spec.sprite,
                position: spec.position,
                size: spec.size,
                z: spec.z,
                body: spec.body,
                motion: None,
                pulses: Vec::new(),
            },
        );
        id
    }

    fn remove_entity(&mut self, id: EntityId) {
        if self.entities.remove(&id).is_none() {
            log::debug!("remove_entity: unknown {:?}", id);
        }
    }

    fn update_position(&mut self, id: EntityId, position: Vec2) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = position;
        }
    }

    fn set_text(&mut self, id: EntityId, text: &str) {
        if let Some(HeadlessEntity {
            sprite: Sprite::Label { text: current, .. },
            ..
        }) = self.entities.get_mut(&id)
        {
            current.clear();
            current.push_str(text);
        }
    }

    fn run_animation(&mut self, id: EntityId, animation: Animation) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        match animation {
            Animation::MoveTo { target, duration } => {
                entity.motion = Some(Motion {
                    from: entity.position,
                    target,
                    total_ticks: secs_to_ticks(duration),
                    elapsed_ticks: 0,
                });
            }
            pulse => entity.pulses.push(pulse),
        }
    }
}

impl TimerScheduler for HeadlessHost {
    fn schedule(&mut self, interval: f32, repeating: bool) -> TimerHandle {
        self.timers.schedule(interval, repeating)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if !self.timers.cancel(handle) {
            log::debug!("cancel: timer {:?} not active", handle);
        }
    }
}

impl ScenePresenter for HeadlessHost {
    fn present(&mut self, scene: SceneKind, transition: Transition) {
        log::info!("Presenting {:?} scene ({:?})", scene, transition);
        self.presented.push((scene, transition));
    }
}

impl Host for HeadlessHost {
    fn scene_size(&self) -> Vec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::category;
    use crate::sim::{Director, SceneRequest};
    use crate::tuning::Tuning;

    fn host() -> HeadlessHost {
        HeadlessHost::new(Vec2::new(400.0, 800.0))
    }

    fn obstacle_at(host: &mut HeadlessHost, pos: Vec2) -> EntityId {
        host.add_entity(
            EntitySpec::new(Sprite::Obstacle { variant: 0 }, pos, Vec2::splat(50.0))
                .with_body(PhysicsBody::obstacle()),
        )
    }

    fn player_at(host: &mut HeadlessHost, pos: Vec2) -> EntityId {
        host.add_entity(
            EntitySpec::new(Sprite::Player, pos, Vec2::splat(60.0)).with_body(PhysicsBody::player()),
        )
    }

    #[test]
    fn test_contact_reported_once_per_overlap() {
        let mut host = host();
        let player = player_at(&mut host, Vec2::new(200.0, 100.0));
        let obstacle = obstacle_at(&mut host, Vec2::new(210.0, 120.0));

        let events = host.step();
        assert_eq!(events.len(), 1);
        let HostEvent::ContactBegan(contact) = events[0] else {
            panic!("expected contact, got {:?}", events[0]);
        };
        assert!(contact.is_player_obstacle());
        assert_eq!(contact.body_in(category::PLAYER).unwrap().entity, player);
        assert_eq!(contact.body_in(category::OBSTACLE).unwrap().entity, obstacle);

        // Still overlapping: no new contact
        assert!(host.step().is_empty());

        // Separate, then overlap again
        host.update_position(obstacle, Vec2::new(390.0, 700.0));
        assert!(host.step().is_empty());
        host.update_position(obstacle, Vec2::new(200.0, 100.0));
        assert_eq!(host.step().len(), 1);
    }

    #[test]
    fn test_obstacles_do_not_contact_each_other() {
        let mut host = host();
        obstacle_at(&mut host, Vec2::new(200.0, 500.0));
        obstacle_at(&mut host, Vec2::new(210.0, 500.0));
        assert!(host.step().is_empty());
    }

    #[test]
    fn test_motion_moves_linearly_and_finishes() {
        let mut host = host();
        let id = obstacle_at(&mut host, Vec2::new(100.0, 850.0));
        host.run_animation(
            id,
            Animation::MoveTo {
                target: Vec2::new(100.0, -50.0),
                duration: 1.0,
            },
        );

        for _ in 0..60 {
            assert!(host.step().is_empty());
        }
        let halfway = host.entity(id).unwrap().position;
        assert!((halfway.y - 400.0).abs() < 0.01);

        for _ in 0..59 {
            host.step();
        }
        assert_eq!(host.step(), vec![HostEvent::MotionFinished(id)]);
        assert_eq!(host.entity(id).unwrap().position, Vec2::new(100.0, -50.0));
        assert!(host.entity(id).unwrap().motion.is_none());
    }

    #[test]
    fn test_set_text_and_unknown_ids() {
        let mut host = host();
        let label = host.add_entity(EntitySpec::new(
            Sprite::Label {
                text: "0".into(),
                font_size: 28.0,
            },
            Vec2::ZERO,
            Vec2::ONE,
        ));
        host.set_text(label, "42");
        assert!(matches!(&host.entity(label).unwrap().sprite, Sprite::Label { text, .. } if text == "42"));

        host.remove_entity(EntityId(999));
        host.update_position(EntityId(999), Vec2::ZERO);
        host.cancel(TimerHandle(999));
        assert_eq!(host.entity_count(), 1);
    }

    /// Slow obstacles so nothing reaches the player during the test
    fn calm_tuning() -> Tuning {
        Tuning {
            initial_fall_duration: 100.0,
            min_fall_duration: 100.0,
            ..Default::default()
        }
    }

    fn start_round(director: &mut Director<HeadlessHost>) {
        let play = director
            .host()
            .entities()
            .find(|e| matches!(e.sprite, Sprite::Button { .. }))
            .map(|e| e.position)
            .expect("menu has a play button");
        director.host_mut().push_input(HostEvent::PointerDown(play));
        let events = director.host_mut().step();
        director.handle_all(events);
        assert!(director.round().is_some());
    }

    #[test]
    fn test_score_advances_every_half_second() {
        let mut director = Director::new(host(), calm_tuning(), 3);
        start_round(&mut director);

        for second in 1..=6u64 {
            for _ in 0..120 {
                let events = director.host_mut().step();
                director.handle_all(events);
            }
            assert_eq!(director.round().unwrap().state().score, second * 2);
        }
        let round = director.round().unwrap();
        assert!(!round.is_game_over());
        // Difficulty stepped once at score 10
        assert!((round.state().spawn_interval - 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_pauses_after_difficulty_step() {
        let mut director = Director::new(host(), calm_tuning(), 3);
        start_round(&mut director);

        // 5 s: spawns at 1,2,3,4,5 s; the score tick at 5 s steps difficulty
        for _ in 0..600 {
            let events = director.host_mut().step();
            director.handle_all(events);
        }
        assert_eq!(director.round().unwrap().obstacles().len(), 5);

        // Next spawn only after a full 0.9 s
        for _ in 0..107 {
            let events = director.host_mut().step();
            director.handle_all(events);
        }
        assert_eq!(director.round().unwrap().obstacles().len(), 5);
        let events = director.host_mut().step();
        director.handle_all(events);
        assert_eq!(director.round().unwrap().obstacles().len(), 6);
    }

    #[test]
    fn test_falling_obstacle_ends_round() {
        let tuning = Tuning {
            initial_fall_duration: 1.0,
            min_fall_duration: 1.0,
            ..Default::default()
        };
        // Scene as narrow as an obstacle: every spawn lands on the player
        let mut director = Director::new(HeadlessHost::new(Vec2::new(60.0, 800.0)), tuning, 5);
        start_round(&mut director);

        for _ in 0..(120 * 3) {
            let events = director.host_mut().step();
            director.handle_all(events);
        }
        let round = director.round().unwrap();
        assert!(round.is_game_over());
        assert!(director.host().timers().is_empty());
        let score = round.state().score;

        // Nothing moves the score once the round is over
        for _ in 0..240 {
            let events = director.host_mut().step();
            director.handle_all(events);
        }
        assert_eq!(director.round().unwrap().state().score, score);

        let restart = director.round().unwrap().on_pointer_tap(Vec2::ONE);
        assert_eq!(restart, Some(SceneRequest::NewRound));
    }
}
