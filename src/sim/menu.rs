//! Start menu scene
//!
//! Title, a pulsing PLAY button and a glow behind it. The only thing that
//! matters is a tap on the button.

use glam::Vec2;

use super::director::SceneRequest;
use crate::consts::*;
use crate::geom::Rect;
use crate::host::{Animation, EntityId, EntitySpec, Host, HostEvent, Sprite, label_size};

/// PLAY button size (unscaled)
pub const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 60.0);
pub const BUTTON_CORNER_RADIUS: f32 = 15.0;
/// Glow halo size
pub const GLOW_SIZE: Vec2 = Vec2::new(220.0, 80.0);
pub const GLOW_CORNER_RADIUS: f32 = 20.0;
/// Half of one pulse cycle, seconds
pub const PULSE_HALF_PERIOD: f32 = 0.8;

#[derive(Debug)]
pub struct MenuScene {
    entities: Vec<EntityId>,
    play_bounds: Rect,
}

impl MenuScene {
    pub fn start<H: Host>(host: &mut H) -> Self {
        let size = host.scene_size();
        let center = size / 2.0;
        let mut entities = Vec::with_capacity(5);

        entities.push(host.add_entity(
            EntitySpec::new(Sprite::Background, center, size).with_z(-1),
        ));
        entities.push(host.add_entity(EntitySpec::new(
            Sprite::Label {
                text: "DODGER".to_string(),
                font_size: TITLE_FONT_SIZE,
            },
            center + Vec2::new(0.0, 100.0),
            label_size("DODGER", TITLE_FONT_SIZE),
        )));

        let button_pos = center - Vec2::new(0.0, 40.0);

        let glow = host.add_entity(
            EntitySpec::new(
                Sprite::Glow {
                    corner_radius: GLOW_CORNER_RADIUS,
                    alpha: 0.3,
                },
                button_pos,
                GLOW_SIZE,
            )
            .with_z(-1),
        );
        host.run_animation(
            glow,
            Animation::PulseAlpha {
                high: 0.6,
                low: 0.2,
                duration: PULSE_HALF_PERIOD,
            },
        );
        entities.push(glow);

        let button = host.add_entity(EntitySpec::new(
            Sprite::Button {
                corner_radius: BUTTON_CORNER_RADIUS,
            },
            button_pos,
            BUTTON_SIZE,
        ));
        host.run_animation(
            button,
            Animation::PulseScale {
                to: 1.1,
                duration: PULSE_HALF_PERIOD,
            },
        );
        entities.push(button);

        let label_extent = label_size("PLAY", BUTTON_FONT_SIZE);
        entities.push(host.add_entity(
            EntitySpec::new(
                Sprite::Label {
                    text: "PLAY".to_string(),
                    font_size: BUTTON_FONT_SIZE,
                },
                button_pos,
                label_extent,
            )
            .with_z(1),
        ));

        let play_bounds =
            Rect::new(button_pos, BUTTON_SIZE).union(&Rect::new(button_pos, label_extent));

        log::info!("Start menu shown");
        Self {
            entities,
            play_bounds,
        }
    }

    /// Hit region of the PLAY control, label included
    pub fn play_bounds(&self) -> Rect {
        self.play_bounds
    }

    pub fn handle_event<H: Host>(&mut self, _host: &mut H, event: HostEvent) -> Option<SceneRequest> {
        match event {
            HostEvent::PointerDown(point) => self.on_pointer_tap(point),
            _ => None,
        }
    }

    pub fn on_pointer_tap(&self, point: Vec2) -> Option<SceneRequest> {
        if self.play_bounds.contains(point) {
            Some(SceneRequest::NewRound)
        } else {
            None
        }
    }

    pub fn teardown<H: Host>(&mut self, host: &mut H) {
        for entity in self.entities.drain(..) {
            host.remove_entity(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;

    fn menu() -> (HeadlessHost, MenuScene) {
        let mut host = HeadlessHost::new(Vec2::new(400.0, 800.0));
        let menu = MenuScene::start(&mut host);
        (host, menu)
    }

    #[test]
    fn test_layout() {
        let (host, menu) = menu();
        assert_eq!(host.entity_count(), 5);
        assert_eq!(menu.play_bounds().center, Vec2::new(200.0, 360.0));
        assert_eq!(menu.play_bounds().size, BUTTON_SIZE);
        // Menu schedules no timers; pulses are host animations
        assert!(host.timers().is_empty());
    }

    #[test]
    fn test_tap_inside_play() {
        let (_, menu) = menu();
        assert_eq!(menu.on_pointer_tap(Vec2::new(200.0, 360.0)), Some(SceneRequest::NewRound));
        assert_eq!(menu.on_pointer_tap(Vec2::new(101.0, 331.0)), Some(SceneRequest::NewRound));
    }

    #[test]
    fn test_tap_outside_play() {
        let (_, menu) = menu();
        assert_eq!(menu.on_pointer_tap(Vec2::new(200.0, 460.0)), None);
        // Inside the glow but outside the button
        assert_eq!(menu.on_pointer_tap(Vec2::new(305.0, 360.0)), None);
        assert_eq!(menu.on_pointer_tap(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_pointer_moves_ignored() {
        let (mut host, mut menu) = menu();
        assert_eq!(
            menu.handle_event(&mut host, HostEvent::PointerMoved(Vec2::new(200.0, 360.0))),
            None
        );
    }

    #[test]
    fn test_teardown() {
        let (mut host, mut menu) = menu();
        menu.teardown(&mut host);
        assert_eq!(host.entity_count(), 0);
    }
}
