//! Player controller: the Grounded/Jumping/Dead state machine
//!
//! Transitions are evaluated from per-frame input and the contact list drained
//! from the physics step. While grounded, lateral input displaces the body
//! along its facing; while jumping, it applies a steering force.

use glam::Vec3;
use rapier3d::prelude::ColliderHandle;

use skystep_physics::{ContactEvent, PhysicsWorld, PlayerBody, PlayerBodyConfig};

use crate::input::{InputAction, InputState};

use super::{MovementConfig, PlayerState};

/// A jump that has started its animation but not yet fired its impulse
#[derive(Debug, Clone, Copy)]
struct JumpWindup {
    remaining: f32,
    impulse: f32,
}

/// Player controller handling input, movement, and the life state machine
pub struct PlayerController {
    /// Movement configuration
    pub config: MovementConfig,
    body: PlayerBody,
    state: PlayerState,
    windup: Option<JumpWindup>,
    moving: bool,
    sprinting: bool,
}

impl PlayerController {
    /// Spawn the player in the world at a position
    pub fn spawn(
        physics: &mut PhysicsWorld,
        config: MovementConfig,
        body_config: PlayerBodyConfig,
        position: Vec3,
    ) -> Self {
        let body = PlayerBody::spawn(physics, body_config, position);
        Self {
            config,
            body,
            state: PlayerState::Grounded,
            windup: None,
            moving: false,
            sprinting: false,
        }
    }

    /// The current state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether the player is alive
    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Whether lateral input was applied last update
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether the sprint modifier was held last update
    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// The player's world position
    pub fn position(&self, physics: &PhysicsWorld) -> Vec3 {
        self.body.position(physics)
    }

    /// The player's collider, for matching contact events
    pub fn collider_handle(&self) -> ColliderHandle {
        self.body.collider_handle()
    }

    /// The underlying physics body
    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    /// Whether a jump can start right now
    pub fn can_jump(&self) -> bool {
        self.state == PlayerState::Grounded && self.windup.is_none()
    }

    /// Start a jump with the given impulse. The impulse fires after the
    /// configured wind-up so the animation leads it. Returns false while
    /// dead, airborne, or mid wind-up.
    pub fn begin_jump(&mut self, impulse: f32) -> bool {
        if !self.can_jump() {
            return false;
        }
        self.windup = Some(JumpWindup {
            remaining: self.config.jump_windup,
            impulse,
        });
        true
    }

    /// Advance movement and the jump wind-up by one fixed step
    pub fn fixed_update(&mut self, physics: &mut PhysicsWorld, input: &InputState, dt: f32) {
        if self.state == PlayerState::Dead {
            self.moving = false;
            self.sprinting = false;
            return;
        }

        // Fire the pending jump impulse once the wind-up elapses
        if let Some(mut windup) = self.windup.take() {
            windup.remaining -= dt;
            if windup.remaining <= 0.0 {
                self.body.apply_jump_impulse(physics, windup.impulse);
                self.state = PlayerState::Jumping;
            } else {
                self.windup = Some(windup);
            }
        }

        let direction = movement_direction(input);
        self.sprinting = input.is_held(InputAction::Sprint);
        self.moving = direction != Vec3::ZERO;

        match self.state {
            PlayerState::Jumping => {
                let force = direction * self.config.steer_force(self.sprinting);
                self.body.set_local_force(physics, force);
            }
            PlayerState::Grounded => {
                self.body.set_local_force(physics, Vec3::ZERO);
                if self.moving {
                    let delta = direction * self.config.speed(self.sprinting) * dt;
                    self.body.displace_local(physics, delta);
                }
            }
            PlayerState::Dead => unreachable!("handled above"),
        }
    }

    /// Resolve landing against this frame's contact list. Returns true when
    /// the state flipped from Jumping to Grounded.
    pub fn notify_contacts(&mut self, events: &[ContactEvent]) -> bool {
        if self.state != PlayerState::Jumping {
            return false;
        }
        let collider = self.body.collider_handle();
        let landed = events
            .iter()
            .any(|e| e.is_started() && e.other(collider).is_some());
        if landed {
            self.state = PlayerState::Grounded;
        }
        landed
    }

    /// Whether the body has fallen below the death depth
    pub fn fell_below_death_depth(&self, physics: &PhysicsWorld) -> bool {
        self.is_alive() && self.body.position(physics).y < self.config.death_depth
    }

    /// Kill the player. Returns false if already dead.
    pub fn kill(&mut self, physics: &mut PhysicsWorld) -> bool {
        if self.state == PlayerState::Dead {
            return false;
        }
        self.state = PlayerState::Dead;
        self.windup = None;
        self.moving = false;
        self.body.set_local_force(physics, Vec3::ZERO);
        true
    }

    /// Respawn at the given position. Only works while dead; returns whether
    /// the respawn happened.
    pub fn respawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> bool {
        if self.state != PlayerState::Dead {
            return false;
        }
        self.body.teleport(physics, position);
        self.state = PlayerState::Grounded;
        self.windup = None;
        true
    }

    /// Point the body's facing at the camera yaw. Ignored while dead.
    pub fn set_facing(&self, physics: &mut PhysicsWorld, yaw: f32) {
        if self.is_alive() {
            self.body.set_yaw(physics, yaw);
        }
    }
}

/// Lateral movement direction in the body's local frame (forward is -Z)
fn movement_direction(input: &InputState) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if input.is_held(InputAction::MoveForward) {
        direction.z -= 1.0;
    }
    if input.is_held(InputAction::MoveBackward) {
        direction.z += 1.0;
    }
    if input.is_held(InputAction::MoveLeft) {
        direction.x -= 1.0;
    }
    if input.is_held(InputAction::MoveRight) {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    use skystep_physics::ContactPhase;

    fn setup() -> (PhysicsWorld, PlayerController) {
        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);
        let player = PlayerController::spawn(
            &mut physics,
            MovementConfig::default(),
            PlayerBodyConfig::default(),
            Vec3::new(0.0, 3.0, 0.0),
        );
        (physics, player)
    }

    fn forward_input() -> InputState {
        let mut input = InputState::new();
        input.held.insert(InputAction::MoveForward);
        input
    }

    #[test]
    fn test_jump_fires_after_windup() {
        let (mut physics, mut player) = setup();
        assert!(player.begin_jump(player.config.jump_impulse));
        assert!(!player.can_jump());

        // Wind-up has not elapsed yet
        player.fixed_update(&mut physics, &InputState::new(), 0.2);
        assert_eq!(player.state(), PlayerState::Grounded);

        player.fixed_update(&mut physics, &InputState::new(), 0.2);
        assert_eq!(player.state(), PlayerState::Jumping);
        assert!(player.body().linvel(&physics).y > 0.0);
    }

    #[test]
    fn test_cannot_jump_while_jumping() {
        let (mut physics, mut player) = setup();
        player.begin_jump(10.0);
        player.fixed_update(&mut physics, &InputState::new(), 1.0);
        assert_eq!(player.state(), PlayerState::Jumping);
        assert!(!player.begin_jump(10.0));
    }

    #[test]
    fn test_dead_player_cannot_jump_or_move() {
        let (mut physics, mut player) = setup();
        player.kill(&mut physics);

        assert!(!player.begin_jump(10.0));

        let before = player.position(&physics);
        player.fixed_update(&mut physics, &forward_input(), 1.0 / 60.0);
        assert_eq!(player.position(&physics), before);
        assert!(!player.is_moving());
    }

    #[test]
    fn test_grounded_movement_displaces_along_facing() {
        let (mut physics, mut player) = setup();
        let before = player.position(&physics);
        player.fixed_update(&mut physics, &forward_input(), 1.0 / 60.0);
        let after = player.position(&physics);

        // Default facing is -Z
        assert!(after.z < before.z);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn test_sprint_doubles_displacement() {
        let (mut physics, mut player) = setup();

        let start = player.position(&physics);
        player.fixed_update(&mut physics, &forward_input(), 1.0 / 60.0);
        let walked = (player.position(&physics) - start).length();

        let mut sprint_input = forward_input();
        sprint_input.held.insert(InputAction::Sprint);
        let start = player.position(&physics);
        player.fixed_update(&mut physics, &sprint_input, 1.0 / 60.0);
        let sprinted = (player.position(&physics) - start).length();

        assert!((sprinted - walked * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_landing_on_contact() {
        let (mut physics, mut player) = setup();
        player.begin_jump(10.0);
        player.fixed_update(&mut physics, &InputState::new(), 1.0);
        assert_eq!(player.state(), PlayerState::Jumping);

        let other = physics.create_ground(-100.0);
        let landed = player.notify_contacts(&[ContactEvent {
            first: player.collider_handle(),
            second: other,
            phase: ContactPhase::Started,
        }]);

        assert!(landed);
        assert_eq!(player.state(), PlayerState::Grounded);
    }

    #[test]
    fn test_unrelated_contact_does_not_land() {
        let (mut physics, mut player) = setup();
        player.begin_jump(10.0);
        player.fixed_update(&mut physics, &InputState::new(), 1.0);

        let a = physics.create_ground(-100.0);
        let b = physics.create_ground(-101.0);
        let landed = player.notify_contacts(&[ContactEvent {
            first: a,
            second: b,
            phase: ContactPhase::Started,
        }]);

        assert!(!landed);
        assert_eq!(player.state(), PlayerState::Jumping);
    }

    #[test]
    fn test_death_depth_check() {
        let (mut physics, mut player) = setup();
        assert!(!player.fell_below_death_depth(&physics));

        player.body().teleport(&mut physics, Vec3::new(0.0, -25.0, 0.0));
        assert!(player.fell_below_death_depth(&physics));

        player.kill(&mut physics);
        // Already dead; no further death triggers
        assert!(!player.fell_below_death_depth(&physics));
    }

    #[test]
    fn test_respawn_only_from_dead() {
        let (mut physics, mut player) = setup();
        assert!(!player.respawn(&mut physics, Vec3::new(0.0, 2.0, 0.0)));

        player.kill(&mut physics);
        assert!(player.respawn(&mut physics, Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(player.state(), PlayerState::Grounded);
        assert_eq!(player.position(&physics), Vec3::new(1.0, 2.0, 3.0));
    }
}
