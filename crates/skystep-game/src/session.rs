//! Game session: one struct owning all per-stage state, one update per frame
//!
//! The session drains contact events from each physics sub-step and turns
//! them into state-machine transitions: landings, checkpoint saves, stage
//! clears, obstacle triggers, and fatal contacts.

use serde::{Deserialize, Serialize};
use tracing::info;

use skystep_core::{GameTime, TimeConfig, Vec3};
use skystep_physics::{ContactEvent, PhysicsConfig, PhysicsWorld, PlayerBodyConfig};
use skystep_stage::{load_stage, LoadedStage, RespawnState, StageData, StageKind};

use crate::animation::{AnimationClip, AnimationDriver, CrossFade};
use crate::camera::{CameraConfig, OrbitCamera};
use crate::checkpoint::{CheckpointEvent, CheckpointSystem};
use crate::input::{InputAction, InputState};
use crate::obstacle::{ObstacleConfig, ObstacleSystem};
use crate::player::{MovementConfig, PlayerController, PlayerState, SuperJump};

/// All tunables of a session, grouped for settings files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub body: PlayerBodyConfig,
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub obstacle: ObstacleConfig,
    pub time: TimeConfig,
}

/// The running game: stage, player, traps, checkpoints, camera, and timers
pub struct GameSession {
    /// Configuration the session was built with
    pub config: GameConfig,
    time: GameTime,
    physics: PhysicsWorld,
    stage: LoadedStage,
    stage_kind: StageKind,
    player: PlayerController,
    super_jump: SuperJump,
    obstacles: ObstacleSystem,
    checkpoints: CheckpointSystem,
    camera: OrbitCamera,
    animation: AnimationDriver,
    respawn: RespawnState,
    death_count: u32,
    stage_cleared: bool,
    menu_open: bool,
}

impl GameSession {
    /// Build a session on the given stage
    pub fn new(config: GameConfig, kind: StageKind, data: &StageData) -> Self {
        let mut physics = PhysicsWorld::with_config(config.physics.clone());
        let stage = load_stage(data, &mut physics, config.movement.death_depth);
        let player = PlayerController::spawn(
            &mut physics,
            config.movement.clone(),
            config.body.clone(),
            stage.spawn,
        );
        let super_jump = SuperJump::new(config.movement.super_jump_cooldown);
        let obstacles = ObstacleSystem::from_links(config.obstacle.clone(), &stage.obstacle_links);
        let camera = OrbitCamera::with_config(config.camera.clone());
        let respawn = RespawnState::new(stage.spawn);
        let time = GameTime::new(config.time.clone());

        Self {
            config,
            time,
            physics,
            stage,
            stage_kind: kind,
            player,
            super_jump,
            obstacles,
            checkpoints: CheckpointSystem::new(),
            camera,
            animation: AnimationDriver::new(),
            respawn,
            death_count: 0,
            stage_cleared: false,
            menu_open: false,
        }
    }

    /// Replace the current stage.
    ///
    /// The previous stage's bodies and step registry drop with its physics
    /// world; respawn state, the super-jump cooldown, and the clear flag
    /// reset, while the death count survives like any session statistic.
    pub fn load_stage(&mut self, kind: StageKind, data: &StageData) {
        let mut physics = PhysicsWorld::with_config(self.config.physics.clone());
        let stage = load_stage(data, &mut physics, self.config.movement.death_depth);
        self.player = PlayerController::spawn(
            &mut physics,
            self.config.movement.clone(),
            self.config.body.clone(),
            stage.spawn,
        );
        self.respawn.reset_to(stage.spawn);
        self.obstacles =
            ObstacleSystem::from_links(self.config.obstacle.clone(), &stage.obstacle_links);
        self.super_jump.reset();
        self.camera.reset_angles();
        self.animation = AnimationDriver::new();
        self.physics = physics;
        self.stage = stage;
        self.stage_kind = kind;
        self.stage_cleared = false;
        self.menu_open = false;
        self.time.resume();

        info!("Entered stage '{}'", self.stage.name);
    }

    /// Advance the session by one display frame
    pub fn update(&mut self, input: &mut InputState, raw_delta: f32) {
        if input.is_just_pressed(InputAction::StageMenu) {
            self.toggle_menu(input);
        }
        if input.is_just_pressed(InputAction::Respawn) {
            self.respawn_player();
        }
        if !self.menu_open {
            if input.is_just_pressed(InputAction::Jump) {
                self.try_jump(false);
            }
            if input.is_just_pressed(InputAction::SuperJump) {
                self.try_jump(true);
            }
        }

        self.time.update(raw_delta);
        let fixed_dt = self.time.config.fixed_timestep;
        for _ in 0..self.time.fixed_steps() {
            self.player.fixed_update(&mut self.physics, input, fixed_dt);
            self.physics.step();

            let events = self.physics.take_contact_events();
            if self.player.notify_contacts(&events) {
                self.animation.finish_one_shot();
            }
            self.process_step_contacts(&events);

            self.obstacles
                .update(&mut self.physics, &self.stage.steps, fixed_dt);

            if self.player.fell_below_death_depth(&self.physics) {
                self.on_death();
            }
        }

        self.super_jump.update(self.time.delta_time);

        self.camera.handle_mouse_look(input.mouse_delta);
        self.camera.follow(self.player.position(&self.physics));
        self.player.set_facing(&mut self.physics, self.camera.yaw());

        self.update_locomotion_clip();
    }

    /// Open or close the stage selection menu. Opening pauses the session
    /// and drops all held input.
    pub fn toggle_menu(&mut self, input: &mut InputState) {
        self.menu_open = !self.menu_open;
        if self.menu_open {
            self.time.pause();
            input.clear_all();
        } else {
            self.time.resume();
        }
    }

    fn try_jump(&mut self, super_jump: bool) {
        if self.time.paused || !self.player.can_jump() {
            return;
        }
        if super_jump {
            if self.super_jump.try_activate() {
                self.player.begin_jump(self.config.movement.super_jump_impulse);
                self.animation.play_one_shot(AnimationClip::Jump);
            }
        } else if self.player.begin_jump(self.config.movement.jump_impulse) {
            self.animation.play_one_shot(AnimationClip::Jump);
        }
    }

    fn process_step_contacts(&mut self, events: &[ContactEvent]) {
        let player_collider = self.player.collider_handle();
        for event in events.iter().filter(|e| e.is_started()) {
            let Some(other) = event.other(player_collider) else {
                continue;
            };
            let Some(step) = self.stage.steps.get_by_collider(other) else {
                continue;
            };
            let step_id = step.id;
            let checkpoint_event = self.checkpoints.handle_contact(step, &self.physics);

            if self.obstacles.is_lethal(step_id) {
                self.on_death();
                continue;
            }
            self.obstacles.handle_trigger_contact(step_id);

            match checkpoint_event {
                Some(CheckpointEvent::SaveReached(position)) => {
                    self.respawn.save(position);
                    info!("Respawn position saved at {position}");
                }
                Some(CheckpointEvent::EndReached) => self.on_stage_clear(),
                None => {}
            }
        }
    }

    fn on_death(&mut self) {
        if self.player.kill(&mut self.physics) {
            self.death_count += 1;
            self.animation.finish_one_shot();
            self.animation.set_locomotion(AnimationClip::Death);
            info!("Player died ({} deaths)", self.death_count);
        }
    }

    fn on_stage_clear(&mut self) {
        if !self.stage_cleared {
            self.stage_cleared = true;
            match self.stage_kind.next() {
                Some(next) => info!(
                    "Stage '{}' cleared, '{}' unlocked",
                    self.stage.name,
                    next.title()
                ),
                None => info!("Stage '{}' cleared, game complete", self.stage.name),
            }
        }
    }

    fn respawn_player(&mut self) {
        let position = self.respawn.position();
        if self.player.respawn(&mut self.physics, position) {
            self.camera.reset_angles();
            self.animation.set_locomotion(AnimationClip::Idle);
            info!("Respawned at {position}");
        }
    }

    fn update_locomotion_clip(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let clip = if !self.player.is_moving() {
            AnimationClip::Idle
        } else if self.player.is_sprinting() {
            AnimationClip::Running
        } else {
            AnimationClip::Walking
        };
        self.animation.set_locomotion(clip);
    }

    /// Drain the animation cues queued since the last frame
    pub fn drain_animation_cues(&mut self) -> Vec<CrossFade> {
        self.animation.drain_cues()
    }

    /// The player's world position
    pub fn player_position(&self) -> Vec3 {
        self.player.position(&self.physics)
    }

    /// The player controller
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Whether the player is waiting for respawn input
    pub fn is_game_over(&self) -> bool {
        self.player.state() == PlayerState::Dead
    }

    /// Times the player has died this session
    pub fn death_count(&self) -> u32 {
        self.death_count
    }

    /// Whether the current stage's end step was reached
    pub fn stage_cleared(&self) -> bool {
        self.stage_cleared
    }

    /// Whether the stage selection menu is open (session paused)
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// The stage currently loaded
    pub fn stage(&self) -> &LoadedStage {
        &self.stage
    }

    /// Which stage is loaded
    pub fn stage_kind(&self) -> StageKind {
        self.stage_kind
    }

    /// The super jump cooldown state
    pub fn super_jump(&self) -> &SuperJump {
        &self.super_jump
    }

    /// The orbit camera
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Respawn bookkeeping
    pub fn respawn_state(&self) -> &RespawnState {
        &self.respawn
    }

    /// The frame clock
    pub fn time(&self) -> &GameTime {
        &self.time
    }

    /// The physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Mutable physics access for embedders
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Teleport the player body, zeroing its velocity (debug tooling)
    pub fn teleport_player(&mut self, position: Vec3) {
        self.player.body().teleport(&mut self.physics, position);
    }
}
