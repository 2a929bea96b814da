//! Falling-obstacle traps
//!
//! Each trap links a trigger step to an obstacle step. First player contact
//! with the trigger starts a delay; when it elapses the obstacle's body is
//! released to fall under gravity. Once it has fallen far enough, or stopped
//! moving after leaving its origin, it is restored fixed at exactly its
//! original pose. Touching a falling obstacle kills the player.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skystep_core::{StepId, Transform};
use skystep_physics::PhysicsWorld;
use skystep_stage::{ObstacleLink, StepRegistry};

/// Obstacle tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Fall distance after which a falling obstacle is restored
    pub fall_reset_distance: f32,
    /// Downward speed below which a moved obstacle counts as settled
    pub settle_speed: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            fall_reset_distance: 10.0,
            settle_speed: 0.1,
        }
    }
}

/// Lifecycle of one trap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrapPhase {
    /// Waiting for first trigger contact
    Armed,
    /// Trigger touched; counting down to the fall
    Pending { remaining: f32 },
    /// Body released; contact with the player is fatal
    Falling { origin: Transform },
    /// Fell and was restored; stays inert until the stage reloads
    Spent,
}

#[derive(Debug, Clone)]
struct ObstacleTrap {
    trigger: StepId,
    obstacle: StepId,
    delay: f32,
    phase: TrapPhase,
}

/// All traps of the loaded stage
#[derive(Debug, Clone)]
pub struct ObstacleSystem {
    /// Tuning
    pub config: ObstacleConfig,
    traps: Vec<ObstacleTrap>,
}

impl ObstacleSystem {
    /// Build the trap list from a stage's validated obstacle links
    pub fn from_links(config: ObstacleConfig, links: &[ObstacleLink]) -> Self {
        let traps = links
            .iter()
            .map(|link| ObstacleTrap {
                trigger: link.trigger,
                obstacle: link.obstacle,
                delay: link.delay,
                phase: TrapPhase::Armed,
            })
            .collect();
        Self { config, traps }
    }

    /// Number of traps
    pub fn trap_count(&self) -> usize {
        self.traps.len()
    }

    /// The phase of the trap dropping `obstacle`, if one exists
    pub fn phase_of(&self, obstacle: StepId) -> Option<TrapPhase> {
        self.traps
            .iter()
            .find(|t| t.obstacle == obstacle)
            .map(|t| t.phase)
    }

    /// Whether touching `step` is currently fatal
    pub fn is_lethal(&self, step: StepId) -> bool {
        self.traps
            .iter()
            .any(|t| t.obstacle == step && matches!(t.phase, TrapPhase::Falling { .. }))
    }

    /// Player touched `step`; arm the delay of any trap triggered by it.
    /// Re-contact never re-arms a trap that already left `Armed`.
    pub fn handle_trigger_contact(&mut self, step: StepId) {
        for trap in &mut self.traps {
            if trap.trigger == step && trap.phase == TrapPhase::Armed {
                trap.phase = TrapPhase::Pending {
                    remaining: trap.delay,
                };
                debug!("Obstacle {} armed, falls in {}s", trap.obstacle, trap.delay);
            }
        }
    }

    /// Advance delay timers and falling obstacles by one fixed step
    pub fn update(&mut self, physics: &mut PhysicsWorld, steps: &StepRegistry, dt: f32) {
        for trap in &mut self.traps {
            match trap.phase {
                TrapPhase::Armed | TrapPhase::Spent => {}
                TrapPhase::Pending { remaining } => {
                    let remaining = remaining - dt;
                    if remaining > 0.0 {
                        trap.phase = TrapPhase::Pending { remaining };
                        continue;
                    }
                    let Some(step) = steps.get(trap.obstacle) else {
                        trap.phase = TrapPhase::Spent;
                        continue;
                    };
                    physics.release_body_dynamic(step.body);
                    trap.phase = TrapPhase::Falling {
                        origin: step.origin,
                    };
                    info!("Obstacle {} released", trap.obstacle);
                }
                TrapPhase::Falling { origin } => {
                    let Some(step) = steps.get(trap.obstacle) else {
                        trap.phase = TrapPhase::Spent;
                        continue;
                    };
                    let Some(body) = physics.get_rigid_body(step.body) else {
                        trap.phase = TrapPhase::Spent;
                        continue;
                    };

                    let fallen = origin.position.y - body.translation().y;
                    let settled = fallen > 0.0 && body.linvel().y >= -self.config.settle_speed;
                    if fallen >= self.config.fall_reset_distance || settled {
                        physics.restore_body_fixed(step.body, origin.position, origin.rotation);
                        trap.phase = TrapPhase::Spent;
                        debug!("Obstacle {} restored to its original pose", trap.obstacle);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::{Quat, Vec3};
    use rapier3d::prelude::*;
    use skystep_stage::StepObject;

    fn spawn_step(world: &mut PhysicsWorld, position: Vec3) -> StepObject {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let collider = ColliderBuilder::cuboid(2.0, 0.5, 2.0).build();
        let (body, collider) = world.add_body(body, collider);
        StepObject {
            id: StepId::new(),
            body,
            collider,
            role: None,
            texture: None,
            origin: Transform {
                position,
                rotation: Quat::IDENTITY,
                scale: Vec3::new(4.0, 1.0, 4.0),
            },
        }
    }

    fn setup(delay: f32) -> (PhysicsWorld, StepRegistry, ObstacleSystem, StepId, StepId) {
        let mut world = PhysicsWorld::new();
        let mut registry = StepRegistry::new();

        let trigger = spawn_step(&mut world, Vec3::new(0.0, 1.0, -10.0));
        let obstacle = spawn_step(&mut world, Vec3::new(0.0, 8.0, -10.0));
        let trigger_id = trigger.id;
        let obstacle_id = obstacle.id;
        registry.insert(trigger);
        registry.insert(obstacle);

        let system = ObstacleSystem::from_links(
            ObstacleConfig::default(),
            &[ObstacleLink {
                trigger: trigger_id,
                obstacle: obstacle_id,
                delay,
            }],
        );

        (world, registry, system, trigger_id, obstacle_id)
    }

    #[test]
    fn test_trigger_contact_starts_delay() {
        let (_world, _registry, mut system, trigger, obstacle) = setup(1.5);
        assert_eq!(system.phase_of(obstacle), Some(TrapPhase::Armed));

        system.handle_trigger_contact(trigger);
        assert_eq!(
            system.phase_of(obstacle),
            Some(TrapPhase::Pending { remaining: 1.5 })
        );
    }

    #[test]
    fn test_retrigger_does_not_reset_delay() {
        let (mut world, registry, mut system, trigger, obstacle) = setup(1.0);
        system.handle_trigger_contact(trigger);
        system.update(&mut world, &registry, 0.4);

        system.handle_trigger_contact(trigger);
        match system.phase_of(obstacle) {
            Some(TrapPhase::Pending { remaining }) => assert!((remaining - 0.6).abs() < 1e-5),
            other => panic!("expected pending trap, got {:?}", other),
        }
    }

    #[test]
    fn test_release_after_delay() {
        let (mut world, registry, mut system, trigger, obstacle) = setup(0.5);
        system.handle_trigger_contact(trigger);

        system.update(&mut world, &registry, 0.3);
        assert!(matches!(
            system.phase_of(obstacle),
            Some(TrapPhase::Pending { .. })
        ));
        assert!(!system.is_lethal(obstacle));

        system.update(&mut world, &registry, 0.3);
        assert!(matches!(
            system.phase_of(obstacle),
            Some(TrapPhase::Falling { .. })
        ));
        assert!(system.is_lethal(obstacle));
    }

    #[test]
    fn test_obstacle_returns_to_original_pose() {
        let (mut world, registry, mut system, trigger, obstacle) = setup(0.1);
        let origin = registry.get(obstacle).unwrap().origin;

        system.handle_trigger_contact(trigger);

        // Run the simulation until the trap has fallen and been restored
        let dt = 1.0 / 60.0;
        for _ in 0..1000 {
            system.update(&mut world, &registry, dt);
            world.step();
            if system.phase_of(obstacle) == Some(TrapPhase::Spent) {
                break;
            }
        }

        assert_eq!(system.phase_of(obstacle), Some(TrapPhase::Spent));
        assert!(!system.is_lethal(obstacle));

        let pose = registry.get(obstacle).unwrap().pose(&world);
        assert!((pose.position - origin.position).length() < 1e-4);

        // Restored fixed: it must not move again
        for _ in 0..30 {
            world.step();
        }
        let pose = registry.get(obstacle).unwrap().pose(&world);
        assert!((pose.position - origin.position).length() < 1e-4);
    }
}
