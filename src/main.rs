//! Skystep - third-person platformer controller demo
//!
//! Drives a short scripted playthrough of the tutorial stage headlessly. An
//! embedding renderer runs the same session loop from its frame callback and
//! consumes the animation cues, step poses, and camera math the session
//! exposes.

mod settings;

use anyhow::{Context, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use skystep_game::{GameSession, InputAction, InputState};
use skystep_stage::{StageData, StageKind};

use settings::GameSettings;

/// Display frame delta the demo advances by
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting Skystep...");

    let settings = GameSettings::load();

    let stage_kind = StageKind::Tutorial;
    let data = StageData::load(stage_kind.asset_path())
        .with_context(|| format!("Failed to load stage '{}'", stage_kind.title()))?;

    let mut session = GameSession::new(settings.game_config(), stage_kind, &data);
    let mut input = InputState::new();

    // Scripted playthrough: walk, sprint, jump, super jump, idle out the fall
    info!("Walking forward");
    input.held.insert(InputAction::MoveForward);
    run(&mut session, &mut input, 120);

    info!("Sprinting");
    input.held.insert(InputAction::Sprint);
    run(&mut session, &mut input, 120);
    input.held.remove(&InputAction::Sprint);

    info!("Jumping");
    input.just_pressed.insert(InputAction::Jump);
    run(&mut session, &mut input, 90);

    info!("Super jump");
    input.just_pressed.insert(InputAction::SuperJump);
    run(&mut session, &mut input, 240);

    input.held.clear();
    run(&mut session, &mut input, 600);

    if session.is_game_over() {
        info!("Respawning");
        input.just_pressed.insert(InputAction::Respawn);
        run(&mut session, &mut input, 60);
    }

    info!(
        "Demo finished on '{}': position {}, {} deaths, cleared: {}",
        session.stage().name,
        session.player_position(),
        session.death_count(),
        session.stage_cleared()
    );

    Ok(())
}

/// Advance the session by `frames` display frames
fn run(session: &mut GameSession, input: &mut InputState, frames: u32) {
    for _ in 0..frames {
        session.update(input, FRAME_DT);
        for cue in session.drain_animation_cues() {
            debug!("Crossfade to {} over {}s", cue.clip.name(), cue.duration);
        }
        input.clear_frame();
    }
}
