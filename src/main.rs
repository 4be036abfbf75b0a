//! Zombie Hunt demo driver
//!
//! Runs a headless hunt: the cursor sweeps the board in a serpentine and
//! commits on every tile until the last zombie is found, then the
//! recorded input is replayed to check the state hash.
//!
//! Usage: `zombie-hunt [config.json]`

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zombie_hunt::{
    game::{events::GameEventData, tick::replay_session},
    scene::{HeadlessScene, RecordingSound},
    ButtonId, DeterministicRng, GameConfig, GameSession, InputEvent, TileCoord, BOARD_WIDTH, FRAME_RATE,
    VERSION,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Zombie Hunt v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).with_context(|| format!("loading config from {}", path))?,
        None => GameConfig::default(),
    };
    // Replay needs the seed, so draw it here rather than inside the session.
    let config = match config.rng_seed {
        Some(_) => config,
        None => {
            let (_, seed) = DeterministicRng::from_entropy();
            config.with_seed(seed)
        }
    };

    demo_hunt(config)
}

/// Cursor targets: every tile, row by row, alternating direction.
fn serpentine() -> Vec<TileCoord> {
    let mut order = Vec::new();
    for y in 0..BOARD_WIDTH {
        let row: Vec<_> = (0..BOARD_WIDTH).filter_map(|x| TileCoord::new(x, y)).collect();
        if y % 2 == 0 {
            order.extend(row);
        } else {
            order.extend(row.into_iter().rev());
        }
    }
    order
}

/// One cursor step toward `target`, if not already there.
fn cursor_step(from: TileCoord, target: TileCoord) -> Option<ButtonId> {
    let delta = from.delta_to(target);
    if delta.x < 0 {
        Some(ButtonId::CursorLeft)
    } else if delta.x > 0 {
        Some(ButtonId::CursorRight)
    } else if delta.y < 0 {
        Some(ButtonId::CursorDown)
    } else if delta.y > 0 {
        Some(ButtonId::CursorUp)
    } else {
        None
    }
}

fn demo_hunt(config: GameConfig) -> Result<()> {
    info!("=== Starting Demo Hunt ===");
    let elapsed = 1.0 / FRAME_RATE as f32;

    let scene = HeadlessScene::standard(&config);
    let mut session =
        GameSession::new(config.clone(), scene, RecordingSound::new()).context("starting session")?;
    session.record_inputs();
    info!("RNG Seed: {}", session.rng_seed());

    let tap = |session: &mut GameSession<HeadlessScene, RecordingSound>, id| {
        for event in InputEvent::tap(id) {
            session.handle_event(&event);
        }
    };

    // Hop once so the jump and the listener get exercised.
    tap(&mut session, ButtonId::MoveUp);

    let mut targets = serpentine().into_iter();
    let mut target = targets.next();
    let mut total_events = 0;

    while let Some(goal) = target {
        if session.is_game_over() {
            break;
        }
        match cursor_step(session.active_tile(), goal) {
            Some(id) => tap(&mut session, id),
            None => {
                tap(&mut session, ButtonId::Commit);
                target = targets.next();
            }
        }

        let result = session.update(elapsed);
        total_events += result.events.len();
        for event in &result.events {
            match &event.data {
                GameEventData::ZombieFound { tile, score, .. } => {
                    info!("Update {}: zombie at {}, score {}", event.update, tile, score);
                }
                GameEventData::HumanFound { tile, score, .. } => {
                    info!("Update {}: human at {}, score {}", event.update, tile, score);
                }
                GameEventData::JumpLanded { tile } => {
                    info!("Update {}: player landed on {}", event.update, tile);
                }
                _ => {}
            }
        }
    }

    if !session.is_game_over() {
        warn!("Sweep ended without finding every zombie");
    }

    info!("=== Hunt Results ===");
    info!(
        "Score {} after {} updates ({} zombies, {} humans found, {} events)",
        session.score(),
        session.update_index(),
        session.zombies_found(),
        session.humans_found(),
        total_events
    );
    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Replay ===");
    let script = session.take_recording().unwrap_or_default();
    let updates = session.update_index();
    let (replayed, _) = replay_session(config, &script, updates, elapsed).context("replaying hunt")?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("REPLAY VERIFIED: Hashes match!");
    } else {
        warn!("REPLAY MISMATCH: Hashes differ!");
    }

    session.shutdown();
    replayed.shutdown();
    Ok(())
}
