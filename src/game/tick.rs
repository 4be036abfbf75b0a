//! Session Update
//!
//! One `update(elapsed)` call per frame advances the whole session. The
//! order within an update is fixed:
//!
//! 1. player move (only while no jump is in flight)
//! 2. jump interpolation (a jump begun this update only takes its
//!    per-update first step; elapsed time counts from the next update)
//! 3. cursor move
//! 4. commit
//! 5. camera and listener follow the player
//! 6. ambient loops
//! 7. input counters drained
//!
//! Once the game is over every update is a no-op.

use glam::Vec3;
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig};
use crate::core::direction::{facing_toward, remap, Facing};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::InputScript;
use crate::game::jump::JumpProgress;
use crate::game::selection::{resolve, SelectionOutcome};
use crate::game::setup::SetupError;
use crate::game::sound::{ambient_cues, apply_cues};
use crate::game::state::GameSession;
use crate::game::entity::EntityId;
use crate::core::coord::TileCoord;
use crate::scene::{HeadlessScene, RecordingSound, SceneGraph, SoundSystem};

/// Result of an update.
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Events generated this update
    pub events: Vec<GameEvent>,
    /// Whether the game is over after this update
    pub game_over: bool,
}

impl<S: SceneGraph, A: SoundSystem> GameSession<S, A> {
    /// Advance the session by one frame.
    ///
    /// `elapsed` is the frame time in seconds; it only matters for the
    /// jump interpolator under an elapsed-time clock.
    pub fn update(&mut self, elapsed: f32) -> UpdateResult {
        if self.tally.game_over {
            return UpdateResult {
                events: Vec::new(),
                game_over: true,
            };
        }

        // 0. Advance update counter
        self.update_index += 1;

        // 1. Player move. Airborne moves stay latched in the counters.
        let airborne = self.jump.is_jumping();
        if !airborne {
            self.apply_player_move();
        }

        // 2. Jump interpolation. Frame time from before takeoff is not
        // charged to a jump begun this update.
        self.advance_jump(if airborne { elapsed } else { 0.0 });

        // 3. Cursor
        self.apply_cursor_move();

        // 4. Commit
        if self.input.take_commit() {
            self.apply_commit();
        }

        // 5. Camera and listener
        self.sync_camera();

        // 6. Ambient loops
        self.sync_ambient();

        // 7. Drain input
        self.input.drain(airborne);

        UpdateResult {
            events: self.take_events(),
            game_over: self.tally.game_over,
        }
    }

    fn apply_player_move(&mut self) {
        let raw = self.input.take_player_move();
        if raw.is_zero() {
            return;
        }
        let delta = remap(raw, self.camera.azimuth);
        let from = self.registry.player().tile;
        let (to, clamped) = from.offset_clamped(delta);

        let player = self.registry.player_mut();
        if let Some(facing) = Facing::from_delta(delta) {
            player.facing = facing;
        }
        let facing = player.facing;
        let transform = player.transform;
        self.scene.set_rotation(transform, facing.rotation());

        if clamped {
            self.push_event(GameEvent::new(
                self.update_index,
                GameEventData::MoveBlocked { at: from, delta },
            ));
            return;
        }

        let origin = self.board.tile(from).anchor();
        let target = self.board.tile(to).anchor();
        self.jump.begin(
            origin,
            target,
            to,
            delta,
            self.config.jump_steps,
            self.config.jump_curvature,
        );
        self.registry.player_mut().tile = to;

        self.push_event(GameEvent::new(
            self.update_index,
            GameEventData::PlayerMoved {
                from,
                to,
                delta,
                facing,
            },
        ));
        self.face_found_toward_player();
    }

    /// Turn every found entity toward the player's tile.
    fn face_found_toward_player(&mut self) {
        let player_tile = self.registry.player().tile;
        for id in self.registry.found_ids() {
            let Some(entity) = self.registry.get_mut(id) else {
                continue;
            };
            if let Some(facing) = facing_toward(entity.tile, player_tile) {
                entity.facing = facing;
                self.scene.set_rotation(entity.transform, facing.rotation());
            }
        }
    }

    fn advance_jump(&mut self, elapsed: f32) {
        let transform = self.registry.player().transform;
        match self.jump.advance(elapsed, self.config.jump_clock) {
            JumpProgress::Idle => {}
            JumpProgress::InFlight { position } => {
                self.player_position = position;
                self.scene.set_position(transform, position);
            }
            JumpProgress::Landed { position, tile } => {
                self.player_position = position;
                self.scene.set_position(transform, position);
                self.push_event(GameEvent::new(self.update_index, GameEventData::JumpLanded { tile }));
            }
        }
    }

    fn apply_cursor_move(&mut self) {
        let raw = self.input.take_cursor_move();
        if raw.is_zero() {
            return;
        }
        let delta = remap(raw, self.camera.azimuth);
        let from = self.active_tile;
        let (to, clamped) = from.offset_clamped(delta);

        if to != from {
            let old = self.board.tile(from);
            self.scene.set_position(old.transform(), old.anchor());
            let new = self.board.tile(to);
            self.scene
                .set_position(new.transform(), new.anchor() - Vec3::Z * self.config.cursor_depth);
            self.active_tile = to;
        }

        self.push_event(GameEvent::new(
            self.update_index,
            GameEventData::CursorMoved { from, to, clamped },
        ));
    }

    fn apply_commit(&mut self) {
        let outcome = resolve(&mut self.board, &mut self.registry, &mut self.tally, self.active_tile);
        let update = self.update_index;
        match outcome {
            SelectionOutcome::Empty { tile } => {
                let score = self.tally.score;
                self.push_event(GameEvent::new(update, GameEventData::EmptyTileCommitted { tile, score }));
            }
            SelectionOutcome::AlreadyResolved { tile } => {
                debug!("Tile {:?} already resolved", tile);
                self.push_event(GameEvent::new(update, GameEventData::AlreadyResolved { tile }));
            }
            SelectionOutcome::Resolved {
                tile,
                entity,
                kind,
                revealed,
                game_over,
            } => {
                if revealed {
                    self.reveal(entity, tile);
                }
                let score = self.tally.score;
                self.push_event(GameEvent::found(update, kind, entity, tile, revealed, score));
                if game_over {
                    info!("All zombies found after {} updates, final score {}", update, score);
                    self.push_event(GameEvent::game_over(update, score));
                }
            }
        }
    }

    /// Move a found entity into view on its tile, facing the player, and
    /// silence its loop.
    fn reveal(&mut self, id: EntityId, tile: TileCoord) {
        let slot = self.board.tile(tile).anchor() + self.config.reveal_offset;
        let Some(entity) = self.registry.get(id) else {
            return;
        };
        self.scene.set_position(entity.transform, slot);
        self.scene.set_rotation(entity.transform, entity.facing.rotation());
        if let Some(handle) = entity.sound {
            self.sound.set_volume(handle, 0.0);
        }
    }

    fn sync_ambient(&mut self) {
        let cues = ambient_cues(
            &self.board,
            &self.registry,
            self.registry.player().tile,
            self.camera.position(),
            &self.config,
        );
        apply_cues(&mut self.sound, &mut self.registry, &cues, &self.config);
    }
}

/// Replay a recorded script against a fresh headless session.
///
/// The config must carry a seed. Runs `updates` updates of `elapsed`
/// seconds each, stopping early at game over. Returns the final session
/// and every event produced.
pub fn replay_session(
    config: GameConfig,
    script: &InputScript,
    updates: u32,
    elapsed: f32,
) -> Result<(GameSession<HeadlessScene, RecordingSound>, Vec<GameEvent>), SetupError> {
    if config.rng_seed.is_none() {
        return Err(ConfigError::Invalid("replay needs a fixed rng_seed".into()).into());
    }
    let scene = HeadlessScene::standard(&config);
    let mut session = GameSession::new(config, scene, RecordingSound::new())?;
    let mut all_events = Vec::new();

    for u in 0..updates {
        for event in script.events_at(u) {
            session.handle_event(event);
        }
        let result = session.update(elapsed);
        all_events.extend(result.events);
        if result.game_over {
            break;
        }
    }

    Ok((session, all_events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JumpClock;
    use crate::core::coord::BoardDelta;
    use crate::game::entity::HuntedKind;
    use crate::game::input::{ButtonId, InputEvent};
    use crate::game::jump::JumpPhase;
    use crate::game::seeder::ScriptedSampler;
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    type Session = GameSession<HeadlessScene, RecordingSound>;

    fn config() -> GameConfig {
        GameConfig {
            zombie_count: 2,
            human_count: 1,
            jump_clock: JumpClock::PerUpdate,
            ..GameConfig::default()
        }
    }

    /// Session with zombies at `zombies` and humans at `humans`.
    fn scripted(config: GameConfig, zombies: &[TileCoord], humans: &[TileCoord]) -> Session {
        let scene = HeadlessScene::standard(&config);
        let coords = zombies.iter().chain(humans).copied().collect();
        let mut sampler = ScriptedSampler::new(coords);
        GameSession::with_sampler(config, scene, RecordingSound::new(), &mut sampler, 0).unwrap()
    }

    fn tile(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y).unwrap()
    }

    fn tap(session: &mut Session, id: ButtonId) {
        for event in InputEvent::tap(id) {
            session.handle_event(&event);
        }
    }

    fn commit(session: &mut Session) -> UpdateResult {
        tap(session, ButtonId::Commit);
        session.update(DT)
    }

    fn move_cursor_to(session: &mut Session, target: TileCoord) {
        while session.active_tile() != target {
            let delta = session.active_tile().delta_to(target);
            let id = if delta.x < 0 {
                ButtonId::CursorLeft
            } else if delta.x > 0 {
                ButtonId::CursorRight
            } else if delta.y < 0 {
                ButtonId::CursorDown
            } else {
                ButtonId::CursorUp
            };
            tap(session, id);
            session.update(DT);
        }
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    #[test]
    fn test_player_hop_right_lands_exactly() {
        let config = GameConfig {
            zombie_count: 1,
            human_count: 0,
            ..config()
        };
        let mut s = scripted(config, &[tile(0, 0)], &[]);
        let target = s.board().tile(tile(4, 3)).anchor();

        tap(&mut s, ButtonId::MoveRight);
        let first = s.update(DT);
        assert_eq!(s.player_tile(), tile(4, 3));
        assert_eq!(s.jump().phase(), JumpPhase::Jumping);
        assert!(matches!(
            first.events[0].data,
            GameEventData::PlayerMoved { delta: BoardDelta { x: 1, y: 0 }, facing: Facing::Right, .. }
        ));

        for _ in 0..8 {
            s.update(DT);
            assert_eq!(s.jump().phase(), JumpPhase::Jumping);
        }
        let last = s.update(DT);
        assert_eq!(s.jump().phase(), JumpPhase::Idle);
        assert!(last
            .events
            .iter()
            .any(|e| e.data == GameEventData::JumpLanded { tile: tile(4, 3) }));
        assert_eq!(s.player_position(), target);

        let player = s.registry().player().transform;
        assert_eq!(s.scene().transform(player).position, target);
    }

    #[test]
    fn test_commit_on_zombie_then_again() {
        let mut s = scripted(config(), &[TileCoord::CENTER, tile(0, 0)], &[tile(6, 6)]);

        commit(&mut s);
        assert_eq!(s.score(), 1);
        assert_eq!(s.zombies_found(), 1);
        assert!(s.board().tile(TileCoord::CENTER).is_resolved());

        let again = commit(&mut s);
        assert_eq!(s.score(), 1);
        assert_eq!(s.zombies_found(), 1);
        assert_eq!(
            again.events,
            vec![GameEvent::new(
                s.update_index(),
                GameEventData::AlreadyResolved { tile: TileCoord::CENTER }
            )]
        );
    }

    #[test]
    fn test_commit_on_human_then_again() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[TileCoord::CENTER]);

        commit(&mut s);
        assert_eq!(s.score(), -1);
        assert_eq!(s.humans_found(), 1);
        assert!(s.board().tile(TileCoord::CENTER).is_resolved());

        let before = s.compute_hash();
        let again = commit(&mut s);
        assert_eq!(s.compute_hash(), before);
        assert_eq!(s.score(), -1);
        assert_eq!(s.humans_found(), 1);
        assert_eq!(
            again.events,
            vec![GameEvent::new(
                s.update_index(),
                GameEventData::AlreadyResolved { tile: TileCoord::CENTER }
            )]
        );
    }

    #[test]
    fn test_slow_takeoff_frame_keeps_the_arc() {
        let config = GameConfig {
            zombie_count: 1,
            human_count: 0,
            jump_clock: JumpClock::default(),
            ..config()
        };
        let mut s = scripted(config, &[tile(0, 0)], &[]);
        let origin = s.board().tile(TileCoord::CENTER).anchor();
        let target = s.board().tile(tile(4, 3)).anchor();

        tap(&mut s, ButtonId::MoveRight);
        let takeoff = s.update(0.25);
        assert_eq!(s.jump().phase(), JumpPhase::Jumping);
        assert_eq!(s.player_position(), origin);
        assert!(takeoff
            .events
            .iter()
            .all(|e| !matches!(e.data, GameEventData::JumpLanded { .. })));

        s.update(1.0 / 30.0);
        assert_eq!(s.jump().phase(), JumpPhase::Jumping);
        assert_eq!(s.jump().current().unwrap().step, 2);
        assert!(s.player_position().z > origin.z);

        let landing = s.update(0.25);
        assert_eq!(s.jump().phase(), JumpPhase::Idle);
        assert_eq!(s.player_position(), target);
        assert!(landing
            .events
            .iter()
            .any(|e| e.data == GameEventData::JumpLanded { tile: tile(4, 3) }));
    }

    #[test]
    fn test_commit_on_empty_tile() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);

        commit(&mut s);
        assert_eq!(s.score(), -1);
        assert!(!s.board().tile(TileCoord::CENTER).is_resolved());

        commit(&mut s);
        assert_eq!(s.score(), -2);
    }

    #[test]
    fn test_cursor_clamped_at_right_edge() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);
        move_cursor_to(&mut s, tile(6, 3));

        tap(&mut s, ButtonId::CursorRight);
        let result = s.update(DT);
        assert_eq!(s.active_tile(), tile(6, 3));
        assert_eq!(
            result.events[0].data,
            GameEventData::CursorMoved {
                from: tile(6, 3),
                to: tile(6, 3),
                clamped: true
            }
        );
    }

    // =========================================================================
    // UPDATE BEHAVIOR
    // =========================================================================

    #[test]
    fn test_finding_every_zombie_freezes_session() {
        let mut s = scripted(config(), &[tile(3, 4), tile(3, 2)], &[tile(6, 6)]);

        move_cursor_to(&mut s, tile(3, 4));
        commit(&mut s);
        assert!(!s.is_game_over());

        move_cursor_to(&mut s, tile(3, 2));
        let result = commit(&mut s);
        assert!(result.game_over);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::GameOver { score: 2, .. })));

        let hash = s.compute_hash();
        assert!(!s.handle_event(&InputEvent::Press(ButtonId::MoveLeft)));
        let frozen = s.update(DT);
        assert!(frozen.game_over);
        assert!(frozen.events.is_empty());
        assert_eq!(s.compute_hash(), hash);
    }

    #[test]
    fn test_human_reveal_moves_and_faces_player() {
        let mut config = config();
        config.reveal_offset = Vec3::new(0.0, 0.0, 1.0);
        let mut s = scripted(config, &[tile(0, 0), tile(1, 0)], &[tile(3, 5)]);

        move_cursor_to(&mut s, tile(3, 5));
        let result = commit(&mut s);
        assert_eq!(s.score(), -1);
        assert_eq!(s.humans_found(), 1);
        assert!(matches!(result.events[0].data, GameEventData::HumanFound { revealed: true, .. }));

        let human = s.registry().get(s.registry().humans()[0]).unwrap();
        assert!(human.found);
        assert_eq!(human.facing, Facing::Down);
        let anchor = s.board().tile(tile(3, 5)).anchor();
        assert_eq!(s.scene().transform(human.transform).position, anchor + Vec3::Z);
        let handle = human.sound.unwrap();
        assert_eq!(s.sound().get(handle).unwrap().volume, 0.0);
    }

    #[test]
    fn test_found_entities_track_player() {
        let mut s = scripted(config(), &[tile(3, 4), tile(0, 0)], &[tile(6, 6)]);
        move_cursor_to(&mut s, tile(3, 4));
        commit(&mut s);
        let zombie = s.registry().zombies()[0];
        assert_eq!(s.registry().get(zombie).unwrap().facing, Facing::Down);

        tap(&mut s, ButtonId::MoveRight);
        s.update(DT);
        assert_eq!(s.player_tile(), tile(4, 3));

        for _ in 0..9 {
            s.update(DT);
        }
        tap(&mut s, ButtonId::MoveRight);
        s.update(DT);
        tap(&mut s, ButtonId::MoveRight);
        for _ in 0..10 {
            s.update(DT);
        }
        assert_eq!(s.player_tile(), tile(6, 3));
        assert_eq!(s.registry().get(zombie).unwrap().facing, Facing::Right);
    }

    #[test]
    fn test_move_during_jump_is_latched() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);

        tap(&mut s, ButtonId::MoveUp);
        s.update(DT);
        assert_eq!(s.player_tile(), tile(3, 4));

        // Arrives mid-flight; must wait for the landing.
        tap(&mut s, ButtonId::MoveUp);
        for _ in 0..9 {
            s.update(DT);
            assert_eq!(s.player_tile(), tile(3, 4));
        }
        assert_eq!(s.jump().phase(), JumpPhase::Idle);

        let result = s.update(DT);
        assert_eq!(s.player_tile(), tile(3, 5));
        assert!(matches!(result.events[0].data, GameEventData::PlayerMoved { .. }));
    }

    #[test]
    fn test_blocked_move_turns_without_jumping() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);
        for _ in 0..3 {
            tap(&mut s, ButtonId::MoveLeft);
            for _ in 0..10 {
                s.update(DT);
            }
        }
        assert_eq!(s.player_tile(), tile(0, 3));

        tap(&mut s, ButtonId::MoveLeft);
        let result = s.update(DT);
        assert_eq!(s.player_tile(), tile(0, 3));
        assert_eq!(s.jump().phase(), JumpPhase::Idle);
        assert!(matches!(result.events[0].data, GameEventData::MoveBlocked { .. }));
        assert_eq!(s.registry().player().facing, Facing::Left);
    }

    #[test]
    fn test_rotated_camera_remaps_moves() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);
        s.camera_mut().azimuth = FRAC_PI_2;

        tap(&mut s, ButtonId::CursorRight);
        s.update(DT);
        assert_eq!(s.active_tile(), tile(3, 4));

        tap(&mut s, ButtonId::MoveRight);
        s.update(DT);
        assert_eq!(s.player_tile(), tile(3, 4));
    }

    #[test]
    fn test_cursor_highlight_follows() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);
        let center = s.board().tile(TileCoord::CENTER).clone();
        let next = s.board().tile(tile(2, 3)).clone();

        tap(&mut s, ButtonId::CursorLeft);
        s.update(DT);
        assert_eq!(s.scene().transform(center.transform()).position, center.anchor());
        let lowered = s.scene().transform(next.transform()).position;
        assert!((lowered.z - (next.anchor().z - 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_ambient_volume_by_distance() {
        let mut s = scripted(config(), &[tile(4, 4), tile(0, 0)], &[tile(6, 6)]);
        s.update(DT);

        let near = s.registry().zombies()[0];
        let far = s.registry().zombies()[1];
        let volume = |s: &Session, id| {
            let handle = s.registry().get(id).unwrap().sound.unwrap();
            s.sound().get(handle).unwrap().volume
        };
        assert_eq!(volume(&s, near), 1.0);
        assert_eq!(volume(&s, far), 0.0);
        assert_eq!(s.sound().loops().len(), 3);

        let listener = s.sound().listener().unwrap().0;
        let handle = s.registry().get(near).unwrap().sound.unwrap();
        let offset = Vec3::new(2.0, 2.0, 0.0);
        assert!((s.sound().get(handle).unwrap().position - (listener + offset)).length() < 1e-4);

        // Loops are started once and then only updated.
        s.update(DT);
        assert_eq!(s.sound().loops().len(), 3);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(6, 6)]);
        tap(&mut s, ButtonId::MoveUp);
        for _ in 0..10 {
            s.update(DT);
        }
        let target = s.board().tile(tile(3, 4)).anchor();
        assert_eq!(s.camera().target, target);
        let frame = s.scene().camera_frame().unwrap();
        assert!((Vec3::from(frame.translation) - s.camera().position()).length() < 1e-4);
    }

    // =========================================================================
    // REPLAY
    // =========================================================================

    fn sweep_script() -> InputScript {
        let mut script = InputScript::new();
        let mut u = 0;
        script.tap(u, ButtonId::MoveUp);
        u += 12;
        for _ in 0..3 {
            script.tap(u, ButtonId::CursorRight);
            script.tap(u, ButtonId::Commit);
            u += 1;
        }
        script.push(u, InputEvent::OrbitStart);
        script.push(
            u,
            InputEvent::CameraMotion {
                xrel: 200.0,
                yrel: 0.0,
                window_width: 800,
                window_height: 600,
                dragging: true,
            },
        );
        script.tap(u + 1, ButtonId::CursorUp);
        script.tap(u + 2, ButtonId::Commit);
        script
    }

    #[test]
    fn test_replay_determinism() {
        let config = GameConfig::default().with_seed(99999);
        let script = sweep_script();

        let (s1, e1) = replay_session(config.clone(), &script, 40, DT).unwrap();
        let (s2, e2) = replay_session(config, &script, 40, DT).unwrap();

        assert_eq!(s1.compute_hash(), s2.compute_hash());
        assert_eq!(e1, e2);
        assert_eq!(s1.update_index(), 40);
    }

    #[test]
    fn test_recording_replays_to_same_hash() {
        let config = GameConfig::default().with_seed(2024);
        let scene = HeadlessScene::standard(&config);
        let mut live = GameSession::new(config.clone(), scene, RecordingSound::new()).unwrap();
        live.record_inputs();

        let script = sweep_script();
        for u in 0..40 {
            for event in script.events_at(u) {
                live.handle_event(event);
            }
            live.update(DT);
        }
        let recorded = live.take_recording().unwrap();
        let (replayed, _) = replay_session(config, &recorded, 40, DT).unwrap();
        assert_eq!(replayed.compute_hash(), live.compute_hash());
    }

    #[test]
    fn test_replay_requires_seed() {
        let err = replay_session(GameConfig::default(), &InputScript::new(), 1, DT).err().unwrap();
        assert!(matches!(err, SetupError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_found_counts_bounded_by_rosters() {
        let mut s = scripted(config(), &[tile(0, 0), tile(1, 0)], &[tile(2, 0)]);
        for target in [tile(0, 0), tile(1, 0), tile(2, 0)] {
            move_cursor_to(&mut s, target);
            commit(&mut s);
        }
        assert!(s.zombies_found() <= s.registry().roster_len(HuntedKind::Zombie));
        assert!(s.humans_found() <= s.registry().roster_len(HuntedKind::Human));
    }
}
