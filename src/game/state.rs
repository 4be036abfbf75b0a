//! Session State
//!
//! `GameSession` owns everything a running hunt mutates: the board, the
//! entity registry, the jump interpolator, the cursor, the score tally and
//! the orbit camera. The scene and the mixer are injected at construction
//! and handed back by [`GameSession::shutdown`].

use glam::Vec3;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::coord::TileCoord;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::board::Board;
use crate::game::entity::{Entity, EntityId, EntityKind, HuntedKind, Registry};
use crate::game::events::GameEvent;
use crate::game::input::{InputEvent, InputScript, InputState};
use crate::game::jump::JumpState;
use crate::game::seeder::{seed_board, TileSampler};
use crate::game::selection::Tally;
use crate::game::setup::{bind_scene, SetupError};
use crate::scene::camera::normalized_motion;
use crate::scene::{OrbitCamera, SceneGraph, SoundSystem};

/// A running hunt.
pub struct GameSession<S: SceneGraph, A: SoundSystem> {
    pub(crate) config: GameConfig,
    pub(crate) scene: S,
    pub(crate) sound: A,

    pub(crate) board: Board,
    pub(crate) registry: Registry,
    pub(crate) jump: JumpState,
    pub(crate) camera: OrbitCamera,
    pub(crate) input: InputState,

    /// Cursor tile a commit lands on
    pub(crate) active_tile: TileCoord,
    /// Player's visual position, which trails its tile while airborne
    pub(crate) player_position: Vec3,
    pub(crate) tally: Tally,

    /// Updates run so far
    pub(crate) update_index: u32,
    /// Seed the board was placed with
    pub(crate) rng_seed: u64,

    pub(crate) pending_events: Vec<GameEvent>,
    pub(crate) recording: Option<InputScript>,
}

impl<S: SceneGraph, A: SoundSystem> GameSession<S, A> {
    /// Start a session, seeding the board from `config.rng_seed` or from
    /// entropy when no seed is set.
    pub fn new(config: GameConfig, scene: S, sound: A) -> Result<Self, SetupError> {
        let (mut rng, seed) = match config.rng_seed {
            Some(seed) => (DeterministicRng::new(seed), seed),
            None => DeterministicRng::from_entropy(),
        };
        Self::with_sampler(config, scene, sound, &mut rng, seed)
    }

    /// Start a session, placing entities with `sampler`.
    ///
    /// `seed` is only recorded for hashing and logs.
    pub fn with_sampler<T: TileSampler + ?Sized>(
        config: GameConfig,
        mut scene: S,
        sound: A,
        sampler: &mut T,
        seed: u64,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let bindings = bind_scene(&scene, &config)?;
        let mut board = bindings.board;

        info!(
            "Starting hunt: {} zombies, {} humans, seed {}",
            config.zombie_count, config.human_count, seed
        );

        let hunted = seed_board(&mut board, &bindings.roster, 1, sampler);
        let player = Entity::new(
            EntityId(0),
            EntityKind::Player,
            config.player_name.clone(),
            bindings.player,
            TileCoord::CENTER,
        );
        let registry = Registry::new(player, hunted);

        let player_position = board.tile(TileCoord::CENTER).anchor();
        scene.set_position(bindings.player, player_position);
        scene.set_rotation(bindings.player, registry.player().facing.rotation());

        let active_tile = TileCoord::CENTER;
        let cursor = board.tile(active_tile);
        scene.set_position(cursor.transform(), cursor.anchor() - Vec3::Z * config.cursor_depth);

        let camera = OrbitCamera::new(player_position, config.camera_radius, config.camera_elevation);

        let mut session = Self {
            config,
            scene,
            sound,
            board,
            registry,
            jump: JumpState::new(),
            camera,
            input: InputState::new(),
            active_tile,
            player_position,
            tally: Tally::default(),
            update_index: 0,
            rng_seed: seed,
            pending_events: Vec::new(),
            recording: None,
        };
        session.sync_camera();
        Ok(session)
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Feed one decoded input event.
    ///
    /// Returns whether the event was consumed. Everything is ignored once
    /// the game is over.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if self.tally.game_over {
            return false;
        }

        let handled = match *event {
            InputEvent::Press(id) => {
                self.input.button_mut(id).press();
                true
            }
            InputEvent::Release(id) => {
                self.input.button_mut(id).release();
                true
            }
            InputEvent::OrbitStart => {
                self.camera.begin_orbit();
                true
            }
            InputEvent::CameraMotion {
                xrel,
                yrel,
                window_width,
                window_height,
                dragging,
            } => {
                if dragging {
                    self.camera
                        .orbit(normalized_motion(xrel, yrel, window_width, window_height));
                }
                dragging
            }
            InputEvent::Zoom { wheel } => {
                self.camera.dolly(wheel);
                true
            }
        };

        if handled {
            if let Some(script) = self.recording.as_mut() {
                script.push(self.update_index, *event);
            }
        }
        handled
    }

    /// Start recording consumed input events.
    pub fn record_inputs(&mut self) {
        self.recording.get_or_insert_with(InputScript::new);
    }

    /// Stop recording and return what was captured.
    pub fn take_recording(&mut self) -> Option<InputScript> {
        self.recording.take()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Signed score.
    pub fn score(&self) -> i32 {
        self.tally.score
    }

    /// Zombies revealed so far.
    pub fn zombies_found(&self) -> usize {
        self.tally.zombies_found
    }

    /// Humans revealed so far.
    pub fn humans_found(&self) -> usize {
        self.tally.humans_found
    }

    /// Score and progress together.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// True once every zombie is found.
    pub fn is_game_over(&self) -> bool {
        self.tally.game_over
    }

    /// Tile a commit would land on.
    pub fn active_tile(&self) -> TileCoord {
        self.active_tile
    }

    /// Tile the player is bound to. Changes at takeoff, not landing.
    pub fn player_tile(&self) -> TileCoord {
        self.registry.player().tile
    }

    /// Player's current visual position.
    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    /// Updates run so far.
    pub fn update_index(&self) -> u32 {
        self.update_index
    }

    /// Seed the board was placed with.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The entity registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The jump interpolator.
    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    /// The orbit camera.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// The orbit camera, mutably; front ends may drive it directly.
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// The scene collaborator.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The sound collaborator.
    pub fn sound(&self) -> &A {
        &self.sound
    }

    // =========================================================================
    // HASHING AND LIFECYCLE
    // =========================================================================

    /// Hash of the logical session state.
    ///
    /// Visual positions and camera state are left out; only what decides
    /// where entities are and what the score is goes in.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.update_index, self.rng_seed, |hasher| {
            hasher.update_i32(self.tally.score);
            hasher.update_u32(self.tally.zombies_found as u32);
            hasher.update_u32(self.tally.humans_found as u32);
            hasher.update_bool(self.tally.game_over);

            hasher.update_coord(self.registry.player().tile);
            hasher.update_coord(self.active_tile);
            hasher.update_bool(self.jump.is_jumping());

            for tile in self.board.tiles() {
                let kind = match tile.occupant().map(|o| o.kind) {
                    None => 0,
                    Some(HuntedKind::Zombie) => 1,
                    Some(HuntedKind::Human) => 2,
                };
                hasher.update_u8(kind);
                hasher.update_bool(tile.is_resolved());
            }

            for entity in self.registry.hunted() {
                hasher.update_bool(entity.found);
                hasher.update_u8(entity.facing as u8);
            }
        })
    }

    /// Mute every ambient loop and hand the collaborators back.
    pub fn shutdown(mut self) -> (S, A) {
        for entity in self.registry.iter() {
            if let Some(handle) = entity.sound {
                self.sound.set_volume(handle, 0.0);
            }
        }
        info!(
            "Hunt closed after {} updates: score {}, zombies {}/{}, humans {}",
            self.update_index,
            self.tally.score,
            self.tally.zombies_found,
            self.registry.roster_len(HuntedKind::Zombie),
            self.tally.humans_found
        );
        (self.scene, self.sound)
    }

    /// Retarget the camera on the player and push the frame out.
    pub(crate) fn sync_camera(&mut self) {
        self.camera.target = self.player_position;
        self.scene.set_camera_frame(self.camera.local_to_parent());
        self.sound.set_listener(self.camera.position(), self.camera.right());
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        debug!("{:?}", event.data);
        self.pending_events.push(event);
    }

    pub(crate) fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
