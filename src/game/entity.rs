//! Entity Registry
//!
//! Arena of the player and the two hunted rosters. Tiles and rosters
//! refer to entities by `EntityId`; the registry is the only owner.

use serde::Serialize;

use crate::core::coord::TileCoord;
use crate::core::direction::Facing;
use crate::scene::{SoundHandle, TransformHandle};

/// Index into the registry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u16);

/// Kinds the player hunts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HuntedKind {
    /// Committing on a zombie scores
    Zombie,
    /// Committing on a human costs
    Human,
}

/// What an entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    /// Moves like the others, never hunted
    Player,
    /// Hidden on the board
    Hunted(HuntedKind),
}

impl EntityKind {
    /// Hunted kind, `None` for the player.
    pub fn hunted(self) -> Option<HuntedKind> {
        match self {
            EntityKind::Player => None,
            EntityKind::Hunted(kind) => Some(kind),
        }
    }
}

/// A player, zombie or human.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Registry id
    pub id: EntityId,
    /// Kind tag
    pub kind: EntityKind,
    /// Scene name it was bound from
    pub name: String,
    /// Scene transform
    pub transform: TransformHandle,
    /// Tile the entity is bound to
    pub tile: TileCoord,
    /// Cardinal facing
    pub facing: Facing,
    /// Ambient loop, started on first use
    pub sound: Option<SoundHandle>,
    /// Revealed by a commit
    pub found: bool,
}

impl Entity {
    /// Create an entity bound to a tile.
    pub fn new(id: EntityId, kind: EntityKind, name: String, transform: TransformHandle, tile: TileCoord) -> Self {
        Self {
            id,
            kind,
            name,
            transform,
            tile,
            facing: Facing::default(),
            sound: None,
            found: false,
        }
    }
}

/// The entity arena plus roster order.
#[derive(Clone, Debug)]
pub struct Registry {
    entities: Vec<Entity>,
    player: EntityId,
    zombies: Vec<EntityId>,
    humans: Vec<EntityId>,
}

impl Registry {
    /// Build from the player and the hunted entities.
    ///
    /// Ids are expected to match arena position (player first), which is
    /// how the seeder hands them out.
    pub fn new(player: Entity, hunted: Vec<Entity>) -> Self {
        let player_id = player.id;
        let mut entities = Vec::with_capacity(hunted.len() + 1);
        entities.push(player);
        entities.extend(hunted);
        debug_assert!(entities.iter().enumerate().all(|(i, e)| e.id.0 as usize == i));

        let ids_of = |wanted: HuntedKind| -> Vec<EntityId> {
            entities
                .iter()
                .filter(|e| e.kind == EntityKind::Hunted(wanted))
                .map(|e| e.id)
                .collect()
        };
        let zombies = ids_of(HuntedKind::Zombie);
        let humans = ids_of(HuntedKind::Human);

        Self {
            entities,
            player: player_id,
            zombies,
            humans,
        }
    }

    /// Look up an entity.
    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    /// Look up an entity mutably.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0 as usize)
    }

    /// The player.
    pub fn player(&self) -> &Entity {
        &self.entities[self.player.0 as usize]
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.entities[self.player.0 as usize]
    }

    /// Zombie roster.
    pub fn zombies(&self) -> &[EntityId] {
        &self.zombies
    }

    /// Human roster.
    pub fn humans(&self) -> &[EntityId] {
        &self.humans
    }

    /// Roster size for a kind.
    pub fn roster_len(&self, kind: HuntedKind) -> usize {
        match kind {
            HuntedKind::Zombie => self.zombies.len(),
            HuntedKind::Human => self.humans.len(),
        }
    }

    /// Every hunted entity.
    pub fn hunted(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.kind != EntityKind::Player)
    }

    /// Ids of hunted entities already revealed.
    pub fn found_ids(&self) -> Vec<EntityId> {
        self.hunted().filter(|e| e.found).map(|e| e.id).collect()
    }

    /// Every entity, player first.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}
