//! Placed occupants and the bounded pools that hold them

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::item::ItemType;
use crate::config::PoolConfig;
use crate::error::{PoolExhausted, PoolKind};
use crate::map::WorldPosition;

/// Adversaries, bosses included.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnemyKind {
    Drone,
    Dasher,
    SnakeHead,
    Turret,
    Scarecrow,
    Golem,
    Compactor,
    Wanderer,
    Gatekeeper,
    Twin,
    InfestedCore,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        matches!(
            self,
            EnemyKind::Wanderer | EnemyKind::Gatekeeper | EnemyKind::Twin | EnemyKind::InfestedCore
        )
    }
}

/// Static set pieces
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SceneryKind {
    Lander,
    LanderSignpost,
    MemorialSignpost,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: WorldPosition,
}

/// A loose item lying on the floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub item: ItemType,
    pub position: WorldPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemChest {
    pub item: ItemType,
    pub position: WorldPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub kind: SceneryKind,
    pub position: WorldPosition,
}

/// Everything placed on a level.
///
/// Enemies have a pool of their own. Pickups, chests and scenery share the
/// details pool, so a full pool can make room for a pickup by dropping
/// scenery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub enemies: Vec<Enemy>,
    pub items: Vec<Pickup>,
    pub chests: Vec<ItemChest>,
    pub scenery: Vec<Scenery>,
    enemy_capacity: usize,
    detail_capacity: usize,
}

impl Population {
    pub fn new(pools: &PoolConfig) -> Self {
        Self {
            enemies: Vec::new(),
            items: Vec::new(),
            chests: Vec::new(),
            scenery: Vec::new(),
            enemy_capacity: pools.enemies,
            detail_capacity: pools.details,
        }
    }

    /// Occupants charged to the details pool
    pub fn details_len(&self) -> usize {
        self.items.len() + self.chests.len() + self.scenery.len()
    }

    fn check(&self, pool: PoolKind) -> Result<(), PoolExhausted> {
        let (len, capacity) = match pool {
            PoolKind::Enemies => (self.enemies.len(), self.enemy_capacity),
            PoolKind::Details => (self.details_len(), self.detail_capacity),
        };
        if len < capacity {
            Ok(())
        } else {
            Err(PoolExhausted { pool, capacity })
        }
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: WorldPosition) -> Result<(), PoolExhausted> {
        self.check(PoolKind::Enemies)?;
        self.enemies.push(Enemy { kind, position });
        Ok(())
    }

    pub fn spawn_item(&mut self, item: ItemType, position: WorldPosition) -> Result<(), PoolExhausted> {
        self.check(PoolKind::Details)?;
        self.items.push(Pickup { item, position });
        Ok(())
    }

    pub fn spawn_chest(&mut self, item: ItemType, position: WorldPosition) -> Result<(), PoolExhausted> {
        self.check(PoolKind::Details)?;
        self.chests.push(ItemChest { item, position });
        Ok(())
    }

    pub fn spawn_scenery(
        &mut self,
        kind: SceneryKind,
        position: WorldPosition,
    ) -> Result<(), PoolExhausted> {
        self.check(PoolKind::Details)?;
        self.scenery.push(Scenery { kind, position });
        Ok(())
    }

    /// Drop the most recently placed scenery to free a details slot.
    pub fn evict_scenery(&mut self) -> Option<Scenery> {
        self.scenery.pop()
    }

    pub fn count_items(&self, item: ItemType) -> usize {
        self.items.iter().filter(|p| p.item == item).count()
    }

    pub fn count_enemies(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|e| e.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.items.clear();
        self.chests.clear();
        self.scenery.clear();
    }
}
