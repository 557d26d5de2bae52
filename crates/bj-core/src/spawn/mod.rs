//! Spawn placement
//!
//! Free slot bookkeeping, items and loot tables, the enemy roster, the
//! bounded occupant pools, and the allocator that consumes slots in
//! priority order.

mod allocator;
mod enemies;
mod item;
mod occupant;
mod slots;

pub use allocator::{Placement, SpawnAllocator, SpawnOutcome};
pub use enemies::{
    EnemyMenu, MenuDraw, SPAWN_TABLE, SpawnWeightEntry, VetoBand, enemy_density,
    target_enemy_count,
};
pub use item::{
    Inventory, ItemType, chest_eligible, chest_table, draw_chest_item, enclave_stock,
};
pub use occupant::{Enemy, EnemyKind, ItemChest, Pickup, Population, Scenery, SceneryKind};
pub use slots::FreeSlotSet;
