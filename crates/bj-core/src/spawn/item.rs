//! Item types, the player's inventory, and loot tables
//!
//! Items carry three static properties: the levels on which they may show
//! up in a chest, a rarity weight, and whether the player keeps them for
//! the whole run. Chest contents are drawn from a fixed-size table in which
//! each eligible item is repeated in proportion to its rarity weight.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator};
use tracing::warn;

use bj_rng::LevelRng;

use crate::dungeon::{LevelRange, boss_index};
use crate::{BOSS_0_LEVEL, BOSS_2_LEVEL, CHEST_TABLE_SIZE};

/// Every item the generator can place or stock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    EnumString,
    FromRepr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum ItemType {
    Null = 0,
    Heart,
    Coin,
    #[serde(rename = "worker_notebook_1")]
    #[strum(serialize = "worker_notebook_1")]
    WorkerNotebook1,
    Blaster,
    Accelerator,
    Lethargy,
    #[serde(rename = "old_poster_1")]
    #[strum(serialize = "old_poster_1")]
    OldPoster1,
    MapSystem,
    #[serde(rename = "explosive_rounds_2")]
    #[strum(serialize = "explosive_rounds_2")]
    ExplosiveRounds2,
    SeedPacket,
    #[serde(rename = "engineer_notebook_2")]
    #[strum(serialize = "engineer_notebook_2")]
    EngineerNotebook2,
    SignalJammer,
    NavigationPamphlet,
    Orange,
    OrangeSeeds,
    #[serde(rename = "long_jump_z2")]
    #[strum(serialize = "long_jump_z2")]
    LongJumpZ2,
    #[serde(rename = "long_jump_z3")]
    #[strum(serialize = "long_jump_z3")]
    LongJumpZ3,
    #[serde(rename = "long_jump_z4")]
    #[strum(serialize = "long_jump_z4")]
    LongJumpZ4,
    PostalAdvert,
    #[serde(rename = "engineer_notebook_1")]
    #[strum(serialize = "engineer_notebook_1")]
    EngineerNotebook1,
    #[serde(rename = "worker_notebook_2")]
    #[strum(serialize = "worker_notebook_2")]
    WorkerNotebook2,
    LongJumpHome,
}

impl ItemType {
    /// First code that is a real inventory item rather than a pickup.
    pub const INVENTORY_START: u8 = ItemType::WorkerNotebook1 as u8;

    /// Items the player keeps for the rest of the run.
    pub fn is_persistent(self) -> bool {
        matches!(
            self,
            ItemType::Blaster
                | ItemType::WorkerNotebook1
                | ItemType::WorkerNotebook2
                | ItemType::OldPoster1
                | ItemType::MapSystem
                | ItemType::SeedPacket
                | ItemType::EngineerNotebook1
                | ItemType::EngineerNotebook2
                | ItemType::NavigationPamphlet
                | ItemType::OrangeSeeds
                | ItemType::PostalAdvert
        )
    }

    pub fn is_long_jump(self) -> bool {
        matches!(
            self,
            ItemType::LongJumpZ2
                | ItemType::LongJumpZ3
                | ItemType::LongJumpZ4
                | ItemType::LongJumpHome
        )
    }

    /// Levels on which the item may appear in a chest.
    pub fn level_range(self) -> LevelRange {
        match self {
            ItemType::OldPoster1 | ItemType::WorkerNotebook1 | ItemType::EngineerNotebook1 => {
                LevelRange::below(BOSS_0_LEVEL)
            }
            ItemType::WorkerNotebook2 | ItemType::EngineerNotebook2 | ItemType::SignalJammer => {
                LevelRange::starting_at(BOSS_0_LEVEL)
            }
            ItemType::SeedPacket => LevelRange::new(0, BOSS_2_LEVEL),
            _ => LevelRange::ALL,
        }
    }

    /// Relative chest weight. Zero never appears in a chest.
    pub fn rarity(self) -> u32 {
        match self {
            ItemType::Heart
            | ItemType::Coin
            | ItemType::Blaster
            | ItemType::OrangeSeeds
            | ItemType::LongJumpZ2
            | ItemType::LongJumpZ3
            | ItemType::LongJumpZ4
            | ItemType::LongJumpHome
            | ItemType::PostalAdvert => 0,
            ItemType::Null => 1,
            ItemType::Orange
            | ItemType::Lethargy
            | ItemType::SeedPacket
            | ItemType::NavigationPamphlet => 2,
            ItemType::WorkerNotebook1
            | ItemType::WorkerNotebook2
            | ItemType::EngineerNotebook1
            | ItemType::EngineerNotebook2
            | ItemType::OldPoster1
            | ItemType::SignalJammer => 3,
            ItemType::Accelerator | ItemType::ExplosiveRounds2 => 4,
            ItemType::MapSystem => 7,
        }
    }
}

/// The player's item counts, carried between levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: HashMap<ItemType, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: ItemType) {
        *self.counts.entry(item).or_insert(0) += 1;
    }

    pub fn count(&self, item: ItemType) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    pub fn has(&self, item: ItemType) -> bool {
        self.count(item) > 0
    }
}

impl FromIterator<ItemType> for Inventory {
    fn from_iter<I: IntoIterator<Item = ItemType>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for item in iter {
            inventory.add(item);
        }
        inventory
    }
}

/// Whether `item` may be put in a chest on `level` for this player.
pub fn chest_eligible(item: ItemType, level: i32, inventory: &Inventory, multiplayer: bool) -> bool {
    if !item.level_range().contains(level) {
        return false;
    }
    if item.is_persistent() && inventory.has(item) {
        return false;
    }
    match item {
        ItemType::Lethargy => !inventory.has(item),
        ItemType::SignalJammer => !multiplayer && inventory.count(item) <= 2,
        _ => true,
    }
}

/// Build the rarity-weighted chest table for a level into `table`.
///
/// Each eligible item takes `ceil(CHEST_TABLE_SIZE * rarity / total)`
/// entries; the table is truncated at `CHEST_TABLE_SIZE`. Empty when no
/// eligible item has any weight.
pub fn chest_table(
    level: i32,
    inventory: &Inventory,
    multiplayer: bool,
    mut table: Vec<ItemType>,
) -> Vec<ItemType> {
    table.clear();
    let eligible = || {
        ItemType::iter().filter(move |&item| chest_eligible(item, level, inventory, multiplayer))
    };
    let total: u32 = eligible().map(|item| item.rarity()).sum();
    if total == 0 {
        return table;
    }

    for item in eligible() {
        let share = CHEST_TABLE_SIZE as u32 * item.rarity();
        let copies = share.div_ceil(total) as usize;
        let room = CHEST_TABLE_SIZE - table.len();
        table.extend(std::iter::repeat_n(item, copies.min(room)));
    }
    table
}

/// Draw one chest item, or `None` when the table is empty. `storage` backs
/// the table.
pub fn draw_chest_item(
    level: i32,
    inventory: &Inventory,
    multiplayer: bool,
    storage: Vec<ItemType>,
    rng: &mut impl LevelRng,
) -> Option<ItemType> {
    let table = chest_table(level, inventory, multiplayer, storage);
    if table.is_empty() {
        warn!(level, "no chest item is eligible, skipping the chest");
        return None;
    }
    Some(table[rng.choice(table.len() as u32) as usize])
}

/// Roll the enclave host's wares.
///
/// After a boss the matching long jump leads the list. Then random
/// non-persistent inventory items up to a rolled count, one orange, maybe
/// a second, all shuffled.
pub fn enclave_stock(level: i32, rng: &mut impl LevelRng) -> Vec<ItemType> {
    let mut stock = Vec::new();
    match boss_index(level - 1) {
        Some(0) => stock.push(ItemType::LongJumpZ2),
        Some(1) => stock.push(ItemType::LongJumpZ3),
        Some(2) => stock.push(ItemType::LongJumpZ4),
        _ => {}
    }

    let target = rng.choice(7) as usize;
    while stock.len() < target {
        let drawn = rng.choice(ItemType::COUNT as u32) as u8;
        let Some(item) = ItemType::from_repr(drawn) else {
            continue;
        };
        if drawn < ItemType::INVENTORY_START || item.is_persistent() || item.is_long_jump() {
            continue;
        }
        stock.push(item);
    }

    stock.push(ItemType::Orange);
    if rng.choice(2) != 0 {
        stock.push(ItemType::Orange);
    }
    rng.shuffle(&mut stock);
    stock
}

#[cfg(test)]
mod tests {
    use super::*;
    use bj_rng::{LinearGenerator, ScriptedRng};

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ItemType::COUNT, 23);
        assert_eq!(ItemType::Heart as u8, 1);
        assert_eq!(ItemType::Orange as u8, 14);
        assert_eq!(ItemType::LongJumpHome as u8, 22);
        assert_eq!(ItemType::from_repr(9), Some(ItemType::ExplosiveRounds2));
        assert_eq!(ItemType::WorkerNotebook1.to_string(), "worker_notebook_1");
        assert_eq!(
            serde_json::to_string(&ItemType::LongJumpZ3).unwrap(),
            "\"long_jump_z3\""
        );
    }

    #[test]
    fn test_table_respects_level_ranges() {
        let inventory = Inventory::new();
        let early = chest_table(3, &inventory, false, Vec::new());
        assert!(early.contains(&ItemType::OldPoster1));
        assert!(!early.contains(&ItemType::SignalJammer));
        let late = chest_table(30, &inventory, false, Vec::new());
        assert!(!late.contains(&ItemType::OldPoster1));
        assert!(!late.contains(&ItemType::SeedPacket));
        assert!(late.contains(&ItemType::SignalJammer));
    }

    #[test]
    fn test_table_weights_and_size() {
        let inventory = Inventory::new();
        for level in [1, 12, 25, 33] {
            let table = chest_table(level, &inventory, false, Vec::new());
            assert!(table.len() <= CHEST_TABLE_SIZE);
            assert!(!table.contains(&ItemType::Heart));
            assert!(!table.contains(&ItemType::Blaster));
            let maps = table.iter().filter(|&&i| i == ItemType::MapSystem).count();
            let oranges = table.iter().filter(|&&i| i == ItemType::Orange).count();
            assert!(maps > oranges, "level {level}");
        }
    }

    #[test]
    fn test_inventory_exclusions() {
        let mut inventory: Inventory = [ItemType::MapSystem, ItemType::Lethargy].into_iter().collect();
        let table = chest_table(12, &inventory, false, Vec::new());
        assert!(!table.contains(&ItemType::MapSystem));
        assert!(!table.contains(&ItemType::Lethargy));
        assert!(table.contains(&ItemType::SignalJammer));

        for _ in 0..3 {
            inventory.add(ItemType::SignalJammer);
        }
        assert!(!chest_table(12, &inventory, false, Vec::new()).contains(&ItemType::SignalJammer));
        assert!(!chest_table(12, &Inventory::new(), true, Vec::new()).contains(&ItemType::SignalJammer));
        // repeatable items stay in
        inventory.add(ItemType::Accelerator);
        assert!(chest_eligible(ItemType::Accelerator, 12, &inventory, false));
    }

    #[test]
    fn test_draw_takes_one_value() {
        let mut rng = ScriptedRng::new([0]);
        let item = draw_chest_item(12, &Inventory::new(), false, Vec::new(), &mut rng);
        assert_eq!(item, chest_table(12, &Inventory::new(), false, Vec::new()).first().copied());
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn test_enclave_stock_after_boss() {
        let mut rng = LinearGenerator::new(4);
        let stock = enclave_stock(20, &mut rng);
        assert!(stock.contains(&ItemType::LongJumpZ3));
        assert!(stock.contains(&ItemType::Orange));
        for item in &stock {
            assert!(!item.is_persistent());
            assert!(*item as u8 >= ItemType::INVENTORY_START);
        }
    }

    #[test]
    fn test_enclave_stock_skips_rejected_draws() {
        // target 2; Heart and Blaster rejected, then Lethargy and Orange
        let mut rng = ScriptedRng::new([2, 1, 4, 6, 14, 0]);
        let mut stock = enclave_stock(12, &mut rng);
        stock.sort();
        assert_eq!(stock, vec![ItemType::Lethargy, ItemType::Orange, ItemType::Orange]);
    }
}
