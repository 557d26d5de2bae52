//! Generation configuration
//!
//! Every tuning constant the generator reads lives here. Defaults reproduce
//! the shipped game; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dungeon::AutomatonRule;
use crate::error::ConfigError;
use crate::map::{TileCode, TileLegend};
use crate::{
    COMPACTOR_TRIES, ENCLAVE_ATTEMPTS, ENCLAVE_HALO, ENEMY_MENU_SIZE, MAP_HEIGHT, MAP_WIDTH,
    MAX_MAP_DIMENSION, MIN_VIABLE_SLOTS,
};

/// Player-selected difficulty
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Survival,
}

/// Enclave search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnclaveConfig {
    /// Centre samples before giving up
    pub attempts: u32,
    /// Radius (world pixels) kept clear of other spawns around the host
    pub halo: f32,
}

impl Default for EnclaveConfig {
    fn default() -> Self {
        Self {
            attempts: ENCLAVE_ATTEMPTS,
            halo: ENCLAVE_HALO,
        }
    }
}

/// Enemy population parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Enemies per free slot at level 0
    pub min_density: f32,
    /// Density ceiling
    pub max_density: f32,
    /// Density added per level
    pub density_step: f32,
    pub max_enemies: u32,
    /// Entries in the weighted spawn menu
    pub menu_size: usize,
    /// Upper bound on menu draws, so a menu with nothing spawnable still ends
    pub max_draws: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            min_density: 0.070,
            max_density: 0.119,
            density_step: 0.004,
            max_enemies: 6,
            menu_size: ENEMY_MENU_SIZE,
            max_draws: 10_000,
        }
    }
}

/// Stationary hazard parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    /// Attempts at finding a nook before falling back to one random probe
    pub tries: u32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            tries: COMPACTOR_TRIES,
        }
    }
}

/// Decoration odds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Overlay tiles start filled with probability 1/n
    pub overlay_fill_one_in: u32,
    /// Plates and sand weather with probability 1/n
    pub weathering_one_in: u32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            overlay_fill_one_in: 3,
            weathering_one_in: 4,
        }
    }
}

/// Occupant pool capacities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub enemies: usize,
    /// Items, chests and scenery share one pool
    pub details: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            enemies: 32,
            details: 64,
        }
    }
}

/// Most loose hearts a level may carry, per difficulty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartCaps {
    pub easy: usize,
    pub normal: usize,
    pub hard: usize,
    pub survival: usize,
}

impl Default for HeartCaps {
    fn default() -> Self {
        Self {
            easy: 3,
            normal: 2,
            hard: 0,
            survival: 0,
        }
    }
}

impl HeartCaps {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
            Difficulty::Survival => self.survival,
        }
    }
}

/// Level generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub width: i32,
    pub height: i32,
    /// Smoothing applied to seeded noise
    pub automaton: AutomatonRule,
    /// Smoothing applied to the decoration overlay
    pub overlay_automaton: AutomatonRule,
    /// Chance (percent) that a procedural level is a small map
    pub small_map_percent: u32,
    pub enclave: EnclaveConfig,
    /// Fewest free slots a map may have before it is regenerated
    pub min_viable_slots: usize,
    /// `None` regenerates until a viable map appears
    pub max_regenerations: Option<u32>,
    pub enemies: EnemyConfig,
    pub hazards: HazardConfig,
    pub decoration: DecorationConfig,
    pub pools: PoolConfig,
    pub heart_caps: HeartCaps,
    pub legend: TileLegend,
    /// Bytes of scratch storage one generation may draw
    pub scratch_budget: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            automaton: AutomatonRule::default(),
            overlay_automaton: AutomatonRule::default(),
            small_map_percent: 20,
            enclave: EnclaveConfig::default(),
            min_viable_slots: MIN_VIABLE_SLOTS,
            max_regenerations: None,
            enemies: EnemyConfig::default(),
            hazards: HazardConfig::default(),
            decoration: DecorationConfig::default(),
            pools: PoolConfig::default(),
            heart_caps: HeartCaps::default(),
            legend: TileLegend::default(),
            scratch_budget: 32 * 1024,
        }
    }
}

impl GenConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GenConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The enclave needs a 5x5 clearing strictly inside a 3-tile band.
        if self.width < 7 || self.height < 7 {
            return Err(ConfigError::invalid(
                "width/height",
                format!("map must be at least 7x7, got {}x{}", self.width, self.height),
            ));
        }
        if self.width > MAX_MAP_DIMENSION || self.height > MAX_MAP_DIMENSION {
            return Err(ConfigError::invalid(
                "width/height",
                format!(
                    "map must be at most {MAX_MAP_DIMENSION}x{MAX_MAP_DIMENSION}, got {}x{}",
                    self.width, self.height
                ),
            ));
        }
        for (field, rule) in [
            ("automaton", &self.automaton),
            ("overlay_automaton", &self.overlay_automaton),
        ] {
            if rule.fill_threshold > 8 || rule.erode_threshold > 8 {
                return Err(ConfigError::invalid(field, "thresholds must be at most 8"));
            }
        }
        if self.small_map_percent > 100 {
            return Err(ConfigError::invalid(
                "small_map_percent",
                format!("{} is not a percentage", self.small_map_percent),
            ));
        }
        if self.min_viable_slots < 2 {
            return Err(ConfigError::invalid(
                "min_viable_slots",
                "need room for at least the player and the exit",
            ));
        }
        let e = &self.enemies;
        if !(e.min_density >= 0.0 && e.min_density <= e.max_density) {
            return Err(ConfigError::invalid(
                "enemies",
                format!("density range {}..{} is empty", e.min_density, e.max_density),
            ));
        }
        if e.density_step < 0.0 {
            return Err(ConfigError::invalid("enemies.density_step", "must not be negative"));
        }
        if e.menu_size == 0 {
            return Err(ConfigError::invalid("enemies.menu_size", "must not be zero"));
        }
        if self.decoration.overlay_fill_one_in == 0 || self.decoration.weathering_one_in == 0 {
            return Err(ConfigError::invalid("decoration", "odds must not be zero"));
        }
        if !self.legend.walls.contains(&TileCode::NONE) {
            return Err(ConfigError::invalid(
                "legend.walls",
                "the empty tile must be listed as a wall",
            ));
        }
        if self.scratch_budget == 0 {
            return Err(ConfigError::invalid("scratch_budget", "must not be zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = GenConfig::default();
        config.max_regenerations = Some(12);
        config.enemies.max_enemies = 4;
        let json = config.to_json_string().unwrap();
        let parsed = GenConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let parsed = GenConfig::from_json_str(r#"{ "small_map_percent": 0 }"#).unwrap();
        assert_eq!(parsed.small_map_percent, 0);
        assert_eq!(parsed.width, MAP_WIDTH);
        assert_eq!(parsed.automaton, AutomatonRule::default());
        assert_eq!(parsed.heart_caps.normal, 2);
    }

    #[test]
    fn test_rejects_tiny_map() {
        let err = GenConfig::from_json_str(r#"{ "width": 4 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "width/height", .. }));
    }

    #[test]
    fn test_rejects_oversized_map() {
        let err = GenConfig::from_json_str(r#"{ "width": 100000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "width/height", .. }));
        let at_limit = GenConfig {
            width: MAX_MAP_DIMENSION,
            height: MAX_MAP_DIMENSION,
            ..GenConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_rejects_legend_without_empty_wall() {
        let json = r#"{ "legend": { "walls": [3, 8], "edges": [1] } }"#;
        assert!(matches!(
            GenConfig::from_json_str(json),
            Err(ConfigError::Invalid { field: "legend.walls", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_density() {
        let json = r#"{ "enemies": { "min_density": 0.5, "max_density": 0.1 } }"#;
        assert!(matches!(
            GenConfig::from_json_str(json),
            Err(ConfigError::Invalid { field: "enemies", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            GenConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GenConfig::load_from_file(Path::new("/nonexistent/bj-gen.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_heart_caps() {
        let caps = HeartCaps::default();
        assert_eq!(caps.for_difficulty(Difficulty::Easy), 3);
        assert_eq!(caps.for_difficulty(Difficulty::Normal), 2);
        assert_eq!(caps.for_difficulty(Difficulty::Hard), 0);
        assert_eq!(caps.for_difficulty(Difficulty::Survival), 0);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Survival".parse::<Difficulty>().unwrap(), Difficulty::Survival);
        assert!(Difficulty::Easy < Difficulty::Hard);
    }
}
