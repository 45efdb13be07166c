//! # Configuration Management Module
//!
//! All tunable numbers in the engine live here rather than as inline
//! threshold checks: enhancement probability/cost tiers, daily caps, reward
//! tables, battle constants, and dungeon scaling. The file format is TOML,
//! every section has a complete `Default`, and values are validated on load.
//!
//! ```toml
//! [storage]
//! data_dir = "data"
//!
//! [daily]
//! utc_offset_hours = 0
//! exploration_cap = 3
//! battle_cap = 10
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub daily: DailyConfig,
    #[serde(default)]
    pub enhance: EnhanceConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub battle: BattleConfig,
    #[serde(default)]
    pub dungeon: DungeonConfig,
}

/// Data persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the single `game.json` save record.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: "data".to_string(),
        }
    }
}

/// Daily-cycle settings: the reference time zone and per-day action caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    /// Fixed reference zone for calendar-day boundaries, as a UTC offset.
    pub utc_offset_hours: i32,
    /// Field explorations allowed per day.
    pub exploration_cap: u32,
    /// Battles allowed per day (win or lose).
    pub battle_cap: u32,
}

impl Default for DailyConfig {
    fn default() -> Self {
        DailyConfig {
            utc_offset_hours: 0,
            exploration_cap: 3,
            battle_cap: 10,
        }
    }
}

/// One enhancement tier: applies to current levels strictly below `below`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceTier {
    pub below: u8,
    pub success: f64,
    pub cost: i64,
    pub destroy: f64,
}

/// Weapon and skill enhancement tables.
///
/// The tier list is consulted in order; the first tier whose `below` exceeds
/// the current level applies. At or past the last tier the success chance is
/// zero (the level cap is terminal).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub level_cap: u8,
    pub tiers: Vec<EnhanceTier>,
    /// Current levels that require one catalyst stone before the attempt
    /// (crossing into 10 and 15 by default).
    pub catalyst_levels: Vec<u8>,
    pub skill_base_chance: f64,
    pub skill_chance_step: f64,
    pub skill_chance_floor: f64,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        EnhanceConfig {
            level_cap: 20,
            tiers: vec![
                EnhanceTier { below: 5, success: 0.9, cost: 10, destroy: 0.01 },
                EnhanceTier { below: 10, success: 0.7, cost: 20, destroy: 0.01 },
                EnhanceTier { below: 15, success: 0.5, cost: 50, destroy: 0.02 },
                EnhanceTier { below: 20, success: 0.3, cost: 100, destroy: 0.05 },
            ],
            catalyst_levels: vec![9, 14],
            skill_base_chance: 0.8,
            skill_chance_step: 0.02,
            skill_chance_floor: 0.5,
        }
    }
}

impl EnhanceConfig {
    /// Success probability for an attempt at `level`. Zero at or past cap.
    pub fn success_chance(&self, level: u8) -> f64 {
        if level >= self.level_cap {
            return 0.0;
        }
        self.tiers
            .iter()
            .find(|t| level < t.below)
            .map(|t| t.success)
            .unwrap_or(0.0)
    }

    /// Dust cost for an attempt at `level`.
    pub fn cost(&self, level: u8) -> i64 {
        self.tiers
            .iter()
            .find(|t| level < t.below)
            .map(|t| t.cost)
            .unwrap_or(0)
    }

    /// Destruction probability for an attempt at `level`.
    pub fn destroy_chance(&self, level: u8) -> f64 {
        self.tiers
            .iter()
            .find(|t| level < t.below)
            .map(|t| t.destroy)
            .unwrap_or(0.0)
    }

    pub fn needs_catalyst(&self, level: u8) -> bool {
        self.catalyst_levels.contains(&level)
    }

    /// Skill variant: decreasing with level, floored, no destruction.
    pub fn skill_chance(&self, level: u8) -> f64 {
        (self.skill_base_chance - self.skill_chance_step * level as f64)
            .max(self.skill_chance_floor)
    }
}

/// One weighted reward tier; `pct` is the percentage chance of this tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTier {
    pub pct: f64,
    pub dust: i64,
}

/// Attendance and field-exploration reward tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// Consulted in order against a single percentile draw; falls through to
    /// `attendance_default`.
    pub attendance_tiers: Vec<RewardTier>,
    pub attendance_default: i64,
    pub exploration_jackpot_pct: f64,
    pub exploration_jackpot: i64,
    pub exploration_dust_min: i64,
    pub exploration_dust_max: i64,
    pub exploration_item_pct: f64,
    pub exploration_items: Vec<String>,
    /// Bonus-drop pool for dungeon loot steps.
    pub dungeon_items: Vec<String>,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        RewardsConfig {
            attendance_tiers: vec![
                RewardTier { pct: 1.0, dust: 2000 },
                RewardTier { pct: 5.0, dust: 500 },
                RewardTier { pct: 5.0, dust: 50 },
            ],
            attendance_default: 100,
            exploration_jackpot_pct: 2.0,
            exploration_jackpot: 5000,
            exploration_dust_min: 100,
            exploration_dust_max: 1000,
            exploration_item_pct: 5.0,
            exploration_items: vec![
                "mystery box".to_string(),
                "enhance stone".to_string(),
                "healing potion".to_string(),
                "mana potion".to_string(),
                "strategy guide".to_string(),
            ],
            dungeon_items: vec![
                "enhance stone".to_string(),
                "healing potion".to_string(),
                "mana potion".to_string(),
                "mystery box".to_string(),
            ],
        }
    }
}

/// Battle resolution constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Each side's roll adds a uniform draw in `0..roll_spread`.
    pub roll_spread: u32,
    /// Combat power gained per character level (contest-only bonus).
    pub level_power_bonus: i32,
    /// Stat points granted per weapon enhancement level.
    pub enhancement_stat_bonus: i32,
    /// Victory dust = defender power / divisor + base.
    pub victory_power_divisor: i64,
    pub victory_base_dust: i64,
    /// Flat HP lost by the attacker on defeat.
    pub defeat_damage: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            roll_spread: 20,
            level_power_bonus: 5,
            enhancement_stat_bonus: 2,
            victory_power_divisor: 10,
            victory_base_dust: 50,
            defeat_damage: 5,
        }
    }
}

/// Dungeon-crawl scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub step_mana_cost: u32,
    pub encounter_base: f64,
    pub encounter_per_floor: f64,
    pub encounter_cap: f64,
    pub monster_base_power: i32,
    pub monster_power_per_floor: i32,
    pub monster_power_spread: u32,
    /// Monster-victory dust = monster power / divisor + floor bonus per floor.
    pub victory_power_divisor: i64,
    pub victory_floor_bonus: i64,
    /// Defeat damage = base + current floor.
    pub defeat_base_damage: i32,
    pub loot_base_dust: i64,
    pub loot_dust_per_floor: i64,
    pub loot_dust_spread: u32,
    pub loot_item_chance: f64,
    /// Mana restored by a mana potion (dungeon-only consumable).
    pub mana_potion_restore: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        DungeonConfig {
            step_mana_cost: 5,
            encounter_base: 0.3,
            encounter_per_floor: 0.05,
            encounter_cap: 0.8,
            monster_base_power: 50,
            monster_power_per_floor: 20,
            monster_power_spread: 30,
            victory_power_divisor: 5,
            victory_floor_bonus: 10,
            defeat_base_damage: 10,
            loot_base_dust: 50,
            loot_dust_per_floor: 20,
            loot_dust_spread: 100,
            loot_item_chance: 0.2,
            mana_potion_restore: 30,
        }
    }
}

impl Config {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("cannot read {}: {e}", path.as_ref().display()))?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default config file, refusing to clobber an existing one.
    pub fn create_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(anyhow!("{} already exists", path.display()));
        }
        let toml = toml::to_string_pretty(&Config::default())?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.daily.exploration_cap == 0 || self.daily.battle_cap == 0 {
            return Err(anyhow!("daily caps must be at least 1"));
        }
        if !(-12..=14).contains(&self.daily.utc_offset_hours) {
            return Err(anyhow!("utc_offset_hours out of range"));
        }
        if self.enhance.tiers.is_empty() {
            return Err(anyhow!("enhance.tiers must not be empty"));
        }
        let mut prev = 0u8;
        for tier in &self.enhance.tiers {
            if tier.below <= prev && prev != 0 {
                return Err(anyhow!("enhance.tiers must be sorted by `below`"));
            }
            if !(0.0..=1.0).contains(&tier.success) || !(0.0..=1.0).contains(&tier.destroy) {
                return Err(anyhow!("enhance tier probabilities must be in [0, 1]"));
            }
            if tier.cost < 0 {
                return Err(anyhow!("enhance tier cost must be non-negative"));
            }
            prev = tier.below;
        }
        if self.rewards.exploration_dust_min > self.rewards.exploration_dust_max {
            return Err(anyhow!("exploration dust range inverted"));
        }
        if self.dungeon.step_mana_cost == 0 {
            return Err(anyhow!("dungeon.step_mana_cost must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.dungeon.encounter_cap) {
            return Err(anyhow!("dungeon.encounter_cap must be in [0, 1]"));
        }
        Ok(())
    }
}
