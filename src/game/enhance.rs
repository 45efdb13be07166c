//! Weapon and skill enhancement state machines.
//!
//! Weapon enhancement walks a 0..20 track per weapon type. Success chance is
//! a decreasing step function of the current level and destruction is an
//! independent small chance that resets only the equipped type's track to
//! zero: the weapon stays equipped and the other types keep their stored
//! levels, so a destroyed weapon needs re-leveling, not re-buying. Crossing
//! into levels 10 and 15 consumes one enhance stone up front; without it
//! the attempt is refused before any dust is spent.
//!
//! The skill variant is simpler: no destruction, a floored success chance,
//! and one enhance stone consumed unconditionally per attempt.

use log::debug;

use crate::config::EnhanceConfig;
use crate::game::dice::Dice;
use crate::game::economy;
use crate::game::storage::GameStore;
use crate::game::types::{
    SkillElement, WeaponKind, WeaponRecord, ITEM_ENHANCE_STONE, ITEM_SKILL_TOME, NAME_LIMIT,
};

/// Result of equipping a weapon type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipReport {
    pub kind: WeaponKind,
    /// Enhancement level restored from this type's stored track.
    pub level: u8,
}

/// Result of one weapon enhancement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeaponEnhanceOutcome {
    /// No weapon has ever been equipped.
    NoWeapon,
    /// Already at the terminal level; no further success probability.
    AtCap { level: u8 },
    /// The threshold crossing requires a catalyst the inventory lacks.
    /// Nothing was spent.
    MissingCatalyst { held: u32 },
    /// Not enough dust for the attempt. Nothing was spent.
    InsufficientDust { need: i64, have: i64 },
    /// The attempt destroyed the weapon: this type's track reset to 0.
    Destroyed { cost: i64, catalyst_used: bool },
    /// The roll failed; the weapon is unharmed.
    Failed { level: u8, cost: i64, catalyst_used: bool },
    /// The type's track (and the mirrored equipped level) went up by one.
    Upgraded { new_level: u8, cost: i64, catalyst_used: bool },
}

/// Result of one skill enhancement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillEnhanceOutcome {
    /// No skill element has been unlocked yet.
    NoSkill,
    /// No enhance stone held; nothing was spent.
    MissingStone,
    /// Stone consumed, level up.
    Upgraded { from: u8, to: u8 },
    /// Stone consumed, level unchanged.
    Failed { level: u8 },
}

/// Result of unlocking a skill element from a skill tome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillUnlockOutcome {
    /// The element is set once and immutable thereafter.
    AlreadyUnlocked { element: SkillElement },
    MissingTome,
    Unlocked { element: SkillElement },
}

/// Result of naming a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillNameOutcome {
    /// The element must be chosen before the skill can be named.
    NoElement,
    NameTooLong { limit: usize },
    Named { name: String },
}

/// Equip a weapon type, creating the record on first equip. Switching types
/// restores that type's own stored enhancement progress.
pub fn equip_weapon(store: &mut GameStore, id: &str, kind: WeaponKind) -> EquipReport {
    let level = match store.weapon_mut(id) {
        Some(weapon) => {
            weapon.equip(kind);
            weapon.level
        }
        None => {
            store.insert_weapon(id, WeaponRecord::new(kind));
            0
        }
    };
    store.persist();
    EquipReport { kind, level }
}

/// Attempt to enhance the equipped weapon.
///
/// Order of checks: weapon present, under cap, catalyst on threshold
/// crossings, dust sufficiency. Only then are dust and catalyst consumed and
/// the destruction and success draws made. Destruction is rolled
/// independently of success and wins over it.
pub fn enhance_weapon(
    store: &mut GameStore,
    cfg: &EnhanceConfig,
    dice: &mut dyn Dice,
    id: &str,
) -> WeaponEnhanceOutcome {
    let Some(weapon) = store.weapon(id) else {
        return WeaponEnhanceOutcome::NoWeapon;
    };
    let level = weapon.level;
    if level >= cfg.level_cap {
        return WeaponEnhanceOutcome::AtCap { level };
    }

    let needs_catalyst = cfg.needs_catalyst(level);
    if needs_catalyst {
        let held = economy::item_quantity(store, id, ITEM_ENHANCE_STONE);
        if held < 1 {
            return WeaponEnhanceOutcome::MissingCatalyst { held };
        }
    }

    let cost = cfg.cost(level);
    let have = economy::balance(store, id);
    if have < cost {
        return WeaponEnhanceOutcome::InsufficientDust { need: cost, have };
    }

    economy::subtract_dust(store, id, cost);
    if needs_catalyst {
        economy::remove_item(store, id, ITEM_ENHANCE_STONE, 1);
    }

    let destroyed = dice.chance(cfg.destroy_chance(level));
    let succeeded = dice.chance(cfg.success_chance(level));

    let Some(weapon) = store.weapon_mut(id) else {
        return WeaponEnhanceOutcome::NoWeapon;
    };
    let outcome = if destroyed {
        weapon.set_track_level(0);
        debug!("weapon destroyed for {id} at +{level}");
        WeaponEnhanceOutcome::Destroyed {
            cost,
            catalyst_used: needs_catalyst,
        }
    } else if succeeded {
        let new_level = (level + 1).min(cfg.level_cap);
        weapon.set_track_level(new_level);
        WeaponEnhanceOutcome::Upgraded {
            new_level,
            cost,
            catalyst_used: needs_catalyst,
        }
    } else {
        WeaponEnhanceOutcome::Failed {
            level,
            cost,
            catalyst_used: needs_catalyst,
        }
    };
    store.persist();
    outcome
}

/// Unlock the skill element by consuming one skill tome. The element is
/// immutable once set.
pub fn unlock_skill(store: &mut GameStore, id: &str, element: SkillElement) -> SkillUnlockOutcome {
    if let Some(existing) = store.skill(id).and_then(|s| s.element) {
        return SkillUnlockOutcome::AlreadyUnlocked { element: existing };
    }
    if !economy::remove_item(store, id, ITEM_SKILL_TOME, 1) {
        return SkillUnlockOutcome::MissingTome;
    }
    store.skill_mut(id).element = Some(element);
    store.persist();
    SkillUnlockOutcome::Unlocked { element }
}

/// Name the skill after its element has been chosen.
pub fn name_skill(store: &mut GameStore, id: &str, name: &str) -> SkillNameOutcome {
    if store.skill(id).and_then(|s| s.element).is_none() {
        return SkillNameOutcome::NoElement;
    }
    let name = name.trim();
    if name.is_empty() || name.chars().count() > NAME_LIMIT {
        return SkillNameOutcome::NameTooLong { limit: NAME_LIMIT };
    }
    store.skill_mut(id).name = Some(name.to_string());
    store.persist();
    SkillNameOutcome::Named {
        name: name.to_string(),
    }
}

/// Attempt to enhance the skill. One enhance stone is consumed per attempt,
/// success or not; there is no destruction branch.
pub fn enhance_skill(
    store: &mut GameStore,
    cfg: &EnhanceConfig,
    dice: &mut dyn Dice,
    id: &str,
) -> SkillEnhanceOutcome {
    if store.skill(id).and_then(|s| s.element).is_none() {
        return SkillEnhanceOutcome::NoSkill;
    }
    if !economy::remove_item(store, id, ITEM_ENHANCE_STONE, 1) {
        return SkillEnhanceOutcome::MissingStone;
    }
    let level = store.skill(id).map(|s| s.level).unwrap_or(0);
    let outcome = if dice.chance(cfg.skill_chance(level)) {
        // The floored success chance makes very high levels reachable, so
        // the counter saturates rather than wrapping.
        let to = level.saturating_add(1);
        store.skill_mut(id).level = to;
        SkillEnhanceOutcome::Upgraded { from: level, to }
    } else {
        SkillEnhanceOutcome::Failed { level }
    };
    store.persist();
    outcome
}
