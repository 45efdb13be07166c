//! Battle resolution: power aggregation and randomized contests.
//!
//! A character's effective stats are its leveled base stats plus the
//! equipped weapon's enhancement bonus routed to the matching stat. Combat
//! power is the sum of effective attack, defense, and magic plus a flat
//! per-level bonus that exists only for contest purposes. Each side then
//! rolls power plus a uniform draw; the attacker must strictly exceed the
//! defender's roll — ties go to the defender.

use log::debug;

use crate::config::{BattleConfig, DailyConfig, DungeonConfig};
use crate::game::daily;
use crate::game::dice::Dice;
use crate::game::economy;
use crate::game::progression::{self, LevelUpReport};
use crate::game::storage::GameStore;
use crate::game::types::{CharacterRecord, WeaponKind, WeaponRecord};
use chrono::NaiveDate;

/// Base stats plus routed weapon bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveStats {
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
}

/// Compute effective stats from a character and its optional weapon.
pub fn effective_stats(
    cfg: &BattleConfig,
    character: &CharacterRecord,
    weapon: Option<&WeaponRecord>,
) -> EffectiveStats {
    let mut stats = EffectiveStats {
        attack: character.attack,
        defense: character.defense,
        magic: character.magic,
    };
    if let Some(weapon) = weapon {
        let bonus = weapon.level as i32 * cfg.enhancement_stat_bonus;
        match weapon.kind {
            WeaponKind::Sword => stats.attack += bonus,
            WeaponKind::Shield => stats.defense += bonus,
            WeaponKind::Staff => stats.magic += bonus,
        }
    }
    stats
}

/// Total combat power: effective stat sum plus the flat per-level bonus.
pub fn combat_power(
    cfg: &BattleConfig,
    character: &CharacterRecord,
    weapon: Option<&WeaponRecord>,
) -> i32 {
    let stats = effective_stats(cfg, character, weapon);
    stats.attack + stats.defense + stats.magic + character.level as i32 * cfg.level_power_bonus
}

/// Resolve one contest. The attacker wins only on a strictly greater roll.
pub fn contest(
    cfg: &BattleConfig,
    dice: &mut dyn Dice,
    attacker_power: i32,
    defender_power: i32,
) -> bool {
    let attacker_roll = attacker_power + dice.below(cfg.roll_spread) as i32;
    let defender_roll = defender_power + dice.below(cfg.roll_spread) as i32;
    debug!("contest: attacker {attacker_roll} vs defender {defender_roll}");
    attacker_roll > defender_roll
}

/// Snapshot of the opposing side, for rendering by the chat layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentInfo {
    pub name: String,
    pub level: u8,
    pub power: i32,
}

/// Result of a PvP duel attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuelOutcome {
    /// Attacker is at zero HP; battles are blocked until healed.
    ZeroHealth,
    /// Daily battle cap reached.
    DailyLimit { cap: u32 },
    /// Named opponent is the attacker's own character.
    SelfChallenge,
    /// Named opponent does not exist.
    UnknownOpponent { name: String },
    /// No other character exists to match against.
    NoOpponent,
    Victory {
        opponent: OpponentInfo,
        dust_won: i64,
        level: LevelUpReport,
        battles_today: u32,
    },
    Defeat {
        opponent: OpponentInfo,
        damage: i32,
        hp_after: i32,
        battles_today: u32,
    },
}

/// Run a PvP duel for `attacker_id` against a named opponent, or a random
/// other character when `opponent_name` is `None`.
///
/// The daily battle counter increments win or lose. The free daily heal is
/// applied lazily before the zero-HP gate so a new day unblocks a downed
/// attacker without any other action.
pub fn duel(
    store: &mut GameStore,
    daily_cfg: &DailyConfig,
    cfg: &BattleConfig,
    dice: &mut dyn Dice,
    attacker_id: &str,
    opponent_name: Option<&str>,
    today: NaiveDate,
) -> DuelOutcome {
    daily::apply_daily_heal(store, attacker_id, today);

    if store.character_mut(attacker_id).is_downed() {
        return DuelOutcome::ZeroHealth;
    }

    {
        let user = store.user_mut(attacker_id);
        let count = daily::roll_counter(&mut user.last_battle, &mut user.battle_count, today);
        if count >= daily_cfg.battle_cap {
            return DuelOutcome::DailyLimit {
                cap: daily_cfg.battle_cap,
            };
        }
    }

    let attacker_name = store.character_mut(attacker_id).name.clone();
    let defender_id = match opponent_name {
        Some(name) => {
            if name == attacker_name {
                return DuelOutcome::SelfChallenge;
            }
            match store.find_by_character_name(name) {
                Some(id) if id == attacker_id => return DuelOutcome::SelfChallenge,
                Some(id) => id.to_string(),
                None => {
                    return DuelOutcome::UnknownOpponent {
                        name: name.to_string(),
                    }
                }
            }
        }
        None => match store.random_opponent(dice, attacker_id) {
            Some(id) => id,
            None => return DuelOutcome::NoOpponent,
        },
    };

    let attacker = store.character_mut(attacker_id).clone();
    let attacker_weapon = store.weapon(attacker_id).cloned();
    let defender = store.character_mut(&defender_id).clone();
    let defender_weapon = store.weapon(&defender_id).cloned();

    let attacker_power = combat_power(cfg, &attacker, attacker_weapon.as_ref());
    let defender_power = combat_power(cfg, &defender, defender_weapon.as_ref());
    let won = contest(cfg, dice, attacker_power, defender_power);

    let battles_today = {
        let user = store.user_mut(attacker_id);
        user.battle_count += 1;
        user.battle_count
    };

    let opponent = OpponentInfo {
        name: defender.name.clone(),
        level: defender.level,
        power: defender_power,
    };

    let outcome = if won {
        let dust_won = defender_power as i64 / cfg.victory_power_divisor + cfg.victory_base_dust;
        economy::add_dust(store, attacker_id, dust_won);
        let level = progression::add_experience(store, attacker_id, 1);
        DuelOutcome::Victory {
            opponent,
            dust_won,
            level,
            battles_today,
        }
    } else {
        let hp_after = progression::damage_hp(store, attacker_id, cfg.defeat_damage);
        DuelOutcome::Defeat {
            opponent,
            damage: cfg.defeat_damage,
            hp_after,
            battles_today,
        }
    };
    store.persist();
    outcome
}

/// A procedurally scaled dungeon monster: power grows with floor depth.
pub fn monster_power(cfg: &DungeonConfig, dice: &mut dyn Dice, floor: u32) -> i32 {
    cfg.monster_base_power
        + floor as i32 * cfg.monster_power_per_floor
        + dice.below(cfg.monster_power_spread) as i32
}
