//! The dungeon crawl: enter, step, exit.
//!
//! A crawl is a mana-metered loop. Entering refills the dungeon mana pool
//! from the character's maximum mana and places the crawler on floor 1 (or
//! back on the floor a voluntary exit preserved). Each step spends mana and
//! resolves to either a monster encounter or a loot find, with both the
//! encounter odds and the payouts scaling with floor depth. Running out of
//! HP throws the crawler out and resets the floor; running out of mana
//! merely stalls the crawl until a mana potion or a fresh entry.

use log::debug;

use chrono::NaiveDate;

use crate::config::{BattleConfig, DungeonConfig, RewardsConfig};
use crate::game::battle::{self, monster_power};
use crate::game::daily;
use crate::game::dice::Dice;
use crate::game::economy;
use crate::game::flavor::{FlavorContext, FlavorText};
use crate::game::progression::{self, LevelUpReport};
use crate::game::storage::GameStore;
use crate::game::types::ItemCategory;

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    Entered { floor: u32, mana: u32 },
    AlreadyInside { floor: u32 },
    ZeroHealth,
}

/// Result of one crawl step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    NotInside,
    /// The crawler was already at zero HP: the crawl ends immediately,
    /// progress resets, and nothing is spent or resolved.
    ForcedOut { floor: u32 },
    /// Not enough mana for a step; the crawler stays put.
    LowMana { have: u32, need: u32 },
    MonsterVictory {
        floor: u32,
        monster_power: i32,
        dust_won: i64,
        level: LevelUpReport,
        next_floor: u32,
        narration: String,
    },
    MonsterDefeat {
        floor: u32,
        monster_power: i32,
        damage: i32,
        hp_after: i32,
        /// True when the hit dropped the crawler to zero HP and ended the
        /// crawl, resetting progress.
        thrown_out: bool,
        narration: String,
    },
    Loot {
        floor: u32,
        dust_found: i64,
        item_found: Option<String>,
        next_floor: u32,
        narration: String,
    },
}

/// Result of a voluntary exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Progress is preserved; re-entry resumes on this floor.
    Left { floor: u32 },
    NotInside,
}

/// Enter the dungeon, refilling the mana pool from the character's maximum.
///
/// A voluntary exit preserves the floor, so re-entry resumes there; a first
/// entry (or one after being thrown out) starts on floor 1. The free daily
/// heal is applied lazily first, so a crawler thrown out yesterday can walk
/// back in today.
pub fn enter(store: &mut GameStore, id: &str, today: NaiveDate) -> EnterOutcome {
    daily::apply_daily_heal(store, id, today);
    if store.user_mut(id).in_dungeon {
        let floor = store.user_mut(id).dungeon_floor;
        return EnterOutcome::AlreadyInside { floor };
    }
    if store.character_mut(id).is_downed() {
        return EnterOutcome::ZeroHealth;
    }
    let max_mana = store.character_mut(id).max_mana;
    let user = store.user_mut(id);
    user.in_dungeon = true;
    user.dungeon_floor = user.dungeon_floor.max(1);
    user.dungeon_mana = max_mana;
    let floor = user.dungeon_floor;
    let mana = user.dungeon_mana;
    store.persist();
    EnterOutcome::Entered { floor, mana }
}

/// Leave the dungeon voluntarily, keeping floor progress.
pub fn exit(store: &mut GameStore, id: &str) -> ExitOutcome {
    let user = store.user_mut(id);
    if !user.in_dungeon {
        return ExitOutcome::NotInside;
    }
    user.in_dungeon = false;
    let floor = user.dungeon_floor;
    store.persist();
    ExitOutcome::Left { floor }
}

/// Advance one step: spend mana, then resolve an encounter or a loot find.
///
/// A crawler whose HP hit zero since the last step (a lost duel, say) is
/// thrown out before anything is spent or resolved, same as a lethal
/// monster defeat.
pub fn step(
    store: &mut GameStore,
    cfg: &DungeonConfig,
    battle_cfg: &BattleConfig,
    rewards: &RewardsConfig,
    dice: &mut dyn Dice,
    flavor: &mut dyn FlavorText,
    id: &str,
) -> StepOutcome {
    if !store.user_mut(id).in_dungeon {
        return StepOutcome::NotInside;
    }

    let floor = store.user_mut(id).dungeon_floor;
    if store.character_mut(id).is_downed() {
        let user = store.user_mut(id);
        user.in_dungeon = false;
        user.dungeon_floor = 0;
        store.persist();
        return StepOutcome::ForcedOut { floor };
    }
    {
        let user = store.user_mut(id);
        if user.dungeon_mana < cfg.step_mana_cost {
            return StepOutcome::LowMana {
                have: user.dungeon_mana,
                need: cfg.step_mana_cost,
            };
        }
        user.dungeon_mana -= cfg.step_mana_cost;
    }

    let encounter_chance =
        (cfg.encounter_base + cfg.encounter_per_floor * floor as f64).min(cfg.encounter_cap);
    debug!("dungeon step: floor {floor}, encounter chance {encounter_chance:.2}");

    let outcome = if dice.chance(encounter_chance) {
        resolve_encounter(store, cfg, battle_cfg, dice, flavor, id, floor)
    } else {
        resolve_loot(store, cfg, rewards, dice, flavor, id, floor)
    };
    store.persist();
    outcome
}

fn resolve_encounter(
    store: &mut GameStore,
    cfg: &DungeonConfig,
    battle_cfg: &BattleConfig,
    dice: &mut dyn Dice,
    flavor: &mut dyn FlavorText,
    id: &str,
    floor: u32,
) -> StepOutcome {
    let monster = monster_power(cfg, dice, floor);
    let character = store.character_mut(id).clone();
    let weapon = store.weapon(id).cloned();
    let player = battle::combat_power(battle_cfg, &character, weapon.as_ref());
    let narration = flavor.line(FlavorContext::DungeonBattle { floor });

    if battle::contest(battle_cfg, dice, player, monster) {
        let dust_won =
            monster as i64 / cfg.victory_power_divisor + cfg.victory_floor_bonus * floor as i64;
        economy::add_dust(store, id, dust_won);
        let level = progression::add_experience(store, id, 1);
        let next_floor = floor + 1;
        store.user_mut(id).dungeon_floor = next_floor;
        StepOutcome::MonsterVictory {
            floor,
            monster_power: monster,
            dust_won,
            level,
            next_floor,
            narration,
        }
    } else {
        let damage = cfg.defeat_base_damage + floor as i32;
        let hp_after = progression::damage_hp(store, id, damage);
        let thrown_out = hp_after == 0;
        if thrown_out {
            let user = store.user_mut(id);
            user.in_dungeon = false;
            user.dungeon_floor = 0;
        }
        StepOutcome::MonsterDefeat {
            floor,
            monster_power: monster,
            damage,
            hp_after,
            thrown_out,
            narration,
        }
    }
}

fn resolve_loot(
    store: &mut GameStore,
    cfg: &DungeonConfig,
    rewards: &RewardsConfig,
    dice: &mut dyn Dice,
    flavor: &mut dyn FlavorText,
    id: &str,
    floor: u32,
) -> StepOutcome {
    let dust_found = cfg.loot_base_dust
        + cfg.loot_dust_per_floor * floor as i64
        + dice.below(cfg.loot_dust_spread) as i64;
    economy::add_dust(store, id, dust_found);

    let item_found = if !rewards.dungeon_items.is_empty() && dice.chance(cfg.loot_item_chance) {
        let idx = dice.below(rewards.dungeon_items.len() as u32) as usize;
        let name = rewards.dungeon_items[idx].clone();
        economy::add_item(store, id, &name, ItemCategory::Consumable, 1);
        Some(name)
    } else {
        None
    };

    let next_floor = floor + 1;
    store.user_mut(id).dungeon_floor = next_floor;
    StepOutcome::Loot {
        floor,
        dust_found,
        item_found,
        next_floor,
        narration: flavor.line(FlavorContext::DungeonLoot { floor }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::SeqDice;
    use crate::game::economy::{balance, item_quantity};
    use crate::game::flavor::SilentFlavor;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).expect("date")
    }

    fn cfg() -> DungeonConfig {
        DungeonConfig::default()
    }

    fn battle_cfg() -> BattleConfig {
        BattleConfig::default()
    }

    fn rewards() -> RewardsConfig {
        RewardsConfig::default()
    }

    #[test]
    fn entry_refills_mana_and_starts_on_floor_one() {
        let mut store = GameStore::in_memory();
        assert_eq!(
            enter(&mut store, "alice", day()),
            EnterOutcome::Entered { floor: 1, mana: 50 }
        );
        assert_eq!(
            enter(&mut store, "alice", day()),
            EnterOutcome::AlreadyInside { floor: 1 }
        );
    }

    #[test]
    fn downed_crawler_cannot_enter_until_the_daily_heal() {
        let mut store = GameStore::in_memory();
        store.character_mut("alice").current_hp = 0;
        store.user_mut("alice").last_heal = Some(day());
        assert_eq!(enter(&mut store, "alice", day()), EnterOutcome::ZeroHealth);

        let tomorrow = NaiveDate::from_ymd_opt(2026, 4, 2).expect("date");
        assert_eq!(
            enter(&mut store, "alice", tomorrow),
            EnterOutcome::Entered { floor: 1, mana: 50 }
        );
    }

    #[test]
    fn voluntary_exit_preserves_the_floor() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        store.user_mut("alice").dungeon_floor = 4;
        assert_eq!(exit(&mut store, "alice"), ExitOutcome::Left { floor: 4 });
        assert_eq!(exit(&mut store, "alice"), ExitOutcome::NotInside);
        assert_eq!(
            enter(&mut store, "alice", day()),
            EnterOutcome::Entered { floor: 4, mana: 50 }
        );
    }

    #[test]
    fn step_outside_declines() {
        let mut store = GameStore::in_memory();
        let mut dice = SeqDice::new();
        let mut flavor = SilentFlavor;
        assert_eq!(
            step(
                &mut store,
                &cfg(),
                &battle_cfg(),
                &rewards(),
                &mut dice,
                &mut flavor,
                "alice",
            ),
            StepOutcome::NotInside
        );
    }

    #[test]
    fn low_mana_stalls_without_spending() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        store.user_mut("alice").dungeon_mana = 3;
        let mut dice = SeqDice::new();
        let mut flavor = SilentFlavor;
        assert_eq!(
            step(
                &mut store,
                &cfg(),
                &battle_cfg(),
                &rewards(),
                &mut dice,
                &mut flavor,
                "alice",
            ),
            StepOutcome::LowMana { have: 3, need: 5 }
        );
        assert_eq!(store.user_mut("alice").dungeon_mana, 3);
    }

    #[test]
    fn loot_step_pays_dust_and_advances() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        // encounter check false, item check false; spread roll 25
        let mut dice = SeqDice::new().with_checks(&[false, false]).with_rolls(&[25]);
        let mut flavor = SilentFlavor;
        let outcome = step(
            &mut store,
            &cfg(),
            &battle_cfg(),
            &rewards(),
            &mut dice,
            &mut flavor,
            "alice",
        );
        // 50 + 20*1 + 25 = 95
        assert_eq!(
            outcome,
            StepOutcome::Loot {
                floor: 1,
                dust_found: 95,
                item_found: None,
                next_floor: 2,
                narration: String::new(),
            }
        );
        assert_eq!(balance(&store, "alice"), 95);
        assert_eq!(store.user_mut("alice").dungeon_mana, 45);
        assert_eq!(store.user_mut("alice").dungeon_floor, 2);
    }

    #[test]
    fn loot_step_can_drop_an_item() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        // no encounter; item check true; rolls: dust spread 0, item index 1
        let mut dice = SeqDice::new().with_checks(&[false, true]).with_rolls(&[0, 1]);
        let mut flavor = SilentFlavor;
        let outcome = step(
            &mut store,
            &cfg(),
            &battle_cfg(),
            &rewards(),
            &mut dice,
            &mut flavor,
            "alice",
        );
        match outcome {
            StepOutcome::Loot { item_found, .. } => {
                assert_eq!(item_found.as_deref(), Some("healing potion"));
            }
            other => panic!("expected loot, got {other:?}"),
        }
        assert_eq!(item_quantity(&store, "alice", "healing potion"), 1);
    }

    #[test]
    fn monster_victory_scales_with_floor() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        store.user_mut("alice").dungeon_floor = 3;
        // encounter true; rolls: monster spread 0, player roll 19, monster roll 0
        let mut dice = SeqDice::new().with_checks(&[true]).with_rolls(&[0, 19, 0]);
        let mut flavor = SilentFlavor;
        let outcome = step(
            &mut store,
            &cfg(),
            &battle_cfg(),
            &rewards(),
            &mut dice,
            &mut flavor,
            "alice",
        );
        // monster 50 + 20*3 = 110; dust 110/5 + 10*3 = 52
        match outcome {
            StepOutcome::MonsterVictory {
                floor,
                monster_power,
                dust_won,
                next_floor,
                ..
            } => {
                assert_eq!(floor, 3);
                assert_eq!(monster_power, 110);
                assert_eq!(dust_won, 52);
                assert_eq!(next_floor, 4);
            }
            other => panic!("expected victory, got {other:?}"),
        }
        assert_eq!(store.character("alice").expect("char").exp, 1);
    }

    #[test]
    fn monster_defeat_costs_scaled_hp() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        store.user_mut("alice").dungeon_floor = 2;
        // encounter true; monster spread 29, player roll 0, monster roll 19
        let mut dice = SeqDice::new().with_checks(&[true]).with_rolls(&[29, 0, 19]);
        let mut flavor = SilentFlavor;
        let outcome = step(
            &mut store,
            &cfg(),
            &battle_cfg(),
            &rewards(),
            &mut dice,
            &mut flavor,
            "alice",
        );
        match outcome {
            StepOutcome::MonsterDefeat {
                damage,
                hp_after,
                thrown_out,
                ..
            } => {
                assert_eq!(damage, 12);
                assert_eq!(hp_after, 38);
                assert!(!thrown_out);
            }
            other => panic!("expected defeat, got {other:?}"),
        }
        // still inside, floor unchanged
        assert!(store.user_mut("alice").in_dungeon);
        assert_eq!(store.user_mut("alice").dungeon_floor, 2);
    }

    #[test]
    fn lethal_defeat_throws_the_crawler_out() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        store.user_mut("alice").dungeon_floor = 5;
        store.character_mut("alice").current_hp = 10;
        let mut dice = SeqDice::new().with_checks(&[true]).with_rolls(&[0, 0, 19]);
        let mut flavor = SilentFlavor;
        let outcome = step(
            &mut store,
            &cfg(),
            &battle_cfg(),
            &rewards(),
            &mut dice,
            &mut flavor,
            "alice",
        );
        match outcome {
            StepOutcome::MonsterDefeat {
                hp_after, thrown_out, ..
            } => {
                assert_eq!(hp_after, 0);
                assert!(thrown_out);
            }
            other => panic!("expected defeat, got {other:?}"),
        }
        assert!(!store.user_mut("alice").in_dungeon);
        assert_eq!(store.user_mut("alice").dungeon_floor, 0);
    }

    #[test]
    fn downed_crawler_is_thrown_out_on_the_next_step() {
        let mut store = GameStore::in_memory();
        enter(&mut store, "alice", day());
        // HP hit zero between steps (a lost duel while inside).
        store.character_mut("alice").current_hp = 0;
        store.user_mut("alice").last_heal = Some(day());

        let mut dice = SeqDice::new();
        let mut flavor = SilentFlavor;
        assert_eq!(
            step(
                &mut store,
                &cfg(),
                &battle_cfg(),
                &rewards(),
                &mut dice,
                &mut flavor,
                "alice",
            ),
            StepOutcome::ForcedOut { floor: 1 }
        );
        // Crawl over, progress reset, nothing spent or paid.
        assert!(!store.user_mut("alice").in_dungeon);
        assert_eq!(store.user_mut("alice").dungeon_floor, 0);
        assert_eq!(store.user_mut("alice").dungeon_mana, 50);
        assert_eq!(balance(&store, "alice"), 0);
    }

    #[test]
    fn encounter_odds_cap_at_the_configured_ceiling() {
        let cfg = cfg();
        let at_depth = (cfg.encounter_base + cfg.encounter_per_floor * 40.0).min(cfg.encounter_cap);
        assert_eq!(at_depth, 0.8);
    }
}
