//! Daily attendance and field exploration rewards.
//!
//! Attendance is a once-per-day tiered dust grant: one percentile draw is
//! matched against the configured tiers in order and falls through to the
//! default amount. Field exploration is capped per day and pays either a
//! rare jackpot or a uniform dust range, with a small chance of a bonus
//! item, plus one experience per outing.

use chrono::NaiveDate;
use log::debug;

use crate::config::{DailyConfig, RewardsConfig};
use crate::game::daily;
use crate::game::dice::Dice;
use crate::game::economy;
use crate::game::flavor::{FlavorContext, FlavorText};
use crate::game::progression::{self, LevelUpReport};
use crate::game::storage::GameStore;
use crate::game::types::ItemCategory;

/// Result of an attendance check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceOutcome {
    AlreadyToday,
    Granted { dust: i64, balance: i64 },
}

/// Result of a field exploration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreOutcome {
    DailyLimit { cap: u32 },
    Explored {
        dust_found: i64,
        jackpot: bool,
        item_found: Option<String>,
        level: LevelUpReport,
        /// Outings left today after this one.
        remaining: u32,
        narration: String,
    },
}

/// Percentile in `[0, 100)` with two decimal places of resolution, so
/// fractional tier percentages stay expressible.
fn percentile(dice: &mut dyn Dice) -> f64 {
    dice.below(10_000) as f64 / 100.0
}

/// Daily check-in. One tier draw, once per calendar day.
pub fn attendance(
    store: &mut GameStore,
    cfg: &RewardsConfig,
    dice: &mut dyn Dice,
    id: &str,
    today: NaiveDate,
) -> AttendanceOutcome {
    if !daily::attendance_available(store, id, today) {
        return AttendanceOutcome::AlreadyToday;
    }
    let draw = percentile(dice);
    let mut threshold = 0.0;
    let mut dust = cfg.attendance_default;
    for tier in &cfg.attendance_tiers {
        threshold += tier.pct;
        if draw < threshold {
            dust = tier.dust;
            break;
        }
    }
    debug!("attendance: draw {draw:.2} pays {dust}");
    store.user_mut(id).last_attendance = Some(today);
    let balance = economy::add_dust(store, id, dust);
    AttendanceOutcome::Granted { dust, balance }
}

/// One field exploration outing, bounded by the daily cap.
pub fn explore_field(
    store: &mut GameStore,
    daily_cfg: &DailyConfig,
    cfg: &RewardsConfig,
    dice: &mut dyn Dice,
    flavor: &mut dyn FlavorText,
    id: &str,
    today: NaiveDate,
) -> ExploreOutcome {
    {
        let user = store.user_mut(id);
        let count = daily::roll_counter(&mut user.last_exploration, &mut user.exploration_count, today);
        if count >= daily_cfg.exploration_cap {
            return ExploreOutcome::DailyLimit {
                cap: daily_cfg.exploration_cap,
            };
        }
        user.exploration_count += 1;
    }
    let remaining = daily_cfg.exploration_cap - store.user_mut(id).exploration_count;

    let jackpot = dice.chance(cfg.exploration_jackpot_pct / 100.0);
    let dust_found = if jackpot {
        cfg.exploration_jackpot
    } else {
        dice.between(cfg.exploration_dust_min as u32, cfg.exploration_dust_max as u32) as i64
    };
    economy::add_dust(store, id, dust_found);

    let item_found = if !cfg.exploration_items.is_empty()
        && dice.chance(cfg.exploration_item_pct / 100.0)
    {
        let idx = dice.below(cfg.exploration_items.len() as u32) as usize;
        let name = cfg.exploration_items[idx].clone();
        economy::add_item(store, id, &name, ItemCategory::Consumable, 1);
        Some(name)
    } else {
        None
    };

    let level = progression::add_experience(store, id, 1);
    store.persist();
    ExploreOutcome::Explored {
        dust_found,
        jackpot,
        item_found,
        level,
        remaining,
        narration: flavor.line(FlavorContext::Exploration),
    }
}
