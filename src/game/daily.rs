//! Daily-cycle bookkeeping.
//!
//! All once-per-day gates (attendance, the exploration and battle caps, the
//! free midnight heal) reset lazily: whenever a counter is about to be read
//! or incremented, the stored date stamp is compared to today's calendar day
//! in the configured reference time zone and the counter is zeroed first if
//! the day rolled over. No background timer exists.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

use crate::game::storage::GameStore;

/// Today's calendar day at the given UTC offset (hours). Out-of-range
/// offsets fall back to UTC; config validation rejects them earlier.
pub fn today(utc_offset_hours: i32) -> NaiveDate {
    let offset =
        FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}

/// Reset a dated counter to zero if its stamp is not `today`, then stamp it.
/// Returns the counter value after any reset (before the caller increments).
pub fn roll_counter(stamp: &mut Option<NaiveDate>, count: &mut u32, today: NaiveDate) -> u32 {
    if *stamp != Some(today) {
        *count = 0;
        *stamp = Some(today);
    }
    *count
}

/// Whether the identity has not yet attended today.
pub fn attendance_available(store: &GameStore, id: &str, today: NaiveDate) -> bool {
    store
        .user(id)
        .map(|u| u.last_attendance != Some(today))
        .unwrap_or(true)
}

/// Grant the free once-per-day full heal if it has not happened today.
/// Applied lazily on the first HP-relevant touch of the day. Returns true
/// when the heal fired.
pub fn apply_daily_heal(store: &mut GameStore, id: &str, today: NaiveDate) -> bool {
    if store.user_mut(id).last_heal == Some(today) {
        return false;
    }
    let character = store.character_mut(id);
    character.current_hp = character.max_hp;
    store.user_mut(id).last_heal = Some(today);
    store.persist();
    true
}
