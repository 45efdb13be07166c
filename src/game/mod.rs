//! Dust Guild game engine: persistent state and progression for a
//! chat-driven RPG. Every operation is a pure-ish transition on the single
//! save record; probabilistic steps draw through [`dice::Dice`] and every
//! user-visible refusal is an outcome value, never an error.

pub mod battle;
pub mod daily;
pub mod dice;
pub mod dungeon;
pub mod economy;
pub mod enhance;
pub mod errors;
pub mod flavor;
pub mod progression;
pub mod rewards;
pub mod shop;
pub mod storage;
pub mod types;

pub use battle::{duel, DuelOutcome};
pub use dice::{Dice, SeqDice, StdDice};
pub use dungeon::{EnterOutcome, ExitOutcome, StepOutcome};
pub use economy::{transfer_dust, transfer_item, TransferOutcome};
pub use enhance::{
    enhance_skill, enhance_weapon, equip_weapon, name_skill, unlock_skill, EquipReport,
    SkillEnhanceOutcome, SkillNameOutcome, SkillUnlockOutcome, WeaponEnhanceOutcome,
};
pub use errors::GameError;
pub use flavor::{FlavorContext, FlavorText, StaticFlavor};
pub use progression::{add_experience, rename_character, LevelUpReport, RenameOutcome};
pub use rewards::{attendance, explore_field, AttendanceOutcome, ExploreOutcome};
pub use shop::{buy, use_healing_potion, use_mana_potion, BuyOutcome, HealOutcome, ManaOutcome};
pub use storage::{GameStore, JsonFileBackend, MemoryBackend, SaveBackend};
pub use types::*;
