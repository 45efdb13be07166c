//! Core data model for the dustguild engine.
//!
//! Five record kinds, all keyed by a stable external player identity:
//! users (currency + daily counters + dungeon state), characters (leveling
//! stats), weapons (equip + per-type enhancement tracks), inventories
//! (stackable items), and skills. Together they form [`GameData`], the single
//! durable save record.
//!
//! Records written by older builds may lack newer fields (enhancement
//! history, mana). `#[serde(default)]` plus the explicit [`GameData::migrate`]
//! sweep fill those in once at load time.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default display name for a freshly created character.
pub const DEFAULT_CHARACTER_NAME: &str = "Adventurer";

/// Maximum length for character and skill names.
pub const NAME_LIMIT: usize = 20;

/// Maximum character level.
pub const LEVEL_CAP: u8 = 20;

// Canonical item names used across the engine. The shop sells them and the
// enhancement / dungeon / consumable flows consume them by name.
pub const ITEM_ENHANCE_STONE: &str = "enhance stone";
pub const ITEM_HEALING_POTION: &str = "healing potion";
pub const ITEM_MANA_POTION: &str = "mana potion";
pub const ITEM_MYSTERY_BOX: &str = "mystery box";
pub const ITEM_STRATEGY_GUIDE: &str = "strategy guide";
pub const ITEM_SKILL_TOME: &str = "skill tome";

/// The three equippable weapon archetypes. Each routes its enhancement bonus
/// to a different combat stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Sword,
    Shield,
    Staff,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Sword, WeaponKind::Shield, WeaponKind::Staff];

    /// Name of the combat stat this weapon boosts.
    pub fn stat_name(&self) -> &'static str {
        match self {
            WeaponKind::Sword => "attack",
            WeaponKind::Shield => "defense",
            WeaponKind::Staff => "magic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WeaponKind::Sword => "sword",
            WeaponKind::Shield => "shield",
            WeaponKind::Staff => "staff",
        }
    }

    pub fn parse(input: &str) -> Option<WeaponKind> {
        match input.trim().to_ascii_lowercase().as_str() {
            "sword" => Some(WeaponKind::Sword),
            "shield" => Some(WeaponKind::Shield),
            "staff" => Some(WeaponKind::Staff),
            _ => None,
        }
    }
}

/// The five skill elements. Set once from a skill tome; immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillElement {
    Fire,
    Water,
    Leaf,
    Earth,
    Wind,
}

impl SkillElement {
    pub const ALL: [SkillElement; 5] = [
        SkillElement::Fire,
        SkillElement::Water,
        SkillElement::Leaf,
        SkillElement::Earth,
        SkillElement::Wind,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillElement::Fire => "fire",
            SkillElement::Water => "water",
            SkillElement::Leaf => "leaf",
            SkillElement::Earth => "earth",
            SkillElement::Wind => "wind",
        }
    }

    pub fn parse(input: &str) -> Option<SkillElement> {
        match input.trim().to_ascii_lowercase().as_str() {
            "fire" => Some(SkillElement::Fire),
            "water" => Some(SkillElement::Water),
            "leaf" => Some(SkillElement::Leaf),
            "earth" => Some(SkillElement::Earth),
            "wind" => Some(SkillElement::Wind),
            _ => None,
        }
    }
}

/// Broad item grouping used for inventory display and shop routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Consumable,
    Material,
    Tome,
}

/// Per-player currency, daily counters, and dungeon membership.
///
/// `dust` is stored as a signed integer so legacy saves with negative
/// balances deserialize cleanly; reads go through [`UserRecord::balance`]
/// which floor-clamps to zero, and the load-time migration repairs the
/// stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub dust: i64,
    pub last_attendance: Option<NaiveDate>,
    pub last_exploration: Option<NaiveDate>,
    pub exploration_count: u32,
    pub last_battle: Option<NaiveDate>,
    pub battle_count: u32,
    pub last_heal: Option<NaiveDate>,
    #[serde(default)]
    pub in_dungeon: bool,
    #[serde(default)]
    pub dungeon_floor: u32,
    /// Crawl resource pool, refilled on dungeon entry.
    #[serde(default)]
    pub dungeon_mana: u32,
}

impl Default for UserRecord {
    fn default() -> Self {
        UserRecord {
            dust: 0,
            last_attendance: None,
            last_exploration: None,
            exploration_count: 0,
            last_battle: None,
            battle_count: 0,
            last_heal: None,
            in_dungeon: false,
            dungeon_floor: 0,
            dungeon_mana: 0,
        }
    }
}

impl UserRecord {
    /// Current dust balance, floor-clamped against legacy negative state.
    pub fn balance(&self) -> i64 {
        self.dust.max(0)
    }
}

/// A leveling character. Derived stats (max HP, attack, defense, magic) are
/// pure functions of level; `current_hp` is clamped to `[0, max_hp]` on
/// every change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub level: u8,
    pub exp: u32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Missing in pre-magic saves; 0 is not a reachable value (level 0 gives
    /// 20), so the migration treats 0 as "absent" and recomputes from level.
    #[serde(default)]
    pub magic: i32,
    #[serde(default)]
    pub max_mana: u32,
}

impl Default for CharacterRecord {
    fn default() -> Self {
        CharacterRecord {
            name: DEFAULT_CHARACTER_NAME.to_string(),
            level: 0,
            exp: 0,
            current_hp: 50,
            max_hp: 50,
            attack: 10,
            defense: 10,
            magic: 20,
            max_mana: 50,
        }
    }
}

impl CharacterRecord {
    pub fn is_downed(&self) -> bool {
        self.current_hp <= 0
    }

    /// Clamp current HP into `[0, max_hp]`.
    pub fn clamp_hp(&mut self) {
        self.current_hp = self.current_hp.clamp(0, self.max_hp);
    }
}

/// Equipped weapon plus the per-type enhancement history.
///
/// Invariant: `level` always mirrors `tracks[kind]` for the currently
/// equipped type. Switching types restores that type's own stored progress
/// instead of resetting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponRecord {
    pub kind: WeaponKind,
    pub level: u8,
    #[serde(default)]
    pub tracks: HashMap<WeaponKind, u8>,
}

impl WeaponRecord {
    pub fn new(kind: WeaponKind) -> Self {
        let mut tracks = HashMap::new();
        for k in WeaponKind::ALL {
            tracks.insert(k, 0);
        }
        WeaponRecord {
            kind,
            level: 0,
            tracks,
        }
    }

    /// Stored enhancement level for a given type track.
    pub fn track_level(&self, kind: WeaponKind) -> u8 {
        self.tracks.get(&kind).copied().unwrap_or(0)
    }

    /// Switch the equipped type, restoring that type's stored level.
    pub fn equip(&mut self, kind: WeaponKind) {
        self.kind = kind;
        self.level = self.track_level(kind);
    }

    /// Set the equipped type's track level and mirror it on `level`.
    pub fn set_track_level(&mut self, level: u8) {
        self.tracks.insert(self.kind, level);
        self.level = level;
    }

    /// Fill in a missing history map from the flat equipped level. Saves
    /// written before per-type tracks existed carry only `kind` + `level`.
    fn migrate(&mut self) {
        if self.tracks.is_empty() {
            for k in WeaponKind::ALL {
                self.tracks.insert(k, 0);
            }
            self.tracks.insert(self.kind, self.level);
        }
        self.level = self.track_level(self.kind);
    }
}

/// One stack of a named item. Quantity is always >= 1; a stack that reaches
/// zero is removed from the inventory entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub category: ItemCategory,
    pub quantity: u32,
}

/// Ordered stackable inventory. No two stacks share an item name.
pub type Inventory = Vec<ItemStack>;

/// A player's single skill. The element is chosen once from a consumable
/// skill tome; the name is set afterwards; the level rises via the
/// destruction-free enhancement variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillRecord {
    pub element: Option<SkillElement>,
    pub name: Option<String>,
    pub level: u8,
}

/// The single durable save record: five maps keyed by player identity,
/// written in full on every mutation and read once at process start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    pub users: HashMap<String, UserRecord>,
    pub characters: HashMap<String, CharacterRecord>,
    pub weapons: HashMap<String, WeaponRecord>,
    pub inventories: HashMap<String, Inventory>,
    #[serde(default)]
    pub skills: HashMap<String, SkillRecord>,
}

impl GameData {
    /// Versioned-schema upgrade pass, applied once after load.
    ///
    /// - clamps legacy negative dust balances to zero
    /// - rebuilds missing per-type enhancement history from the flat level
    /// - fills magic / mana fields absent from older character records
    pub fn migrate(&mut self) {
        for user in self.users.values_mut() {
            if user.dust < 0 {
                user.dust = 0;
            }
        }
        for weapon in self.weapons.values_mut() {
            weapon.migrate();
        }
        for character in self.characters.values_mut() {
            if character.magic == 0 {
                character.magic = 20 + character.level as i32 * 5;
            }
            if character.max_mana == 0 {
                character.max_mana = 50;
            }
            character.clamp_hp();
        }
    }
}
