//! The fixed shop catalog and consumable item effects.
//!
//! Prices are static. A weapon purchase equips immediately (switching back
//! to a previously enhanced type restores that type's track). Every decline
//! happens before any dust moves.

use crate::config::DungeonConfig;
use crate::game::economy;
use crate::game::enhance;
use crate::game::storage::GameStore;
use crate::game::types::{
    ItemCategory, WeaponKind, ITEM_ENHANCE_STONE, ITEM_HEALING_POTION, ITEM_MANA_POTION,
    ITEM_MYSTERY_BOX, ITEM_SKILL_TOME, ITEM_STRATEGY_GUIDE,
};

/// HP restored by one healing potion.
pub const HEALING_POTION_HEAL: i32 = 50;

/// What a catalog entry sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopGoods {
    Weapon(WeaponKind),
    Item {
        name: &'static str,
        category: ItemCategory,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopEntry {
    pub label: &'static str,
    pub price: i64,
    pub goods: ShopGoods,
}

pub const CATALOG: &[ShopEntry] = &[
    ShopEntry {
        label: "sword",
        price: 100,
        goods: ShopGoods::Weapon(WeaponKind::Sword),
    },
    ShopEntry {
        label: "shield",
        price: 100,
        goods: ShopGoods::Weapon(WeaponKind::Shield),
    },
    ShopEntry {
        label: "staff",
        price: 100,
        goods: ShopGoods::Weapon(WeaponKind::Staff),
    },
    ShopEntry {
        label: ITEM_ENHANCE_STONE,
        price: 200,
        goods: ShopGoods::Item {
            name: ITEM_ENHANCE_STONE,
            category: ItemCategory::Material,
        },
    },
    ShopEntry {
        label: ITEM_HEALING_POTION,
        price: 150,
        goods: ShopGoods::Item {
            name: ITEM_HEALING_POTION,
            category: ItemCategory::Consumable,
        },
    },
    ShopEntry {
        label: ITEM_MANA_POTION,
        price: 150,
        goods: ShopGoods::Item {
            name: ITEM_MANA_POTION,
            category: ItemCategory::Consumable,
        },
    },
    ShopEntry {
        label: ITEM_MYSTERY_BOX,
        price: 300,
        goods: ShopGoods::Item {
            name: ITEM_MYSTERY_BOX,
            category: ItemCategory::Consumable,
        },
    },
    ShopEntry {
        label: ITEM_STRATEGY_GUIDE,
        price: 250,
        goods: ShopGoods::Item {
            name: ITEM_STRATEGY_GUIDE,
            category: ItemCategory::Tome,
        },
    },
    ShopEntry {
        label: ITEM_SKILL_TOME,
        price: 500,
        goods: ShopGoods::Item {
            name: ITEM_SKILL_TOME,
            category: ItemCategory::Tome,
        },
    },
];

/// Look up a catalog entry by its label.
pub fn find_entry(label: &str) -> Option<&'static ShopEntry> {
    CATALOG.iter().find(|e| e.label == label)
}

/// Result of a purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyOutcome {
    UnknownItem { label: String },
    InsufficientDust { need: i64, have: i64 },
    /// Weapon bought and equipped.
    Equipped { kind: WeaponKind, balance: i64 },
    /// Item bought into the inventory.
    Bought { name: String, quantity: u32, balance: i64 },
}

/// Buy one catalog entry. Dust sufficiency is checked before deduction; a
/// weapon purchase equips via the per-type track rules.
pub fn buy(store: &mut GameStore, id: &str, label: &str) -> BuyOutcome {
    let Some(entry) = find_entry(label) else {
        return BuyOutcome::UnknownItem {
            label: label.to_string(),
        };
    };
    let have = economy::balance(store, id);
    if have < entry.price {
        return BuyOutcome::InsufficientDust {
            need: entry.price,
            have,
        };
    }
    economy::subtract_dust(store, id, entry.price);
    let balance = economy::balance(store, id);
    match entry.goods {
        ShopGoods::Weapon(kind) => {
            enhance::equip_weapon(store, id, kind);
            BuyOutcome::Equipped { kind, balance }
        }
        ShopGoods::Item { name, category } => {
            let quantity = economy::add_item(store, id, name, category, 1);
            BuyOutcome::Bought {
                name: name.to_string(),
                quantity,
                balance,
            }
        }
    }
}

/// Result of drinking a healing potion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealOutcome {
    MissingPotion,
    FullHealth,
    Healed { hp: i32, max_hp: i32 },
}

/// Drink a healing potion: +50 HP capped at max. Declined at full health so
/// the potion is never wasted.
pub fn use_healing_potion(store: &mut GameStore, id: &str) -> HealOutcome {
    if !economy::has_item(store, id, ITEM_HEALING_POTION, 1) {
        return HealOutcome::MissingPotion;
    }
    let character = store.character_mut(id);
    if character.current_hp >= character.max_hp {
        return HealOutcome::FullHealth;
    }
    character.current_hp = (character.current_hp + HEALING_POTION_HEAL).min(character.max_hp);
    let hp = character.current_hp;
    let max_hp = character.max_hp;
    economy::remove_item(store, id, ITEM_HEALING_POTION, 1);
    store.persist();
    HealOutcome::Healed { hp, max_hp }
}

/// Result of drinking a mana potion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManaOutcome {
    MissingPotion,
    /// Mana potions only work inside the dungeon.
    NotInDungeon,
    FullMana,
    Restored { mana: u32, max_mana: u32 },
}

/// Drink a mana potion inside the dungeon, restoring the crawl pool.
pub fn use_mana_potion(store: &mut GameStore, cfg: &DungeonConfig, id: &str) -> ManaOutcome {
    if !economy::has_item(store, id, ITEM_MANA_POTION, 1) {
        return ManaOutcome::MissingPotion;
    }
    if !store.user_mut(id).in_dungeon {
        return ManaOutcome::NotInDungeon;
    }
    let max_mana = store.character_mut(id).max_mana;
    let user = store.user_mut(id);
    if user.dungeon_mana >= max_mana {
        return ManaOutcome::FullMana;
    }
    user.dungeon_mana = (user.dungeon_mana + cfg.mana_potion_restore).min(max_mana);
    let mana = user.dungeon_mana;
    economy::remove_item(store, id, ITEM_MANA_POTION, 1);
    store.persist();
    ManaOutcome::Restored { mana, max_mana }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dungeon;
    use crate::game::economy::{add_dust, add_item, balance, item_quantity};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).expect("date")
    }

    #[test]
    fn catalog_prices_are_fixed() {
        assert_eq!(find_entry("sword").expect("entry").price, 100);
        assert_eq!(find_entry("enhance stone").expect("entry").price, 200);
        assert_eq!(find_entry("skill tome").expect("entry").price, 500);
        assert!(find_entry("excalibur").is_none());
    }

    #[test]
    fn weapon_purchase_equips_immediately() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 250);
        let outcome = buy(&mut store, "alice", "staff");
        assert_eq!(
            outcome,
            BuyOutcome::Equipped {
                kind: WeaponKind::Staff,
                balance: 150
            }
        );
        assert_eq!(store.weapon("alice").expect("weapon").kind, WeaponKind::Staff);
    }

    #[test]
    fn rebuying_a_weapon_restores_its_track() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 1000);
        buy(&mut store, "alice", "sword");
        store.weapon_mut("alice").expect("weapon").set_track_level(6);
        buy(&mut store, "alice", "shield");
        assert_eq!(store.weapon("alice").expect("weapon").level, 0);
        buy(&mut store, "alice", "sword");
        assert_eq!(store.weapon("alice").expect("weapon").level, 6);
    }

    #[test]
    fn purchase_declined_before_deduction() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 120);
        assert_eq!(
            buy(&mut store, "alice", "enhance stone"),
            BuyOutcome::InsufficientDust { need: 200, have: 120 }
        );
        assert_eq!(balance(&store, "alice"), 120);
        assert_eq!(item_quantity(&store, "alice", "enhance stone"), 0);
    }

    #[test]
    fn item_purchase_stacks() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 400);
        buy(&mut store, "alice", "healing potion");
        let outcome = buy(&mut store, "alice", "healing potion");
        assert_eq!(
            outcome,
            BuyOutcome::Bought {
                name: "healing potion".into(),
                quantity: 2,
                balance: 100
            }
        );
    }

    #[test]
    fn healing_potion_heals_fifty_capped() {
        let mut store = GameStore::in_memory();
        add_item(&mut store, "alice", ITEM_HEALING_POTION, ItemCategory::Consumable, 2);
        store.character_mut("alice").current_hp = 10;
        assert_eq!(
            use_healing_potion(&mut store, "alice"),
            HealOutcome::Healed { hp: 50, max_hp: 50 }
        );
        assert_eq!(item_quantity(&store, "alice", ITEM_HEALING_POTION), 1);
        // now at full health, the second potion is refused and kept
        assert_eq!(use_healing_potion(&mut store, "alice"), HealOutcome::FullHealth);
        assert_eq!(item_quantity(&store, "alice", ITEM_HEALING_POTION), 1);
    }

    #[test]
    fn healing_potion_requires_stock() {
        let mut store = GameStore::in_memory();
        store.character_mut("alice").current_hp = 10;
        assert_eq!(use_healing_potion(&mut store, "alice"), HealOutcome::MissingPotion);
    }

    #[test]
    fn mana_potion_works_only_inside() {
        let mut store = GameStore::in_memory();
        let cfg = DungeonConfig::default();
        add_item(&mut store, "alice", ITEM_MANA_POTION, ItemCategory::Consumable, 2);
        assert_eq!(
            use_mana_potion(&mut store, &cfg, "alice"),
            ManaOutcome::NotInDungeon
        );

        dungeon::enter(&mut store, "alice", day());
        assert_eq!(
            use_mana_potion(&mut store, &cfg, "alice"),
            ManaOutcome::FullMana
        );

        store.user_mut("alice").dungeon_mana = 5;
        assert_eq!(
            use_mana_potion(&mut store, &cfg, "alice"),
            ManaOutcome::Restored { mana: 35, max_mana: 50 }
        );
        assert_eq!(item_quantity(&store, "alice", ITEM_MANA_POTION), 1);
    }
}
