//! Dust (currency) and stackable-inventory operations.
//!
//! Dust never goes negative: additions are unconditional, subtractions
//! deduct at most the current balance (overdraft requests partially apply
//! rather than failing loud), and reads floor-clamp against any legacy
//! negative state. Inventory stacks are unique by item name and a stack is
//! removed entirely when its quantity reaches zero.

use crate::game::storage::GameStore;
use crate::game::types::ItemCategory;

/// Add dust unconditionally. Returns the new balance.
pub fn add_dust(store: &mut GameStore, id: &str, amount: i64) -> i64 {
    let user = store.user_mut(id);
    user.dust = user.balance() + amount.max(0);
    let balance = user.dust;
    store.persist();
    balance
}

/// Subtract up to `amount` dust, clamped at zero. Returns the amount
/// actually deducted.
pub fn subtract_dust(store: &mut GameStore, id: &str, amount: i64) -> i64 {
    let user = store.user_mut(id);
    let current = user.balance();
    let deducted = amount.max(0).min(current);
    user.dust = current - deducted;
    store.persist();
    deducted
}

/// Current balance, floor-clamped to zero.
pub fn balance(store: &GameStore, id: &str) -> i64 {
    store.user(id).map(|u| u.balance()).unwrap_or(0)
}

/// Add `qty` of an item, stacking onto an existing entry or appending a new
/// one. Returns the stack quantity afterwards.
pub fn add_item(store: &mut GameStore, id: &str, name: &str, category: ItemCategory, qty: u32) -> u32 {
    if qty == 0 {
        return item_quantity(store, id, name);
    }
    let inventory = store.inventory_mut(id);
    let total = if let Some(stack) = inventory.iter_mut().find(|s| s.name == name) {
        stack.quantity += qty;
        stack.quantity
    } else {
        inventory.push(crate::game::types::ItemStack {
            name: name.to_string(),
            category,
            quantity: qty,
        });
        qty
    };
    store.persist();
    total
}

/// Remove `qty` of an item. Returns false (and mutates nothing) when the
/// item is absent or the held quantity is insufficient. A stack that reaches
/// zero is deleted.
pub fn remove_item(store: &mut GameStore, id: &str, name: &str, qty: u32) -> bool {
    if qty == 0 {
        return true;
    }
    let inventory = store.inventory_mut(id);
    let Some(idx) = inventory.iter().position(|s| s.name == name) else {
        return false;
    };
    if inventory[idx].quantity < qty {
        return false;
    }
    inventory[idx].quantity -= qty;
    if inventory[idx].quantity == 0 {
        inventory.remove(idx);
    }
    store.persist();
    true
}

/// Held quantity of an item (0 when absent).
pub fn item_quantity(store: &GameStore, id: &str, name: &str) -> u32 {
    store
        .inventory(id)
        .and_then(|inv| inv.iter().find(|s| s.name == name))
        .map(|s| s.quantity)
        .unwrap_or(0)
}

pub fn has_item(store: &GameStore, id: &str, name: &str, qty: u32) -> bool {
    item_quantity(store, id, name) >= qty
}

/// Result of a dust or item transfer between two identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Sent,
    SelfTransfer,
    InsufficientDust { have: i64, need: i64 },
    MissingItem { name: String },
}

/// Move dust from one identity to another. Sufficiency is verified on the
/// source before either side mutates.
pub fn transfer_dust(store: &mut GameStore, from: &str, to: &str, amount: i64) -> TransferOutcome {
    if from == to {
        return TransferOutcome::SelfTransfer;
    }
    let have = balance(store, from);
    if amount <= 0 || have < amount {
        return TransferOutcome::InsufficientDust { have, need: amount };
    }
    subtract_dust(store, from, amount);
    add_dust(store, to, amount);
    TransferOutcome::Sent
}

/// Move one unit of an item between identities. The source's stack is
/// checked before any mutation.
pub fn transfer_item(store: &mut GameStore, from: &str, to: &str, name: &str) -> TransferOutcome {
    if from == to {
        return TransferOutcome::SelfTransfer;
    }
    let Some(stack) = store
        .inventory(from)
        .and_then(|inv| inv.iter().find(|s| s.name == name))
    else {
        return TransferOutcome::MissingItem {
            name: name.to_string(),
        };
    };
    let category = stack.category;
    if !remove_item(store, from, name, 1) {
        return TransferOutcome::MissingItem {
            name: name.to_string(),
        };
    }
    add_item(store, to, name, category, 1);
    TransferOutcome::Sent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_never_negative() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 50);
        let deducted = subtract_dust(&mut store, "alice", 80);
        assert_eq!(deducted, 50);
        assert_eq!(balance(&store, "alice"), 0);
    }

    #[test]
    fn random_op_sequence_keeps_balance_non_negative() {
        let mut store = GameStore::in_memory();
        let ops: [(bool, i64); 8] = [
            (true, 100),
            (false, 30),
            (false, 500),
            (true, 10),
            (false, 1),
            (false, 9),
            (false, 9),
            (true, 0),
        ];
        for (is_add, amount) in ops {
            if is_add {
                add_dust(&mut store, "bob", amount);
            } else {
                subtract_dust(&mut store, "bob", amount);
            }
            assert!(balance(&store, "bob") >= 0);
        }
    }

    #[test]
    fn add_item_stacks_by_name() {
        let mut store = GameStore::in_memory();
        add_item(&mut store, "alice", "healing potion", ItemCategory::Consumable, 2);
        add_item(&mut store, "alice", "healing potion", ItemCategory::Consumable, 3);
        let inventory = store.inventory("alice").expect("inv");
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].quantity, 5);
    }

    #[test]
    fn remove_item_deletes_empty_stack() {
        let mut store = GameStore::in_memory();
        add_item(&mut store, "alice", "enhance stone", ItemCategory::Material, 2);
        assert!(remove_item(&mut store, "alice", "enhance stone", 2));
        assert!(store.inventory("alice").expect("inv").is_empty());
    }

    #[test]
    fn remove_item_declines_without_mutation() {
        let mut store = GameStore::in_memory();
        add_item(&mut store, "alice", "enhance stone", ItemCategory::Material, 1);
        assert!(!remove_item(&mut store, "alice", "enhance stone", 2));
        assert_eq!(item_quantity(&store, "alice", "enhance stone"), 1);
        assert!(!remove_item(&mut store, "alice", "mystery box", 1));
    }

    #[test]
    fn dust_transfer_checks_source_first() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 40);
        assert_eq!(
            transfer_dust(&mut store, "alice", "bob", 100),
            TransferOutcome::InsufficientDust { have: 40, need: 100 }
        );
        assert_eq!(balance(&store, "alice"), 40);
        assert_eq!(balance(&store, "bob"), 0);

        assert_eq!(transfer_dust(&mut store, "alice", "bob", 25), TransferOutcome::Sent);
        assert_eq!(balance(&store, "alice"), 15);
        assert_eq!(balance(&store, "bob"), 25);
    }

    #[test]
    fn self_transfer_rejected() {
        let mut store = GameStore::in_memory();
        add_dust(&mut store, "alice", 40);
        assert_eq!(
            transfer_dust(&mut store, "alice", "alice", 10),
            TransferOutcome::SelfTransfer
        );
        assert_eq!(
            transfer_item(&mut store, "alice", "alice", "mystery box"),
            TransferOutcome::SelfTransfer
        );
    }

    #[test]
    fn item_transfer_moves_one_unit() {
        let mut store = GameStore::in_memory();
        add_item(&mut store, "alice", "mystery box", ItemCategory::Consumable, 2);
        assert_eq!(
            transfer_item(&mut store, "alice", "bob", "mystery box"),
            TransferOutcome::Sent
        );
        assert_eq!(item_quantity(&store, "alice", "mystery box"), 1);
        assert_eq!(item_quantity(&store, "bob", "mystery box"), 1);

        assert_eq!(
            transfer_item(&mut store, "alice", "bob", "skill tome"),
            TransferOutcome::MissingItem {
                name: "skill tome".into()
            }
        );
    }
}
