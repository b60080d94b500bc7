use crate::engine::explorer::{Buff, Explorer};
use crate::world::{BoostDuration, Item, ItemCategory, ItemEffect};

impl Explorer {
    /// Remove the first inventory entry equal to `item`.
    fn take_from_inventory(&mut self, item: &Item) -> Option<Item> {
        let idx = self.inventory.iter().position(|i| i == item)?;
        Some(self.inventory.remove(idx))
    }

    /// Equip `item` in its slot (`ring` unless the item names one). Whatever
    /// was in that slot goes back to the inventory.
    pub fn equip(&mut self, item: &Item) -> String {
        if item.category != ItemCategory::Equipable {
            return format!("{} is not equipable", item.name);
        }

        let slot = item.slot().to_string();
        let equipped = self.take_from_inventory(item).unwrap_or_else(|| item.clone());
        let previous = self.equipped.insert(slot.clone(), equipped);

        match previous {
            Some(prev) => {
                let msg = format!(
                    "you equip {}, {} returns to your inventory",
                    item.name, prev.name
                );
                self.inventory.push(prev);
                msg
            }
            None => format!("you equip {} in the {} slot", item.name, slot),
        }
    }

    /// Consume `item` from the inventory. Every path that gets past the
    /// checks removes exactly one matching entry.
    pub fn use_item(&mut self, item: &Item) -> String {
        if !self.inventory.contains(item) {
            return format!("you do not have {}", item.name);
        }
        if item.category != ItemCategory::Consumable {
            return format!("{} is not consumable", item.name);
        }

        self.take_from_inventory(item);

        match &item.effect {
            ItemEffect::AttackBoost {
                attack,
                duration: BoostDuration::Permanent,
            } => {
                self.base_attack = self.base_attack.saturating_add(*attack);
                format!("you use {}, base attack +{}", item.name, attack)
            }
            ItemEffect::AttackBoost {
                attack,
                duration: BoostDuration::Rooms(rooms),
            } => {
                self.buffs.push(Buff {
                    attack_bonus: *attack,
                    remaining_rooms: *rooms,
                });
                format!("you use {}, +{} attack for {} rooms", item.name, attack, rooms)
            }
            ItemEffect::Heal { amount } => {
                self.heal(*amount);
                format!("you use {} and recover {} hp", item.name, amount)
            }
            ItemEffect::SlotBonus { .. } | ItemEffect::None => {
                format!("you use {}", item.name)
            }
        }
    }

    /// One line per inventory entry, numbered from 1.
    pub fn inventory_lines(&self) -> Vec<String> {
        self.inventory
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {} (value: {})", i + 1, item.name, item.value))
            .collect()
    }
}
