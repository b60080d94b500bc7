use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_SLOT: &str = "ring";

/// An inventory item. Immutable once created; persisted through
/// [`ItemRecord`] so older saves with missing fields still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub name: String,
    pub value: u32,
    pub description: String,
    pub category: ItemCategory,
    pub effect: ItemEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Normal,
    Equipable,
    Consumable,
}

impl ItemCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemCategory::Normal => "normal",
            ItemCategory::Equipable => "equipable",
            ItemCategory::Consumable => "consumible",
        }
    }

    /// Unrecognised labels fall back to `Normal`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "equipable" | "equippable" => ItemCategory::Equipable,
            "consumible" | "consumable" => ItemCategory::Consumable,
            _ => ItemCategory::Normal,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a consumed attack bonus lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostDuration {
    Permanent,
    /// Expires after this many room transitions.
    Rooms(i32),
}

/// What an item does when equipped or consumed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemEffect {
    #[default]
    None,
    /// Worn in `slot`, adds `attack` while equipped.
    SlotBonus { slot: String, attack: i32 },
    /// Consumed for an attack bonus.
    AttackBoost { attack: i32, duration: BoostDuration },
    /// Consumed to restore health.
    Heal { amount: i32 },
}

impl Item {
    pub fn new(name: impl Into<String>, value: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            description: description.into(),
            category: ItemCategory::Normal,
            effect: ItemEffect::None,
        }
    }

    pub fn equipable(name: impl Into<String>, slot: impl Into<String>, attack: i32) -> Self {
        Self {
            category: ItemCategory::Equipable,
            effect: ItemEffect::SlotBonus {
                slot: slot.into(),
                attack,
            },
            ..Self::new(name, 0, "")
        }
    }

    pub fn consumable(name: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            category: ItemCategory::Consumable,
            effect,
            ..Self::new(name, 0, "")
        }
    }

    /// Attack contributed while equipped.
    pub fn attack_bonus(&self) -> i32 {
        match &self.effect {
            ItemEffect::SlotBonus { attack, .. } => *attack,
            _ => 0,
        }
    }

    pub fn slot(&self) -> &str {
        match &self.effect {
            ItemEffect::SlotBonus { slot, .. } => slot,
            _ => DEFAULT_SLOT,
        }
    }
}

////////////////////
/// RECORD FORM  ///
////////////////////

/// Persisted item shape. Every field is optional on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default = "default_item_name", alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "valor")]
    pub value: u32,
    #[serde(default, alias = "descripcion")]
    pub description: String,
    #[serde(default = "default_category", alias = "categoria")]
    pub category: String,
    #[serde(default, alias = "efecto", deserialize_with = "null_as_default")]
    pub effect: EffectRecord,
}

/// Reads an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_item_name() -> String {
    "item".to_string()
}

fn default_category() -> String {
    "normal".to_string()
}

/// Open key/value form of an effect as it appears on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    #[serde(default, alias = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, alias = "valor", skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(default, alias = "ataque", skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, alias = "modo", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, alias = "habitaciones", skip_serializing_if = "Option::is_none")]
    pub rooms: Option<i32>,
    #[serde(default, alias = "detalle", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

const MODE_PERMANENT: &str = "permanente";
const MODE_ROOMS: &str = "temporal_habitaciones";

pub(crate) fn is_heal_kind(kind: Option<&str>) -> bool {
    matches!(kind, Some("heal") | Some("curar"))
}

impl ItemEffect {
    /// Interpret an on-disk effect for an item of `category`.
    pub fn from_record(category: ItemCategory, rec: &EffectRecord) -> Self {
        if category == ItemCategory::Equipable {
            return ItemEffect::SlotBonus {
                slot: rec.slot.clone().unwrap_or_else(|| DEFAULT_SLOT.to_string()),
                attack: rec.attack.unwrap_or(0),
            };
        }

        if let Some(attack) = rec.attack {
            match rec.mode.as_deref().unwrap_or(MODE_PERMANENT) {
                MODE_PERMANENT => {
                    return ItemEffect::AttackBoost {
                        attack,
                        duration: BoostDuration::Permanent,
                    };
                }
                MODE_ROOMS => {
                    return ItemEffect::AttackBoost {
                        attack,
                        duration: BoostDuration::Rooms(rec.rooms.unwrap_or(1)),
                    };
                }
                _ => {}
            }
        }

        if is_heal_kind(rec.kind.as_deref()) {
            return ItemEffect::Heal {
                amount: rec.value.unwrap_or(1),
            };
        }

        ItemEffect::None
    }

    pub fn to_record(&self) -> EffectRecord {
        match self {
            ItemEffect::None => EffectRecord::default(),
            ItemEffect::SlotBonus { slot, attack } => EffectRecord {
                slot: Some(slot.clone()),
                attack: Some(*attack),
                ..EffectRecord::default()
            },
            ItemEffect::AttackBoost { attack, duration } => match duration {
                BoostDuration::Permanent => EffectRecord {
                    attack: Some(*attack),
                    mode: Some(MODE_PERMANENT.to_string()),
                    ..EffectRecord::default()
                },
                BoostDuration::Rooms(n) => EffectRecord {
                    attack: Some(*attack),
                    mode: Some(MODE_ROOMS.to_string()),
                    rooms: Some(*n),
                    ..EffectRecord::default()
                },
            },
            ItemEffect::Heal { amount } => EffectRecord {
                kind: Some("heal".to_string()),
                value: Some(*amount),
                ..EffectRecord::default()
            },
        }
    }
}

impl From<ItemRecord> for Item {
    fn from(rec: ItemRecord) -> Self {
        let category = ItemCategory::parse(&rec.category);
        let effect = ItemEffect::from_record(category, &rec.effect);
        Item {
            name: rec.name,
            value: rec.value,
            description: rec.description,
            category,
            effect,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        ItemRecord {
            name: item.name,
            value: item.value,
            description: item.description,
            category: item.category.as_str().to_string(),
            effect: item.effect.to_record(),
        }
    }
}
