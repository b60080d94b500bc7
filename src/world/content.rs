use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item::{is_heal_kind, null_as_default, Item};
use crate::error::{DungeonError, Result};

/// The single occupant a room may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Treasure(Treasure),
    Monster(Monster),
    Boss(Boss),
    Event(Event),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Treasure,
    Monster,
    Boss,
    Event,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Treasure => "treasure",
            ContentKind::Monster => "monster",
            ContentKind::Boss => "boss",
            ContentKind::Event => "event",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Treasure {
    pub reward: Item,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub name: String,
    pub health: i32,
    pub attack: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub name: String,
    pub health: i32,
    pub attack: i32,
    pub special_reward: Item,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub description: String,
    pub effect: EventEffect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEffect {
    Heal(i32),
    Trap(i32),
    /// Flavour only; no teleport happens.
    Portal,
    /// Flavour only; no buff is granted.
    Buff { detail: String },
    /// Anything else, keeping the stored kind label if there was one.
    Mystery(Option<String>),
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Treasure(_) => ContentKind::Treasure,
            Content::Monster(_) => ContentKind::Monster,
            Content::Boss(_) => ContentKind::Boss,
            Content::Event(_) => ContentKind::Event,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Content::Treasure(t) => {
                format!("a treasure: {} worth {}", t.reward.name, t.reward.value)
            }
            Content::Monster(m) => {
                format!("monster {} hp {} atk {}", m.name, m.health, m.attack)
            }
            Content::Boss(b) => format!("boss {} hp {} atk {}", b.name, b.health, b.attack),
            Content::Event(e) => format!("{}: {}", e.name, e.description),
        }
    }

    /// True once the occupant has nothing left to give: treasure and events
    /// are single-use, foes are spent at zero health.
    pub fn is_exhausted(&self) -> bool {
        match self {
            Content::Treasure(_) | Content::Event(_) => true,
            Content::Monster(m) => m.health <= 0,
            Content::Boss(b) => b.health <= 0,
        }
    }

    /// Decode a persisted content record, dispatching on its `kind` field.
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = value
            .get("kind")
            .or_else(|| value.get("tipo"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if !KNOWN_KINDS.contains(&kind.as_str()) {
            return Err(DungeonError::UnknownContentKind(kind));
        }

        let value = match value {
            Value::Object(mut map) => {
                // Older records name the discriminator `tipo`.
                if let Some(tag) = map.remove("tipo") {
                    map.entry("kind").or_insert(tag);
                }
                Value::Object(map)
            }
            other => other,
        };

        let record: ContentRecord = serde_json::from_value(value)?;
        Ok(record.into())
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(ContentRecord::from(self.clone()))?)
    }
}

////////////////////
/// RECORD FORM  ///
////////////////////

const KNOWN_KINDS: [&str; 8] = [
    "treasure", "tesoro", "monster", "monstruo", "boss", "jefe", "event", "evento",
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ContentRecord {
    #[serde(alias = "tesoro")]
    Treasure {
        #[serde(alias = "recompensa")]
        reward: Item,
    },
    #[serde(alias = "monstruo")]
    Monster {
        #[serde(alias = "nombre")]
        name: String,
        #[serde(alias = "vida")]
        health: i32,
        #[serde(alias = "ataque")]
        attack: i32,
    },
    #[serde(rename = "jefe", alias = "boss")]
    Boss {
        #[serde(alias = "nombre")]
        name: String,
        #[serde(alias = "vida")]
        health: i32,
        #[serde(alias = "ataque")]
        attack: i32,
        #[serde(alias = "recompensa_especial")]
        special_reward: Item,
    },
    #[serde(rename = "evento", alias = "event")]
    Event {
        #[serde(alias = "nombre")]
        name: String,
        #[serde(default, alias = "descripcion")]
        description: String,
        #[serde(default, alias = "efecto", deserialize_with = "null_as_default")]
        effect: EventEffectRecord,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct EventEffectRecord {
    #[serde(default, alias = "tipo", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, alias = "valor", skip_serializing_if = "Option::is_none")]
    value: Option<i32>,
    #[serde(default, alias = "detalle", skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl From<EventEffectRecord> for EventEffect {
    fn from(rec: EventEffectRecord) -> Self {
        let amount = rec.value.unwrap_or(1);
        match rec.kind.as_deref() {
            k if is_heal_kind(k) => EventEffect::Heal(amount),
            Some("trap") | Some("trampa") => EventEffect::Trap(amount),
            Some("portal") => EventEffect::Portal,
            Some("buff") => EventEffect::Buff {
                detail: rec.detail.unwrap_or_default(),
            },
            _ => EventEffect::Mystery(rec.kind.clone()),
        }
    }
}

impl From<EventEffect> for EventEffectRecord {
    fn from(effect: EventEffect) -> Self {
        let mut rec = EventEffectRecord::default();
        match effect {
            EventEffect::Heal(n) => {
                rec.kind = Some("heal".into());
                rec.value = Some(n);
            }
            EventEffect::Trap(n) => {
                rec.kind = Some("trap".into());
                rec.value = Some(n);
            }
            EventEffect::Portal => rec.kind = Some("portal".into()),
            EventEffect::Buff { detail } => {
                rec.kind = Some("buff".into());
                rec.detail = Some(detail);
            }
            EventEffect::Mystery(kind) => rec.kind = kind,
        }
        rec
    }
}

impl From<ContentRecord> for Content {
    fn from(rec: ContentRecord) -> Self {
        match rec {
            ContentRecord::Treasure { reward } => Content::Treasure(Treasure { reward }),
            ContentRecord::Monster {
                name,
                health,
                attack,
            } => Content::Monster(Monster {
                name,
                health,
                attack,
            }),
            ContentRecord::Boss {
                name,
                health,
                attack,
                special_reward,
            } => Content::Boss(Boss {
                name,
                health,
                attack,
                special_reward,
            }),
            ContentRecord::Event {
                name,
                description,
                effect,
            } => Content::Event(Event {
                name,
                description,
                effect: effect.into(),
            }),
        }
    }
}

impl From<Content> for ContentRecord {
    fn from(content: Content) -> Self {
        match content {
            Content::Treasure(t) => ContentRecord::Treasure { reward: t.reward },
            Content::Monster(m) => ContentRecord::Monster {
                name: m.name,
                health: m.health,
                attack: m.attack,
            },
            Content::Boss(b) => ContentRecord::Boss {
                name: b.name,
                health: b.health,
                attack: b.attack,
                special_reward: b.special_reward,
            },
            Content::Event(e) => ContentRecord::Event {
                name: e.name,
                description: e.description,
                effect: e.effect.into(),
            },
        }
    }
}
