//! Tunable battle rules.

use serde::{Deserialize, Serialize};

use super::combatant::{STARTING_HEALTH, STAT_CAP};

/// Stat caps applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRules")]
pub struct BattleRules {
    /// Health never rises above this
    pub max_health: i32,
    /// Defense never rises above this
    pub max_defense: i32,
}

impl BattleRules {
    pub fn new() -> Self {
        Self {
            max_health: STAT_CAP,
            max_defense: STAT_CAP,
        }
    }

    /// Parse rules from JSON; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Health cap must leave room for a fresh combatant, defense cap must
    /// not be negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_health < STARTING_HEALTH {
            return Err(format!(
                "max_health {} is below starting health {}",
                self.max_health, STARTING_HEALTH
            ));
        }
        if self.max_defense < 0 {
            return Err(format!("max_defense {} is negative", self.max_defense));
        }
        Ok(())
    }
}

/// Unchecked wire form of [`BattleRules`].
#[derive(Deserialize)]
#[serde(default)]
struct RawRules {
    max_health: i32,
    max_defense: i32,
}

impl Default for RawRules {
    fn default() -> Self {
        Self {
            max_health: STAT_CAP,
            max_defense: STAT_CAP,
        }
    }
}

impl TryFrom<RawRules> for BattleRules {
    type Error = String;

    fn try_from(raw: RawRules) -> Result<Self, Self::Error> {
        let rules = Self {
            max_health: raw.max_health,
            max_defense: raw.max_defense,
        };
        rules.validate()?;
        Ok(rules)
    }
}

impl Default for BattleRules {
    fn default() -> Self {
        Self::new()
    }
}
