//! Combatant model.
//!
//! A combatant is one side of a match: a creature with health and defense
//! stats and a fixed, index-addressable catalogue of actions.

use serde::{Deserialize, Serialize};

/// Upper bound for health and defense.
pub const STAT_CAP: i32 = 100;

/// Health every combatant starts a match with.
pub const STARTING_HEALTH: i32 = 100;

/// A selectable move.
///
/// `power` is dealt to the opponent, `defense_gain` and `health_gain` go to
/// the combatant using it. All three are scaled by one multiplier drawn
/// from `random_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub power: f64,
    /// Closed `(min, max)` interval for the multiplier.
    pub random_range: (f64, f64),
    pub defense_gain: f64,
    pub health_gain: f64,
}

impl Action {
    /// Build an action, rejecting non-finite values, negative magnitudes or
    /// an inverted range.
    pub fn new(
        name: impl Into<String>,
        power: f64,
        random_range: (f64, f64),
        defense_gain: f64,
        health_gain: f64,
    ) -> Option<Self> {
        let (min, max) = random_range;
        let finite = [power, min, max, defense_gain, health_gain]
            .iter()
            .all(|v| v.is_finite());
        if !(finite && power >= 0.0 && min >= 0.0 && min <= max) {
            return None;
        }

        Some(Self {
            name: name.into(),
            power,
            random_range,
            defense_gain,
            health_gain,
        })
    }

    /// Damage with a fixed multiplier range and no self effect.
    pub(crate) fn strike(name: &str, power: f64, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            power,
            random_range: (min, max),
            defense_gain: 0.0,
            health_gain: 0.0,
        }
    }

    pub(crate) fn with_defense(mut self, gain: f64) -> Self {
        self.defense_gain = gain;
        self
    }

    pub(crate) fn with_heal(mut self, gain: f64) -> Self {
        self.health_gain = gain;
        self
    }

    /// No damage, only a self effect.
    pub fn is_pure_buff(&self) -> bool {
        self.power == 0.0 && (self.defense_gain != 0.0 || self.health_gain != 0.0)
    }

    /// Damage only.
    pub fn is_pure_attack(&self) -> bool {
        self.power > 0.0 && self.defense_gain == 0.0 && self.health_gain == 0.0
    }
}

/// One side's battling entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Reference to the underlying creature (token id)
    pub identity: String,

    /// Always within `[0, STAT_CAP]` in a stored snapshot
    pub health: i32,

    /// Always within `[0, STAT_CAP]`
    pub defense: i32,

    /// Move catalogue; the index is the move selector
    pub actions: Vec<Action>,
}

impl Combatant {
    /// Fresh combatant at full health with no defense.
    pub fn new(identity: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            identity: identity.into(),
            health: STARTING_HEALTH,
            defense: 0,
            actions,
        }
    }

    /// Look up an action by selector.
    pub fn action(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Built-in combatant for the first slot.
    pub fn default_first() -> Self {
        Self::new(
            "6600",
            vec![
                Action::strike("ice blast", 50.0, 0.1, 1.5),
                Action::strike("solidify", 0.0, 1.0, 1.0).with_defense(100.0),
                Action::strike("tackle", 20.0, 1.0, 1.0),
            ],
        )
    }

    /// Built-in combatant for the second slot.
    pub fn default_second() -> Self {
        Self::new(
            "763",
            vec![
                Action::strike("grass blast", 50.0, 0.1, 1.5),
                Action::strike("cacoon", 0.0, 1.0, 1.0).with_defense(100.0),
                Action::strike("tackle", 20.0, 1.0, 1.0),
            ],
        )
    }
}
