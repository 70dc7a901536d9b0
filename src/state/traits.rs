//! Combatant resolution from trait sheets.
//!
//! A combatant reference (a token id) points at a metadata sheet listing the
//! creature's traits. Each recognised `(trait_type, value)` pair grants one
//! action. Resolution is total from the engine's point of view: anything
//! that goes wrong falls back to a built-in combatant.

use std::collections::HashMap;

use serde::Deserialize;

use super::combatant::{Action, Combatant};

/// A single entry of a trait sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TraitAttribute {
    pub trait_type: String,
    pub value: String,
}

/// Metadata sheet for one creature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraitSheet {
    #[serde(default)]
    pub attributes: Vec<TraitAttribute>,
}

impl TraitSheet {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Actions granted by this sheet, in sheet order.
    pub fn actions(&self) -> Vec<Action> {
        self.attributes
            .iter()
            .filter_map(|attr| trait_action(&attr.trait_type, &attr.value))
            .collect()
    }
}

/// Map one trait to the action it grants.
pub fn trait_action(trait_type: &str, value: &str) -> Option<Action> {
    match trait_type {
        "body" => body_action(value),
        "chest" => chest_action(value),
        "eyes" => eyes_action(value),
        "feet" => feet_action(value),
        _ => None,
    }
}

fn body_action(value: &str) -> Option<Action> {
    let action = match value {
        "teal" => Action::strike("water gun", 60.0, 0.3, 1.2),
        "lime green" => Action::strike("fresh cut", 65.0, 0.2, 1.1),
        "light green" => Action::strike("blade runner", 70.0, 0.5, 1.0),
        "gray" => Action::strike("tackle", 20.0, 1.0, 1.0),
        "green" => Action::strike("grass blast", 50.0, 0.1, 1.5),
        "yellow" => Action::strike("sunny day", 20.0, 0.1, 5.0),
        "aqua" => Action::strike("aqua mist", 60.0, 0.5, 1.0),
        "blue" => Action::strike("wave", 60.0, 0.4, 1.2),
        "red" => Action::strike("fire spin", 20.0, 1.0, 5.0),
        "purple" => Action::strike("purple nurple", 50.0, 0.8, 1.0),
        "pink" => Action::strike("nail polish", 10.0, 1.0, 10.0),
        // Gradient bodies trade damage for a shield
        "purple linear gradient" => gradient("royal grab", 10.0),
        "orange linear gradient" => gradient("orange squeeze", 10.0),
        "yellow linear gradient" => gradient("lemon squeeze", 10.0),
        "blue linear gradient" => gradient("blueberry pop", 10.0),
        "pink linear gradient" => gradient("pinky poke", 10.0),
        "green linear gradient" => gradient("rad grab", 10.0),
        "grayspace linear gradient" => gradient("thrust", 30.0),
        "rainbow" => gradient("rainbow punch", 30.0),
        _ => return None,
    };
    Some(action)
}

fn gradient(name: &str, power: f64) -> Action {
    Action::strike(name, power, 1.0, 1.0).with_defense(30.0)
}

fn chest_action(value: &str) -> Option<Action> {
    let name = match value {
        "orangered" | "orange" => "solidify",
        "light gray" | "gray" => "rock solid",
        "green" | "purple" => "cacoon",
        "aqua" | "blue" | "light blue" => "water shield",
        "pink" => "fur coat",
        "yellow" => "sun screen",
        _ => return None,
    };
    Some(Action::strike(name, 0.0, 1.0, 1.0).with_defense(50.0))
}

fn eyes_action(value: &str) -> Option<Action> {
    match value {
        "lazer" => Some(Action::strike("lazer beam", 100.0, 0.1, 1.0)),
        "white" | "light gray" | "purple" | "yellow" | "blue" | "dark red" | "dark gray"
        | "green" | "orange" | "red" | "green red" | "blue yellow" => {
            Some(Action::strike("tackle", 0.0, 1.0, 1.0).with_defense(20.0))
        }
        _ => None,
    }
}

fn feet_action(value: &str) -> Option<Action> {
    match value {
        "normal" | "rocket boots" | "hoverboard" | "skateboard" => {
            Some(Action::strike("heal", 0.0, 0.1, 1.0).with_heal(100.0))
        }
        _ => None,
    }
}

/// Source of raw trait sheets, keyed by combatant reference.
pub trait MetadataSource {
    /// Raw JSON sheet, or `None` when the reference is unknown or the
    /// source is unavailable.
    fn fetch(&self, combatant_ref: &str) -> Option<String>;
}

/// Resolves a combatant reference to a combatant.
pub trait AttributeLookup {
    fn resolve(&self, combatant_ref: &str) -> Option<Combatant>;
}

/// Lookup that never resolves anything; every slot gets its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl AttributeLookup for NoLookup {
    fn resolve(&self, _combatant_ref: &str) -> Option<Combatant> {
        None
    }
}

/// Lookup backed by trait sheets from a [`MetadataSource`].
#[derive(Debug, Clone, Default)]
pub struct TraitLookup<S> {
    source: S,
}

impl<S: MetadataSource> TraitLookup<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: MetadataSource> AttributeLookup for TraitLookup<S> {
    fn resolve(&self, combatant_ref: &str) -> Option<Combatant> {
        let raw = self.source.fetch(combatant_ref)?;
        let sheet = match TraitSheet::from_json(&raw) {
            Ok(sheet) => sheet,
            Err(err) => {
                tracing::warn!(combatant_ref, error = %err, "malformed trait sheet");
                return None;
            }
        };

        let actions = sheet.actions();
        if actions.is_empty() {
            return None;
        }

        Some(Combatant::new(combatant_ref, actions))
    }
}

/// In-memory metadata, keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    sheets: HashMap<String, String>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, combatant_ref: impl Into<String>, raw: impl Into<String>) -> Self {
        self.sheets.insert(combatant_ref.into(), raw.into());
        self
    }
}

impl MetadataSource for StaticMetadata {
    fn fetch(&self, combatant_ref: &str) -> Option<String> {
        self.sheets.get(combatant_ref).cloned()
    }
}

/// Resolve an optional reference, falling back to `fallback` on absence or
/// lookup failure. Never fails.
pub fn resolve_or_default<L: AttributeLookup + ?Sized>(
    lookup: &L,
    combatant_ref: Option<&str>,
    fallback: fn() -> Combatant,
) -> Combatant {
    let Some(combatant_ref) = combatant_ref else {
        return fallback();
    };

    match lookup.resolve(combatant_ref) {
        Some(combatant) => combatant,
        None => {
            tracing::warn!(combatant_ref, "combatant lookup failed, using default");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHEET: &str = r#"{
        "name": "Tiny Dino #42",
        "attributes": [
            {"trait_type": "background", "value": "sky"},
            {"trait_type": "body", "value": "teal"},
            {"trait_type": "chest", "value": "pink"},
            {"trait_type": "eyes", "value": "lazer"},
            {"trait_type": "feet", "value": "skateboard"}
        ]
    }"#;

    fn names(combatant: &Combatant) -> Vec<&str> {
        combatant.actions.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_sheet_actions_in_order() {
        let sheet = TraitSheet::from_json(SHEET).unwrap();
        let actions = sheet.actions();
        let names: Vec<&str> = actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["water gun", "fur coat", "lazer beam", "heal"]);

        assert_eq!(actions[0].random_range, (0.3, 1.2));
        assert_eq!(actions[1].defense_gain, 50.0);
        assert_eq!(actions[3].health_gain, 100.0);
    }

    #[test]
    fn test_trait_action_unknown() {
        assert!(trait_action("body", "plaid").is_none());
        assert!(trait_action("hat", "teal").is_none());
        assert_eq!(
            trait_action("body", "rainbow"),
            Some(Action::strike("rainbow punch", 30.0, 1.0, 1.0).with_defense(30.0))
        );
    }

    #[test]
    fn test_trait_lookup_resolves() {
        let lookup = TraitLookup::new(StaticMetadata::new().with_sheet("42", SHEET));
        let combatant = lookup.resolve("42").unwrap();

        assert_eq!(combatant.identity, "42");
        assert_eq!(combatant.health, 100);
        assert_eq!(combatant.defense, 0);
        assert_eq!(names(&combatant), vec!["water gun", "fur coat", "lazer beam", "heal"]);

        // Same input, same output
        assert_eq!(lookup.resolve("42"), Some(combatant));
    }

    #[test]
    fn test_trait_lookup_failures() {
        let lookup = TraitLookup::new(
            StaticMetadata::new()
                .with_sheet("broken", "{not json")
                .with_sheet("bare", r#"{"attributes": [{"trait_type": "hat", "value": "cap"}]}"#),
        );

        assert!(lookup.resolve("missing").is_none());
        assert!(lookup.resolve("broken").is_none());
        assert!(lookup.resolve("bare").is_none());
    }

    #[test]
    fn test_resolve_or_default() {
        let lookup = TraitLookup::new(StaticMetadata::new().with_sheet("42", SHEET));

        let resolved = resolve_or_default(&lookup, Some("42"), Combatant::default_first);
        assert_eq!(resolved.identity, "42");

        let missing = resolve_or_default(&lookup, Some("7"), Combatant::default_first);
        assert_eq!(missing, Combatant::default_first());

        let absent = resolve_or_default(&NoLookup, None, Combatant::default_second);
        assert_eq!(absent, Combatant::default_second());
    }
}
