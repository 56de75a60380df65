//! Containment settings value object
//!
//! Read-only inputs to the predicates and tick routines. The core never
//! mutates them; a session is built with one `ContainmentSettings` and keeps
//! it until teardown.
//!
//! # Serialization
//!
//! Every field is defaulted so partial configuration files deserialize
//! cleanly. Content tables (effects, loot) are plain data and can be swapped
//! without touching code.

use serde::{Deserialize, Serialize};

use super::policy::PolicyMatcher;
use crate::weighted::WeightedChoice;
use crate::DomainError;

/// All configurable containment settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentSettings {
    pub policies: PolicySet,
    pub debug: DebugOverrides,
    pub effects: EffectCatalog,
    pub disposal: DisposalSettings,
    pub loot: LootTable,
}

impl ContainmentSettings {
    /// Reject tables that cannot produce sensible choices.
    pub fn validate(&self) -> Result<(), DomainError> {
        for cue in EffectCue::ALL {
            for category in self.effects.categories(cue) {
                if category.name.trim().is_empty() {
                    return Err(DomainError::validation(format!(
                        "{cue:?} effect category has an empty name"
                    )));
                }
                for entry in &category.entries {
                    if entry.name.trim().is_empty() {
                        return Err(DomainError::validation(format!(
                            "effect category '{}' has an entry with an empty name",
                            category.name
                        )));
                    }
                    if !entry.weight.is_finite() || entry.weight < 0.0 {
                        return Err(DomainError::validation(format!(
                            "effect '{}' has invalid weight {}",
                            entry.name, entry.weight
                        )));
                    }
                }
            }
        }
        for entry in &self.loot.entries {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(DomainError::validation(format!(
                    "loot '{}' has invalid weight {}",
                    entry.item, entry.weight
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Policies
// ============================================================================

/// Which entities may initiate or accept each kind of action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySet {
    pub can_contain: PolicyMatcher,
    pub can_be_contained: PolicyMatcher,
    pub can_process: PolicyMatcher,
    pub can_be_processed: PolicyMatcher,
    pub can_struggle: PolicyMatcher,
    pub can_opportunistic_contain: PolicyMatcher,
}

impl Default for PolicySet {
    fn default() -> Self {
        Self {
            can_contain: PolicyMatcher::everyone(),
            can_be_contained: PolicyMatcher::everyone(),
            can_process: PolicyMatcher::everyone(),
            can_be_processed: PolicyMatcher::everyone(),
            can_struggle: PolicyMatcher::everyone(),
            can_opportunistic_contain: PolicyMatcher::creatures_only(),
        }
    }
}

// ============================================================================
// Debug Overrides
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOverrides {
    /// Ignore holder capacity entirely.
    pub no_capacity_limit: bool,
    /// Report every fullness ratio as infinite.
    pub full_fullness: bool,
    /// Never layer occupants visually over their holder.
    pub no_layered_occupants: bool,
    /// Log per-step digestion and struggle rolls at info level.
    pub info: bool,
}

// ============================================================================
// Disposal
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisposalSettings {
    /// `true` finishes the occupant through the normal one-life damage path;
    /// `false` kills it directly.
    pub finishing_blow: bool,
}

impl Default for DisposalSettings {
    fn default() -> Self {
        Self {
            finishing_blow: true,
        }
    }
}

// ============================================================================
// Effect Catalog
// ============================================================================

/// Moments at which the core requests a presentation effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCue {
    Contain,
    Release,
    Ambient,
    Disposal,
}

impl EffectCue {
    pub const ALL: [EffectCue; 4] = [Self::Contain, Self::Release, Self::Ambient, Self::Disposal];
}

fn default_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// A single named effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Only offered when the holder carries this tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_tag: Option<String>,
}

impl EffectEntry {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            holder_tag: None,
        }
    }

    pub fn for_tag(mut self, tag: impl Into<String>) -> Self {
        self.holder_tag = Some(tag.into());
        self
    }
}

/// A toggleable group of effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectCategory {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub entries: Vec<EffectEntry>,
}

impl EffectCategory {
    pub fn new(name: impl Into<String>, entries: Vec<EffectEntry>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            entries,
        }
    }

    fn uniform(name: &str, effects: &[&str]) -> Self {
        Self::new(
            name,
            effects.iter().map(|e| EffectEntry::new(*e, 1.0)).collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectCatalog {
    pub contain: Vec<EffectCategory>,
    pub release: Vec<EffectCategory>,
    pub ambient: Vec<EffectCategory>,
    pub disposal: Vec<EffectCategory>,
}

impl EffectCatalog {
    /// A catalog with no effects at all.
    pub fn silent() -> Self {
        Self {
            contain: Vec::new(),
            release: Vec::new(),
            ambient: Vec::new(),
            disposal: Vec::new(),
        }
    }

    pub fn categories(&self, cue: EffectCue) -> &[EffectCategory] {
        match cue {
            EffectCue::Contain => &self.contain,
            EffectCue::Release => &self.release,
            EffectCue::Ambient => &self.ambient,
            EffectCue::Disposal => &self.disposal,
        }
    }

    pub fn categories_mut(&mut self, cue: EffectCue) -> &mut Vec<EffectCategory> {
        match cue {
            EffectCue::Contain => &mut self.contain,
            EffectCue::Release => &mut self.release,
            EffectCue::Ambient => &mut self.ambient,
            EffectCue::Disposal => &mut self.disposal,
        }
    }

    /// Toggle a category by name. Returns false when no such category exists.
    pub fn set_enabled(&mut self, cue: EffectCue, category: &str, enabled: bool) -> bool {
        match self
            .categories_mut(cue)
            .iter_mut()
            .find(|c| c.name == category)
        {
            Some(c) => {
                c.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Weighted candidates from every enabled category, filtered by holder tags.
    pub fn candidates(&self, cue: EffectCue, holder_tags: &[String]) -> WeightedChoice<String> {
        self.categories(cue)
            .iter()
            .filter(|c| c.enabled)
            .flat_map(|c| c.entries.iter())
            .filter(|e| match &e.holder_tag {
                Some(tag) => holder_tags.contains(tag),
                None => true,
            })
            .map(|e| (e.name.clone(), e.weight))
            .collect()
    }
}

impl Default for EffectCatalog {
    fn default() -> Self {
        Self {
            contain: vec![EffectCategory::uniform("gulping", &["Gulp"])],
            release: vec![EffectCategory::uniform("retching", &["Puke"])],
            ambient: vec![
                EffectCategory::uniform(
                    "gurgling",
                    &[
                        "afewlargergroans",
                        "agroan",
                        "blrp",
                        "blrrpgrougl",
                        "blrrrrp",
                        "brbrbrbrblrbrgblgr",
                        "burblegoingdown",
                        "burblingIthink",
                        "burblywhine",
                        "fewgroans",
                        "glorp",
                        "glorpgrowl",
                        "glowrpblorp",
                        "groooooorwp",
                        "gwouuurg",
                        "hardglrn",
                        "littlerumble-longer",
                        "littlerumble",
                        "singlebworb",
                        "singlegroan",
                        "someburbling-deeper",
                        "someburbling",
                        "somesquirts-take2",
                        "somesquirts",
                        "squirtsandgurgling",
                        "squirtsthenrumble",
                    ],
                ),
                EffectCategory::new(
                    "burping",
                    vec![
                        EffectEntry::new("burp", 0.5),
                        EffectEntry::new("burp-short", 0.5),
                        EffectEntry::new("wetbelch", 0.25),
                    ],
                ),
                EffectCategory::new(
                    "farting",
                    vec![EffectEntry::new("fart", 0.25), EffectEntry::new("toot", 1.0)],
                ),
            ],
            disposal: vec![
                EffectCategory::new(
                    "belching",
                    vec![
                        EffectEntry::new("BelchF", 1.0).for_tag("female"),
                        EffectEntry::new("BelchM", 1.0).for_tag("male"),
                        EffectEntry::new("wetbelch", 0.5),
                    ],
                ),
                EffectCategory::uniform("farting", &["fart-long", "fart"]),
            ],
        }
    }
}

// ============================================================================
// Loot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Entry only participates when the rolled chance reaches this percentage.
    #[serde(default)]
    pub min_chance: i32,
}

impl LootEntry {
    pub fn new(item: impl Into<String>, weight: f64, min_chance: i32) -> Self {
        Self {
            item: item.into(),
            weight,
            min_chance,
        }
    }
}

/// Fixed drop for holders carrying `holder_tag`, replacing the weighted pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootOverride {
    pub holder_tag: String,
    pub item: String,
}

impl LootOverride {
    pub fn new(holder_tag: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            holder_tag: holder_tag.into(),
            item: item.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTable {
    pub enabled: bool,
    pub entries: Vec<LootEntry>,
    /// First match wins.
    pub overrides: Vec<LootOverride>,
}

impl LootTable {
    /// Weighted candidates for a given chance percentage.
    pub fn candidates(&self, chance: i32) -> WeightedChoice<String> {
        self.entries
            .iter()
            .filter(|e| e.min_chance <= chance)
            .map(|e| (e.item.clone(), e.weight))
            .collect()
    }

    /// The fixed drop for a holder with `holder_tags`, if any override applies.
    pub fn override_for(&self, holder_tags: &[String]) -> Option<&str> {
        self.overrides
            .iter()
            .find(|o| holder_tags.contains(&o.holder_tag))
            .map(|o| o.item.as_str())
    }
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            enabled: true,
            entries: vec![
                LootEntry::new("soul_of_flight", 1.0, 0),
                LootEntry::new("soul_of_light", 1.0, 0),
                LootEntry::new("soul_of_night", 1.0, 0),
                LootEntry::new("soul_of_might", 1.0 / 3.0, 50),
                LootEntry::new("soul_of_sight", 1.0 / 3.0, 50),
                LootEntry::new("soul_of_fright", 1.0 / 3.0, 50),
            ],
            overrides: vec![LootOverride::new("celestial", "black_hole_fragment")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(ContainmentSettings::default().validate().is_ok());
    }

    #[test]
    fn negative_effect_weight_is_rejected() {
        let mut settings = ContainmentSettings::default();
        settings.effects.ambient[0].entries[0].weight = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn disabled_categories_offer_no_candidates() {
        let mut catalog = EffectCatalog::default();
        assert!(catalog.set_enabled(EffectCue::Contain, "gulping", false));
        assert!(catalog.candidates(EffectCue::Contain, &[]).is_empty());
        assert!(!catalog.set_enabled(EffectCue::Contain, "missing", false));
    }

    #[test]
    fn tag_gated_entries_need_the_holder_tag() {
        let catalog = EffectCatalog::default();
        let untagged = catalog.candidates(EffectCue::Disposal, &[]);
        let tagged = catalog.candidates(EffectCue::Disposal, &["female".to_string()]);
        assert_eq!(tagged.len(), untagged.len() + 1);
    }

    #[test]
    fn loot_candidates_respect_min_chance() {
        let loot = LootTable::default();
        assert_eq!(loot.candidates(30).len(), 3);
        assert_eq!(loot.candidates(50).len(), 6);
    }

    #[test]
    fn loot_override_matches_holder_tag() {
        let loot = LootTable::default();
        assert_eq!(loot.override_for(&[]), None);
        assert_eq!(
            loot.override_for(&["boss".to_string(), "celestial".to_string()]),
            Some("black_hole_fragment")
        );
    }

    #[test]
    fn partial_configuration_deserializes() {
        let json = r#"{ "debug": { "no_capacity_limit": true }, "disposal": { "finishing_blow": false } }"#;
        let settings: ContainmentSettings = serde_json::from_str(json).expect("valid json");
        assert!(settings.debug.no_capacity_limit);
        assert!(!settings.disposal.finishing_blow);
        assert_eq!(settings.loot, LootTable::default());
        assert!(!settings.policies.can_opportunistic_contain.players);
    }
}
