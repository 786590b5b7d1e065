//! Candidate catalog
//!
//! Immutable option definitions, loaded once at startup.

use serde::{Deserialize, Serialize};

use crate::draft::candidate::{Candidate, CandidateKind, Effect};
use crate::rarity::RarityTier;

/// Exclusivity group used by the aspect upgrades
pub const ASPECT_GROUP: &str = "aspect";

/// Variants offered when a candidate reaches an enhancement tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSet {
    pub candidate_id: String,
    pub tier: u32,
    pub variants: Vec<Candidate>,
}

/// Every draftable option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Core-stage level-up pool
    pub core: Vec<Candidate>,
    /// Projectile-stage level-up pool
    pub projectiles: Vec<Candidate>,
    /// Variant sets per (candidate, tier)
    #[serde(default)]
    pub variants: Vec<VariantSet>,
    /// Favour offers for external batches
    #[serde(default)]
    pub favours: Vec<Candidate>,
    /// Enemy unlock offers for external batches
    #[serde(default)]
    pub enemies: Vec<Candidate>,
}

impl Catalog {
    /// Find a top-level candidate by ID
    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.core
            .iter()
            .chain(self.projectiles.iter())
            .chain(self.favours.iter())
            .chain(self.enemies.iter())
            .find(|c| c.id == id)
    }

    /// Variant set for a candidate at a tier
    pub fn variant_set(&self, candidate_id: &str, tier: u32) -> Option<&VariantSet> {
        self.variants
            .iter()
            .find(|set| set.candidate_id == candidate_id && set.tier == tier)
    }

    /// Single-stage pool: core and projectiles together
    pub fn level_pool(&self) -> Vec<Candidate> {
        self.core.iter().chain(self.projectiles.iter()).cloned().collect()
    }
}

fn stat(id: &str, name: &str, rarity: RarityTier, stat: &str, per_tier: f32) -> Candidate {
    Candidate::new(
        id,
        name,
        CandidateKind::Core,
        rarity,
        Effect::StatBonus { stat: stat.into(), per_tier },
    )
}

fn projectile(id: &str, name: &str, rarity: RarityTier) -> Candidate {
    Candidate::new(
        id,
        name,
        CandidateKind::Projectile,
        rarity,
        Effect::Projectile { projectile: id.into() },
    )
}

fn variant(id: &str, name: &str, kind: CandidateKind, rarity: RarityTier, modifier: &str) -> Candidate {
    Candidate::new(id, name, kind, rarity, Effect::Variant { modifier: modifier.into() })
}

fn aspect(id: &str, name: &str) -> Candidate {
    Candidate::new(
        id,
        name,
        CandidateKind::Core,
        RarityTier::Rare,
        Effect::Favour { favour: id.into() },
    )
    .with_exclusivity_group(ASPECT_GROUP)
    .with_max_picks(1)
}

/// Built-in catalog
pub fn default_catalog() -> Catalog {
    use RarityTier::*;

    Catalog {
        core: vec![
            stat("vitality", "Vitality", Common, "max_hp", 10.0)
                .with_description("More maximum health"),
            stat("might", "Might", Common, "damage", 2.0)
                .with_description("Harder hits"),
            stat("haste", "Haste", Uncommon, "speed", 1.0)
                .with_description("Move and fire faster")
                .with_max_picks(5),
            stat("fortune", "Fortune", Uncommon, "luck", 8.0)
                .with_description("Rarer drafts"),
            stat("focus", "Focus", Rare, "cooldown", 3.0)
                .with_description("Shorter cooldowns")
                .with_max_picks(4),
            stat("bulwark", "Bulwark", Epic, "armor", 2.0)
                .with_description("Flat damage reduction"),
            stat("ascension", "Ascension", Mythic, "all", 1.0)
                .with_description("Everything, a little")
                .with_unlock("first_boss")
                .with_max_picks(1),
            aspect("aspect_storm", "Aspect of Storm").with_description("Lightning chains between foes"),
            aspect("aspect_ember", "Aspect of Ember").with_description("Hits leave burning ground"),
            aspect("aspect_tide", "Aspect of Tide").with_description("Hits push enemies back"),
        ],
        projectiles: vec![
            projectile("blade", "Spinning Blade", Common),
            projectile("bolt", "Arc Bolt", Uncommon),
            projectile("orb", "Void Orb", Rare),
            projectile("mine", "Proximity Mine", Rare).with_element_choice(),
            projectile("comet", "Comet", Epic).with_unlock("first_boss"),
        ],
        variants: vec![
            VariantSet {
                candidate_id: "blade".into(),
                tier: 1,
                variants: vec![
                    variant("blade_twin", "Twin Blades", CandidateKind::Projectile, Uncommon, "count+1"),
                    variant("blade_serrated", "Serrated Edge", CandidateKind::Projectile, Uncommon, "bleed"),
                    variant("blade_wide", "Wide Arc", CandidateKind::Projectile, Uncommon, "area+30%"),
                ],
            },
            VariantSet {
                candidate_id: "blade".into(),
                tier: 2,
                variants: vec![
                    variant("blade_storm", "Blade Storm", CandidateKind::Projectile, Epic, "orbit"),
                    variant("blade_return", "Boomerang", CandidateKind::Projectile, Rare, "return"),
                ],
            },
            VariantSet {
                candidate_id: "bolt".into(),
                tier: 1,
                variants: vec![
                    variant("bolt_chain", "Chain Bolt", CandidateKind::Projectile, Rare, "chain+2"),
                    variant("bolt_pierce", "Piercing Bolt", CandidateKind::Projectile, Uncommon, "pierce"),
                ],
            },
            VariantSet {
                candidate_id: "mine".into(),
                tier: 1,
                variants: vec![
                    variant("mine_cluster", "Cluster Mine", CandidateKind::Projectile, Rare, "split+3"),
                    variant("mine_sticky", "Sticky Mine", CandidateKind::Projectile, Uncommon, "attach"),
                ],
            },
        ],
        favours: vec![
            Candidate::new("favour_heal", "Mercy", CandidateKind::Favour, Common, Effect::Favour { favour: "heal".into() }),
            Candidate::new("favour_gold", "Avarice", CandidateKind::Favour, Uncommon, Effect::Favour { favour: "gold".into() }),
            Candidate::new("favour_reroll", "Second Chance", CandidateKind::Favour, Rare, Effect::Favour { favour: "reroll".into() }),
        ],
        enemies: vec![
            Candidate::new("enemy_wisp", "Wisp Swarm", CandidateKind::Enemy, Common, Effect::UnlockEnemy { enemy: "wisp".into() }),
            Candidate::new("enemy_brute", "Brute", CandidateKind::Enemy, Uncommon, Effect::UnlockEnemy { enemy: "brute".into() }),
            Candidate::new("enemy_lich", "Lich", CandidateKind::Enemy, Epic, Effect::UnlockEnemy { enemy: "lich".into() }),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_ids_unique() {
        let catalog = default_catalog();
        let mut ids = HashSet::new();
        let top_level = catalog
            .core
            .iter()
            .chain(catalog.projectiles.iter())
            .chain(catalog.favours.iter())
            .chain(catalog.enemies.iter());
        let variants = catalog.variants.iter().flat_map(|set| set.variants.iter());
        for candidate in top_level.chain(variants) {
            assert!(ids.insert(candidate.id.clone()), "duplicate id {}", candidate.id);
        }
    }

    #[test]
    fn test_variant_sets_reference_catalog() {
        let catalog = default_catalog();
        for set in &catalog.variants {
            assert!(catalog.find(&set.candidate_id).is_some(), "unknown {}", set.candidate_id);
        }
        assert!(catalog.variant_set("blade", 2).is_some());
        assert!(catalog.variant_set("blade", 3).is_none());
    }

    #[test]
    fn test_mine_needs_element() {
        let catalog = default_catalog();
        assert!(catalog.find("mine").map_or(false, |c| c.element_choice));
        assert_eq!(catalog.level_pool().len(), catalog.core.len() + catalog.projectiles.len());
    }
}
