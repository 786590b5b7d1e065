//! Draft candidates
//!
//! Immutable catalog entries and the runtime instances sampling produces.

use serde::{Deserialize, Serialize};

use crate::rarity::RarityTier;

/// Stable catalog identity
pub type CandidateId = String;

/// What kind of option a candidate is (drives batch priority)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Core stat upgrades offered by level-ups
    Core,
    /// Projectile weapons
    Projectile,
    /// Active abilities
    Active,
    /// Boons granted by external events
    Favour,
    /// Enemy unlocks
    Enemy,
    Other,
}

/// Element sub-choice for mine-style projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Frost,
}

impl Element {
    pub const ALL: [Element; 2] = [Element::Fire, Element::Frost];

    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Frost => "Frost",
        }
    }
}

/// Side effect applied when an option is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Raise a named stat by `per_tier` for each tier of assigned rarity (Common counts as one)
    StatBonus { stat: String, per_tier: f32 },
    /// Grant or upgrade a projectile
    Projectile { projectile: String },
    /// Modify an already owned option
    Variant { modifier: String },
    /// Unlock an enemy type
    UnlockEnemy { enemy: String },
    /// Grant a favour
    Favour { favour: String },
    /// Pick an element (follow-up drafts only)
    ChooseElement(Element),
}

/// Receiver of chosen effects
pub trait Actor {
    /// Apply an effect at the given rarity
    fn apply_effect(&mut self, effect: &Effect, rarity: RarityTier, element: Option<Element>);
}

/// An offerable option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: CandidateKind,
    /// Lowest tier at which the candidate may appear
    pub base_rarity: RarityTier,
    /// Progress key that must be unlocked before the candidate is eligible
    #[serde(default)]
    pub unlock: Option<String>,
    /// How many times it may be chosen per run (None = unlimited)
    #[serde(default)]
    pub max_picks: Option<u32>,
    /// Candidates sharing a group are mutually exclusive for the run
    #[serde(default)]
    pub exclusivity_group: Option<String>,
    /// Needs a Fire/Frost follow-up before it applies
    #[serde(default)]
    pub element_choice: bool,
    pub effect: Effect,
}

impl Candidate {
    /// Create a candidate with no gating
    pub fn new(
        id: impl Into<CandidateId>,
        name: impl Into<String>,
        kind: CandidateKind,
        base_rarity: RarityTier,
        effect: Effect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            base_rarity,
            unlock: None,
            max_picks: None,
            exclusivity_group: None,
            element_choice: false,
            effect,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unlock(mut self, key: impl Into<String>) -> Self {
        self.unlock = Some(key.into());
        self
    }

    pub fn with_max_picks(mut self, max: u32) -> Self {
        self.max_picks = Some(max);
        self
    }

    pub fn with_exclusivity_group(mut self, group: impl Into<String>) -> Self {
        self.exclusivity_group = Some(group.into());
        self
    }

    pub fn with_element_choice(mut self) -> Self {
        self.element_choice = true;
        self
    }

    /// Bind to a rarity, never below the base rarity
    pub fn instantiate(&self, rarity: RarityTier) -> CandidateInstance {
        CandidateInstance {
            candidate: self.clone(),
            rarity: rarity.max(self.base_rarity),
            element: None,
        }
    }
}

/// A candidate bound to an assigned rarity
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateInstance {
    pub candidate: Candidate,
    pub rarity: RarityTier,
    /// Chosen element, for candidates that need one
    pub element: Option<Element>,
}

impl CandidateInstance {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    /// Apply the effect to an actor
    pub fn apply(&self, actor: &mut dyn Actor) {
        actor.apply_effect(&self.candidate.effect, self.rarity, self.element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<(Effect, RarityTier, Option<Element>)>);

    impl Actor for Recorder {
        fn apply_effect(&mut self, effect: &Effect, rarity: RarityTier, element: Option<Element>) {
            self.0.push((effect.clone(), rarity, element));
        }
    }

    #[test]
    fn test_instantiate_never_below_base() {
        let candidate = Candidate::new(
            "blade",
            "Blade",
            CandidateKind::Projectile,
            RarityTier::Epic,
            Effect::Projectile { projectile: "blade".into() },
        );
        assert_eq!(candidate.instantiate(RarityTier::Common).rarity, RarityTier::Epic);
        assert_eq!(candidate.instantiate(RarityTier::Mythic).rarity, RarityTier::Mythic);
    }

    #[test]
    fn test_apply_forwards_to_actor() {
        let candidate = Candidate::new(
            "mine",
            "Mine",
            CandidateKind::Projectile,
            RarityTier::Rare,
            Effect::Projectile { projectile: "mine".into() },
        )
        .with_element_choice();
        let mut instance = candidate.instantiate(RarityTier::Rare);
        instance.element = Some(Element::Frost);

        let mut actor = Recorder(Vec::new());
        instance.apply(&mut actor);

        assert_eq!(actor.0.len(), 1);
        assert_eq!(actor.0[0].1, RarityTier::Rare);
        assert_eq!(actor.0[0].2, Some(Element::Frost));
    }
}
