//! Demo session
//!
//! The player actor and the host side of the draft scheduler: luck, unlocks,
//! death, the gameplay time freeze, and the effects of resolved choices.

use std::collections::{BTreeMap, HashSet};

use crate::draft::{
    Actor, CandidateId, CandidateInstance, CandidateKind, DraftHost, DraftId, Effect, Element,
    OpenDraft, SelectionSink,
};
use crate::progression::{tier_crossed, Experience};
use crate::rarity::RarityTier;
use super::state::{GameMessage, MessageCategory};

/// Keep only this many messages
const MAX_MESSAGES: usize = 100;

/// Starting health
const BASE_HP: f32 = 100.0;

/// Effect multiplier for a rarity (Common counts as one tier)
pub fn rarity_multiplier(rarity: RarityTier) -> f32 {
    match rarity.index() {
        Some(index) => (index + 1) as f32,
        None => 8.0,
    }
}

/// Everything the player has drafted so far
#[derive(Debug, Clone)]
pub struct Player {
    pub experience: Experience,
    pub hp: f32,
    pub max_hp: f32,
    /// Raw luck stat, scaled by the scheduler
    pub luck: f32,
    pub gold: u32,
    /// Named stat totals from stat bonuses
    pub stats: BTreeMap<String, f32>,
    /// Picks per owned projectile
    pub projectiles: BTreeMap<CandidateId, u32>,
    /// Element chosen for element-bound projectiles
    pub elements: BTreeMap<CandidateId, Element>,
    pub modifiers: Vec<String>,
    pub favours: Vec<String>,
    pub enemies: Vec<String>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            experience: Experience::new(),
            hp: BASE_HP,
            max_hp: BASE_HP,
            luck: 0.0,
            gold: 0,
            stats: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            elements: BTreeMap::new(),
            modifiers: Vec::new(),
            favours: Vec::new(),
            enemies: Vec::new(),
        }
    }

    fn add_stat(&mut self, stat: &str, amount: f32) {
        match stat {
            "luck" => self.luck += amount,
            "max_hp" => {
                self.max_hp += amount;
                self.hp += amount;
            }
            "all" => {
                self.luck += amount;
                for value in self.stats.values_mut() {
                    *value += amount;
                }
            }
            other => *self.stats.entry(other.to_string()).or_insert(0.0) += amount,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for Player {
    fn apply_effect(&mut self, effect: &Effect, rarity: RarityTier, element: Option<Element>) {
        let mult = rarity_multiplier(rarity);
        match effect {
            Effect::StatBonus { stat, per_tier } => self.add_stat(stat, per_tier * mult),
            Effect::Projectile { projectile } => {
                *self.projectiles.entry(projectile.clone()).or_insert(0) += 1;
                if let Some(element) = element {
                    self.elements.insert(projectile.clone(), element);
                }
            }
            Effect::Variant { modifier } => self.modifiers.push(modifier.clone()),
            Effect::UnlockEnemy { enemy } => self.enemies.push(enemy.clone()),
            Effect::Favour { favour } => match favour.as_str() {
                "heal" => self.hp = self.max_hp,
                "gold" => self.gold += 25 * mult as u32,
                _ => self.favours.push(favour.clone()),
            },
            Effect::ChooseElement(_) => {}
        }
    }
}

/// Host state for one run
pub struct Session {
    pub player: Player,
    unlocked: HashSet<String>,
    dead: bool,
    time_paused: bool,
    messages: Vec<GameMessage>,
    /// Gameplay seconds (frozen while paused)
    elapsed: f32,
    /// Enhancement tiers reached since the last drain
    tier_events: Vec<(CandidateId, u32)>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            player: Player::new(),
            unlocked: HashSet::new(),
            dead: false,
            time_paused: false,
            messages: Vec::new(),
            elapsed: 0.0,
            tier_events: Vec::new(),
        }
    }

    pub fn is_time_paused(&self) -> bool {
        self.time_paused
    }

    /// Advance gameplay time; returns the seconds that actually elapsed
    pub fn advance_time(&mut self, delta_secs: f32) -> f32 {
        if self.time_paused {
            return 0.0;
        }
        self.elapsed += delta_secs;
        delta_secs
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn unlock(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.unlocked.insert(key.clone()) {
            log::info!("Unlocked {}", key);
            self.add_message(format!("Unlocked: {}", key), MessageCategory::Progress);
        }
    }

    pub fn kill(&mut self) {
        self.dead = true;
        self.player.hp = 0.0;
        self.add_message("You have fallen.", MessageCategory::Warning);
    }

    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    pub fn add_message(&mut self, text: impl Into<String>, category: MessageCategory) {
        self.messages.push(GameMessage {
            text: text.into(),
            timestamp: self.elapsed,
            category,
        });

        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSink for Session {
    fn on_resolved(&mut self, instance: &CandidateInstance) {
        let before = self.player.projectiles.get(instance.id()).copied().unwrap_or(0);
        instance.apply(&mut self.player);

        if instance.candidate.kind == CandidateKind::Projectile {
            let after = self.player.projectiles.get(instance.id()).copied().unwrap_or(0);
            if let Some(tier) = tier_crossed(before, after) {
                self.tier_events.push((instance.id().to_string(), tier));
                self.add_message(
                    format!("{} reached tier {}", instance.name(), tier),
                    MessageCategory::Progress,
                );
            }
        }

        let text = match instance.element {
            Some(element) => format!("Chose {} ({}, {})", instance.name(), instance.rarity, element.name()),
            None => format!("Chose {} ({})", instance.name(), instance.rarity),
        };
        self.add_message(text, MessageCategory::Draft);
    }
}

impl DraftHost for Session {
    fn luck(&self) -> f32 {
        self.player.luck
    }

    fn is_unlocked(&self, key: &str) -> bool {
        self.unlocked.contains(key)
    }

    fn is_player_dead(&self) -> bool {
        self.dead
    }

    fn pause_time(&mut self) {
        log::debug!("Gameplay time paused");
        self.time_paused = true;
    }

    fn resume_time(&mut self) {
        log::debug!("Gameplay time resumed");
        self.time_paused = false;
    }

    fn take_tier_events(&mut self) -> Vec<(CandidateId, u32)> {
        std::mem::take(&mut self.tier_events)
    }

    fn on_draft_opened(&mut self, draft: &OpenDraft) {
        self.add_message(
            format!("Choose one of {} options", draft.options.len()),
            MessageCategory::System,
        );
    }

    fn on_draft_closed(&mut self, draft: DraftId) {
        log::debug!("Draft {} closed", draft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_catalog;

    fn instance(id: &str, rarity: RarityTier) -> CandidateInstance {
        default_catalog().find(id).cloned().unwrap().instantiate(rarity)
    }

    #[test]
    fn test_stat_bonus_scales_with_rarity() {
        let mut session = Session::new();
        session.on_resolved(&instance("might", RarityTier::Common));
        session.on_resolved(&instance("might", RarityTier::Rare));
        assert_eq!(session.player.stats.get("damage"), Some(&8.0));

        session.on_resolved(&instance("fortune", RarityTier::Uncommon));
        assert_eq!(session.luck(), 16.0);
    }

    #[test]
    fn test_projectile_tiers_reported_once() {
        let mut session = Session::new();
        for _ in 0..3 {
            session.on_resolved(&instance("blade", RarityTier::Common));
        }
        assert_eq!(session.take_tier_events(), vec![("blade".to_string(), 1)]);
        assert!(session.take_tier_events().is_empty());

        session.on_resolved(&instance("blade", RarityTier::Common));
        assert_eq!(session.take_tier_events(), vec![("blade".to_string(), 2)]);
    }

    #[test]
    fn test_element_recorded() {
        let mut session = Session::new();
        let mut mine = instance("mine", RarityTier::Rare);
        mine.element = Some(Element::Fire);
        session.on_resolved(&mine);
        assert_eq!(session.player.elements.get("mine"), Some(&Element::Fire));
    }

    #[test]
    fn test_time_freezes_while_paused() {
        let mut session = Session::new();
        assert_eq!(session.advance_time(1.0), 1.0);
        session.pause_time();
        assert_eq!(session.advance_time(1.0), 0.0);
        session.resume_time();
        session.advance_time(0.5);
        assert_eq!(session.elapsed(), 1.5);
    }

    #[test]
    fn test_unlock_gates_eligibility() {
        let mut session = Session::new();
        let comet = default_catalog().find("comet").cloned().unwrap();
        assert!(!session.is_eligible(&comet));
        session.unlock("first_boss");
        assert!(session.is_eligible(&comet));
    }
}
