//! Constrained sampling without replacement
//!
//! Picks draft options from a candidate pool for a target rarity:
//! - first-time candidates are preferred over repeats
//! - exact-rarity and upgraded lower-rarity candidates split by `exact_weight`
//! - no match degrades the target one tier at a time, then falls back to any
//!   unused candidate at its own base rarity

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::rarity::{sample_tier, RarityOdds, RarityTier};
use super::candidate::{Candidate, CandidateId, CandidateInstance};
use super::exclusivity::ExclusivitySlot;
use super::history::DraftHistory;

/// Default chance (percent) of drawing from the exact-rarity group
pub const DEFAULT_EXACT_WEIGHT: f32 = 50.0;

/// Who may be offered at all
pub struct Eligibility<'a> {
    pub history: &'a DraftHistory,
    /// Host-side gate (unlock progress and the like)
    pub eligible: &'a dyn Fn(&Candidate) -> bool,
}

impl<'a> Eligibility<'a> {
    pub fn new(history: &'a DraftHistory, eligible: &'a dyn Fn(&Candidate) -> bool) -> Self {
        Self { history, eligible }
    }

    pub fn admits(&self, candidate: &Candidate) -> bool {
        self.history.under_limit(candidate) && (self.eligible)(candidate)
    }
}

/// Tier roll parameters for one draft
#[derive(Debug, Clone, Copy)]
pub struct TierRoll<'a> {
    pub odds: &'a RarityOdds,
    /// Restrict rolled tiers to this subset
    pub allowed: Option<&'a [RarityTier]>,
}

/// A successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick<'a> {
    pub candidate: &'a Candidate,
    pub rarity: RarityTier,
}

impl Pick<'_> {
    pub fn instantiate(&self) -> CandidateInstance {
        self.candidate.instantiate(self.rarity)
    }
}

#[derive(Debug, Clone)]
pub struct ConstrainedSampler {
    exact_weight: f32,
}

impl Default for ConstrainedSampler {
    fn default() -> Self {
        Self::new(DEFAULT_EXACT_WEIGHT)
    }
}

impl ConstrainedSampler {
    /// Create a sampler; `exact_weight` is a percentage
    pub fn new(exact_weight: f32) -> Self {
        let exact_weight = if exact_weight.is_finite() {
            exact_weight.clamp(0.0, 100.0)
        } else {
            DEFAULT_EXACT_WEIGHT
        };
        Self { exact_weight }
    }

    pub fn exact_weight(&self) -> f32 {
        self.exact_weight
    }

    /// Pick one candidate for `target`, binding the exclusivity slot if needed
    pub fn pick<'a>(
        &self,
        pool: &'a [Candidate],
        target: RarityTier,
        used: &HashSet<CandidateId>,
        gate: &Eligibility<'_>,
        slot: &mut ExclusivitySlot,
        rng: &mut impl Rng,
    ) -> Option<Pick<'a>> {
        let admissible =
            |c: &Candidate| !used.contains(&c.id) && slot.permits(c) && gate.admits(c);

        let mut tier = target;
        loop {
            let filtered: Vec<&Candidate> = pool
                .iter()
                .filter(|c| c.base_rarity <= tier && admissible(*c))
                .collect();

            if !filtered.is_empty() {
                let chosen = self.choose_within(&filtered, tier, gate.history, rng)?;
                return Some(Self::finish(chosen, tier, slot));
            }

            match tier.lower() {
                Some(lower) => tier = lower,
                None => break,
            }
        }

        // Nothing at or below the target: ignore the ceiling
        let remaining: Vec<&Candidate> = pool.iter().filter(|c| admissible(*c)).collect();
        let chosen = *remaining.choose(rng)?;
        let rarity = target.max(chosen.base_rarity);
        Some(Self::finish(chosen, rarity, slot))
    }

    /// First-time beats repeat; inside the group, exact vs upgraded by weight
    fn choose_within<'a>(
        &self,
        filtered: &[&'a Candidate],
        tier: RarityTier,
        history: &DraftHistory,
        rng: &mut impl Rng,
    ) -> Option<&'a Candidate> {
        let (first_time, repeat): (Vec<&Candidate>, Vec<&Candidate>) = filtered
            .iter()
            .copied()
            .partition(|c| history.is_first_time(&c.id));

        let group = if first_time.is_empty() { repeat } else { first_time };

        let (exact, upgraded): (Vec<&Candidate>, Vec<&Candidate>) =
            group.into_iter().partition(|c| c.base_rarity == tier);

        let bucket = match (exact.is_empty(), upgraded.is_empty()) {
            (false, false) => {
                if rng.gen_bool(f64::from(self.exact_weight) / 100.0) {
                    exact
                } else {
                    upgraded
                }
            }
            (false, true) => exact,
            _ => upgraded,
        };

        bucket.choose(rng).copied()
    }

    fn finish<'a>(candidate: &'a Candidate, rarity: RarityTier, slot: &mut ExclusivitySlot) -> Pick<'a> {
        slot.bind(candidate);
        Pick { candidate, rarity }
    }

    /// Draw up to `count` distinct options, rolling one tier per slot
    pub fn draw_options(
        &self,
        pool: &[Candidate],
        count: usize,
        roll: TierRoll<'_>,
        gate: &Eligibility<'_>,
        slot: &mut ExclusivitySlot,
        rng: &mut impl Rng,
    ) -> Vec<CandidateInstance> {
        let mut used = HashSet::new();
        let mut options = Vec::with_capacity(count);

        for _ in 0..count {
            let target = sample_tier(roll.odds, roll.allowed, rng);
            match self.pick(pool, target, &used, gate, slot, rng) {
                Some(pick) => {
                    used.insert(pick.candidate.id.clone());
                    options.push(pick.instantiate());
                }
                None => break,
            }
        }

        options
    }

    /// Top `options` up to `count` with repeat draws from the eligible pool
    ///
    /// Repeats are bound at their base rarity. Returns how many were added.
    pub fn fill_with_repeats(
        &self,
        pool: &[Candidate],
        options: &mut Vec<CandidateInstance>,
        count: usize,
        gate: &Eligibility<'_>,
        slot: &ExclusivitySlot,
        rng: &mut impl Rng,
    ) -> usize {
        let eligible: Vec<&Candidate> = pool
            .iter()
            .filter(|c| slot.permits(c) && gate.admits(c))
            .collect();

        let mut added = 0;
        while options.len() < count {
            match eligible.choose(rng) {
                Some(candidate) => {
                    options.push(candidate.instantiate(candidate.base_rarity));
                    added += 1;
                }
                None => break,
            }
        }
        added
    }
}
