//! Per-run record of chosen options

use std::collections::{HashMap, HashSet};

use super::candidate::{Candidate, CandidateId};

/// What the player has chosen this run
#[derive(Debug, Clone, Default)]
pub struct DraftHistory {
    /// Times each candidate was chosen
    picks: HashMap<CandidateId, u32>,
    /// Variants already taken (never offered again)
    variants: HashSet<CandidateId>,
}

impl DraftHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chosen candidate
    pub fn record(&mut self, id: &str) {
        *self.picks.entry(id.to_string()).or_insert(0) += 1;
    }

    /// Record a chosen variant
    pub fn record_variant(&mut self, id: &str) {
        self.variants.insert(id.to_string());
        self.record(id);
    }

    pub fn times_picked(&self, id: &str) -> u32 {
        self.picks.get(id).copied().unwrap_or(0)
    }

    /// Never chosen before
    pub fn is_first_time(&self, id: &str) -> bool {
        self.times_picked(id) == 0
    }

    pub fn has_variant(&self, id: &str) -> bool {
        self.variants.contains(id)
    }

    /// Whether the candidate's stack limit still allows it
    pub fn under_limit(&self, candidate: &Candidate) -> bool {
        candidate
            .max_picks
            .map_or(true, |max| self.times_picked(&candidate.id) < max)
    }

    pub fn clear(&mut self) {
        self.picks.clear();
        self.variants.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::candidate::{CandidateKind, Effect};
    use crate::rarity::RarityTier;

    #[test]
    fn test_pick_limits() {
        let candidate = Candidate::new(
            "haste",
            "Haste",
            CandidateKind::Core,
            RarityTier::Common,
            Effect::StatBonus { stat: "speed".into(), per_tier: 1.0 },
        )
        .with_max_picks(2);

        let mut history = DraftHistory::new();
        assert!(history.is_first_time("haste"));
        history.record("haste");
        assert!(!history.is_first_time("haste"));
        assert!(history.under_limit(&candidate));
        history.record("haste");
        assert!(!history.under_limit(&candidate));
    }
}
