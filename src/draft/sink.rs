//! Host-side contract
//!
//! The scheduler never owns the player, the clock or the UI. It reaches them
//! through these traits, called only from `DraftScheduler::tick`.

use super::candidate::{Candidate, CandidateId, CandidateInstance};
use super::scheduler::{DraftId, OpenDraft};

/// Receives resolved choices
pub trait SelectionSink {
    /// Called exactly once per resolved draft with the chosen instance
    fn on_resolved(&mut self, instance: &CandidateInstance);
}

/// Everything the scheduler needs from the game session
pub trait DraftHost: SelectionSink {
    /// Raw luck stat (the scheduler applies the luck scale)
    fn luck(&self) -> f32;

    /// Whether an unlock key has been reached
    fn is_unlocked(&self, key: &str) -> bool;

    /// Player death forces every draft closed
    fn is_player_dead(&self) -> bool;

    /// Freeze gameplay time while drafts are shown
    fn pause_time(&mut self);

    /// Release the freeze taken by `pause_time`
    fn resume_time(&mut self);

    /// Enhancement tiers reached by the choices delivered so far, oldest first
    fn take_tier_events(&mut self) -> Vec<(CandidateId, u32)> {
        Vec::new()
    }

    /// A draft became visible
    fn on_draft_opened(&mut self, _draft: &OpenDraft) {}

    /// A draft left the screen (resolved or force-closed)
    fn on_draft_closed(&mut self, _draft: DraftId) {}

    /// Catalog eligibility: unlock gating
    fn is_eligible(&self, candidate: &Candidate) -> bool {
        candidate
            .unlock
            .as_deref()
            .map_or(true, |key| self.is_unlocked(key))
    }
}
