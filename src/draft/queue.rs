//! Pending draft requests
//!
//! Four independently fed FIFO queues. External batches carry a priority class
//! derived from the candidates they contain; the best class is served first
//! and ties go to the oldest batch.

use std::collections::VecDeque;

use crate::rarity::RarityTier;
use super::candidate::{Candidate, CandidateId, CandidateInstance, CandidateKind};

/// Monotonic request identity
pub type RequestId = u64;

/// Which producer a draft came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    LevelStageCore,
    LevelStageProjectile,
    Variant,
    ExternalBatch,
    ExternalCombinedBatch,
    /// Fire/Frost follow-up for a mine-style pick
    MineElement,
}

/// Serving priority, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityClass {
    Core,
    Projectile,
    Favour,
    Enemy,
    Other,
}

impl PriorityClass {
    /// Class for a single candidate kind
    pub fn for_kind(kind: CandidateKind) -> Self {
        match kind {
            CandidateKind::Core => PriorityClass::Core,
            CandidateKind::Projectile | CandidateKind::Active => PriorityClass::Projectile,
            CandidateKind::Favour => PriorityClass::Favour,
            CandidateKind::Enemy => PriorityClass::Enemy,
            CandidateKind::Other => PriorityClass::Other,
        }
    }

    /// Class of a batch: the best class among its candidates
    pub fn for_batch<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> Self {
        candidates
            .into_iter()
            .map(|c| Self::for_kind(c.kind))
            .min()
            .unwrap_or(PriorityClass::Other)
    }
}

/// What a request materializes into when opened
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// One pending level-up
    LevelUp,
    /// Variant choice for a candidate reaching an enhancement tier
    Variant { candidate_id: CandidateId, tier: u32 },
    /// Fixed offers presented as-is
    External { offers: Vec<CandidateInstance> },
    /// Sampled offers with a rarity floor
    Combined { candidates: Vec<Candidate>, min_rarity: RarityTier },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub priority: PriorityClass,
    pub payload: RequestPayload,
}

/// Queue lengths, for display and diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueLengths {
    pub level: usize,
    pub variant: usize,
    pub external: usize,
    pub combined: usize,
}

impl QueueLengths {
    pub fn total(&self) -> usize {
        self.level + self.variant + self.external + self.combined
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestQueueSet {
    level: VecDeque<DraftRequest>,
    variant: VecDeque<DraftRequest>,
    external: VecDeque<DraftRequest>,
    combined: VecDeque<DraftRequest>,
    next_id: RequestId,
}

impl RequestQueueSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> RequestId {
        self.next_id += 1;
        self.next_id
    }

    pub fn push_level_up(&mut self) -> RequestId {
        let id = self.next_id();
        self.level.push_back(DraftRequest {
            id,
            kind: RequestKind::LevelStageCore,
            priority: PriorityClass::Core,
            payload: RequestPayload::LevelUp,
        });
        id
    }

    /// Variants are served strictly in arrival order
    pub fn push_variant(&mut self, candidate_id: CandidateId, tier: u32) -> RequestId {
        let id = self.next_id();
        self.variant.push_back(DraftRequest {
            id,
            kind: RequestKind::Variant,
            priority: PriorityClass::Other,
            payload: RequestPayload::Variant { candidate_id, tier },
        });
        id
    }

    pub fn push_external(&mut self, offers: Vec<CandidateInstance>) -> RequestId {
        let id = self.next_id();
        let priority = PriorityClass::for_batch(offers.iter().map(|o| &o.candidate));
        self.external.push_back(DraftRequest {
            id,
            kind: RequestKind::ExternalBatch,
            priority,
            payload: RequestPayload::External { offers },
        });
        id
    }

    pub fn push_combined(&mut self, candidates: Vec<Candidate>, min_rarity: RarityTier) -> RequestId {
        let id = self.next_id();
        let priority = PriorityClass::for_batch(&candidates);
        self.combined.push_back(DraftRequest {
            id,
            kind: RequestKind::ExternalCombinedBatch,
            priority,
            payload: RequestPayload::Combined { candidates, min_rarity },
        });
        id
    }

    /// Pending level-up units
    pub fn level_len(&self) -> usize {
        self.level.len()
    }

    /// Drop up to `count` level-up units from the front (a finished batch)
    pub fn complete_levels(&mut self, count: usize) {
        let count = count.min(self.level.len());
        self.level.drain(..count);
    }

    pub fn pop_variant(&mut self) -> Option<DraftRequest> {
        self.variant.pop_front()
    }

    /// Take the best-priority external batch; ties go to the oldest
    ///
    /// Remaining batches keep their relative order.
    pub fn pop_best_external(&mut self) -> Option<DraftRequest> {
        let best = self
            .external
            .iter()
            .enumerate()
            .min_by_key(|(index, request)| (request.priority, *index))
            .map(|(index, _)| index)?;
        self.external.remove(best)
    }

    pub fn pop_combined(&mut self) -> Option<DraftRequest> {
        self.combined.pop_front()
    }

    pub fn lengths(&self) -> QueueLengths {
        QueueLengths {
            level: self.level.len(),
            variant: self.variant.len(),
            external: self.external.len(),
            combined: self.combined.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lengths().total() == 0
    }

    /// Drop every pending request
    pub fn clear(&mut self) {
        self.level.clear();
        self.variant.clear();
        self.external.clear();
        self.combined.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::candidate::Effect;

    fn offer(id: &str, kind: CandidateKind) -> CandidateInstance {
        Candidate::new(id, id, kind, RarityTier::Common, Effect::Favour { favour: id.into() })
            .instantiate(RarityTier::Common)
    }

    #[test]
    fn test_batch_priority_is_best_kind() {
        let enemy = offer("imp", CandidateKind::Enemy);
        let favour = offer("gift", CandidateKind::Favour);
        let class = PriorityClass::for_batch([&enemy.candidate, &favour.candidate]);
        assert_eq!(class, PriorityClass::Favour);
        assert_eq!(PriorityClass::for_batch(std::iter::empty::<&Candidate>()), PriorityClass::Other);
        assert_eq!(PriorityClass::for_kind(CandidateKind::Active), PriorityClass::Projectile);
    }

    #[test]
    fn test_external_priority_then_fifo() {
        let mut queues = RequestQueueSet::new();
        let first_enemy = queues.push_external(vec![offer("imp", CandidateKind::Enemy)]);
        let first_favour = queues.push_external(vec![offer("gift", CandidateKind::Favour)]);
        let second_enemy = queues.push_external(vec![offer("ghoul", CandidateKind::Enemy)]);
        let second_favour = queues.push_external(vec![offer("boon", CandidateKind::Favour)]);

        let order: Vec<RequestId> = std::iter::from_fn(|| queues.pop_best_external())
            .map(|r| r.id)
            .collect();
        assert_eq!(order, vec![first_favour, second_favour, first_enemy, second_enemy]);
    }

    #[test]
    fn test_complete_levels() {
        let mut queues = RequestQueueSet::new();
        for _ in 0..3 {
            queues.push_level_up();
        }
        queues.complete_levels(2);
        assert_eq!(queues.level_len(), 1);
        queues.complete_levels(5);
        assert_eq!(queues.level_len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut queues = RequestQueueSet::new();
        queues.push_level_up();
        queues.push_variant("blade".into(), 2);
        queues.push_external(vec![offer("imp", CandidateKind::Enemy)]);
        queues.push_combined(Vec::new(), RarityTier::Rare);
        assert_eq!(queues.lengths().total(), 4);

        queues.clear();
        assert!(queues.is_empty());
    }
}
