//! Run-scoped exclusivity slot
//!
//! At most one candidate from the exclusive group may be bound per run. Once
//! bound, every other member of that group is filtered out of sampling.

use super::candidate::{Candidate, CandidateId};

/// The bound identity and the group it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub group: String,
    pub id: CandidateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusivitySlot {
    bound: Option<Binding>,
}

impl ExclusivitySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.bound.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Whether sampling may offer this candidate
    pub fn permits(&self, candidate: &Candidate) -> bool {
        match (&self.bound, &candidate.exclusivity_group) {
            (Some(binding), Some(group)) => *group != binding.group || candidate.id == binding.id,
            _ => true,
        }
    }

    /// Bind to the candidate if it is exclusive and the slot is free
    ///
    /// Returns true when a new binding was made.
    pub fn bind(&mut self, candidate: &Candidate) -> bool {
        if self.bound.is_some() {
            return false;
        }
        match &candidate.exclusivity_group {
            Some(group) => {
                log::info!("Exclusivity slot bound to {} ({})", candidate.id, group);
                self.bound = Some(Binding {
                    group: group.clone(),
                    id: candidate.id.clone(),
                });
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::candidate::{CandidateKind, Effect};
    use crate::rarity::RarityTier;

    fn aspect(id: &str) -> Candidate {
        Candidate::new(
            id,
            id,
            CandidateKind::Core,
            RarityTier::Rare,
            Effect::Favour { favour: id.into() },
        )
        .with_exclusivity_group("aspect")
    }

    #[test]
    fn test_bind_once() {
        let mut slot = ExclusivitySlot::new();
        assert!(slot.bind(&aspect("storm")));
        assert!(!slot.bind(&aspect("ember")));
        assert_eq!(slot.binding().map(|b| b.id.as_str()), Some("storm"));
    }

    #[test]
    fn test_permits_only_bound_member() {
        let mut slot = ExclusivitySlot::new();
        let plain = Candidate::new(
            "hp",
            "Vitality",
            CandidateKind::Core,
            RarityTier::Common,
            Effect::StatBonus { stat: "hp".into(), per_tier: 5.0 },
        );
        assert!(slot.permits(&aspect("ember")));
        assert!(!slot.bind(&plain));

        slot.bind(&aspect("storm"));
        assert!(slot.permits(&aspect("storm")));
        assert!(!slot.permits(&aspect("ember")));
        assert!(slot.permits(&plain));
    }
}
