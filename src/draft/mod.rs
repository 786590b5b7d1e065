//! Draft scheduling
//!
//! Candidates, constrained sampling, request queues and the scheduler that
//! serializes every choice the player is offered.

pub mod candidate;
pub mod clock;
pub mod error;
pub mod exclusivity;
pub mod history;
pub mod queue;
pub mod sampler;
pub mod scheduler;
pub mod sink;

pub use candidate::{Actor, Candidate, CandidateId, CandidateInstance, CandidateKind, Effect, Element};
pub use error::DraftError;
pub use exclusivity::ExclusivitySlot;
pub use history::DraftHistory;
pub use queue::{PriorityClass, QueueLengths, RequestId, RequestKind};
pub use sampler::ConstrainedSampler;
pub use scheduler::{DraftId, DraftScheduler, OpenDraft, SchedulerState, StagePhase};
pub use sink::{DraftHost, SelectionSink};
