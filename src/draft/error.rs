//! Draft error types
//!
//! Every variant is recovered where it arises; the scheduler logs them and
//! keeps running.

use thiserror::Error;

use super::queue::RequestKind;
use super::scheduler::DraftId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("base rarity odds sum to {total}, expected 100")]
    Configuration { total: f32 },

    #[error("no eligible candidates for {kind:?} draft")]
    EmptyPool { kind: RequestKind },

    #[error("only {filled} of {requested} unique options available")]
    ExhaustedSampling { requested: usize, filled: usize },

    #[error("draft {draft} is not open (stale resolution)")]
    StaleResolution { draft: DraftId },

    #[error("choice {choice} out of range for draft with {options} options")]
    InvalidChoice { choice: usize, options: usize },

    #[error("data error: {0}")]
    Data(String),
}
