//! Draftwell - Draft selection scheduler
//!
//! Rarity-weighted option drafts for level-ups, variant unlocks and external
//! offers, serialized so the player only ever sees one choice at a time.

pub mod rarity;
pub mod draft;
pub mod data;
pub mod progression;
pub mod game;
pub mod ui;

// Re-export commonly used types
pub use rarity::{distribution, sample_tier, RarityTier};
pub use draft::{
    Candidate, CandidateInstance, DraftError, DraftHost, DraftScheduler, OpenDraft,
    SchedulerState, SelectionSink,
};
pub use data::{Catalog, DataManager, DraftConfig};
pub use game::{Game, GameState};
