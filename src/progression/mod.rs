//! Progression systems

pub mod xp;
pub mod enhancement;

pub use xp::{Experience, xp_for_level, total_xp_for_level, level_title};
pub use enhancement::{enhancement_tier, tier_crossed, PICKS_PER_TIER, MAX_ENHANCEMENT_TIER};
