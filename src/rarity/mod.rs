//! Rarity tiers and the luck-weighted distribution

pub mod tier;
pub mod distribution;

pub use tier::{RarityTier, DRAWABLE_TIERS};
pub use distribution::{
    distribution, sample_tier, effective_luck, odds_total,
    RarityOdds, DEFAULT_BASE_ODDS, LUCK_CAP, STAGE_WIDTH,
};
