//! Rarity tiers
//!
//! Ordered classification of option power and frequency.

use serde::{Deserialize, Serialize};

/// Rarity tiers, ordered from most common to rarest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    /// Only assigned directly by external offers (post-boss rewards)
    Boss,
}

/// Number of tiers the distribution produces (everything but Boss)
pub const DRAWABLE_TIERS: usize = 6;

impl RarityTier {
    /// Tiers the distribution can produce, in ascending order
    pub const DRAWABLE: [RarityTier; DRAWABLE_TIERS] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
        RarityTier::Mythic,
    ];

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
            RarityTier::Mythic => "Mythic",
            RarityTier::Boss => "Boss",
        }
    }

    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            RarityTier::Common => (200, 200, 200),
            RarityTier::Uncommon => (100, 255, 100),
            RarityTier::Rare => (100, 150, 255),
            RarityTier::Epic => (200, 100, 255),
            RarityTier::Legendary => (255, 180, 50),
            RarityTier::Mythic => (100, 255, 255),
            RarityTier::Boss => (255, 60, 60),
        }
    }

    /// Index into a probability table (Boss has none)
    pub fn index(&self) -> Option<usize> {
        match self {
            RarityTier::Boss => None,
            other => Some(*other as usize),
        }
    }

    /// Tier for a probability table index
    pub fn from_index(index: usize) -> Option<RarityTier> {
        Self::DRAWABLE.get(index).copied()
    }

    /// One tier down, or None at Common
    pub fn lower(&self) -> Option<RarityTier> {
        match self {
            RarityTier::Common => None,
            RarityTier::Uncommon => Some(RarityTier::Common),
            RarityTier::Rare => Some(RarityTier::Uncommon),
            RarityTier::Epic => Some(RarityTier::Rare),
            RarityTier::Legendary => Some(RarityTier::Epic),
            RarityTier::Mythic => Some(RarityTier::Legendary),
            RarityTier::Boss => Some(RarityTier::Mythic),
        }
    }

    /// Drawable tiers at or above this one
    pub fn at_least(&self) -> Vec<RarityTier> {
        Self::DRAWABLE.iter().copied().filter(|t| t >= self).collect()
    }
}

impl std::fmt::Display for RarityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
