//! Draft configuration

use serde::{Deserialize, Serialize};

use crate::draft::DraftError;
use crate::draft::sampler::DEFAULT_EXACT_WEIGHT;
use crate::rarity::{odds_total, RarityOdds, DEFAULT_BASE_ODDS};

/// Tolerance when checking that base odds add up to 100
const ODDS_TOLERANCE: f32 = 0.01;

/// Tunables for drafting and presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Base percentages per tier, Common first (should sum to 100)
    pub base_odds: RarityOdds,
    /// Chance (percent) of sampling the exact-rarity group over upgraded ones
    pub exact_weight: f32,
    /// Options per level-stage or combined draft
    pub option_count: usize,
    /// Options per variant draft
    pub variant_option_count: usize,
    /// Seconds before each level or external draft opens
    pub presentation_delay: f32,
    /// Seconds between the core and projectile phases
    pub inter_stage_delay: f32,
    /// Seconds before each variant draft opens
    pub variant_delay: f32,
    /// Run a projectile phase after the core phase
    pub two_stage: bool,
    /// Fill short drafts with repeat draws instead of showing fewer options
    pub duplicate_fill: bool,
    /// Multiplier from the raw luck stat to distribution luck
    pub luck_scale: f32,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            base_odds: DEFAULT_BASE_ODDS,
            exact_weight: DEFAULT_EXACT_WEIGHT,
            option_count: 3,
            variant_option_count: 3,
            presentation_delay: 0.35,
            inter_stage_delay: 0.5,
            variant_delay: 0.25,
            two_stage: true,
            duplicate_fill: true,
            luck_scale: 0.5,
        }
    }
}

impl DraftConfig {
    /// Check the odds table; sampling still works over the actual weights
    pub fn validate(&self) -> Result<(), DraftError> {
        let total = odds_total(&self.base_odds);
        if (total - 100.0).abs() > ODDS_TOLERANCE {
            return Err(DraftError::Configuration { total });
        }
        Ok(())
    }

    /// Zero delays everywhere (tests and headless runs)
    pub fn instant(mut self) -> Self {
        self.presentation_delay = 0.0;
        self.inter_stage_delay = 0.0;
        self.variant_delay = 0.0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DraftConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_odds_reported() {
        let config = DraftConfig {
            base_odds: [50.0, 20.0, 10.0, 5.0, 0.0, 0.0],
            ..DraftConfig::default()
        };
        assert_eq!(config.validate(), Err(DraftError::Configuration { total: 85.0 }));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: DraftConfig = ron::from_str("(exact_weight: 75.0, two_stage: false)").unwrap();
        assert_eq!(config.exact_weight, 75.0);
        assert!(!config.two_stage);
        assert_eq!(config.option_count, 3);
        assert_eq!(config.base_odds, DEFAULT_BASE_ODDS);
    }
}
