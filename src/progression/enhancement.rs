//! Enhancement tiers
//!
//! Owned options grow stronger as they are picked again. Crossing a tier
//! boundary makes the option's variants draftable.

/// Picks of the same option per enhancement tier
pub const PICKS_PER_TIER: u32 = 2;

/// Highest tier that has variants
pub const MAX_ENHANCEMENT_TIER: u32 = 2;

/// Tier reached after `picks` picks
pub fn enhancement_tier(picks: u32) -> u32 {
    (picks / PICKS_PER_TIER).min(MAX_ENHANCEMENT_TIER)
}

/// The tier newly reached when going from `before` to `after` picks
pub fn tier_crossed(before: u32, after: u32) -> Option<u32> {
    let tier = enhancement_tier(after);
    (tier > enhancement_tier(before)).then_some(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(enhancement_tier(0), 0);
        assert_eq!(enhancement_tier(1), 0);
        assert_eq!(enhancement_tier(2), 1);
        assert_eq!(enhancement_tier(4), 2);
        assert_eq!(enhancement_tier(10), MAX_ENHANCEMENT_TIER);
    }

    #[test]
    fn test_tier_crossed_once() {
        assert_eq!(tier_crossed(1, 2), Some(1));
        assert_eq!(tier_crossed(2, 3), None);
        assert_eq!(tier_crossed(3, 4), Some(2));
        assert_eq!(tier_crossed(5, 6), None);
    }
}
