//! Luck-weighted rarity distribution
//!
//! Turns a base odds table and a luck value into a probability mass over the
//! six drawable tiers, and samples tiers from it.
//!
//! Luck is consumed in contiguous 80-unit stages. Stages 0-2 fully drain
//! Common, Uncommon and Rare in turn into the tiers above them using fixed
//! integer weight ratios. Stage 3 drains most of Epic into Legendary and
//! Mythic. Stage 4 drains Epic and Legendary further toward fixed floors so
//! both stay representable. Luck beyond 400 is saturated.

use rand::Rng;

use super::tier::{RarityTier, DRAWABLE_TIERS};

/// Probability (or percentage) per drawable tier, Common first
pub type RarityOdds = [f32; DRAWABLE_TIERS];

/// Width of one luck stage
pub const STAGE_WIDTH: f32 = 80.0;

/// Luck above this is saturated
pub const LUCK_CAP: f32 = 400.0;

/// Default base odds (percent)
pub const DEFAULT_BASE_ODDS: RarityOdds = [30.0, 29.0, 20.0, 15.0, 5.0, 1.0];

/// Weights for the tiers above each fully-draining stage's source tier
const STAGE_WEIGHTS: [&[f32]; 3] = [
    &[5.0, 4.0, 3.0, 2.0, 1.0], // Common -> Uncommon..Mythic (15 parts)
    &[4.0, 3.0, 2.0, 1.0],      // Uncommon -> Rare..Mythic (10 parts)
    &[3.0, 2.0, 1.0],           // Rare -> Epic..Mythic (6 parts)
];

/// Stage 3 weights: Epic -> Legendary, Mythic
const EPIC_DRAIN_WEIGHTS: [f32; 2] = [2.0, 1.0];

/// Share of Epic's stage-3 entry mass left after stage 3
const EPIC_STAGE3_FLOOR: f32 = 0.20;
/// Share of Epic's stage-3 entry mass left at saturation
const EPIC_STAGE4_FLOOR: f32 = 0.12;
/// Share of Legendary's stage-4 entry mass left at saturation
const LEGENDARY_STAGE4_FLOOR: f32 = 0.65;

const EPIC: usize = 3;
const LEGENDARY: usize = 4;
const MYTHIC: usize = 5;

/// Sum of a table, ignoring negative and non-finite entries
pub fn odds_total(odds: &RarityOdds) -> f32 {
    odds.iter().map(|p| sanitize(*p)).sum()
}

/// Convert a raw luck stat into distribution luck
pub fn effective_luck(raw_luck: f32, scale: f32) -> f32 {
    sanitize(raw_luck * scale)
}

/// Fraction of a stage's 80-unit window consumed by `luck`
fn stage_progress(luck: f32, stage: usize) -> f32 {
    let start = stage as f32 * STAGE_WIDTH;
    ((luck - start) / STAGE_WIDTH).clamp(0.0, 1.0)
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Spread `amount` over consecutive tiers starting at `first` by `weights`
fn spread(probs: &mut RarityOdds, amount: f32, first: usize, weights: &[f32]) {
    let parts: f32 = weights.iter().sum();
    for (offset, weight) in weights.iter().enumerate() {
        probs[first + offset] += amount * weight / parts;
    }
}

/// Compute the full rarity distribution for a luck value
///
/// The result is non-negative and sums to the total of `base` (normally 100).
pub fn distribution(base: &RarityOdds, luck: f32) -> RarityOdds {
    let mut probs = base.map(sanitize);
    let total_in: f32 = probs.iter().sum();
    let luck = sanitize(luck).min(LUCK_CAP);

    // Stages 0-2: drain the source tier completely across the window
    for (stage, weights) in STAGE_WEIGHTS.iter().enumerate() {
        let t = stage_progress(luck, stage);
        if t <= 0.0 {
            break;
        }
        let drained = probs[stage] * t;
        probs[stage] -= drained;
        spread(&mut probs, drained, stage + 1, weights);
    }

    // Stage 3: Epic down to a floor
    let epic_entry = probs[EPIC];
    let t = stage_progress(luck, 3);
    if t > 0.0 {
        let drained = epic_entry * (1.0 - EPIC_STAGE3_FLOOR) * t;
        probs[EPIC] -= drained;
        spread(&mut probs, drained, LEGENDARY, &EPIC_DRAIN_WEIGHTS);
    }

    // Stage 4: Epic and Legendary ease toward their floors, mass goes to Mythic
    let t = stage_progress(luck, 4);
    if t > 0.0 {
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        let epic_drain = epic_entry * (EPIC_STAGE3_FLOOR - EPIC_STAGE4_FLOOR) * eased;
        let legendary_drain = probs[LEGENDARY] * (1.0 - LEGENDARY_STAGE4_FLOOR) * eased;
        probs[EPIC] -= epic_drain;
        probs[LEGENDARY] -= legendary_drain;
        probs[MYTHIC] += epic_drain + legendary_drain;
    }

    // Rounding can leave tiny negatives behind
    for p in probs.iter_mut() {
        *p = sanitize(*p);
    }

    let total_out: f32 = probs.iter().sum();
    if total_out > 0.0 && total_in > 0.0 {
        let scale = total_in / total_out;
        for p in probs.iter_mut() {
            *p *= scale;
        }
    }

    probs
}

/// Sample a tier from a distribution, optionally restricted to `allowed`
///
/// Resolution walks the cumulative sum from Mythic down to Common. An allowed
/// subset with no weight falls back to unrestricted sampling; a table with no
/// weight at all yields Common.
pub fn sample_tier(
    probs: &RarityOdds,
    allowed: Option<&[RarityTier]>,
    rng: &mut impl Rng,
) -> RarityTier {
    let permitted = |tier: RarityTier| allowed.map_or(true, |set| set.contains(&tier));

    let total: f32 = RarityTier::DRAWABLE
        .iter()
        .enumerate()
        .filter(|(_, tier)| permitted(**tier))
        .map(|(i, _)| sanitize(probs[i]))
        .sum();

    if total <= 0.0 {
        if allowed.is_some() {
            return sample_tier(probs, None, rng);
        }
        return RarityTier::Common;
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last = RarityTier::Common;

    for (i, tier) in RarityTier::DRAWABLE.iter().enumerate().rev() {
        let weight = sanitize(probs[i]);
        if !permitted(*tier) || weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last = *tier;
        if roll < cumulative {
            return *tier;
        }
    }

    // Float drift past the final bucket
    last
}
