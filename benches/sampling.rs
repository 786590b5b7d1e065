//! Rarity distribution and option sampling benchmarks

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::SeedableRng;

use draftwell::data::default_catalog;
use draftwell::draft::sampler::{ConstrainedSampler, Eligibility, TierRoll};
use draftwell::draft::{Candidate, DraftHistory, ExclusivitySlot};
use draftwell::rarity::{distribution, sample_tier, DEFAULT_BASE_ODDS};

fn bench_distribution(c: &mut Criterion) {
    c.bench_function("distribution_luck_sweep", |b| {
        b.iter(|| {
            for luck in (0..=400).step_by(10) {
                black_box(distribution(black_box(&DEFAULT_BASE_ODDS), luck as f32));
            }
        })
    });
}

fn bench_sample_tier(c: &mut Criterion) {
    let odds = distribution(&DEFAULT_BASE_ODDS, 120.0);
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("sample_tier_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(sample_tier(&odds, None, &mut rng));
            }
        })
    });
}

fn bench_draw_options(c: &mut Criterion) {
    let catalog = default_catalog();
    let pool = catalog.level_pool();
    let odds = distribution(&DEFAULT_BASE_ODDS, 60.0);
    let sampler = ConstrainedSampler::default();
    let history = DraftHistory::new();
    let eligible = |c: &Candidate| c.unlock.is_none();
    let gate = Eligibility::new(&history, &eligible);
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("draw_options_3", |b| {
        b.iter(|| {
            let mut slot = ExclusivitySlot::new();
            let roll = TierRoll { odds: &odds, allowed: None };
            black_box(sampler.draw_options(&pool, 3, roll, &gate, &mut slot, &mut rng));
        })
    });
}

criterion_group!(benches, bench_distribution, bench_sample_tier, bench_draw_options);
criterion_main!(benches);
