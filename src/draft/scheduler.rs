//! Draft scheduler
//!
//! Tick-driven state machine that serializes every player-facing draft.
//! Exactly one draft is ever open. Producers enqueue requests at any time;
//! the scheduler drains them in this order:
//!
//! 1. a pending Fire/Frost follow-up (opened immediately)
//! 2. the active level batch (core phase, then projectile phase), with full
//!    variant drains at phase boundaries
//! 3. variant requests
//! 4. new level batches
//! 5. external batches (best priority first), then combined batches
//!
//! All waiting is explicit state polled on each `tick`.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::{Catalog, DraftConfig};
use crate::rarity::{distribution, effective_luck, RarityTier};
use super::candidate::{Candidate, CandidateInstance, CandidateKind, Effect, Element};
use super::clock::DraftClock;
use super::error::DraftError;
use super::exclusivity::ExclusivitySlot;
use super::history::DraftHistory;
use super::queue::{
    DraftRequest, QueueLengths, RequestId, RequestKind, RequestPayload,
    RequestQueueSet,
};
use super::sampler::{ConstrainedSampler, Eligibility, TierRoll};
use super::sink::DraftHost;

/// Identity of an opened draft
pub type DraftId = u64;

/// Upper bound on transitions per tick
const MAX_STEPS_PER_TICK: usize = 32;

/// Level batch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagePhase {
    Core,
    Projectile,
}

impl StagePhase {
    fn request_kind(self) -> RequestKind {
        match self {
            StagePhase::Core => RequestKind::LevelStageCore,
            StagePhase::Projectile => RequestKind::LevelStageProjectile,
        }
    }
}

/// Externally visible scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    Idle,
    StageOpen(StagePhase),
    VariantOpen,
    ExternalOpen,
    MineElementOpen,
}

impl SchedulerState {
    fn for_kind(kind: RequestKind) -> Self {
        match kind {
            RequestKind::LevelStageCore => SchedulerState::StageOpen(StagePhase::Core),
            RequestKind::LevelStageProjectile => SchedulerState::StageOpen(StagePhase::Projectile),
            RequestKind::Variant => SchedulerState::VariantOpen,
            RequestKind::ExternalBatch | RequestKind::ExternalCombinedBatch => {
                SchedulerState::ExternalOpen
            }
            RequestKind::MineElement => SchedulerState::MineElementOpen,
        }
    }
}

/// A draft on screen, awaiting the player's choice
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDraft {
    pub id: DraftId,
    pub kind: RequestKind,
    pub options: Vec<CandidateInstance>,
    /// Queued request this draft came from (level and follow-up drafts have none)
    pub request: Option<RequestId>,
}

/// Progress through one level batch
#[derive(Debug, Clone, Copy)]
struct LevelBatch {
    /// Level units snapshotted when the batch started
    size: usize,
    phase: StagePhase,
    /// Drafts finished in the current phase
    done: usize,
    /// Variant queue must be emptied before the batch moves on
    drain_variants: bool,
}

/// A draft waiting to be materialized
#[derive(Debug, Clone)]
enum PendingDraft {
    Level(StagePhase),
    Request(DraftRequest),
}

impl PendingDraft {
    fn kind(&self) -> RequestKind {
        match self {
            PendingDraft::Level(phase) => phase.request_kind(),
            PendingDraft::Request(request) => request.kind,
        }
    }
}

/// A mine-style pick waiting for its element
#[derive(Debug, Clone)]
struct FollowUp {
    instance: CandidateInstance,
    origin: RequestKind,
}

/// Current suspension point
#[derive(Debug, Clone)]
enum Step {
    /// Free to schedule the next draft
    Ready,
    /// Presentation delay before materializing
    Delay { until: f64, pending: PendingDraft },
    /// Pause between the core and projectile phases
    Interlude { until: f64 },
    /// On screen, waiting for `resolve`
    Open(OpenDraft),
    /// Chosen; applied on the next tick
    Resolved { draft: OpenDraft, choice: usize },
}

/// Serializes level-up, variant and external drafts for one game session
pub struct DraftScheduler {
    config: DraftConfig,
    catalog: Arc<Catalog>,
    /// Core and projectiles together, for single-stage mode
    level_pool: Arc<[Candidate]>,
    sampler: ConstrainedSampler,
    queues: RequestQueueSet,
    history: DraftHistory,
    exclusivity: ExclusivitySlot,
    clock: DraftClock,
    rng: StdRng,
    step: Step,
    batch: Option<LevelBatch>,
    follow_up: Option<FollowUp>,
    next_draft_id: DraftId,
    /// Whether we asked the host to freeze time
    holds_pause: bool,
    /// Set by `force_close_all`; the pause is released on the next tick
    release_owed: bool,
    /// Drafts discarded by `force_close_all`, reported on the next tick
    closed_owed: Vec<DraftId>,
    last_state: SchedulerState,
}

impl DraftScheduler {
    /// Create a scheduler with an entropy-seeded RNG
    pub fn new(config: DraftConfig, catalog: Arc<Catalog>) -> Self {
        Self::with_rng(config, catalog, StdRng::from_entropy())
    }

    /// Create a scheduler with a fixed seed (reproducible runs)
    pub fn with_seed(config: DraftConfig, catalog: Arc<Catalog>, seed: u64) -> Self {
        Self::with_rng(config, catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: DraftConfig, catalog: Arc<Catalog>, rng: StdRng) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Draft config: {}; sampling proceeds over actual weights", e);
        }
        let level_pool: Arc<[Candidate]> = catalog.level_pool().into();
        Self {
            sampler: ConstrainedSampler::new(config.exact_weight),
            config,
            catalog,
            level_pool,
            queues: RequestQueueSet::new(),
            history: DraftHistory::new(),
            exclusivity: ExclusivitySlot::new(),
            clock: DraftClock::new(),
            rng,
            step: Step::Ready,
            batch: None,
            follow_up: None,
            next_draft_id: 0,
            holds_pause: false,
            release_owed: false,
            closed_owed: Vec::new(),
            last_state: SchedulerState::Idle,
        }
    }

    // =========================================================================
    // Producer API
    // =========================================================================

    /// Enqueue one level-up unit
    pub fn request_level_up(&mut self) -> RequestId {
        let id = self.queues.push_level_up();
        log::debug!("Level-up requested ({} pending)", self.queues.level_len());
        id
    }

    /// Enqueue a variant draft if the tier still has un-chosen variants
    pub fn notify_enhancement_tier_reached(&mut self, candidate_id: &str, tier: u32) -> Option<RequestId> {
        let set = self.catalog.variant_set(candidate_id, tier)?;
        let available = set
            .variants
            .iter()
            .filter(|v| !self.history.has_variant(&v.id))
            .count();
        if available == 0 {
            log::debug!("No variants left for {} tier {}", candidate_id, tier);
            return None;
        }

        let id = self.queues.push_variant(candidate_id.to_string(), tier);
        log::debug!("Variant draft queued for {} tier {}", candidate_id, tier);
        Some(id)
    }

    /// Enqueue fixed offers, each at its base rarity
    pub fn offer_external_batch(&mut self, candidates: Vec<Candidate>) -> Option<RequestId> {
        let offers = candidates
            .into_iter()
            .map(|c| {
                let rarity = c.base_rarity;
                c.instantiate(rarity)
            })
            .collect();
        self.push_external(offers)
    }

    /// Enqueue fixed offers bound to `rarity` (e.g. Boss rewards)
    pub fn offer_external_batch_at(&mut self, candidates: Vec<Candidate>, rarity: RarityTier) -> Option<RequestId> {
        let offers = candidates.iter().map(|c| c.instantiate(rarity)).collect();
        self.push_external(offers)
    }

    fn push_external(&mut self, offers: Vec<CandidateInstance>) -> Option<RequestId> {
        if offers.is_empty() {
            log::warn!("{}; batch dropped", DraftError::EmptyPool { kind: RequestKind::ExternalBatch });
            return None;
        }
        Some(self.queues.push_external(offers))
    }

    /// Enqueue a sampled offer whose options are at least `min_rarity`
    pub fn offer_external_combined_batch(&mut self, candidates: Vec<Candidate>, min_rarity: RarityTier) -> Option<RequestId> {
        if candidates.is_empty() {
            log::warn!(
                "{}; batch dropped",
                DraftError::EmptyPool { kind: RequestKind::ExternalCombinedBatch }
            );
            return None;
        }
        Some(self.queues.push_combined(candidates, min_rarity))
    }

    /// Cancel everything immediately
    ///
    /// Queues are cleared and any draft on screen is discarded unapplied. The
    /// host's time pause is released on the next tick.
    pub fn force_close_all(&mut self) {
        let discarded = match std::mem::replace(&mut self.step, Step::Ready) {
            Step::Open(draft) | Step::Resolved { draft, .. } => Some(draft.id),
            _ => None,
        };
        if let Some(id) = discarded {
            self.closed_owed.push(id);
        }

        self.queues.clear();
        self.batch = None;
        self.follow_up = None;
        self.release_owed = self.holds_pause;

        log::info!("All drafts force-closed");
    }

    /// Any queued work or a draft in flight
    pub fn is_busy(&self) -> bool {
        !self.queues.is_empty()
            || self.batch.is_some()
            || self.follow_up.is_some()
            || !matches!(self.step, Step::Ready)
    }

    // =========================================================================
    // Presentation API
    // =========================================================================

    /// The draft currently on screen
    pub fn open_draft(&self) -> Option<&OpenDraft> {
        match &self.step {
            Step::Open(draft) => Some(draft),
            _ => None,
        }
    }

    /// Record the player's choice for an open draft
    ///
    /// The choice is applied on the next tick. Resolutions for drafts that are
    /// no longer open are ignored.
    pub fn resolve(&mut self, draft_id: DraftId, choice: usize) -> Result<(), DraftError> {
        match std::mem::replace(&mut self.step, Step::Ready) {
            Step::Open(draft) if draft.id == draft_id => {
                if choice >= draft.options.len() {
                    let err = DraftError::InvalidChoice { choice, options: draft.options.len() };
                    self.step = Step::Open(draft);
                    log::warn!("{}", err);
                    return Err(err);
                }
                log::info!("Draft {} resolved: {}", draft.id, draft.options[choice].name());
                self.step = Step::Resolved { draft, choice };
                Ok(())
            }
            other => {
                self.step = other;
                let err = DraftError::StaleResolution { draft: draft_id };
                log::warn!("{}; ignored", err);
                Err(err)
            }
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.step {
            Step::Open(draft) | Step::Resolved { draft, .. } => SchedulerState::for_kind(draft.kind),
            Step::Delay { pending, .. } => SchedulerState::for_kind(pending.kind()),
            Step::Interlude { .. } => SchedulerState::StageOpen(StagePhase::Projectile),
            Step::Ready => match self.batch {
                Some(batch) => SchedulerState::StageOpen(batch.phase),
                None => SchedulerState::Idle,
            },
        }
    }

    pub fn queue_lengths(&self) -> QueueLengths {
        self.queues.lengths()
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &DraftHistory {
        &self.history
    }

    pub fn exclusivity(&self) -> &ExclusivitySlot {
        &self.exclusivity
    }

    /// Start a fresh run: cancel everything and forget run-scoped picks
    pub fn reset_run(&mut self) {
        self.force_close_all();
        self.history.clear();
        self.exclusivity = ExclusivitySlot::new();
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the scheduler by an unscaled (pause-invariant) delta
    pub fn tick<H: DraftHost>(&mut self, delta: Duration, host: &mut H) {
        self.clock.advance(delta);

        if host.is_player_dead() && self.is_busy() {
            self.force_close_all();
        }
        self.settle_force_close(host);

        if !host.is_player_dead() {
            let mut steps = 0;
            while steps < MAX_STEPS_PER_TICK && self.advance(host) {
                steps += 1;
            }
        }

        let state = self.state();
        if state != self.last_state {
            log::debug!("Draft state transition: {:?} -> {:?}", self.last_state, state);
            self.last_state = state;
        }
    }

    /// Report discards and release the pause after a force close
    fn settle_force_close<H: DraftHost>(&mut self, host: &mut H) {
        for id in self.closed_owed.drain(..) {
            host.on_draft_closed(id);
        }
        if self.release_owed {
            self.release_owed = false;
            self.release_pause(host);
        }
    }

    /// Run one transition; false when waiting
    fn advance<H: DraftHost>(&mut self, host: &mut H) -> bool {
        match std::mem::replace(&mut self.step, Step::Ready) {
            Step::Ready => self.schedule_next(host),
            Step::Delay { until, pending } => {
                if self.clock.reached(until) {
                    self.materialize_and_open(pending, host);
                    true
                } else {
                    self.step = Step::Delay { until, pending };
                    false
                }
            }
            Step::Interlude { until } => {
                if self.clock.reached(until) {
                    true
                } else {
                    self.step = Step::Interlude { until };
                    false
                }
            }
            Step::Open(draft) => {
                self.step = Step::Open(draft);
                false
            }
            Step::Resolved { draft, choice } => {
                self.finish_draft(draft, choice, host);
                true
            }
        }
    }

    /// Pick the next piece of work; false when there is none
    fn schedule_next<H: DraftHost>(&mut self, host: &mut H) -> bool {
        if let Some(mut batch) = self.batch {
            if batch.drain_variants {
                if let Some(request) = self.queues.pop_variant() {
                    self.begin(PendingDraft::Request(request), self.config.variant_delay, host);
                    return true;
                }
                batch.drain_variants = false;
                self.batch = Some(batch);
            }

            if batch.done < batch.size {
                self.begin(PendingDraft::Level(batch.phase), self.config.presentation_delay, host);
                return true;
            }

            if batch.phase == StagePhase::Core && self.config.two_stage {
                batch.phase = StagePhase::Projectile;
                batch.done = 0;
                self.batch = Some(batch);
                self.step = Step::Interlude { until: self.clock.deadline(self.config.inter_stage_delay) };
                log::debug!("Level batch of {} entering projectile phase", batch.size);
                return true;
            }

            self.batch = None;
            self.queues.complete_levels(batch.size);
            log::info!(
                "Level batch of {} complete ({} deferred)",
                batch.size,
                self.queues.level_len()
            );
            return true;
        }

        if let Some(request) = self.queues.pop_variant() {
            self.begin(PendingDraft::Request(request), self.config.variant_delay, host);
            return true;
        }

        let levels = self.queues.level_len();
        if levels > 0 {
            self.batch = Some(LevelBatch {
                size: levels,
                phase: StagePhase::Core,
                done: 0,
                drain_variants: false,
            });
            log::info!("Starting level batch of {}", levels);
            return true;
        }

        if let Some(request) = self.queues.pop_best_external().or_else(|| self.queues.pop_combined()) {
            self.begin(PendingDraft::Request(request), self.config.presentation_delay, host);
            return true;
        }

        self.release_pause(host);
        false
    }

    /// Freeze time and wait out the presentation delay
    fn begin<H: DraftHost>(&mut self, pending: PendingDraft, delay: f32, host: &mut H) {
        self.acquire_pause(host);
        self.step = Step::Delay { until: self.clock.deadline(delay), pending };
    }

    fn acquire_pause<H: DraftHost>(&mut self, host: &mut H) {
        if !self.holds_pause {
            host.pause_time();
            self.holds_pause = true;
        }
    }

    fn release_pause<H: DraftHost>(&mut self, host: &mut H) {
        if self.holds_pause {
            host.resume_time();
            self.holds_pause = false;
        }
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    fn materialize_and_open<H: DraftHost>(&mut self, pending: PendingDraft, host: &mut H) {
        let kind = pending.kind();
        let (options, request) = match pending {
            PendingDraft::Level(phase) => (self.materialize_level(phase, host), None),
            PendingDraft::Request(request) => {
                (self.materialize_request(&request.payload, host), Some(request.id))
            }
        };

        if options.is_empty() {
            // Dropped, never left blocking
            log::warn!("{}; request discarded", DraftError::EmptyPool { kind });
            self.after_resolution(kind);
            return;
        }

        self.open(kind, options, request, host);
    }

    fn materialize_level<H: DraftHost>(&mut self, phase: StagePhase, host: &H) -> Vec<CandidateInstance> {
        let catalog = Arc::clone(&self.catalog);
        let level_pool = Arc::clone(&self.level_pool);
        let pool: &[Candidate] = match (phase, self.config.two_stage) {
            (StagePhase::Core, true) => &catalog.core,
            (StagePhase::Core, false) => &level_pool,
            (StagePhase::Projectile, _) => &catalog.projectiles,
        };

        let luck = effective_luck(host.luck(), self.config.luck_scale);
        let odds = distribution(&self.config.base_odds, luck);
        self.draw(pool, TierRoll { odds: &odds, allowed: None }, host)
    }

    fn materialize_request<H: DraftHost>(&mut self, payload: &RequestPayload, host: &H) -> Vec<CandidateInstance> {
        match payload {
            RequestPayload::LevelUp => Vec::new(),
            RequestPayload::Variant { candidate_id, tier } => {
                self.materialize_variant(candidate_id, *tier, host)
            }
            RequestPayload::External { offers } => offers
                .iter()
                .filter(|offer| {
                    let candidate = &offer.candidate;
                    self.exclusivity.permits(candidate)
                        && self.history.under_limit(candidate)
                        && host.is_eligible(candidate)
                })
                .cloned()
                .collect(),
            RequestPayload::Combined { candidates, min_rarity } => {
                let luck = effective_luck(host.luck(), self.config.luck_scale);
                let odds = distribution(&self.config.base_odds, luck);
                let allowed = min_rarity.at_least();
                let roll = TierRoll {
                    odds: &odds,
                    allowed: if allowed.is_empty() { None } else { Some(allowed.as_slice()) },
                };
                let mut options = self.draw(candidates, roll, host);
                for option in options.iter_mut() {
                    option.rarity = option.rarity.max(*min_rarity);
                }
                options
            }
        }
    }

    fn materialize_variant<H: DraftHost>(&mut self, candidate_id: &str, tier: u32, host: &H) -> Vec<CandidateInstance> {
        let catalog = Arc::clone(&self.catalog);
        let Some(set) = catalog.variant_set(candidate_id, tier) else {
            return Vec::new();
        };

        let available: Vec<&Candidate> = set
            .variants
            .iter()
            .filter(|v| !self.history.has_variant(&v.id) && host.is_eligible(v))
            .collect();

        available
            .choose_multiple(&mut self.rng, self.config.variant_option_count)
            .map(|v| v.instantiate(v.base_rarity))
            .collect()
    }

    /// Sample a full option set, topping it up with repeats when configured
    fn draw<H: DraftHost>(&mut self, pool: &[Candidate], roll: TierRoll<'_>, host: &H) -> Vec<CandidateInstance> {
        let eligible = |c: &Candidate| host.is_eligible(c);
        let gate = Eligibility::new(&self.history, &eligible);
        // Bindings made while sampling are tentative until the player chooses
        let mut slot = self.exclusivity.clone();
        let count = self.config.option_count;

        let mut options = self.sampler.draw_options(pool, count, roll, &gate, &mut slot, &mut self.rng);

        if options.len() < count && !options.is_empty() {
            log::debug!(
                "{}",
                DraftError::ExhaustedSampling { requested: count, filled: options.len() }
            );
            if self.config.duplicate_fill {
                self.sampler.fill_with_repeats(pool, &mut options, count, &gate, &slot, &mut self.rng);
            }
        }

        options
    }

    fn open<H: DraftHost>(&mut self, kind: RequestKind, options: Vec<CandidateInstance>, request: Option<RequestId>, host: &mut H) {
        debug_assert!(
            matches!(self.step, Step::Ready),
            "a draft is already in flight"
        );
        self.acquire_pause(host);
        self.next_draft_id += 1;
        let draft = OpenDraft { id: self.next_draft_id, kind, options, request };

        log::info!(
            "Draft {} opened ({:?}): {}",
            draft.id,
            draft.kind,
            draft.options.iter().map(|o| o.name()).collect::<Vec<_>>().join(", ")
        );
        host.on_draft_opened(&draft);
        self.step = Step::Open(draft);
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    fn finish_draft<H: DraftHost>(&mut self, draft: OpenDraft, choice: usize, host: &mut H) {
        host.on_draft_closed(draft.id);
        let Some(chosen) = draft.options.into_iter().nth(choice) else {
            return;
        };

        if draft.kind == RequestKind::MineElement {
            if let Some(FollowUp { mut instance, origin }) = self.follow_up.take() {
                if let Effect::ChooseElement(element) = chosen.candidate.effect {
                    instance.element = Some(element);
                }
                self.apply(instance, origin, host);
            }
            return;
        }

        if chosen.candidate.element_choice && chosen.element.is_none() {
            self.open_element_draft(chosen, draft.kind, host);
            return;
        }

        self.apply(chosen, draft.kind, host);
    }

    /// Fire/Frost follow-up; takes precedence over every queue
    fn open_element_draft<H: DraftHost>(&mut self, instance: CandidateInstance, origin: RequestKind, host: &mut H) {
        let options = Element::ALL
            .iter()
            .map(|element| {
                Candidate::new(
                    format!("{}_{}", instance.id(), element.name().to_lowercase()),
                    element.name(),
                    CandidateKind::Other,
                    instance.candidate.base_rarity,
                    Effect::ChooseElement(*element),
                )
                .instantiate(instance.rarity)
            })
            .collect();

        log::debug!("{} needs an element", instance.name());
        self.follow_up = Some(FollowUp { instance, origin });
        self.open(RequestKind::MineElement, options, None, host);
    }

    /// Deliver to the sink and record the pick
    fn apply<H: DraftHost>(&mut self, instance: CandidateInstance, kind: RequestKind, host: &mut H) {
        host.on_resolved(&instance);

        if kind == RequestKind::Variant {
            self.history.record_variant(instance.id());
        } else {
            self.history.record(instance.id());
        }
        self.exclusivity.bind(&instance.candidate);

        // Queue variants before the batch decides what opens next
        for (candidate_id, tier) in host.take_tier_events() {
            self.notify_enhancement_tier_reached(&candidate_id, tier);
        }

        self.after_resolution(kind);
    }

    /// Level batch bookkeeping once a draft is done (or dropped)
    fn after_resolution(&mut self, kind: RequestKind) {
        let Some(mut batch) = self.batch else {
            return;
        };
        let phase = match kind {
            RequestKind::LevelStageCore => StagePhase::Core,
            RequestKind::LevelStageProjectile => StagePhase::Projectile,
            _ => return,
        };
        if phase != batch.phase {
            return;
        }

        batch.done += 1;
        if phase == StagePhase::Projectile || batch.done >= batch.size {
            batch.drain_variants = true;
        }
        self.batch = Some(batch);
    }
}
