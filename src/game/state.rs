//! Game state machine
//!
//! Owns the session and the draft scheduler, and turns gameplay events into
//! draft requests.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::DataManager;
use crate::draft::{Candidate, DraftScheduler, DraftHost};
use crate::rarity::RarityTier;
use super::session::Session;

/// XP gained per second of unpaused gameplay
const XP_PER_SECOND: f32 = 20.0;

/// Offers per enemy or favour batch
const OFFERS_PER_BATCH: usize = 2;

/// Unlock key granted by defeating the first boss
pub const FIRST_BOSS: &str = "first_boss";

/// The main game struct that holds all game data
pub struct Game {
    state: GameState,
    session: Session,
    scheduler: DraftScheduler,
    /// Loaded config and catalog
    data: DataManager,
    /// Random number generator for offer selection
    rng: StdRng,
}

/// All possible game states
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// Run in progress
    Playing,
    /// Player died
    GameOver { level_reached: u32 },
    /// Exit the game
    Quit,
}

/// A message to display in the game log
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub text: String,
    pub timestamp: f32,
    pub category: MessageCategory,
}

/// Categories for message filtering/coloring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageCategory {
    Draft,
    Progress,
    System,
    Warning,
}

impl Game {
    /// Create a new game with data from disk
    pub fn new() -> Self {
        Self::with_data(DataManager::new(), None)
    }

    /// Create a game from already loaded data, optionally seeded
    pub fn with_data(data: DataManager, seed: Option<u64>) -> Self {
        let catalog = Arc::new(data.catalog().clone());
        let config = data.config().clone();
        let (scheduler, rng) = match seed {
            Some(seed) => (
                DraftScheduler::with_seed(config, catalog, seed),
                StdRng::seed_from_u64(seed),
            ),
            None => (DraftScheduler::new(config, catalog), StdRng::from_entropy()),
        };

        let mut session = Session::new();
        session.add_message("Gain XP to draft upgrades. [?] for keys.", MessageCategory::System);

        Self {
            state: GameState::Playing,
            session,
            scheduler,
            data,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Set a new game state
    pub fn set_state(&mut self, state: GameState) {
        log::debug!("State transition: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &DraftScheduler {
        &self.scheduler
    }

    pub fn data(&self) -> &DataManager {
        &self.data
    }

    /// Update game state (called every frame with real, unscaled time)
    pub fn update(&mut self, delta: Duration) {
        if self.state == GameState::Playing {
            let played = self.session.advance_time(delta.as_secs_f32());
            let gained = self.session.player.experience.add_xp(XP_PER_SECOND * played);
            for _ in 0..gained {
                self.scheduler.request_level_up();
            }
            if gained > 0 {
                let level = self.session.player.experience.level;
                self.session.add_message(format!("Reached level {}", level), MessageCategory::Progress);
            }
        }

        self.scheduler.tick(delta, &mut self.session);

        if self.state == GameState::Playing && self.session.is_player_dead() {
            let level_reached = self.session.player.experience.level;
            self.set_state(GameState::GameOver { level_reached });
        }
    }

    /// Choose an option in the open draft
    pub fn choose(&mut self, index: usize) {
        let Some(draft_id) = self.scheduler.open_draft().map(|draft| draft.id) else {
            return;
        };
        if let Err(e) = self.scheduler.resolve(draft_id, index) {
            self.session.add_message(e.to_string(), MessageCategory::Warning);
        }
    }

    /// Grant a level immediately
    pub fn level_up(&mut self) {
        self.scheduler.request_level_up();
    }

    /// A few random picks from a catalog list
    fn sample_offers(&mut self, candidates: &[Candidate]) -> Vec<Candidate> {
        candidates
            .choose_multiple(&mut self.rng, OFFERS_PER_BATCH)
            .cloned()
            .collect()
    }

    pub fn offer_enemies(&mut self) {
        let enemies = self.data.catalog().enemies.clone();
        let offers = self.sample_offers(&enemies);
        self.scheduler.offer_external_batch(offers);
    }

    pub fn offer_favours(&mut self) {
        let favours = self.data.catalog().favours.clone();
        let offers = self.sample_offers(&favours);
        self.scheduler.offer_external_batch(offers);
    }

    /// Offer the element-bound projectiles
    pub fn offer_mine(&mut self) {
        let mines: Vec<Candidate> = self
            .data
            .catalog()
            .projectiles
            .iter()
            .filter(|c| c.element_choice)
            .cloned()
            .collect();
        self.scheduler.offer_external_batch(mines);
    }

    /// Sampled projectile offer at Rare or better
    pub fn offer_combined(&mut self) {
        let projectiles = self.data.catalog().projectiles.clone();
        self.scheduler.offer_external_combined_batch(projectiles, RarityTier::Rare);
    }

    /// First boss down: unlock gated content and offer it at Boss rarity
    pub fn defeat_boss(&mut self) {
        self.session.unlock(FIRST_BOSS);
        let catalog = self.data.catalog();
        let rewards: Vec<Candidate> = catalog
            .core
            .iter()
            .chain(catalog.projectiles.iter())
            .filter(|c| c.unlock.as_deref() == Some(FIRST_BOSS))
            .cloned()
            .collect();
        self.scheduler.offer_external_batch_at(rewards, RarityTier::Boss);
    }

    pub fn kill_player(&mut self) {
        if self.state == GameState::Playing {
            self.session.kill();
        }
    }

    /// Start over with a fresh player
    pub fn restart(&mut self) {
        self.scheduler.reset_run();
        self.session = Session::new();
        self.session.add_message("A new run begins.", MessageCategory::System);
        self.set_state(GameState::Playing);
        log::info!("New run started");
    }

    /// Request to quit the game
    pub fn quit(&mut self) {
        self.set_state(GameState::Quit);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{default_catalog, DraftConfig};
    use crate::draft::{Element, RequestKind, SchedulerState, StagePhase};

    fn game() -> Game {
        let data = DataManager {
            config: DraftConfig::default().instant(),
            catalog: default_catalog(),
        };
        Game::with_data(data, Some(11))
    }

    fn tick(game: &mut Game) {
        game.update(Duration::ZERO);
    }

    #[test]
    fn test_xp_opens_level_draft_and_freezes_time() {
        let mut game = game();
        game.update(Duration::from_secs(5));

        assert_eq!(game.session().player.experience.level, 2);
        let draft = game.scheduler().open_draft().unwrap();
        assert_eq!(draft.kind, RequestKind::LevelStageCore);
        assert!(game.session().is_time_paused());

        // No XP while the draft is up
        let xp = game.session().player.experience;
        game.update(Duration::from_secs(5));
        assert_eq!(game.session().player.experience, xp);
    }

    #[test]
    fn test_variant_opens_right_after_tier_pick() {
        let mut catalog = default_catalog();
        catalog.projectiles.retain(|c| c.id == "blade");
        let data = DataManager {
            config: DraftConfig::default().instant(),
            catalog,
        };
        let mut game = Game::with_data(data, Some(11));
        game.session.player.projectiles.insert("blade".to_string(), 1);

        game.level_up();
        game.level_up();
        tick(&mut game);
        for _ in 0..2 {
            assert_eq!(game.scheduler().state(), SchedulerState::StageOpen(StagePhase::Core));
            game.choose(0);
            tick(&mut game);
        }

        assert_eq!(game.scheduler().state(), SchedulerState::StageOpen(StagePhase::Projectile));
        assert_eq!(game.scheduler().open_draft().unwrap().options[0].id(), "blade");
        game.choose(0);
        tick(&mut game);

        assert_eq!(game.scheduler().state(), SchedulerState::VariantOpen);
        assert_eq!(game.scheduler().queue_lengths().variant, 0);
        assert!(game
            .session()
            .messages()
            .iter()
            .any(|m| m.category == MessageCategory::Progress && m.text.ends_with("reached tier 1")));
    }

    #[test]
    fn test_mine_offer_records_element() {
        let mut game = game();
        game.offer_mine();
        tick(&mut game);
        assert_eq!(game.scheduler().state(), SchedulerState::ExternalOpen);

        game.choose(0);
        tick(&mut game);
        assert_eq!(game.scheduler().state(), SchedulerState::MineElementOpen);

        game.choose(0);
        tick(&mut game);
        assert_eq!(game.session().player.elements.get("mine"), Some(&Element::Fire));
        assert!(!game.session().is_time_paused());
    }

    #[test]
    fn test_bad_choice_is_reported() {
        let mut game = game();
        game.offer_favours();
        tick(&mut game);
        game.choose(7);
        assert!(game.scheduler().open_draft().is_some());
        let last = game.session().messages().last().unwrap();
        assert_eq!(last.category, MessageCategory::Warning);
    }

    #[test]
    fn test_death_closes_drafts() {
        let mut game = game();
        game.level_up();
        game.offer_enemies();
        tick(&mut game);
        assert!(game.scheduler().is_busy());

        game.kill_player();
        tick(&mut game);
        assert_eq!(game.state(), &GameState::GameOver { level_reached: 1 });
        assert!(!game.scheduler().is_busy());
        assert!(!game.session().is_time_paused());

        game.restart();
        tick(&mut game);
        assert_eq!(game.state(), &GameState::Playing);
        assert!(game.scheduler().history().times_picked("blade") == 0);
    }

    #[test]
    fn test_boss_reward_unlocks_content() {
        let mut game = game();
        game.defeat_boss();
        tick(&mut game);

        let draft = game.scheduler().open_draft().unwrap();
        assert_eq!(draft.kind, RequestKind::ExternalBatch);
        assert!(draft.options.iter().all(|o| o.rarity == RarityTier::Boss));
        assert!(draft.options.iter().any(|o| o.id() == "comet"));
        assert!(game.session().is_unlocked(FIRST_BOSS));
    }
}
