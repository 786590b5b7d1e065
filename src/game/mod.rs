//! Game module - Demo session driving the draft scheduler

mod state;
mod session;

pub use state::{Game, GameState, GameMessage, MessageCategory, FIRST_BOSS};
pub use session::{Player, Session, rarity_multiplier};
