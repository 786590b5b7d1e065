//! UI widgets

pub mod draft_cards;

pub use draft_cards::{DraftCardsWidget, draft_title, rarity_color};
