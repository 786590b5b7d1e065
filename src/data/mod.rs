//! Data loading and external draft content
//!
//! This module handles loading the draft configuration and candidate catalog
//! from external RON files, allowing for data-driven content and easy modding.

pub mod loader;
pub mod config;
pub mod catalog;

pub use loader::{DataManager, export_default_data, data_dirs};
pub use config::DraftConfig;
pub use catalog::{Catalog, VariantSet, default_catalog, ASPECT_GROUP};
