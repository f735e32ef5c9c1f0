//! # looq-styling
//!
//! Rule-based outfit engine: pairs an anchor garment with compatible
//! products from a pool, scores each combination on color harmony and
//! offers static look suggestions per category.

pub mod compatibility;
pub mod engine;
pub mod harmony;
pub mod suggestions;

pub use compatibility::CompatibilityTable;
pub use engine::{current_season, OutfitEngine, DEFAULT_OCCASION};
pub use harmony::ColorHarmony;
pub use suggestions::{suggest_looks, LookSuggestion, SuggestedItem};
