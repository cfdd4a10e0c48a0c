//! Text Normalization for Vehicle Listings
//!
//! Folds free-text brand/model/fuel/motor strings into canonical keys that
//! can be compared across listing sources.

mod fold;
mod fuel;
mod key;

pub use fold::{fold, fold_compact, model_base, motor_matches};
pub use fuel::{classify_fuel, FuelClass};
pub use key::NormalizedKey;
