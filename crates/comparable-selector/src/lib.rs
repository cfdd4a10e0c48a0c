//! Comparable Selection
//!
//! Picks candidate listings similar to a target vehicle (brand/model text
//! match, year and mileage windows, optional fuel and motor filters) and
//! orders them by closeness.

mod candidate;
mod config;
mod error;
mod matcher;

pub use candidate::{Candidate, CandidateSet, Distance};
pub use config::{BrandMatch, SelectCriteria, SelectorConfig};
pub use error::SelectError;
pub use matcher::{select, Matcher};
