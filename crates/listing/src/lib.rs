//! Vehicle Listing Records
//!
//! Shared vehicle record type plus parsing of loosely typed rows coming from
//! scraped or seeded listing data.

mod descriptor;
mod error;
mod raw;

pub use descriptor::VehicleDescriptor;
pub use error::RecordError;
pub use raw::{parse_pool, ParsedPool, RawListing, RawValue, RecordBounds};
