//! Advertisement decoding and scan filtering
//!
//! [`AdvertisementRecord`] decodes a raw advertising payload, [`Sighting`]
//! pairs it with the device and signal metadata of one scan result, and
//! [`Filter`] decides whether a sighting is wanted.

pub mod config;
pub mod filter;
pub mod mask;
pub mod record;
pub mod sighting;


pub use config::FilterConfig;
pub use filter::{matches_any, prune_subsumed, Filter, FilterBuilder};
pub use mask::{is_partial_data_superset, is_uuid_superset, matches_partial_data, matches_uuid};
pub use record::AdvertisementRecord;
pub use sighting::Sighting;
