//! Bluetooth HCI (Host Controller Interface) event parsing
//!
//! Reads LE Advertising Report events and turns each report into a
//! [`Sighting`](crate::scan::Sighting).

pub mod constants;
pub mod packet;

#[cfg(test)]
mod tests;

pub use packet::{sightings_from_event, AdvertisingEventType, HciEvent, LeAdvertisingReport};
