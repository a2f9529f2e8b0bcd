//! Generic Access Profile definitions used when reading advertisements
//!
//! AD type constants, device addresses and the advertising flags bit set.

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
