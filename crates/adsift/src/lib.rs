//! adsift - Bluetooth LE advertisement decoding and scan filtering
//!
//! This library turns raw advertising and scan-response payloads into
//! structured records and decides whether the resulting sightings match a set
//! of scan filters. It also answers whether one filter already covers another,
//! so overlapping scan requests can be merged.
//!
//! Decoding is best effort: a malformed payload produces an empty record that
//! still carries the original bytes, never an error.
//!
//! ```
//! use adsift::{Filter, Sighting};
//!
//! let payload = [0x02, 0x01, 0x06, 0x05, 0xFF, 0x4C, 0x00, 0x02, 0x15];
//! let sighting = Sighting::new(Some("00:11:22:33:44:55".into()), &payload, -60, 0);
//!
//! let filter = Filter::builder()
//!     .manufacturer_data_with_mask(0x004C, [0x02], [0xFF])
//!     .build()
//!     .unwrap();
//! assert!(filter.matches(&sighting));
//! ```

pub mod error;
pub mod gap;
pub mod hci;
pub mod scan;
pub mod uuid;

// Re-export common types for convenience
pub use error::{FilterError, HciError};
pub use gap::{AddressType, AdvertisingFlags, BdAddr};
pub use hci::{sightings_from_event, HciEvent, LeAdvertisingReport};
pub use scan::{AdvertisementRecord, Filter, FilterBuilder, FilterConfig, Sighting};
pub use uuid::Uuid;
