//! Scan results
//!
//! A [`Sighting`] is one advertisement as delivered by the controller, decoded
//! once on construction.

use super::record::AdvertisementRecord;
use tracing::debug;

/// Lowest RSSI a sighting reports, in dBm.
pub const RSSI_MIN: i16 = -127;
/// Highest RSSI a sighting reports, in dBm.
pub const RSSI_MAX: i16 = 127;

const RSSI_NORMALIZATION_OFFSET: i16 = 3;
const NORMALIZED_RSSI_MAX: i16 = 126;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// One observed advertisement: who sent it, what it said, how loud, and when.
///
/// Equality and hashing cover the device id, RSSI, raw payload and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sighting {
    device_id: Option<String>,
    record: AdvertisementRecord,
    rssi: i16,
    timestamp_nanos: u64,
}

impl Sighting {
    /// Build a sighting from the values delivered with a scan result.
    ///
    /// `record_bytes` is decoded immediately; a malformed payload yields an
    /// empty record rather than an error. An RSSI outside
    /// [`RSSI_MIN`]..=[`RSSI_MAX`] is kept as given and only logged.
    pub fn new(
        device_id: Option<String>,
        record_bytes: &[u8],
        rssi: i16,
        timestamp_nanos: u64,
    ) -> Self {
        if !Self::is_valid_rssi(rssi) {
            debug!(rssi, "RSSI outside the reportable range");
        }

        Self {
            device_id,
            record: AdvertisementRecord::decode(record_bytes),
            rssi,
            timestamp_nanos,
        }
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn record(&self) -> &AdvertisementRecord {
        &self.record
    }

    pub fn rssi(&self) -> i16 {
        self.rssi
    }

    /// Whether `rssi` lies in the range a controller can report.
    pub fn is_valid_rssi(rssi: i16) -> bool {
        (RSSI_MIN..=RSSI_MAX).contains(&rssi)
    }

    /// RSSI shifted by the fixed +3 dB calibration offset and clamped to
    /// `[-127, 126]`.
    pub fn normalized_rssi(&self) -> i16 {
        self.rssi
            .saturating_add(RSSI_NORMALIZATION_OFFSET)
            .clamp(RSSI_MIN, NORMALIZED_RSSI_MAX)
    }

    pub fn timestamp_nanos(&self) -> u64 {
        self.timestamp_nanos
    }

    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp_nanos / NANOS_PER_MILLI
    }
}
