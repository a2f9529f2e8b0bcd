//! Advertising data decoding
//!
//! Turns a raw advertisement or scan-response payload into an
//! [`AdvertisementRecord`]. Decoding never fails: a malformed payload yields an
//! empty record that still carries the original bytes.

use crate::gap::constants::*;
use crate::gap::AdvertisingFlags;
use crate::uuid::Uuid;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Reasons a payload is abandoned. Only ever logged.
#[derive(Debug, Error)]
enum MalformedAd {
    #[error("AD structure at offset {offset} runs past the end of the buffer")]
    Truncated { offset: usize },

    #[error("AD type {ad_type:#04x} payload of {len} bytes is not a multiple of {width}")]
    UuidListLength { ad_type: u8, len: usize, width: usize },

    #[error("AD type {ad_type:#04x} payload of {len} bytes is shorter than {min}")]
    FieldTooShort { ad_type: u8, len: usize, min: usize },
}

/// Decoded contents of one advertisement or scan response.
///
/// Equality and hashing only look at [`raw_bytes`](Self::raw_bytes); the
/// decoded fields are a pure function of them.
#[derive(Debug, Clone, Default)]
pub struct AdvertisementRecord {
    flags: Option<u8>,
    service_uuids: Vec<Uuid>,
    manufacturer_data: HashMap<u16, Vec<u8>>,
    service_data: HashMap<Uuid, Vec<u8>>,
    tx_power_level: Option<i8>,
    device_name: Option<String>,
    raw_bytes: Vec<u8>,
}

impl AdvertisementRecord {
    /// Decode a sequence of AD structures.
    ///
    /// Parsing stops at the first zero length octet or at the end of the
    /// buffer. If any structure is truncated or malformed, every decoded field
    /// is discarded and an empty record is returned; `raw_bytes` always equals
    /// `bytes`.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut record = Self {
            raw_bytes: bytes.to_vec(),
            ..Self::default()
        };

        if let Err(err) = record.parse_structures(bytes) {
            debug!(%err, raw = %hex::encode(bytes), "discarding malformed advertising data");
            return Self {
                raw_bytes: record.raw_bytes,
                ..Self::default()
            };
        }

        record
    }

    fn parse_structures(&mut self, bytes: &[u8]) -> Result<(), MalformedAd> {
        let mut cursor = Cursor::new(bytes);

        while (cursor.position() as usize) < bytes.len() {
            let offset = cursor.position() as usize;
            let truncated = |_| MalformedAd::Truncated { offset };

            let length = cursor.read_u8().map_err(truncated)? as usize;
            if length == 0 {
                break;
            }
            let ad_type = cursor.read_u8().map_err(truncated)?;

            // `length` covers the type octet and the payload.
            let end = offset + 1 + length;
            let payload = bytes
                .get(offset + 2..end)
                .ok_or(MalformedAd::Truncated { offset })?;

            self.parse_structure(ad_type, payload)?;
            cursor.set_position(end as u64);
        }

        Ok(())
    }

    fn parse_structure(&mut self, ad_type: u8, payload: &[u8]) -> Result<(), MalformedAd> {
        match ad_type {
            ADV_TYPE_FLAGS => {
                self.flags = Some(field_prefix(ad_type, payload, 1)?[0]);
            }
            ADV_TYPE_16BIT_SERVICE_UUID_PARTIAL | ADV_TYPE_16BIT_SERVICE_UUID_COMPLETE => {
                self.parse_service_uuids(ad_type, payload, Uuid::LEN_16)?;
            }
            ADV_TYPE_32BIT_SERVICE_UUID_PARTIAL | ADV_TYPE_32BIT_SERVICE_UUID_COMPLETE => {
                self.parse_service_uuids(ad_type, payload, Uuid::LEN_32)?;
            }
            ADV_TYPE_128BIT_SERVICE_UUID_PARTIAL | ADV_TYPE_128BIT_SERVICE_UUID_COMPLETE => {
                self.parse_service_uuids(ad_type, payload, Uuid::LEN_128)?;
            }
            ADV_TYPE_SHORT_LOCAL_NAME | ADV_TYPE_COMPLETE_LOCAL_NAME => {
                self.device_name = Some(String::from_utf8_lossy(payload).into_owned());
            }
            ADV_TYPE_TX_POWER_LEVEL => {
                self.tx_power_level = Some(field_prefix(ad_type, payload, 1)?[0] as i8);
            }
            ADV_TYPE_SERVICE_DATA_16BIT => {
                let uuid_bytes = field_prefix(ad_type, payload, Uuid::LEN_16)?;
                let uuid = Uuid::from_u16(LittleEndian::read_u16(uuid_bytes));
                self.service_data
                    .insert(uuid, payload[Uuid::LEN_16..].to_vec());
            }
            ADV_TYPE_MANUFACTURER_SPECIFIC => {
                let id = LittleEndian::read_u16(field_prefix(ad_type, payload, 2)?);
                self.manufacturer_data.insert(id, payload[2..].to_vec());
            }
            _ => {}
        }

        Ok(())
    }

    fn parse_service_uuids(
        &mut self,
        ad_type: u8,
        payload: &[u8],
        width: usize,
    ) -> Result<(), MalformedAd> {
        if payload.len() % width != 0 {
            return Err(MalformedAd::UuidListLength {
                ad_type,
                len: payload.len(),
                width,
            });
        }

        self.service_uuids.extend(
            payload
                .chunks_exact(width)
                .filter_map(Uuid::try_from_slice_le),
        );
        Ok(())
    }

    /// Raw advertising flags octet, if a Flags structure was present.
    pub fn flags(&self) -> Option<u8> {
        self.flags
    }

    /// The flags octet as a bit set. Unknown bits are retained.
    pub fn advertising_flags(&self) -> Option<AdvertisingFlags> {
        self.flags.map(AdvertisingFlags::from_bits_retain)
    }

    /// Service UUIDs in the order they appeared, duplicates included.
    pub fn service_uuids(&self) -> &[Uuid] {
        &self.service_uuids
    }

    pub fn manufacturer_data(&self) -> &HashMap<u16, Vec<u8>> {
        &self.manufacturer_data
    }

    /// Manufacturer specific payload for a company identifier, without the id.
    pub fn manufacturer_data_for(&self, manufacturer_id: u16) -> Option<&[u8]> {
        self.manufacturer_data
            .get(&manufacturer_id)
            .map(Vec::as_slice)
    }

    pub fn service_data(&self) -> &HashMap<Uuid, Vec<u8>> {
        &self.service_data
    }

    /// Service data payload for a service UUID, without the UUID.
    pub fn service_data_for(&self, uuid: &Uuid) -> Option<&[u8]> {
        self.service_data.get(uuid).map(Vec::as_slice)
    }

    pub fn tx_power_level(&self) -> Option<i8> {
        self.tx_power_level
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    /// The payload this record was decoded from.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// True when no field was decoded, either because the payload carried
    /// nothing recognised or because it was malformed.
    pub fn is_empty(&self) -> bool {
        self.flags.is_none()
            && self.service_uuids.is_empty()
            && self.manufacturer_data.is_empty()
            && self.service_data.is_empty()
            && self.tx_power_level.is_none()
            && self.device_name.is_none()
    }
}

/// The first `min` bytes of a payload that has fixed leading fields.
fn field_prefix(ad_type: u8, payload: &[u8], min: usize) -> Result<&[u8], MalformedAd> {
    payload.get(..min).ok_or(MalformedAd::FieldTooShort {
        ad_type,
        len: payload.len(),
        min,
    })
}

impl PartialEq for AdvertisementRecord {
    fn eq(&self, other: &Self) -> bool {
        self.raw_bytes == other.raw_bytes
    }
}

impl Eq for AdvertisementRecord {}

impl Hash for AdvertisementRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw_bytes.hash(state);
    }
}

impl fmt::Display for AdvertisementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdvertisementRecord [flags=")?;
        match self.flags {
            Some(flags) => write!(f, "{:#04x}", flags)?,
            None => write!(f, "none")?,
        }
        write!(f, ", service_uuids=[")?;
        for (i, uuid) in self.service_uuids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", uuid)?;
        }
        write!(f, "], manufacturer_data={{")?;
        let mut ids: Vec<_> = self.manufacturer_data.keys().collect();
        ids.sort();
        for (i, id) in ids.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:#06x}: {}", id, hex::encode(&self.manufacturer_data[id]))?;
        }
        write!(f, "}}, service_data={{")?;
        let mut uuids: Vec<_> = self.service_data.keys().collect();
        uuids.sort();
        for (i, uuid) in uuids.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", uuid, hex::encode(&self.service_data[uuid]))?;
        }
        write!(f, "}}, tx_power_level=")?;
        match self.tx_power_level {
            Some(level) => write!(f, "{}", level)?,
            None => write!(f, "none")?,
        }
        write!(f, ", device_name={:?}]", self.device_name)
    }
}
