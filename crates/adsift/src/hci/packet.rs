//! HCI event structures and parsing
//!
//! This module parses HCI events far enough to extract LE advertising reports.

use crate::error::HciError;
use crate::gap::{AddressType, BdAddr};
use crate::hci::constants::*;
use crate::scan::Sighting;
use byteorder::ReadBytesExt;
use std::io::{Cursor, Read};
use tracing::warn;

/// HCI Event packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HciEvent {
    pub event_code: u8,
    pub parameter_total_length: u8,
    pub parameters: Vec<u8>,
}

impl HciEvent {
    /// Parse an HCI event from raw bytes, starting at the event code
    pub fn parse(data: &[u8]) -> Result<Self, HciError> {
        if data.len() < HCI_EVENT_HDR_SIZE {
            return Err(HciError::Truncated {
                needed: HCI_EVENT_HDR_SIZE,
                actual: data.len(),
            });
        }

        let event_code = data[0];
        let parameter_total_length = data[1];
        let end = HCI_EVENT_HDR_SIZE + parameter_total_length as usize;

        let parameters = data
            .get(HCI_EVENT_HDR_SIZE..end)
            .ok_or(HciError::Truncated {
                needed: end,
                actual: data.len(),
            })?
            .to_vec();

        Ok(HciEvent {
            event_code,
            parameter_total_length,
            parameters,
        })
    }

    /// Parse an event packet that still carries its H4 packet type indicator
    pub fn parse_packet(packet: &[u8]) -> Result<Self, HciError> {
        match packet.split_first() {
            Some((&HCI_EVENT_PKT, event)) => Self::parse(event),
            Some((&packet_type, _)) => Err(HciError::UnexpectedPacketType(packet_type)),
            None => Err(HciError::Truncated {
                needed: 1,
                actual: 0,
            }),
        }
    }

    /// LE Meta Event subevent code, if this is an LE Meta Event
    pub fn subevent_code(&self) -> Option<u8> {
        if self.event_code == EVT_LE_META_EVENT {
            self.parameters.first().copied()
        } else {
            None
        }
    }
}

/// The kind of PDU an advertising report was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingEventType {
    ConnectableUndirected,
    ConnectableDirected,
    ScannableUndirected,
    NonConnectableUndirected,
    ScanResponse,
    Unknown(u8),
}

impl From<u8> for AdvertisingEventType {
    fn from(value: u8) -> Self {
        match value {
            ADV_IND => Self::ConnectableUndirected,
            ADV_DIRECT_IND => Self::ConnectableDirected,
            ADV_SCAN_IND => Self::ScannableUndirected,
            ADV_NONCONN_IND => Self::NonConnectableUndirected,
            SCAN_RSP => Self::ScanResponse,
            other => Self::Unknown(other),
        }
    }
}

impl AdvertisingEventType {
    pub fn is_connectable(&self) -> bool {
        matches!(self, Self::ConnectableUndirected | Self::ConnectableDirected)
    }
}

/// One report from an LE Advertising Report event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeAdvertisingReport {
    pub event_type: AdvertisingEventType,
    pub address_type: AddressType,
    pub address: BdAddr,
    pub data: Vec<u8>,
    pub rssi: i8,
}

impl LeAdvertisingReport {
    /// Parse every report carried by an LE Advertising Report event.
    ///
    /// Reports are laid out one after another, each as event type, address
    /// type, address, data length, data and RSSI.
    pub fn parse_from_event(event: &HciEvent) -> Result<Vec<Self>, HciError> {
        let subevent = event.subevent_code();
        if subevent != Some(EVT_LE_ADVERTISING_REPORT) {
            return Err(HciError::UnexpectedEvent {
                event_code: event.event_code,
                subevent,
            });
        }

        let mut cursor = Cursor::new(&event.parameters[1..]);
        let num_reports = cursor.read_u8().map_err(|_| truncated(&cursor, 1))?;

        let mut reports = Vec::with_capacity(num_reports as usize);
        for _ in 0..num_reports {
            reports.push(Self::parse_one(&mut cursor)?);
        }

        Ok(reports)
    }

    fn parse_one(cursor: &mut Cursor<&[u8]>) -> Result<Self, HciError> {
        let mut fixed = [0u8; ADV_REPORT_FIXED_SIZE];
        read_exact(cursor, &mut fixed)?;

        let event_type = AdvertisingEventType::from(fixed[0]);
        let address_type = AddressType::from(fixed[1]);
        let address = BdAddr::from_slice(&fixed[2..8]).ok_or_else(|| truncated(cursor, 6))?;
        let data_length = fixed[8] as usize;

        let mut data = vec![0u8; data_length];
        read_exact(cursor, &mut data)?;
        let rssi = cursor.read_i8().map_err(|_| truncated(cursor, 1))?;

        Ok(LeAdvertisingReport {
            event_type,
            address_type,
            address,
            data,
            rssi,
        })
    }

    /// Decode this report into a sighting observed at `timestamp_nanos`
    pub fn into_sighting(self, timestamp_nanos: u64) -> Sighting {
        Sighting::new(
            Some(self.address.to_string()),
            &self.data,
            i16::from(self.rssi),
            timestamp_nanos,
        )
    }
}

/// All sightings carried by an HCI event. Events that are not well-formed LE
/// Advertising Reports yield nothing.
pub fn sightings_from_event(event: &HciEvent, timestamp_nanos: u64) -> Vec<Sighting> {
    match LeAdvertisingReport::parse_from_event(event) {
        Ok(reports) => reports
            .into_iter()
            .map(|report| report.into_sighting(timestamp_nanos))
            .collect(),
        Err(err) => {
            warn!(%err, "dropping HCI event without usable advertising reports");
            Vec::new()
        }
    }
}

fn read_exact(cursor: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), HciError> {
    let err = truncated(cursor, buf.len());
    cursor.read_exact(buf).map_err(|_| err)
}

fn truncated(cursor: &Cursor<&[u8]>, wanted: usize) -> HciError {
    HciError::Truncated {
        needed: cursor.position() as usize + wanted,
        actual: cursor.get_ref().len(),
    }
}
