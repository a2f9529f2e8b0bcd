use crate::gap::constants::*;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Public,
    Random,
    PublicIdentity,
    RandomIdentity,
}

impl From<u8> for AddressType {
    fn from(value: u8) -> Self {
        match value {
            PUBLIC_DEVICE_ADDRESS => AddressType::Public,
            RANDOM_DEVICE_ADDRESS => AddressType::Random,
            PUBLIC_IDENTITY_ADDRESS => AddressType::PublicIdentity,
            RANDOM_IDENTITY_ADDRESS => AddressType::RandomIdentity,
            _ => AddressType::Public,
        }
    }
}

impl From<AddressType> for u8 {
    fn from(value: AddressType) -> Self {
        match value {
            AddressType::Public => PUBLIC_DEVICE_ADDRESS,
            AddressType::Random => RANDOM_DEVICE_ADDRESS,
            AddressType::PublicIdentity => PUBLIC_IDENTITY_ADDRESS,
            AddressType::RandomIdentity => RANDOM_IDENTITY_ADDRESS,
        }
    }
}

/// A 48-bit Bluetooth device address, stored in over-the-air (little-endian) order.
///
/// Formats as `AA:BB:CC:DD:EE:FF` with the most significant octet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr {
    pub bytes: [u8; 6],
}

impl BdAddr {
    /// Address from the first six bytes of `slice`, in over-the-air order.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes = slice.get(..6)?.try_into().ok()?;
        Some(Self { bytes })
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

/// Error returned when a device address string is not `XX:XX:XX:XX:XX:XX`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid device address {0:?}: expected six colon-separated hex octets")]
pub struct AddressParseError(pub String);

impl FromStr for BdAddr {
    type Err = AddressParseError;

    /// Accepts upper- or lower-case hex digits; every octet must be exactly
    /// two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AddressParseError(s.to_string());

        let mut bytes = [0u8; 6];
        let mut octets = s.split(':');
        // Display order is most significant first, storage is little-endian.
        for slot in bytes.iter_mut().rev() {
            let octet = octets.next().ok_or_else(err)?;
            if octet.len() != 2 || !octet.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            *slot = u8::from_str_radix(octet, 16).map_err(|_| err())?;
        }
        if octets.next().is_some() {
            return Err(err());
        }

        Ok(Self { bytes })
    }
}

bitflags! {
    /// Contents of the advertising Flags AD structure (Core Spec Supplement, Part A, 1.3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AdvertisingFlags: u8 {
        const LE_LIMITED_DISCOVERABLE = 0x01;
        const LE_GENERAL_DISCOVERABLE = 0x02;
        const BR_EDR_NOT_SUPPORTED = 0x04;
        const SIMULTANEOUS_LE_BR_EDR_CONTROLLER = 0x08;
        const SIMULTANEOUS_LE_BR_EDR_HOST = 0x10;
    }
}

impl AdvertisingFlags {
    /// Whether the advertiser is in either LE discoverable mode.
    pub fn is_discoverable(&self) -> bool {
        self.intersects(Self::LE_LIMITED_DISCOVERABLE | Self::LE_GENERAL_DISCOVERABLE)
    }
}
