//! Error types for the adsift library
//!
//! Advertisement decoding never fails, so the only errors are raised while
//! building filters and while reading HCI events.

use crate::gap::AddressParseError;
use thiserror::Error;

/// Errors raised by [`FilterBuilder::build`](crate::scan::FilterBuilder::build).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressParseError),

    #[error("{field} mask is {mask_len} bytes but the data is {data_len} bytes")]
    MaskLengthMismatch {
        field: &'static str,
        data_len: usize,
        mask_len: usize,
    },

    #[error("{0} mask set without a value to mask")]
    MaskWithoutValue(&'static str),

    #[error("service data set without a service data UUID")]
    MissingServiceDataUuid,

    #[error("invalid manufacturer id {0}: must be in 0..=65535")]
    InvalidManufacturerId(i32),
}

/// Errors raised when an HCI event does not have the expected layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HciError {
    #[error("HCI packet too short: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("unexpected HCI packet type {0:#04x}")]
    UnexpectedPacketType(u8),

    #[error("unexpected HCI event {event_code:#04x} (subevent {subevent:?})")]
    UnexpectedEvent { event_code: u8, subevent: Option<u8> },
}
