//! HCI protocol constants
//!
//! The subset of HCI framing needed to read LE advertising reports.

// HCI packet types
pub const HCI_COMMAND_PKT: u8 = 0x01;
pub const HCI_EVENT_PKT: u8 = 0x04;

// Event header: event code + parameter total length
pub const HCI_EVENT_HDR_SIZE: usize = 2;

// HCI Events
pub const EVT_LE_META_EVENT: u8 = 0x3E;

// LE Meta Events
pub const EVT_LE_CONN_COMPLETE: u8 = 0x01;
pub const EVT_LE_ADVERTISING_REPORT: u8 = 0x02;

// LE Advertising Report event types
pub const ADV_IND: u8 = 0x00;
pub const ADV_DIRECT_IND: u8 = 0x01;
pub const ADV_SCAN_IND: u8 = 0x02;
pub const ADV_NONCONN_IND: u8 = 0x03;
pub const SCAN_RSP: u8 = 0x04;

// Fixed part of one report: event type, address type, address, data length
pub const ADV_REPORT_FIXED_SIZE: usize = 9;
