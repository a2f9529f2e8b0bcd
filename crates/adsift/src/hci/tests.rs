//! Unit tests for HCI event parsing

use super::constants::*;
use super::packet::*;
use crate::error::HciError;
use crate::gap::AddressType;
use crate::scan::Filter;

fn two_report_event() -> HciEvent {
    let parameters = vec![
        EVT_LE_ADVERTISING_REPORT, // Subevent code
        2,                         // Num_Reports
        // First report
        ADV_IND, // Event_Type
        0x00,    // Address_Type (public)
        0x55,
        0x44,
        0x33,
        0x22,
        0x11,
        0x00, // Address
        9,    // Data_Length
        0x02,
        0x01,
        0x06, // Flags
        0x05,
        0xFF,
        0x4C,
        0x00,
        0x02,
        0x15, // Manufacturer data
        0xC3, // RSSI (-61 dBm)
        // Second report
        SCAN_RSP, // Event_Type
        0x01,     // Address_Type (random)
        0x01,
        0x02,
        0x03,
        0x04,
        0x05,
        0x06, // Address
        6,    // Data_Length
        0x05,
        0x09,
        b'T',
        b'e',
        b's',
        b't', // Complete Local Name
        0xB0, // RSSI (-80 dBm)
    ];

    HciEvent {
        event_code: EVT_LE_META_EVENT,
        parameter_total_length: parameters.len() as u8,
        parameters,
    }
}

#[test]
fn test_hci_event_parsing() {
    let data = [
        EVT_LE_META_EVENT,         // Event code
        2,                         // Parameter length
        EVT_LE_ADVERTISING_REPORT, // Subevent code
        0,                         // Num_Reports
        0xAA,                      // Trailing byte outside the event
    ];

    let event = HciEvent::parse(&data).unwrap();
    assert_eq!(event.event_code, EVT_LE_META_EVENT);
    assert_eq!(event.parameter_total_length, 2);
    assert_eq!(event.parameters, vec![EVT_LE_ADVERTISING_REPORT, 0]);
    assert_eq!(event.subevent_code(), Some(EVT_LE_ADVERTISING_REPORT));

    // Invalid data tests
    assert_eq!(
        HciEvent::parse(&[]),
        Err(HciError::Truncated {
            needed: 2,
            actual: 0
        })
    );
    assert_eq!(
        HciEvent::parse(&[0x0E, 10, 1, 2]),
        Err(HciError::Truncated {
            needed: 12,
            actual: 4
        })
    );
}

#[test]
fn test_hci_packet_indicator() {
    let packet = [HCI_EVENT_PKT, EVT_LE_META_EVENT, 2, EVT_LE_ADVERTISING_REPORT, 0];
    let event = HciEvent::parse_packet(&packet).unwrap();
    assert_eq!(event.subevent_code(), Some(EVT_LE_ADVERTISING_REPORT));

    assert_eq!(
        HciEvent::parse_packet(&[HCI_COMMAND_PKT, 0x03, 0x0C, 0x00]),
        Err(HciError::UnexpectedPacketType(HCI_COMMAND_PKT))
    );
    assert!(HciEvent::parse_packet(&[]).is_err());
}

#[test]
fn test_le_advertising_report_parsing() {
    let reports = LeAdvertisingReport::parse_from_event(&two_report_event()).unwrap();
    assert_eq!(reports.len(), 2);

    let report = &reports[0];
    assert_eq!(report.event_type, AdvertisingEventType::ConnectableUndirected);
    assert!(report.event_type.is_connectable());
    assert_eq!(report.address_type, AddressType::Public);
    assert_eq!(report.address.to_string(), "00:11:22:33:44:55");
    assert_eq!(report.data.len(), 9);
    assert_eq!(report.rssi, -61);

    let report = &reports[1];
    assert_eq!(report.event_type, AdvertisingEventType::ScanResponse);
    assert!(!report.event_type.is_connectable());
    assert_eq!(report.address_type, AddressType::Random);
    assert_eq!(report.address.to_string(), "06:05:04:03:02:01");
    assert_eq!(report.data, b"\x05\x09Test".to_vec());
    assert_eq!(report.rssi, -80);
}

#[test]
fn test_le_advertising_report_invalid() {
    // Not an LE Meta event
    let event = HciEvent {
        event_code: 0x0E,
        parameter_total_length: 4,
        parameters: vec![1, 0x03, 0x0C, 0x00],
    };
    assert_eq!(
        LeAdvertisingReport::parse_from_event(&event),
        Err(HciError::UnexpectedEvent {
            event_code: 0x0E,
            subevent: None
        })
    );

    // Not an Advertising Report subevent
    let event = HciEvent {
        event_code: EVT_LE_META_EVENT,
        parameter_total_length: 3,
        parameters: vec![EVT_LE_CONN_COMPLETE, 0x00, 0x00],
    };
    assert_eq!(
        LeAdvertisingReport::parse_from_event(&event),
        Err(HciError::UnexpectedEvent {
            event_code: EVT_LE_META_EVENT,
            subevent: Some(EVT_LE_CONN_COMPLETE)
        })
    );

    // No reports
    let event = HciEvent {
        event_code: EVT_LE_META_EVENT,
        parameter_total_length: 2,
        parameters: vec![EVT_LE_ADVERTISING_REPORT, 0],
    };
    assert_eq!(LeAdvertisingReport::parse_from_event(&event), Ok(vec![]));

    // Second report missing its RSSI
    let mut event = two_report_event();
    event.parameters.pop();
    assert!(matches!(
        LeAdvertisingReport::parse_from_event(&event),
        Err(HciError::Truncated { .. })
    ));

    // Data length larger than what follows
    let event = HciEvent {
        event_code: EVT_LE_META_EVENT,
        parameter_total_length: 12,
        parameters: vec![
            EVT_LE_ADVERTISING_REPORT,
            1,
            ADV_NONCONN_IND,
            0x00,
            0x01,
            0x02,
            0x03,
            0x04,
            0x05,
            0x06,
            31, // Data_Length
            0x02,
        ],
    };
    assert!(matches!(
        LeAdvertisingReport::parse_from_event(&event),
        Err(HciError::Truncated { .. })
    ));

    // Num_Reports missing
    let event = HciEvent {
        event_code: EVT_LE_META_EVENT,
        parameter_total_length: 1,
        parameters: vec![EVT_LE_ADVERTISING_REPORT],
    };
    assert_eq!(
        LeAdvertisingReport::parse_from_event(&event),
        Err(HciError::Truncated {
            needed: 1,
            actual: 0
        })
    );
}

#[test]
fn test_sightings_from_event() {
    let sightings = sightings_from_event(&two_report_event(), 5_000_000);
    assert_eq!(sightings.len(), 2);

    let first = &sightings[0];
    assert_eq!(first.device_id(), Some("00:11:22:33:44:55"));
    assert_eq!(first.rssi(), -61);
    assert_eq!(first.timestamp_millis(), 5);
    assert_eq!(first.record().flags(), Some(0x06));
    assert_eq!(first.record().manufacturer_data_for(0x004C), Some(&[0x02, 0x15][..]));

    let second = &sightings[1];
    assert_eq!(second.device_id(), Some("06:05:04:03:02:01"));
    assert_eq!(second.record().device_name(), Some("Test"));

    let filter = Filter::builder()
        .device_address("00:11:22:33:44:55")
        .manufacturer_data(0x004C, [0x02])
        .build()
        .unwrap();
    assert!(filter.matches(first));
    assert!(!filter.matches(second));

    // Reports carry the address least significant octet first
    let by_address = Filter::builder()
        .device_address("06:05:04:03:02:01")
        .build()
        .unwrap();
    assert!(by_address.matches(second));
    assert!(!by_address.matches(first));

    let mut truncated = two_report_event();
    truncated.parameters.truncate(10);
    assert!(sightings_from_event(&truncated, 0).is_empty());
}
