//! Example: Filtering LE advertising reports
//!
//! Decodes a captured LE Advertising Report event, prints every sighting and
//! reports which scan filters accept it. Run with `RUST_LOG=adsift=trace` to
//! see why filters reject a sighting.

use adsift::{sightings_from_event, Filter, HciEvent, Uuid};
use tracing_subscriber::EnvFilter;

// H4 event packet with two reports: an iBeacon style advertisement and a
// scan response carrying a local name.
const CAPTURED_EVENT: &str = concat!(
    "043e",   // Event packet, LE Meta Event
    "3002",   // Parameter length, LE Advertising Report
    "02",     // Num_Reports
    "0300",   // ADV_NONCONN_IND, public address
    "554433221100",
    "0c",     // Data_Length
    "020106", // Flags
    "08ff4c000215aabbcc", // Apple manufacturer data
    "c3",     // RSSI -61 dBm
    "0401",   // SCAN_RSP, random address
    "010203040506",
    "0e",     // Data_Length
    "0309aaff", // Short name with invalid UTF-8
    "0303aafe", // Eddystone 16-bit service UUID
    "05162aff0102", // Service data
    "b0"      // RSSI -80 dBm
);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let filters = [
        Filter::builder()
            .manufacturer_data_with_mask(0x004C, [0x02, 0x15], [0xFF, 0xFF])
            .build()?,
        Filter::builder()
            .service_uuid(Uuid::from_u16(0xFEAA))
            .build()?,
        Filter::builder()
            .device_address("06:05:04:03:02:01")
            .build()?,
    ];

    let packet = hex::decode(CAPTURED_EVENT)?;
    let event = HciEvent::parse_packet(&packet)?;

    for sighting in sightings_from_event(&event, 0) {
        println!(
            "{} rssi={} (normalized {})",
            sighting.device_id().unwrap_or("<unknown>"),
            sighting.rssi(),
            sighting.normalized_rssi()
        );
        println!("  {}", sighting.record());

        for (i, filter) in filters.iter().enumerate() {
            println!("  filter {}: {}", i, filter.matches(&sighting));
        }
    }

    Ok(())
}
