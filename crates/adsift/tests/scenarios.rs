//! End-to-end decoding and filtering of captured advertisements

use adsift::scan::{is_partial_data_superset, matches_partial_data};
use adsift::{AdvertisementRecord, Filter, Sighting, Uuid};

const IBEACON: [u8; 6] = [0x05, 0xFF, 0x4C, 0x00, 0x02, 0x15];

fn sighting(bytes: &[u8]) -> Sighting {
    Sighting::new(Some("C0:FF:EE:00:00:01".into()), bytes, -70, 42_000_000)
}

#[test]
fn short_uuids_expand_against_the_base_uuid() {
    let vectors = [
        (0x1800u32, "00001800-0000-1000-8000-00805f9b34fb"),
        (0x180D, "0000180d-0000-1000-8000-00805f9b34fb"),
        (0xFEAA, "0000feaa-0000-1000-8000-00805f9b34fb"),
        (0x0001_0000, "00010000-0000-1000-8000-00805f9b34fb"),
        (0xFFFF_FFFF, "ffffffff-0000-1000-8000-00805f9b34fb"),
    ];

    for (short, canonical) in vectors {
        let uuid = Uuid::from_u32(short);
        assert_eq!(uuid.to_string(), canonical);
        assert_eq!(uuid, canonical.parse::<Uuid>().unwrap());
        assert_eq!(uuid.least_significant_bits(), 0x8000_0080_5F9B_34FB);
        assert_eq!(
            uuid.most_significant_bits(),
            0x0000_1000 + ((short as u64) << 32)
        );
    }

    let decoded = AdvertisementRecord::decode(&[0x03, 0x03, 0x00, 0x18]);
    assert_eq!(
        decoded.service_uuids()[0].to_string(),
        "00001800-0000-1000-8000-00805f9b34fb"
    );
}

#[test]
fn flags_only_advertisement() {
    let record = AdvertisementRecord::decode(&[0x02, 0x01, 0x06]);

    assert_eq!(record.flags(), Some(0x06));
    assert!(record.service_uuids().is_empty());
    assert!(record.manufacturer_data().is_empty());
    assert!(record.service_data().is_empty());
    assert_eq!(record.tx_power_level(), None);
    assert_eq!(record.device_name(), None);
}

#[test]
fn complete_local_name() {
    let record = AdvertisementRecord::decode(&[0x05, 0x09, b'T', b'e', b's', b't']);
    assert_eq!(record.device_name(), Some("Test"));
}

#[test]
fn manufacturer_data_is_little_endian() {
    let record = AdvertisementRecord::decode(&IBEACON);
    assert_eq!(record.manufacturer_data_for(0x004C), Some(&[0x02, 0x15][..]));
    assert_eq!(record.manufacturer_data_for(0x4C00), None);
}

#[test]
fn masked_manufacturer_filter_ignores_unmasked_bytes() {
    let filter = Filter::builder()
        .manufacturer_data_with_mask(0x004C, [0x02], [0xFF])
        .build()
        .unwrap();

    assert!(filter.matches(&sighting(&IBEACON)));
    assert!(filter.matches(&sighting(&[0x05, 0xFF, 0x4C, 0x00, 0x02, 0x99])));
    assert!(!filter.matches(&sighting(&[0x05, 0xFF, 0x4C, 0x00, 0x03, 0x15])));
    assert!(!filter.matches(&sighting(&[0x05, 0xFF, 0x06, 0x00, 0x02, 0x15])));
}

#[test]
fn empty_filter_matches_every_sighting() {
    let filter = Filter::builder().build().unwrap();
    assert!(filter.is_empty());

    for bytes in [&[0u8; 0][..], &IBEACON[..], &[0xFF, 0x00][..]] {
        assert!(filter.matches(&sighting(bytes)));
        assert!(filter.matches(&Sighting::new(None, bytes, 0, 0)));
    }
}

#[test]
fn decoding_is_idempotent_and_keeps_raw_bytes() {
    let inputs: [&[u8]; 4] = [&IBEACON, &[0x02, 0x01], &[0x1F], &[0x02, 0x01, 0x06, 0x00, 0x00]];

    for input in inputs {
        let first = AdvertisementRecord::decode(input);
        let second = AdvertisementRecord::decode(input);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.raw_bytes(), input);
    }
}

#[test]
fn narrower_mask_filter_covers_wider_mask_filter() {
    let pattern = [0x02, 0x15];
    let narrow_mask = [0xF0, 0x00];
    let wide_mask = [0xFF, 0x0F];

    let broad = Filter::builder()
        .manufacturer_data_with_mask(0x004C, pattern, narrow_mask)
        .build()
        .unwrap();
    let strict = Filter::builder()
        .manufacturer_data_with_mask(0x004C, pattern, wide_mask)
        .build()
        .unwrap();

    assert!(is_partial_data_superset(
        Some(&pattern[..]),
        Some(&narrow_mask[..]),
        Some(&pattern[..]),
        Some(&wide_mask[..])
    ));
    assert!(broad.is_superset(&strict));
    assert!(!strict.is_superset(&broad));

    let candidate = [0x02, 0x05];
    assert!(matches_partial_data(&pattern, Some(&wide_mask[..]), &candidate));
    assert!(matches_partial_data(&pattern, Some(&narrow_mask[..]), &candidate));

    let s = sighting(&[0x05, 0xFF, 0x4C, 0x00, 0x02, 0x05]);
    assert!(strict.matches(&s));
    assert!(broad.matches(&s));
}
