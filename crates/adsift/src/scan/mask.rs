//! Bit-mask partial matching shared by filter matching and filter subsumption.
//!
//! A mask selects the bits that must agree between a pattern and a candidate.
//! No mask means every bit is compared.

use crate::uuid::Uuid;

const FULL_MASK_HALF: u64 = u64::MAX;

/// Whether `candidate` starts with `pattern` on every bit selected by `mask`.
///
/// `candidate` may be longer than `pattern`; trailing bytes are ignored. A
/// `mask` whose length differs from `pattern` never matches.
pub fn matches_partial_data(pattern: &[u8], mask: Option<&[u8]>, candidate: &[u8]) -> bool {
    if candidate.len() < pattern.len() || mask.is_some_and(|m| m.len() != pattern.len()) {
        return false;
    }

    match mask {
        None => candidate[..pattern.len()] == *pattern,
        Some(mask) => pattern
            .iter()
            .zip(mask)
            .zip(candidate)
            .all(|((p, m), c)| m & c == m & p),
    }
}

/// Whether `candidate` agrees with `uuid` on every bit selected by `mask`.
pub fn matches_uuid(uuid: &Uuid, mask: Option<&Uuid>, candidate: &Uuid) -> bool {
    let (mask_msb, mask_lsb) = mask_halves(mask);

    (uuid.most_significant_bits() & mask_msb) == (candidate.most_significant_bits() & mask_msb)
        && (uuid.least_significant_bits() & mask_lsb)
            == (candidate.least_significant_bits() & mask_lsb)
}

/// Whether every UUID matched by `(b, b_mask)` is also matched by `(a, a_mask)`.
///
/// An unset `a` matches everything. A set `a` never covers an unset `b`.
pub fn is_uuid_superset(
    a: Option<&Uuid>,
    a_mask: Option<&Uuid>,
    b: Option<&Uuid>,
    b_mask: Option<&Uuid>,
) -> bool {
    let Some(a) = a else {
        return true;
    };
    let Some(b) = b else {
        return false;
    };

    let (a_msb_mask, a_lsb_mask) = mask_halves(a_mask);
    let (b_msb_mask, b_lsb_mask) = mask_halves(b_mask);

    is_half_superset(
        a.most_significant_bits(),
        a_msb_mask,
        b.most_significant_bits(),
        b_msb_mask,
    ) && is_half_superset(
        a.least_significant_bits(),
        a_lsb_mask,
        b.least_significant_bits(),
        b_lsb_mask,
    )
}

/// Byte-wise counterpart of [`is_uuid_superset`].
///
/// `a` must not be longer than `b`, since `b` accepts candidates as short as
/// its own pattern.
pub fn is_partial_data_superset(
    a: Option<&[u8]>,
    a_mask: Option<&[u8]>,
    b: Option<&[u8]>,
    b_mask: Option<&[u8]>,
) -> bool {
    let Some(a) = a else {
        return true;
    };
    let Some(b) = b else {
        return false;
    };
    if a.len() > b.len() {
        return false;
    }

    a.iter().zip(b).enumerate().all(|(i, (&a_byte, &b_byte))| {
        let a_bits = mask_byte(a_mask, i);
        let b_bits = mask_byte(b_mask, i);
        a_bits & b_bits == a_bits && a_byte & a_bits == b_byte & a_bits
    })
}

fn is_half_superset(a: u64, a_mask: u64, b: u64, b_mask: u64) -> bool {
    (a_mask & b_mask) == a_mask && (a & a_mask) == (b & a_mask)
}

fn mask_halves(mask: Option<&Uuid>) -> (u64, u64) {
    mask.map_or((FULL_MASK_HALF, FULL_MASK_HALF), |m| {
        (m.most_significant_bits(), m.least_significant_bits())
    })
}

fn mask_byte(mask: Option<&[u8]>, index: usize) -> u8 {
    mask.and_then(|m| m.get(index).copied()).unwrap_or(0xFF)
}
