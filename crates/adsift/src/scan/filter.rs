//! Scan filters
//!
//! A [`Filter`] is a conjunction of optional criteria over a [`Sighting`].
//! Unset criteria match everything, so the default filter accepts every
//! sighting.

use super::mask::{
    is_partial_data_superset, is_uuid_superset, matches_partial_data, matches_uuid,
};
use super::sighting::Sighting;
use crate::error::FilterError;
use crate::gap::BdAddr;
use crate::uuid::Uuid;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UuidCriterion {
    uuid: Uuid,
    mask: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DataCriterion<K> {
    key: K,
    data: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl<K> DataCriterion<K> {
    fn matches(&self, candidate: Option<&[u8]>) -> bool {
        candidate.is_some_and(|c| matches_partial_data(&self.data, self.mask.as_deref(), c))
    }
}

/// Immutable set of criteria a sighting must satisfy.
///
/// Construct with [`Filter::builder`]. Every mask has the same length as the
/// data it applies to, and the device address, if any, is a well-formed
/// `XX:XX:XX:XX:XX:XX` string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "super::config::FilterConfig", into = "super::config::FilterConfig")
)]
pub struct Filter {
    device_name: Option<String>,
    device_address: Option<String>,
    service_uuid: Option<UuidCriterion>,
    service_data: Option<DataCriterion<Uuid>>,
    manufacturer_data: Option<DataCriterion<u16>>,
}

impl Filter {
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn device_address(&self) -> Option<&str> {
        self.device_address.as_deref()
    }

    pub fn service_uuid(&self) -> Option<&Uuid> {
        self.service_uuid.as_ref().map(|c| &c.uuid)
    }

    pub fn service_uuid_mask(&self) -> Option<&Uuid> {
        self.service_uuid.as_ref().and_then(|c| c.mask.as_ref())
    }

    pub fn service_data_uuid(&self) -> Option<&Uuid> {
        self.service_data.as_ref().map(|c| &c.key)
    }

    pub fn service_data(&self) -> Option<&[u8]> {
        self.service_data.as_ref().map(|c| c.data.as_slice())
    }

    pub fn service_data_mask(&self) -> Option<&[u8]> {
        self.service_data.as_ref().and_then(|c| c.mask.as_deref())
    }

    pub fn manufacturer_id(&self) -> Option<u16> {
        self.manufacturer_data.as_ref().map(|c| c.key)
    }

    pub fn manufacturer_data(&self) -> Option<&[u8]> {
        self.manufacturer_data.as_ref().map(|c| c.data.as_slice())
    }

    pub fn manufacturer_data_mask(&self) -> Option<&[u8]> {
        self.manufacturer_data.as_ref().and_then(|c| c.mask.as_deref())
    }

    /// True when no criterion is set; such a filter matches every sighting.
    pub fn is_empty(&self) -> bool {
        self.device_address.is_none() && !self.requires_record()
    }

    /// Criteria that can only be evaluated against decoded advertising data.
    fn requires_record(&self) -> bool {
        self.device_name.is_some()
            || self.service_uuid.is_some()
            || self.service_data.is_some()
            || self.manufacturer_data.is_some()
    }

    /// Whether `sighting` satisfies every criterion set on this filter.
    pub fn matches(&self, sighting: &Sighting) -> bool {
        if let Some(address) = &self.device_address {
            if !sighting
                .device_id()
                .is_some_and(|id| id.eq_ignore_ascii_case(address))
            {
                trace!(address, device_id = ?sighting.device_id(), "device address mismatch");
                return false;
            }
        }

        let record = sighting.record();
        if self.requires_record() && record.is_empty() {
            trace!("no decoded advertising data to match against");
            return false;
        }

        if let Some(name) = &self.device_name {
            if record.device_name() != Some(name.as_str()) {
                trace!(name, "device name mismatch");
                return false;
            }
        }

        if let Some(criterion) = &self.service_uuid {
            if !record
                .service_uuids()
                .iter()
                .any(|candidate| matches_uuid(&criterion.uuid, criterion.mask.as_ref(), candidate))
            {
                trace!(uuid = %criterion.uuid, "no matching service UUID");
                return false;
            }
        }

        if let Some(criterion) = &self.service_data {
            if !criterion.matches(record.service_data_for(&criterion.key)) {
                trace!(uuid = %criterion.key, "service data mismatch");
                return false;
            }
        }

        if let Some(criterion) = &self.manufacturer_data {
            if !criterion.matches(record.manufacturer_data_for(criterion.key)) {
                trace!(manufacturer_id = criterion.key, "manufacturer data mismatch");
                return false;
            }
        }

        true
    }

    /// Whether every sighting matched by `other` is also matched by `self`.
    ///
    /// Used to drop scan filters that a broader filter already covers.
    pub fn is_superset(&self, other: &Filter) -> bool {
        if self == other {
            return true;
        }

        if let Some(address) = &self.device_address {
            if !other
                .device_address()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(address))
            {
                return false;
            }
        }

        if self.device_name.is_some() && self.device_name != other.device_name {
            return false;
        }

        if !is_uuid_superset(
            self.service_uuid(),
            self.service_uuid_mask(),
            other.service_uuid(),
            other.service_uuid_mask(),
        ) {
            return false;
        }

        if self.service_data.is_some() && self.service_data_uuid() != other.service_data_uuid() {
            return false;
        }
        if !is_partial_data_superset(
            self.service_data(),
            self.service_data_mask(),
            other.service_data(),
            other.service_data_mask(),
        ) {
            return false;
        }

        if self.manufacturer_data.is_some() && self.manufacturer_id() != other.manufacturer_id() {
            return false;
        }
        is_partial_data_superset(
            self.manufacturer_data(),
            self.manufacturer_data_mask(),
            other.manufacturer_data(),
            other.manufacturer_data_mask(),
        )
    }
}

/// True if any filter matches `sighting`. An empty filter list accepts everything.
pub fn matches_any(filters: &[Filter], sighting: &Sighting) -> bool {
    filters.is_empty() || filters.iter().any(|filter| filter.matches(sighting))
}

/// Drop every filter that another filter in the set already covers.
///
/// The result matches exactly the same sightings as the input. Of several
/// equal filters the first is kept.
pub fn prune_subsumed(filters: impl IntoIterator<Item = Filter>) -> Vec<Filter> {
    let mut kept: Vec<Filter> = Vec::new();

    for filter in filters {
        if kept.iter().any(|k| k.is_superset(&filter)) {
            continue;
        }
        kept.retain(|k| !filter.is_superset(k));
        kept.push(filter);
    }

    kept
}

/// Collects filter criteria and validates them in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    pub(super) device_name: Option<String>,
    pub(super) device_address: Option<String>,
    pub(super) service_uuid: Option<Uuid>,
    pub(super) service_uuid_mask: Option<Uuid>,
    pub(super) service_data_uuid: Option<Uuid>,
    pub(super) service_data: Option<Vec<u8>>,
    pub(super) service_data_mask: Option<Vec<u8>>,
    pub(super) manufacturer_id: Option<i32>,
    pub(super) manufacturer_data: Option<Vec<u8>>,
    pub(super) manufacturer_data_mask: Option<Vec<u8>>,
}

impl FilterBuilder {
    /// Require an exact local name.
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Require a device address such as `00:11:22:AA:BB:CC`. Checked in `build`.
    pub fn device_address(mut self, address: impl Into<String>) -> Self {
        self.device_address = Some(address.into());
        self
    }

    /// Require an advertised service UUID. Clears any previous mask.
    pub fn service_uuid(mut self, uuid: Uuid) -> Self {
        self.service_uuid = Some(uuid);
        self.service_uuid_mask = None;
        self
    }

    /// Require an advertised service UUID agreeing with `uuid` on the bits set in `mask`.
    pub fn service_uuid_with_mask(mut self, uuid: Uuid, mask: Uuid) -> Self {
        self.service_uuid = Some(uuid);
        self.service_uuid_mask = Some(mask);
        self
    }

    pub fn clear_service_uuid(mut self) -> Self {
        self.service_uuid = None;
        self.service_uuid_mask = None;
        self
    }

    /// Require service data for `uuid` starting with `data`.
    pub fn service_data(mut self, uuid: Uuid, data: impl Into<Vec<u8>>) -> Self {
        self.service_data_uuid = Some(uuid);
        self.service_data = Some(data.into());
        self.service_data_mask = None;
        self
    }

    /// Like [`service_data`](Self::service_data), comparing only the bits set in `mask`.
    pub fn service_data_with_mask(
        mut self,
        uuid: Uuid,
        data: impl Into<Vec<u8>>,
        mask: impl Into<Vec<u8>>,
    ) -> Self {
        self.service_data_uuid = Some(uuid);
        self.service_data = Some(data.into());
        self.service_data_mask = Some(mask.into());
        self
    }

    /// Require manufacturer specific data for `manufacturer_id` starting with
    /// `data`. Empty `data` only requires the id to be present.
    pub fn manufacturer_data(mut self, manufacturer_id: u16, data: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_id = Some(manufacturer_id.into());
        self.manufacturer_data = Some(data.into());
        self.manufacturer_data_mask = None;
        self
    }

    /// Like [`manufacturer_data`](Self::manufacturer_data), comparing only the bits set in `mask`.
    pub fn manufacturer_data_with_mask(
        mut self,
        manufacturer_id: u16,
        data: impl Into<Vec<u8>>,
        mask: impl Into<Vec<u8>>,
    ) -> Self {
        self.manufacturer_id = Some(manufacturer_id.into());
        self.manufacturer_data = Some(data.into());
        self.manufacturer_data_mask = Some(mask.into());
        self
    }

    /// Validate the collected criteria.
    pub fn build(self) -> Result<Filter, FilterError> {
        if let Some(address) = &self.device_address {
            address.parse::<BdAddr>()?;
        }

        let service_uuid = match (self.service_uuid, self.service_uuid_mask) {
            (Some(uuid), mask) => Some(UuidCriterion { uuid, mask }),
            (None, Some(_)) => return Err(FilterError::MaskWithoutValue("service UUID")),
            (None, None) => None,
        };

        let service_data = match (self.service_data_uuid, self.service_data) {
            (Some(uuid), data) => Some(DataCriterion {
                key: uuid,
                mask: checked_mask("service data", data.as_deref(), self.service_data_mask)?,
                data: data.unwrap_or_default(),
            }),
            (None, Some(_)) => return Err(FilterError::MissingServiceDataUuid),
            (None, None) if self.service_data_mask.is_some() => {
                return Err(FilterError::MaskWithoutValue("service data"))
            }
            (None, None) => None,
        };

        let manufacturer_data = match (self.manufacturer_id, self.manufacturer_data) {
            (Some(id), data) => {
                let key = u16::try_from(id).map_err(|_| FilterError::InvalidManufacturerId(id))?;
                Some(DataCriterion {
                    key,
                    mask: checked_mask(
                        "manufacturer data",
                        data.as_deref(),
                        self.manufacturer_data_mask,
                    )?,
                    data: data.unwrap_or_default(),
                })
            }
            (None, Some(_)) => return Err(FilterError::InvalidManufacturerId(-1)),
            (None, None) if self.manufacturer_data_mask.is_some() => {
                return Err(FilterError::MaskWithoutValue("manufacturer data"))
            }
            (None, None) => None,
        };

        Ok(Filter {
            device_name: self.device_name,
            device_address: self.device_address,
            service_uuid,
            service_data,
            manufacturer_data,
        })
    }
}

fn checked_mask(
    field: &'static str,
    data: Option<&[u8]>,
    mask: Option<Vec<u8>>,
) -> Result<Option<Vec<u8>>, FilterError> {
    let Some(mask) = mask else {
        return Ok(None);
    };
    let data_len = data.map_or(0, <[u8]>::len);
    if mask.len() != data_len {
        return Err(FilterError::MaskLengthMismatch {
            field,
            data_len,
            mask_len: mask.len(),
        });
    }
    Ok(Some(mask))
}
