//! Plain-data description of a [`Filter`].
//!
//! `FilterConfig` is what filters look like in configuration files: every
//! field optional, UUIDs as strings, and the manufacturer id as a signed
//! integer where `-1` means unset. Converting it into a [`Filter`] applies the
//! same validation as [`FilterBuilder::build`](super::FilterBuilder::build).

use super::filter::{Filter, FilterBuilder};
use crate::error::FilterError;
use crate::uuid::Uuid;

/// Manufacturer id value meaning "no manufacturer criterion".
pub const MANUFACTURER_ID_UNSET: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct FilterConfig {
    pub device_name: Option<String>,
    pub device_address: Option<String>,
    pub service_uuid: Option<Uuid>,
    pub service_uuid_mask: Option<Uuid>,
    pub service_data_uuid: Option<Uuid>,
    pub service_data: Option<Vec<u8>>,
    pub service_data_mask: Option<Vec<u8>>,
    pub manufacturer_id: i32,
    pub manufacturer_data: Option<Vec<u8>>,
    pub manufacturer_data_mask: Option<Vec<u8>>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            device_address: None,
            service_uuid: None,
            service_uuid_mask: None,
            service_data_uuid: None,
            service_data: None,
            service_data_mask: None,
            manufacturer_id: MANUFACTURER_ID_UNSET,
            manufacturer_data: None,
            manufacturer_data_mask: None,
        }
    }
}

impl TryFrom<FilterConfig> for Filter {
    type Error = FilterError;

    fn try_from(config: FilterConfig) -> Result<Self, Self::Error> {
        let has_manufacturer_criterion = config.manufacturer_id != MANUFACTURER_ID_UNSET
            || config.manufacturer_data.is_some();

        FilterBuilder {
            device_name: config.device_name,
            device_address: config.device_address,
            service_uuid: config.service_uuid,
            service_uuid_mask: config.service_uuid_mask,
            service_data_uuid: config.service_data_uuid,
            service_data: config.service_data,
            service_data_mask: config.service_data_mask,
            manufacturer_id: has_manufacturer_criterion.then_some(config.manufacturer_id),
            manufacturer_data: config.manufacturer_data,
            manufacturer_data_mask: config.manufacturer_data_mask,
        }
        .build()
    }
}

impl From<Filter> for FilterConfig {
    fn from(filter: Filter) -> Self {
        Self {
            device_name: filter.device_name().map(str::to_owned),
            device_address: filter.device_address().map(str::to_owned),
            service_uuid: filter.service_uuid().copied(),
            service_uuid_mask: filter.service_uuid_mask().copied(),
            service_data_uuid: filter.service_data_uuid().copied(),
            service_data: filter.service_data().map(<[u8]>::to_vec),
            service_data_mask: filter.service_data_mask().map(<[u8]>::to_vec),
            manufacturer_id: filter
                .manufacturer_id()
                .map_or(MANUFACTURER_ID_UNSET, i32::from),
            manufacturer_data: filter.manufacturer_data().map(<[u8]>::to_vec),
            manufacturer_data_mask: filter.manufacturer_data_mask().map(<[u8]>::to_vec),
        }
    }
}
