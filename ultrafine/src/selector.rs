//! Resolves which of the attached monitors a request applies to.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::transport::DeviceDescriptor;

/// The token selecting every attached monitor.
pub const ALL_TOKEN: &str = "all";

/// Selects one or all supported monitors.
///
/// Indices are zero-based ordinals counting only supported monitors, in
/// enumeration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DeviceSelection {
    /// The monitor at a specific ordinal.
    Index(usize),

    /// Every supported monitor.
    All,
}

impl FromStr for DeviceSelection {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_TOKEN {
            return Ok(Self::All);
        }

        s.parse::<usize>()
            .map(Self::Index)
            .map_err(|_| ParseSelectionError(s.to_owned()))
    }
}

impl fmt::Display for DeviceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::All => f.write_str(ALL_TOKEN),
        }
    }
}

/// Indicates that a string is neither `all` nor a non-negative integer.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("expected a non-negative device index or \"{ALL_TOKEN}\", got {0:?}")]
pub struct ParseSelectionError(pub String);

/// Filters enumerated devices down to supported monitors and picks the ones
/// matching the selection.
///
/// The result preserves enumeration order. Selecting an index no monitor
/// occupies yields an empty result.
pub fn select_devices<D>(
    devices: impl IntoIterator<Item = (DeviceDescriptor, D)>,
    selection: DeviceSelection,
) -> Vec<D> {
    select_indexed(devices, selection)
        .into_iter()
        .map(|(_, device)| device)
        .collect()
}

/// Like [`select_devices`], but pairs every selected device with its ordinal
/// among supported monitors.
pub fn select_indexed<D>(
    devices: impl IntoIterator<Item = (DeviceDescriptor, D)>,
    selection: DeviceSelection,
) -> Vec<(usize, D)> {
    let matching = devices
        .into_iter()
        .filter(|(descriptor, _)| descriptor.is_target())
        .map(|(_, device)| device)
        .enumerate();

    match selection {
        DeviceSelection::Index(index) => matching.skip(index).take(1).collect(),
        DeviceSelection::All => matching.collect(),
    }
}
