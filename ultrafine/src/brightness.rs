//! Encodes and decodes the brightness feature report.
//!
//! The monitor reports and accepts a raw 16-bit little-endian value between
//! [`MIN_RAW`] and [`MAX_RAW`]. Users deal in percentages, which are scaled
//! against [`MAX_RAW`], truncating toward zero.

use crate::protocol::{GET_REPORT_LENGTH, SET_REPORT_LENGTH};

/// The raw value of the lowest brightness.
pub const MIN_RAW: u16 = 0x0000;

/// The raw value of the highest brightness.
pub const MAX_RAW: u16 = 0xd2f0;

/// Raw units per percent. [`MAX_RAW`] is exactly 100 of them.
const RAW_PER_PERCENT: i64 = 540;

/// Converts a percentage into a raw value.
///
/// Percentages outside `0..=100` are accepted and clamped into the raw range.
pub fn percent_to_raw(percent: i32) -> u16 {
    (i64::from(percent) * RAW_PER_PERCENT).clamp(i64::from(MIN_RAW), i64::from(MAX_RAW)) as u16
}

/// Converts a raw value into a percentage, truncating toward zero.
///
/// Raw values above [`MAX_RAW`] are not clamped and yield more than 100.
pub fn raw_to_percent(raw: u16) -> u8 {
    (i64::from(raw) / RAW_PER_PERCENT) as u8
}

/// Builds the SET_REPORT payload for a brightness percentage.
pub fn encode_brightness(percent: i32) -> [u8; SET_REPORT_LENGTH] {
    let [lo, hi] = percent_to_raw(percent).to_le_bytes();
    [lo, hi, 0x00, 0x00, 0x00, 0x00]
}

/// Extracts the raw value from a GET_REPORT reply.
pub fn decode_raw(report: &[u8; GET_REPORT_LENGTH]) -> u16 {
    u16::from_le_bytes([report[0], report[1]])
}

/// Extracts the brightness percentage from a GET_REPORT reply.
pub fn decode_brightness(report: &[u8; GET_REPORT_LENGTH]) -> u8 {
    raw_to_percent(decode_raw(report))
}
