//! Wire-level constants of the brightness feature report exchange.
//!
//! All values in here are dictated by the monitor firmware and must be kept
//! bit-exact.

use std::time::Duration;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The USB vendor ID of the supported monitors.
pub const VENDOR_ID: u16 = 0x043e;

/// The USB product ID of the supported monitors.
pub const PRODUCT_ID: u16 = 0x9a40;

/// The number of the HID interface carrying the brightness report.
pub const INTERFACE: u8 = 1;

/// The ID of the brightness feature report.
pub const REPORT_ID: u8 = 0;

/// The size of the buffer a GET_REPORT request reads into.
pub const GET_REPORT_LENGTH: usize = 8;

/// The size of the payload a SET_REPORT request writes.
pub const SET_REPORT_LENGTH: usize = 6;

/// The timeout applied to every control transfer.
///
/// A zero duration makes the transport wait indefinitely.
pub const TRANSFER_TIMEOUT: Duration = Duration::ZERO;

const REQUEST_TYPE_CLASS: u8 = 0x01 << 5;
const RECIPIENT_INTERFACE: u8 = 0x01;

/// Class-specific HID requests as defined by the HID specification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum HidRequest {
    GetReport = 0x01,
    SetReport = 0x09,
}

/// The report types a HID GET/SET_REPORT request can address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ReportType {
    Input = 0x01,
    Output = 0x02,
    Feature = 0x03,
}

/// The direction of a control transfer's data stage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    /// Device to host.
    In,

    /// Host to device.
    Out,
}

/// Builds the `bmRequestType` of a class-specific, interface-recipient
/// control transfer.
pub fn request_type(direction: Direction) -> u8 {
    let direction_bit = match direction {
        Direction::In => 0x80,
        Direction::Out => 0x00,
    };

    direction_bit | REQUEST_TYPE_CLASS | RECIPIENT_INTERFACE
}

/// Builds the `wValue` of a GET/SET_REPORT request, with the report type in
/// the high and the report ID in the low byte.
pub fn report_value(report_type: ReportType, report_id: u8) -> u16 {
    (u16::from(u8::from(report_type)) << 8) | u16::from(report_id)
}
