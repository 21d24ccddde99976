//! The seam between this crate and the USB library doing the actual I/O.
//!
//! This crate does not talk to USB itself. Callers provide an implementation
//! of [`UsbTransport`] (and the [`UsbSession`] it opens) backed by the USB
//! library of their choice.

use std::{error::Error, time::Duration};

use crate::protocol::{PRODUCT_ID, VENDOR_ID};

/// The identifying fields of a USB device descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl DeviceDescriptor {
    /// Checks whether the descriptor belongs to a supported monitor.
    pub fn is_target(&self) -> bool {
        self.vendor_id == VENDOR_ID && self.product_id == PRODUCT_ID
    }
}

/// An error reported by a transport implementation.
///
/// Besides being a regular error, it has to expose the numeric result code
/// and the symbolic name of the failure so diagnostics can report them.
pub trait TransportError: Error {
    /// The numeric (usually negative) result code of the failure.
    fn code(&self) -> i32;

    /// The symbolic name of the failure, e.g. `LIBUSB_ERROR_ACCESS`.
    fn name(&self) -> &'static str;
}

/// Represents access to the USB subsystem.
pub trait UsbTransport {
    /// An implementation-specific handle to an enumerated, unopened device.
    type Device;

    /// An opened device. Dropping it closes the device.
    type Session: UsbSession<Error = Self::Error>;

    /// An implementation-specific error type.
    type Error: TransportError;

    /// Lists all devices currently attached, in enumeration order.
    fn enumerate(&self) -> Result<Vec<(DeviceDescriptor, Self::Device)>, Self::Error>;

    /// Opens a previously enumerated device.
    fn open(&self, device: &Self::Device) -> Result<Self::Session, Self::Error>;
}

/// Represents an opened USB device.
pub trait UsbSession {
    /// An implementation-specific error type.
    type Error: TransportError;

    /// Makes the transport detach an OS driver bound to an interface when it
    /// is claimed and re-attach it when it is released.
    ///
    /// Not every platform supports this.
    fn set_auto_detach_kernel_driver(&mut self, enable: bool) -> Result<(), Self::Error>;

    /// Claims an interface for exclusive use.
    fn claim_interface(&mut self, interface: u8) -> Result<(), Self::Error>;

    /// Releases a previously claimed interface.
    fn release_interface(&mut self, interface: u8) -> Result<(), Self::Error>;

    /// Re-attaches the OS driver to an interface.
    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), Self::Error>;

    /// Performs a control transfer with a device-to-host data stage.
    ///
    /// Returns the exact amount of read bytes on success.
    fn read_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error>;

    /// Performs a control transfer with a host-to-device data stage.
    ///
    /// Returns the exact amount of written bytes on success.
    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error>;
}
