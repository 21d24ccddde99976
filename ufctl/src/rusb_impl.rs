//! Implements USB access using the `rusb` crate.

use std::time::Duration;

use log::warn;
use rusb::{Context, Device, DeviceHandle, LogLevel, UsbContext};
use thiserror::Error;
use ultrafine::transport::{DeviceDescriptor, TransportError, UsbSession, UsbTransport};

/// Wraps errors returned by `rusb` to expose libusb's result codes.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct UsbError(#[from] rusb::Error);

impl TransportError for UsbError {
    fn code(&self) -> i32 {
        match self.0 {
            rusb::Error::Io => -1,
            rusb::Error::InvalidParam => -2,
            rusb::Error::Access => -3,
            rusb::Error::NoDevice => -4,
            rusb::Error::NotFound => -5,
            rusb::Error::Busy => -6,
            rusb::Error::Timeout => -7,
            rusb::Error::Overflow => -8,
            rusb::Error::Pipe => -9,
            rusb::Error::Interrupted => -10,
            rusb::Error::NoMem => -11,
            rusb::Error::NotSupported => -12,
            rusb::Error::BadDescriptor | rusb::Error::Other => -99,
        }
    }

    fn name(&self) -> &'static str {
        match self.0 {
            rusb::Error::Io => "LIBUSB_ERROR_IO",
            rusb::Error::InvalidParam => "LIBUSB_ERROR_INVALID_PARAM",
            rusb::Error::Access => "LIBUSB_ERROR_ACCESS",
            rusb::Error::NoDevice => "LIBUSB_ERROR_NO_DEVICE",
            rusb::Error::NotFound => "LIBUSB_ERROR_NOT_FOUND",
            rusb::Error::Busy => "LIBUSB_ERROR_BUSY",
            rusb::Error::Timeout => "LIBUSB_ERROR_TIMEOUT",
            rusb::Error::Overflow => "LIBUSB_ERROR_OVERFLOW",
            rusb::Error::Pipe => "LIBUSB_ERROR_PIPE",
            rusb::Error::Interrupted => "LIBUSB_ERROR_INTERRUPTED",
            rusb::Error::NoMem => "LIBUSB_ERROR_NO_MEM",
            rusb::Error::NotSupported => "LIBUSB_ERROR_NOT_SUPPORTED",
            rusb::Error::BadDescriptor | rusb::Error::Other => "LIBUSB_ERROR_OTHER",
        }
    }
}

/// Represents a failure to bring up USB access at all.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("unable to initialize libusb")]
    Init(#[source] UsbError),

    #[error("unable to get USB device list ({})", .0.code())]
    DeviceList(#[source] UsbError),
}

impl BootstrapError {
    /// The libusb result code the process should exit with.
    pub fn code(&self) -> i32 {
        match self {
            Self::Init(err) | Self::DeviceList(err) => err.code(),
        }
    }
}

/// USB access through a dedicated libusb context.
///
/// The context is torn down when this is dropped.
pub struct RusbTransport {
    context: Context,
}

impl RusbTransport {
    pub fn new() -> Result<Self, BootstrapError> {
        let mut context = Context::new().map_err(|err| BootstrapError::Init(err.into()))?;
        context.set_log_level(LogLevel::Warning);

        Ok(Self { context })
    }
}

impl UsbTransport for RusbTransport {
    type Device = Device<Context>;
    type Session = RusbSession;
    type Error = UsbError;

    fn enumerate(&self) -> Result<Vec<(DeviceDescriptor, Self::Device)>, Self::Error> {
        let devices = self.context.devices()?;

        Ok(devices
            .iter()
            .filter_map(|device| match device.device_descriptor() {
                Ok(desc) => Some((
                    DeviceDescriptor {
                        vendor_id: desc.vendor_id(),
                        product_id: desc.product_id(),
                    },
                    device,
                )),
                Err(err) => {
                    warn!(
                        "failed to get device descriptor of {:03}:{:03}: {err}",
                        device.bus_number(),
                        device.address()
                    );
                    None
                },
            })
            .collect())
    }

    fn open(&self, device: &Self::Device) -> Result<Self::Session, Self::Error> {
        Ok(RusbSession(device.open()?))
    }
}

/// An opened device. libusb closes it once this is dropped.
pub struct RusbSession(DeviceHandle<Context>);

impl UsbSession for RusbSession {
    type Error = UsbError;

    fn set_auto_detach_kernel_driver(&mut self, enable: bool) -> Result<(), Self::Error> {
        Ok(self.0.set_auto_detach_kernel_driver(enable)?)
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), Self::Error> {
        Ok(self.0.claim_interface(interface)?)
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), Self::Error> {
        Ok(self.0.release_interface(interface)?)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), Self::Error> {
        Ok(self.0.attach_kernel_driver(interface)?)
    }

    fn read_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error> {
        Ok(self
            .0
            .read_control(request_type, request, value, index, buf, timeout)?)
    }

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error> {
        Ok(self
            .0
            .write_control(request_type, request, value, index, buf, timeout)?)
    }
}
