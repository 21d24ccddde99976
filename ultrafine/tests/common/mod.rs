//! An in-memory transport recording every call made through it.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc, time::Duration};

use thiserror::Error;
use ultrafine::{
    protocol::{GET_REPORT_LENGTH, PRODUCT_ID, VENDOR_ID},
    transport::{DeviceDescriptor, TransportError, UsbSession, UsbTransport},
};

pub const TARGET: DeviceDescriptor = DeviceDescriptor {
    vendor_id: VENDOR_ID,
    product_id: PRODUCT_ID,
};

pub const KEYBOARD: DeviceDescriptor = DeviceDescriptor {
    vendor_id: 0x046d,
    product_id: 0xc31c,
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Call {
    Open(u32),
    AutoDetach(u32, bool),
    Claim(u32, u8),
    Release(u32, u8),
    Attach(u32, u8),
    Read {
        device: u32,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        len: usize,
        timeout: Duration,
    },
    Write {
        device: u32,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: Vec<u8>,
        timeout: Duration,
    },
    Close(u32),
}

impl Call {
    pub fn device(&self) -> u32 {
        match *self {
            Self::Open(device)
            | Self::AutoDetach(device, _)
            | Self::Claim(device, _)
            | Self::Release(device, _)
            | Self::Attach(device, _)
            | Self::Read { device, .. }
            | Self::Write { device, .. }
            | Self::Close(device) => device,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("mock transport failure {name} ({code})")]
pub struct MockError {
    pub code: i32,
    pub name: &'static str,
}

impl TransportError for MockError {
    fn code(&self) -> i32 {
        self.code
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

pub const ACCESS: MockError = MockError {
    code: -3,
    name: "LIBUSB_ERROR_ACCESS",
};

pub const BUSY: MockError = MockError {
    code: -6,
    name: "LIBUSB_ERROR_BUSY",
};

pub const PIPE: MockError = MockError {
    code: -9,
    name: "LIBUSB_ERROR_PIPE",
};

pub const NOT_FOUND: MockError = MockError {
    code: -5,
    name: "LIBUSB_ERROR_NOT_FOUND",
};

/// A simulated device and the behaviour of its transfers.
#[derive(Clone, Debug)]
pub struct MockDevice {
    pub id: u32,
    pub descriptor: DeviceDescriptor,
    pub open_fails: bool,
    pub claim_fails: bool,
    pub auto_detach_fails: bool,
    /// The report returned by GET_REPORT, `None` making the transfer fail.
    pub report: Option<[u8; GET_REPORT_LENGTH]>,
    pub write_fails: bool,
}

impl MockDevice {
    pub fn new(id: u32, descriptor: DeviceDescriptor) -> Self {
        Self {
            id,
            descriptor,
            open_fails: false,
            claim_fails: false,
            auto_detach_fails: false,
            report: Some([0xf0, 0xd2, 0, 0, 0, 0, 0, 0]),
            write_fails: false,
        }
    }

    pub fn monitor(id: u32) -> Self {
        Self::new(id, TARGET)
    }
}

pub struct MockTransport {
    pub devices: Vec<MockDevice>,
    pub enumerate_fails: bool,
    pub calls: Rc<RefCell<Vec<Call>>>,
}

impl MockTransport {
    pub fn new(devices: Vec<MockDevice>) -> Self {
        Self {
            devices,
            enumerate_fails: false,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, device: u32) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.device() == device)
            .cloned()
            .collect()
    }

    pub fn device(&self, id: u32) -> MockDevice {
        self.devices
            .iter()
            .find(|device| device.id == id)
            .cloned()
            .expect("unknown mock device")
    }
}

impl UsbTransport for MockTransport {
    type Device = MockDevice;
    type Session = MockSession;
    type Error = MockError;

    fn enumerate(&self) -> Result<Vec<(DeviceDescriptor, MockDevice)>, MockError> {
        if self.enumerate_fails {
            return Err(MockError {
                code: -1,
                name: "LIBUSB_ERROR_IO",
            });
        }

        Ok(self
            .devices
            .iter()
            .map(|device| (device.descriptor, device.clone()))
            .collect())
    }

    fn open(&self, device: &MockDevice) -> Result<MockSession, MockError> {
        self.calls.borrow_mut().push(Call::Open(device.id));

        if device.open_fails {
            return Err(ACCESS);
        }

        Ok(MockSession {
            device: device.clone(),
            calls: Rc::clone(&self.calls),
        })
    }
}

pub struct MockSession {
    device: MockDevice,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl MockSession {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.record(Call::Close(self.device.id));
    }
}

impl UsbSession for MockSession {
    type Error = MockError;

    fn set_auto_detach_kernel_driver(&mut self, enable: bool) -> Result<(), MockError> {
        self.record(Call::AutoDetach(self.device.id, enable));

        if self.device.auto_detach_fails {
            Err(MockError {
                code: -12,
                name: "LIBUSB_ERROR_NOT_SUPPORTED",
            })
        } else {
            Ok(())
        }
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), MockError> {
        self.record(Call::Claim(self.device.id, interface));

        if self.device.claim_fails {
            Err(BUSY)
        } else {
            Ok(())
        }
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), MockError> {
        self.record(Call::Release(self.device.id, interface));
        Ok(())
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), MockError> {
        self.record(Call::Attach(self.device.id, interface));
        Err(NOT_FOUND)
    }

    fn read_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, MockError> {
        self.record(Call::Read {
            device: self.device.id,
            request_type,
            request,
            value,
            index,
            len: buf.len(),
            timeout,
        });

        let Some(report) = self.device.report else {
            return Err(PIPE);
        };

        let len = buf.len().min(report.len());
        buf[..len].copy_from_slice(&report[..len]);
        Ok(len)
    }

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, MockError> {
        self.record(Call::Write {
            device: self.device.id,
            request_type,
            request,
            value,
            index,
            data: buf.to_vec(),
            timeout,
        });

        if self.device.write_fails {
            Err(PIPE)
        } else {
            Ok(buf.len())
        }
    }
}
