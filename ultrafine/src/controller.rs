//! Drives the brightness exchange with individual monitors.
//!
//! Every monitor is handled in isolation: it is opened, its HID interface is
//! claimed, the report is exchanged and everything is released and closed
//! again before the next monitor is touched. Failures of a single monitor or
//! transfer are logged and reflected in the returned outcome, but never abort
//! the handling of other monitors.

use log::{debug, error, info, warn};

use crate::{
    brightness::{self, decode_brightness},
    protocol::{
        Direction,
        GET_REPORT_LENGTH,
        HidRequest,
        INTERFACE,
        REPORT_ID,
        ReportType,
        TRANSFER_TIMEOUT,
        report_value,
        request_type,
    },
    selector::{self, DeviceSelection},
    transport::{TransportError, UsbSession, UsbTransport},
};

/// The terminal state of adjusting a single monitor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AdjustOutcome {
    /// The interface was claimed and the exchange was attempted.
    ///
    /// This does not imply the transfers themselves succeeded, see
    /// [`AdjustReport`].
    Success(AdjustReport),

    /// The monitor could not be opened.
    SkippedOpenFailed,

    /// The monitor was opened, but its HID interface could not be claimed.
    SkippedClaimFailed,
}

/// Details about an attempted brightness exchange.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdjustReport {
    /// The brightness percentage before the adjustment.
    ///
    /// This is `0` if the brightness could not be read.
    pub current: u8,

    /// Whether the current brightness was read successfully.
    pub read_ok: bool,

    /// Whether the new brightness was written successfully.
    pub written: bool,
}

/// The terminal state of reading the brightness of a single monitor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ProbeOutcome {
    /// The brightness percentage was read.
    Read(u8),

    /// The interface was claimed, but the read transfer failed.
    ReadFailed,

    /// The monitor could not be opened.
    SkippedOpenFailed,

    /// The monitor was opened, but its HID interface could not be claimed.
    SkippedClaimFailed,
}

/// Why a monitor was skipped before any report was exchanged.
enum Skipped {
    OpenFailed,
    ClaimFailed,
}

/// An opened session with the brightness interface claimed.
///
/// Dropping it releases the interface, hands it back to the OS driver and
/// closes the session, in that order.
struct ClaimedInterface<S: UsbSession> {
    session: S,
    interface: u8,
}

impl<S: UsbSession> ClaimedInterface<S> {
    fn claim(mut session: S, interface: u8) -> Result<Self, S::Error> {
        // Not supported on every platform. The claim below reports any actual
        // problem with the interface.
        if let Err(err) = session.set_auto_detach_kernel_driver(true) {
            debug!("automatic kernel driver detach unavailable: {}", err.name());
        }

        session.claim_interface(interface)?;

        Ok(Self { session, interface })
    }
}

impl<S: UsbSession> Drop for ClaimedInterface<S> {
    fn drop(&mut self) {
        if let Err(err) = self.session.release_interface(self.interface) {
            warn!(
                "failed to release interface {}: {} ({})",
                self.interface,
                err.name(),
                err.code()
            );
        }

        // Fails whenever no driver was detached in the first place.
        if let Err(err) = self.session.attach_kernel_driver(self.interface) {
            debug!(
                "did not re-attach kernel driver to interface {}: {}",
                self.interface,
                err.name()
            );
        }
    }
}

/// Opens a device, claims the brightness interface and runs `exchange` on it.
///
/// Cleanup happens before this returns, no matter what `exchange` did.
fn with_claimed_interface<T: UsbTransport, R>(
    transport: &T,
    device: &T::Device,
    exchange: impl FnOnce(&T::Session) -> R,
) -> Result<R, Skipped> {
    let session = match transport.open(device) {
        Ok(session) => session,
        Err(err) => {
            error!("failed to open device, result code {}", err.code());
            return Err(Skipped::OpenFailed);
        },
    };

    // On failure the session is dropped, and thereby closed, right here.
    let claimed = match ClaimedInterface::claim(session, INTERFACE) {
        Ok(claimed) => claimed,
        Err(err) => {
            error!(
                "failed to claim interface {}: {} ({})",
                INTERFACE,
                err.name(),
                err.code()
            );
            return Err(Skipped::ClaimFailed);
        },
    };

    Ok(exchange(&claimed.session))
}

/// Reads the brightness feature report and decodes it into a percentage.
pub fn read_brightness<S: UsbSession>(session: &S) -> Result<u8, S::Error> {
    let mut report = [0u8; GET_REPORT_LENGTH];

    let len = session.read_control(
        request_type(Direction::In),
        HidRequest::GetReport.into(),
        report_value(ReportType::Feature, REPORT_ID),
        u16::from(INTERFACE),
        &mut report,
        TRANSFER_TIMEOUT,
    )?;
    debug!("read {len} bytes of brightness report: {report:02x?}");

    Ok(decode_brightness(&report))
}

/// Encodes a brightness percentage and writes it as feature report.
///
/// The percentage is clamped into the supported range.
pub fn write_brightness<S: UsbSession>(session: &S, percent: i32) -> Result<(), S::Error> {
    let report = brightness::encode_brightness(percent);

    let len = session.write_control(
        request_type(Direction::Out),
        HidRequest::SetReport.into(),
        report_value(ReportType::Feature, REPORT_ID),
        u16::from(INTERFACE),
        &report,
        TRANSFER_TIMEOUT,
    )?;
    debug!("wrote {len} bytes of brightness report: {report:02x?}");

    Ok(())
}

/// Sets the brightness of a single monitor.
///
/// The current brightness is read first for diagnostic purposes only. Failing
/// to read it does not prevent the write.
pub fn adjust<T: UsbTransport>(transport: &T, device: &T::Device, percent: i32) -> AdjustOutcome {
    let exchanged = with_claimed_interface(transport, device, |session| {
        let (current, read_ok) = match read_brightness(session) {
            Ok(current) => (current, true),
            Err(err) => {
                warn!(
                    "unable to get brightness: {} ({}), assuming 0%",
                    err.name(),
                    err.code()
                );
                (0, false)
            },
        };
        info!("current brightness = {current}%");

        let written = match write_brightness(session, percent) {
            Ok(()) => true,
            Err(err) => {
                error!("unable to set brightness: {}", err.name());
                false
            },
        };

        AdjustReport {
            current,
            read_ok,
            written,
        }
    });

    match exchanged {
        Ok(report) => AdjustOutcome::Success(report),
        Err(Skipped::OpenFailed) => AdjustOutcome::SkippedOpenFailed,
        Err(Skipped::ClaimFailed) => AdjustOutcome::SkippedClaimFailed,
    }
}

/// Reads the brightness of a single monitor without changing it.
pub fn probe<T: UsbTransport>(transport: &T, device: &T::Device) -> ProbeOutcome {
    let exchanged = with_claimed_interface(transport, device, |session| {
        read_brightness(session).inspect_err(|err| {
            warn!("unable to get brightness: {} ({})", err.name(), err.code());
        })
    });

    match exchanged {
        Ok(Ok(current)) => ProbeOutcome::Read(current),
        Ok(Err(_)) => ProbeOutcome::ReadFailed,
        Err(Skipped::OpenFailed) => ProbeOutcome::SkippedOpenFailed,
        Err(Skipped::ClaimFailed) => ProbeOutcome::SkippedClaimFailed,
    }
}

/// Enumerates the attached devices once and sets the brightness of every
/// selected monitor, one after another.
///
/// Returns the ordinal and outcome of every selected monitor in enumeration
/// order. Only a failed enumeration is returned as an error.
pub fn adjust_selected<T: UsbTransport>(
    transport: &T,
    selection: DeviceSelection,
    percent: i32,
) -> Result<Vec<(usize, AdjustOutcome)>, T::Error> {
    let devices = selector::select_indexed(transport.enumerate()?, selection);

    if devices.is_empty() {
        info!("no monitor matches selection {selection}");
    }

    Ok(devices
        .into_iter()
        .map(|(ordinal, device)| {
            info!("adjusting monitor {ordinal}");
            (ordinal, adjust(transport, &device, percent))
        })
        .collect())
}
