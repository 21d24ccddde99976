//! Brightness control for LG UltraFine monitors.
//!
//! These monitors do not support DDC/CI. Instead, their brightness is exposed
//! as a vendor-defined HID feature report on interface 1 of the monitor's USB
//! hub. Reading the report yields the current brightness as a raw 16-bit
//! little-endian value, writing it sets a new one.
//!
//! # Quickstart
//!
//! ## Provide USB access
//!
//! This crate implements device selection and the report exchange, not the
//! underlying USB communication, which is left to an external crate of your
//! choice. The traits used for bridging your USB library to this crate are
//! [`transport::UsbTransport`] and [`transport::UsbSession`].
//!
//! ## Adjust brightness
//!
//! ```ignore
//! use ultrafine::{controller, selector::DeviceSelection};
//!
//! // Set every attached monitor to 40%.
//! let outcomes = controller::adjust_selected(&my_transport, DeviceSelection::All, 40)
//!     .expect("could not enumerate USB devices");
//!
//! // Monitors that could not be opened or claimed are skipped, the remaining
//! // ones are still adjusted.
//! for (ordinal, outcome) in outcomes {
//!     println!("monitor {ordinal}: {outcome:?}");
//! }
//! ```
//!
//! Monitors are addressed by their ordinal among all supported monitors, in
//! enumeration order. The [`selector`] module resolves these ordinals, the
//! [`brightness`] module converts between percentages and raw report values.

pub mod brightness;
pub mod controller;
pub mod protocol;
pub mod selector;
pub mod transport;
