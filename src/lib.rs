// #![deny(missing_docs)]
//! One-shot WebSocket command client for an ESP32 power supply

#[macro_use]
extern crate slog;

mod client;
mod common;
mod errors;
mod server;

pub use client::{execute, run_sequence, DeviceClient, CLOSE_TIMEOUT};
pub use common::{Command, Response, DEFAULT_DEVICE_URL, DEMO_SEQUENCE};
pub use errors::{CtlError, Result};
pub use server::{DeviceServer, DeviceStatus};
