//! Safe ESP-NOW driver for the ESP32.
//!
//! ESP-NOW itself lives in the closed-source radio blob; this crate owns the
//! station bring-up, forwards peer management and transmission to the native
//! `esp_now_*` entry points, and converts their callbacks into owned Rust
//! events. Notifications reach the application either through a polled queue
//! (`EspNow::receive` plus the send token) or through hooks invoked directly
//! from the Wi-Fi driver task.

#![no_std]

extern crate alloc;

mod delivery;
pub mod driver;
pub mod error;
pub mod event;
pub mod peer;

pub use driver::{EspNow, SendToken};
pub use error::{EspNowError, SendError};
pub use event::{DeliveryStatus, FrameInfo, ReceivedFrame, SentFrame};
pub use peer::{parse_mac, PeerCount, PeerInfo};

/// Destination address for broadcast frames. Must be registered as a peer
/// before sending to it.
pub const BROADCAST_ADDRESS: [u8; 6] = [0xff; 6];

/// Largest payload the native driver accepts in a single frame.
pub const ESP_NOW_MAX_DATA_LEN: usize = 250;

/// Length of the primary and local master keys.
pub const ESP_NOW_KEY_LEN: usize = 16;
