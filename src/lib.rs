#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Color`**: A packed `0xRRGGBB` color value
//! - **`Decoder`**: Turns a `#RRGGBB` message payload into a `ColorCommand` (color + random `PulsePeriod`)
//! - **`PulseEngine`**: Animates the last command as a triangle-wave "breathing" pulse
//! - **`render`**: Scales a color by a 0-255 alpha into three duty values
//! - **`RgbOutput`**: Trait to implement for your light hardware (`PwmRgb` covers `embedded-hal` PWM)
//! - **`MessagingClient`**: Trait to implement for your publish/subscribe client
//! - **`ConnectionSupervisor`**: Reconnects and resubscribes with a fixed blocking backoff
//! - **`UpdateTransport`**: Trait for the firmware-update transport, reporting `UpdateEvent`s
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`Controller`**: Owns all of the above and runs the control loop
//!
//! Duty values are `Srgb<u8>` with each channel in `0..=255`.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod color;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod engine;
pub mod identity;
pub mod indicator;
pub mod output;
pub mod supervisor;
pub mod time;
pub mod update;

pub use color::Color;
pub use config::ControllerConfig;
pub use controller::Controller;
pub use decoder::{ColorCommand, DecodeError, Decoder, HexPolicy, PAYLOAD_LEN, PulsePeriod};
pub use engine::{AnimationState, PULSE_CYCLE, PulseEngine, alpha_at};
pub use identity::device_id;
pub use indicator::{BootStage, boot_indicator, update_indicator};
pub use output::{DUTY_OFF, DUTY_RANGE, PWM_FREQUENCY_HZ, PwmRgb, RgbOutput, render};
pub use supervisor::{
    Broker, ConnectionState, ConnectionSupervisor, DEFAULT_RETRY_DELAY_MS, Message,
    MessagingClient, ReconnectReport,
};
#[cfg(feature = "std")]
pub use time::SystemClock;
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use update::{NoUpdates, UpdateError, UpdateEvent, UpdateTransport};
