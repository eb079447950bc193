//! Controller configuration.
//!
//! Everything is `&'static str` or plain integers so a configuration can be a
//! `const` in flash.

use crate::decoder::HexPolicy;
use crate::identity::DEFAULT_ID_PREFIX;
use crate::supervisor::{Broker, DEFAULT_RETRY_DELAY_MS};

/// Static settings of a light controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Broker the messaging client connects to.
    pub broker: Broker,
    /// Topic carrying `#RRGGBB` color commands.
    pub topic: &'static str,
    /// Prefix of the derived device id.
    pub id_prefix: &'static str,
    /// Pause between failed connection attempts.
    pub retry_delay_ms: u32,
    /// Treatment of non-hex digits in commands.
    pub hex_policy: HexPolicy,
}

impl ControllerConfig {
    /// The public CheerLights feed.
    pub const DEFAULT: ControllerConfig = ControllerConfig {
        broker: Broker::DEFAULT,
        topic: "cheerlightsRGB",
        id_prefix: DEFAULT_ID_PREFIX,
        retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        hex_policy: HexPolicy::Strict,
    };

    /// Sets the broker address.
    pub const fn with_broker(mut self, host: &'static str, port: u16) -> Self {
        self.broker = Broker { host, port };
        self
    }

    /// Sets the command topic.
    pub const fn with_topic(mut self, topic: &'static str) -> Self {
        self.topic = topic;
        self
    }

    /// Sets the device id prefix.
    pub const fn with_id_prefix(mut self, prefix: &'static str) -> Self {
        self.id_prefix = prefix;
        self
    }

    /// Sets the pause between failed connection attempts.
    pub const fn with_retry_delay_ms(mut self, retry_delay_ms: u32) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Sets how non-hex digits in commands are treated.
    pub const fn with_hex_policy(mut self, policy: HexPolicy) -> Self {
        self.hex_policy = policy;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
