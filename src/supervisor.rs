//! Keeps the color-command subscription alive.
//!
//! Provides [`ConnectionSupervisor`], which reconnects a [`MessagingClient`]
//! whenever it drops and subscribes to the command topic again after every
//! successful connect. Between failed attempts it waits a fixed delay using a
//! blocking [`DelayNs`]; nothing else in the control loop runs during that wait.

use crate::identity::DEVICE_ID_LEN;
use embedded_hal::delay::DelayNs;
use heapless::String;

/// Default pause between connection attempts.
pub const DEFAULT_RETRY_DELAY_MS: u32 = 5_000;

/// Address of the message broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Broker {
    /// Host name or address.
    pub host: &'static str,
    /// TCP port.
    pub port: u16,
}

impl Broker {
    /// The public CheerLights broker.
    pub const DEFAULT: Broker = Broker {
        host: "mqtt.cheerlights.com",
        port: 1883,
    };
}

impl core::fmt::Display for Broker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A message delivered by the messaging client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    /// Topic the message was published on.
    pub topic: &'a str,
    /// Raw message body.
    pub payload: &'a [u8],
}

/// Trait for abstracting the publish/subscribe client.
///
/// Implement this on top of your MQTT stack. All methods are expected to
/// return promptly; the supervisor owns the retry policy.
pub trait MessagingClient {
    /// Broker or transport error, logged by the supervisor.
    type Error: core::fmt::Debug;

    /// Whether the session is currently up.
    fn is_connected(&self) -> bool;

    /// Opens a session with `broker` identified by `client_id`.
    fn connect(&mut self, broker: &Broker, client_id: &str) -> Result<(), Self::Error>;

    /// Subscribes to `topic` on the current session.
    fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error>;

    /// Tears the session down.
    fn disconnect(&mut self);

    /// Services the session and returns the next incoming message, if any.
    fn poll(&mut self) -> Option<Message<'_>>;
}

/// Lifecycle of the messaging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No session. Initial state.
    Disconnected,
    /// A connect request is in flight.
    Connecting,
    /// Session up and the command topic subscribed.
    Connected,
}

/// What a call to [`ConnectionSupervisor::ensure_connected`] went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReconnectReport {
    /// Connect requests issued.
    pub attempts: u32,
    /// Attempts that ended in a backoff delay.
    pub failures: u32,
}

/// Reconnects the messaging client with a fixed, blocking backoff.
///
/// Retries forever: there is no attempt cap, no exponential growth and no
/// jitter.
pub struct ConnectionSupervisor<D: DelayNs> {
    delay: D,
    broker: Broker,
    client_id: String<DEVICE_ID_LEN>,
    topic: &'static str,
    retry_delay_ms: u32,
    state: ConnectionState,
}

impl<D: DelayNs> ConnectionSupervisor<D> {
    /// Creates a supervisor for [`Broker::DEFAULT`] in the `Disconnected` state.
    pub fn new(delay: D, client_id: String<DEVICE_ID_LEN>, topic: &'static str) -> Self {
        Self {
            delay,
            broker: Broker::DEFAULT,
            client_id,
            topic,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            state: ConnectionState::Disconnected,
        }
    }

    /// Connects to `broker` instead of the default one.
    pub fn with_broker(mut self, broker: Broker) -> Self {
        self.broker = broker;
        self
    }

    /// Overrides the pause between attempts.
    pub fn with_retry_delay_ms(mut self, retry_delay_ms: u32) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Marks the session as dropped if the client lost its transport.
    ///
    /// Returns whether the session is still connected.
    pub fn poll_liveness<C: MessagingClient>(&mut self, client: &C) -> bool {
        let connected = client.is_connected();
        if connected {
            self.state = ConnectionState::Connected;
        } else if self.state == ConnectionState::Connected {
            log::warn!("mqtt: connection lost");
            self.state = ConnectionState::Disconnected;
        }
        connected
    }

    /// Blocks until the client is connected and subscribed.
    ///
    /// Returns immediately when the client is already connected. A failed
    /// subscribe counts as a failed attempt: the session is dropped and the
    /// supervisor backs off before reconnecting.
    pub fn ensure_connected<C: MessagingClient>(&mut self, client: &mut C) -> ReconnectReport {
        let mut report = ReconnectReport::default();

        while !client.is_connected() {
            self.state = ConnectionState::Connecting;
            report.attempts += 1;
            log::info!(
                "mqtt: attempting connection to {} as {}",
                self.broker,
                self.client_id
            );

            let outcome = match client.connect(&self.broker, &self.client_id) {
                Ok(()) => match client.subscribe(self.topic) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        client.disconnect();
                        Err(e)
                    }
                },
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {
                    log::info!("mqtt: connected, subscribed to {}", self.topic);
                    self.state = ConnectionState::Connected;
                }
                Err(e) => {
                    log::warn!(
                        "mqtt: failed ({:?}), trying again in {} ms",
                        e,
                        self.retry_delay_ms
                    );
                    self.state = ConnectionState::Disconnected;
                    report.failures += 1;
                    self.delay.delay_ms(self.retry_delay_ms);
                }
            }
        }

        self.state = ConnectionState::Connected;
        report
    }

    /// Returns the current session state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the broker the client connects to.
    pub fn broker(&self) -> Broker {
        self.broker
    }

    /// Returns the id the client connects with.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the topic subscribed after every connect.
    pub fn topic(&self) -> &'static str {
        self.topic
    }

    /// Returns the pause between failed attempts.
    pub fn retry_delay_ms(&self) -> u32 {
        self.retry_delay_ms
    }

    /// Returns the delay provider used for backoff.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Gives the delay provider back.
    pub fn release(self) -> D {
        self.delay
    }
}
