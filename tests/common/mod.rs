//! Shared test infrastructure for rgb-pulse integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use embedded_hal::delay::DelayNs;
use heapless::{Deque, String, Vec};
use palette::Srgb;
use rgb_pulse::{
    Broker, Message, MessagingClient, Millis, RgbOutput, TimeSource, UpdateEvent,
    UpdateTransport,
};

pub const TOPIC: &str = "cheerlightsRGB";

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockClock {
    current_time: core::cell::Cell<Millis>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: core::cell::Cell::new(Millis(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like a
    /// hardware counter
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(millis)));
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Millis(millis));
    }
}

impl TimeSource<Millis> for MockClock {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Output
// ============================================================================

/// Mock light output that records every frame written to it
pub struct MockOutput {
    current: Srgb<u8>,
    history: Vec<Srgb<u8>, 64>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            current: Srgb::new(0, 0, 0),
            history: Vec::new(),
        }
    }

    pub fn last(&self) -> Srgb<u8> {
        self.current
    }

    pub fn history(&self) -> &[Srgb<u8>] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl RgbOutput for MockOutput {
    fn write(&mut self, duty: Srgb<u8>) {
        self.current = duty;
        let _ = self.history.push(duty);
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Delay that returns immediately and records what was requested
pub struct MockDelay {
    delays_ms: Vec<u32, 32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            delays_ms: Vec::new(),
        }
    }

    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        let _ = self.delays_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        let _ = self.delays_ms.push(ms);
    }
}

// ============================================================================
// Scripted Messaging Client
// ============================================================================

/// Broker return code reported by the scripted client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub i8);

/// Messaging client whose connect/subscribe outcomes are scripted in advance.
///
/// Once a script runs out every further call succeeds.
pub struct ScriptedClient {
    connected: bool,
    connect_script: Deque<Result<(), MockError>, 16>,
    subscribe_script: Deque<Result<(), MockError>, 16>,
    inbox: Deque<(String<32>, Vec<u8, 16>), 8>,
    current: Option<(String<32>, Vec<u8, 16>)>,
    pub connect_calls: u32,
    pub subscribe_calls: u32,
    pub disconnect_calls: u32,
    pub poll_calls: u32,
    pub last_broker: Option<Broker>,
    pub last_client_id: String<32>,
    pub subscriptions: Vec<String<32>, 16>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            connected: false,
            connect_script: Deque::new(),
            subscribe_script: Deque::new(),
            inbox: Deque::new(),
            current: None,
            connect_calls: 0,
            subscribe_calls: 0,
            disconnect_calls: 0,
            poll_calls: 0,
            last_broker: None,
            last_client_id: String::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Client that is already connected
    pub fn connected() -> Self {
        let mut client = Self::new();
        client.connected = true;
        client
    }

    /// Queues the outcome of the next connect attempts
    pub fn script_connects(&mut self, outcomes: &[Result<(), MockError>]) {
        for outcome in outcomes {
            self.connect_script.push_back(*outcome).unwrap();
        }
    }

    /// Queues the outcome of the next subscribe calls
    pub fn script_subscribes(&mut self, outcomes: &[Result<(), MockError>]) {
        for outcome in outcomes {
            self.subscribe_script.push_back(*outcome).unwrap();
        }
    }

    /// Queues a message to be delivered by `poll`
    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        let topic = String::try_from(topic).unwrap();
        let payload = Vec::from_slice(payload).unwrap();
        self.inbox.push_back((topic, payload)).unwrap();
    }

    /// Simulates the transport going away
    pub fn drop_connection(&mut self) {
        self.connected = false;
    }

    pub fn subscribed_topics(&self) -> std::vec::Vec<&str> {
        self.subscriptions.iter().map(|topic| topic.as_str()).collect()
    }

    pub fn pending_messages(&self) -> usize {
        self.inbox.len()
    }
}

impl MessagingClient for ScriptedClient {
    type Error = MockError;

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, broker: &Broker, client_id: &str) -> Result<(), MockError> {
        self.connect_calls += 1;
        self.last_broker = Some(*broker);
        self.last_client_id = String::try_from(client_id).unwrap();
        let outcome = self.connect_script.pop_front().unwrap_or(Ok(()));
        self.connected = outcome.is_ok();
        outcome
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), MockError> {
        self.subscribe_calls += 1;
        let outcome = self.subscribe_script.pop_front().unwrap_or(Ok(()));
        if outcome.is_ok() {
            self.subscriptions
                .push(String::try_from(topic).unwrap())
                .unwrap();
        }
        outcome
    }

    fn disconnect(&mut self) {
        self.disconnect_calls += 1;
        self.connected = false;
    }

    fn poll(&mut self) -> Option<Message<'_>> {
        self.poll_calls += 1;
        if !self.connected {
            return None;
        }
        self.current = self.inbox.pop_front();
        self.current.as_ref().map(|(topic, payload)| Message {
            topic: topic.as_str(),
            payload: payload.as_slice(),
        })
    }
}

// ============================================================================
// Scripted Update Transport
// ============================================================================

/// Update transport that reports queued events on the next service call
pub struct ScriptedUpdates {
    pending: Deque<UpdateEvent, 16>,
    pub service_calls: u32,
}

impl ScriptedUpdates {
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
            service_calls: 0,
        }
    }

    pub fn queue(&mut self, events: &[UpdateEvent]) {
        for event in events {
            self.pending.push_back(*event).unwrap();
        }
    }
}

impl UpdateTransport for ScriptedUpdates {
    fn handle_pending(&mut self, on_event: &mut dyn FnMut(UpdateEvent)) {
        self.service_calls += 1;
        while let Some(event) = self.pending.pop_front() {
            on_event(event);
        }
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Shorthand for an 8-bit duty triple
pub const fn duty(red: u8, green: u8, blue: u8) -> Srgb<u8> {
    Srgb::new(red, green, blue)
}
