//! The cooperative control loop.
//!
//! Provides [`Controller`], which owns every collaborator of the light and
//! runs one pass of the loop per [`Controller::run_once`] call:
//!
//! 1. service the firmware-update transport,
//! 2. reconnect the messaging client if it dropped (blocking),
//! 3. decode and apply at most one incoming color command,
//! 4. render the current animation frame.

use crate::config::ControllerConfig;
use crate::decoder::Decoder;
use crate::engine::PulseEngine;
use crate::identity::device_id;
use crate::indicator::{self, BootStage};
use crate::output::RgbOutput;
use crate::supervisor::{ConnectionState, ConnectionSupervisor, MessagingClient, ReconnectReport};
use crate::time::{TimeInstant, TimeSource};
use crate::update::{UpdateEvent, UpdateTransport};
use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

/// Runs an RGB light from color commands received over a messaging client.
///
/// All state lives in this struct; there are no globals, so several
/// controllers (or tests) can coexist.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `C` - Messaging client
/// * `U` - Firmware-update transport
/// * `O` - Light output
/// * `D` - Blocking delay used for reconnect backoff
/// * `R` - Random number generator for pulse periods
pub struct Controller<'t, I, T, C, U, O, D, R>
where
    I: TimeInstant,
    T: TimeSource<I>,
    C: MessagingClient,
    U: UpdateTransport,
    O: RgbOutput,
    D: DelayNs,
    R: RngCore,
{
    time_source: &'t T,
    client: C,
    updater: U,
    output: O,
    supervisor: ConnectionSupervisor<D>,
    rng: R,
    decoder: Decoder,
    engine: PulseEngine<I>,
}

impl<'t, I, T, C, U, O, D, R> Controller<'t, I, T, C, U, O, D, R>
where
    I: TimeInstant,
    T: TimeSource<I>,
    C: MessagingClient,
    U: UpdateTransport,
    O: RgbOutput,
    D: DelayNs,
    R: RngCore,
{
    /// Creates a controller with the light off and the client disconnected.
    ///
    /// `hardware_id` is a stable per-chip number from which the messaging
    /// client id is derived.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &ControllerConfig,
        hardware_id: u32,
        time_source: &'t T,
        client: C,
        updater: U,
        mut output: O,
        delay: D,
        rng: R,
    ) -> Self {
        output.write(indicator::boot_indicator(BootStage::Ready));

        let client_id = device_id(config.id_prefix, hardware_id);
        log::info!(
            "controller: device {} using {} topic {}",
            client_id,
            config.broker,
            config.topic
        );

        let supervisor = ConnectionSupervisor::new(delay, client_id, config.topic)
            .with_broker(config.broker)
            .with_retry_delay_ms(config.retry_delay_ms);

        Self {
            time_source,
            client,
            updater,
            output,
            supervisor,
            rng,
            decoder: Decoder::new(config.hex_policy),
            engine: PulseEngine::new(),
        }
    }

    /// Shows the progress of the caller's start-up sequence on the light.
    pub fn show_boot_stage(&mut self, stage: BootStage) {
        log::debug!("controller: boot stage {:?}", stage);
        self.output.write(indicator::boot_indicator(stage));
    }

    /// Runs one pass of the control loop.
    ///
    /// Blocks for as long as it takes to reconnect when the messaging client
    /// is down; the animation is frozen during that time.
    pub fn run_once(&mut self) {
        let output = &mut self.output;
        self.updater
            .handle_pending(&mut |event| apply_update_event(output, event));

        if !self.supervisor.poll_liveness(&self.client) {
            let report = self.supervisor.ensure_connected(&mut self.client);
            log_reconnect(report);
        }

        let now = self.time_source.now();
        if let Some(message) = self.client.poll() {
            if message.topic == self.supervisor.topic() {
                // Failures are logged by the decoder; the animation carries on.
                if let Ok(command) = self.decoder.decode(message.payload, &mut self.rng) {
                    self.engine.on_command(command, now);
                }
            } else {
                log::debug!("controller: ignoring message on {}", message.topic);
            }
        }

        self.output.write(self.engine.tick(now));
    }

    /// Runs the control loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    /// Returns the state of the messaging session.
    pub fn connection_state(&self) -> ConnectionState {
        self.supervisor.state()
    }

    /// Returns the animation engine.
    pub fn engine(&self) -> &PulseEngine<I> {
        &self.engine
    }

    /// Returns the messaging client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the messaging client mutably.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Returns the light output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Returns the light output mutably.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Returns the update transport mutably.
    pub fn updater_mut(&mut self) -> &mut U {
        &mut self.updater
    }

    /// Returns the connection supervisor.
    pub fn supervisor(&self) -> &ConnectionSupervisor<D> {
        &self.supervisor
    }
}

fn apply_update_event<O: RgbOutput>(output: &mut O, event: UpdateEvent) {
    match event {
        UpdateEvent::Start => log::info!("update: start"),
        UpdateEvent::End => log::info!("update: end"),
        UpdateEvent::Progress { .. } => {
            log::debug!("update: progress {}%", event.percent().unwrap_or(0));
        }
        UpdateEvent::Error(e) => log::error!("update: {}", e),
    }

    if let Some(duty) = indicator::update_indicator(event) {
        output.write(duty);
    }
}

fn log_reconnect(report: ReconnectReport) {
    if report.attempts > 0 {
        log::info!(
            "controller: reconnected after {} attempt(s), {} failure(s)",
            report.attempts,
            report.failures
        );
    }
}
