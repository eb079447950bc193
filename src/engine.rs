//! Breathing animation over the most recently commanded color.
//!
//! Provides [`PulseEngine`], which stores the last [`ColorCommand`] together
//! with the instant it arrived and turns elapsed time into a brightness scale
//! (alpha) following a triangle wave:
//!
//! ```text
//! alpha
//!  255 |\        /\        /
//!      | \      /  \      /
//!      |  \    /    \    /
//!    0 |   \  /      \  /
//!      +----\/--------\/------> elapsed / period
//!      0   256 512   768 1024
//! ```

use crate::color::Color;
use crate::decoder::{ColorCommand, PulsePeriod};
use crate::output::{self, DUTY_OFF};
use crate::time::{TimeDuration, TimeInstant};
use palette::Srgb;

/// Length of one breathing cycle in period-scaled time units.
pub const PULSE_CYCLE: u64 = 512;

/// Half a cycle: alpha falls for this many units, then rises for as many.
const HALF_CYCLE: u64 = PULSE_CYCLE / 2;

/// Brightness scale after `elapsed_ms` of a pulse with the given period.
///
/// `elapsed_ms / period` is folded into `0..512`; the first half ramps down
/// from 255 to 0, the second half ramps back up from 0 to 255.
#[inline]
pub fn alpha_at(elapsed_ms: u64, period: PulsePeriod) -> u8 {
    let phase = (elapsed_ms / u64::from(period.get())) % PULSE_CYCLE;
    let alpha = if phase < HALF_CYCLE {
        (HALF_CYCLE - 1) - phase
    } else {
        phase - HALF_CYCLE
    };
    alpha as u8
}

/// The command currently being animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationState<I> {
    pub color: Color,
    pub period: PulsePeriod,
    /// When the command was applied.
    pub started_at: I,
}

/// Animates the last received color.
///
/// Each new command replaces the previous one outright; there is no queue and
/// no blending between commands.
#[derive(Debug, Clone)]
pub struct PulseEngine<I: TimeInstant> {
    state: Option<AnimationState<I>>,
}

impl<I: TimeInstant> PulseEngine<I> {
    /// Creates an engine that has not received a command yet.
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// Applies a command received at `now`, discarding the current animation.
    ///
    /// A tick at the same instant shows the new color at full brightness.
    pub fn on_command(&mut self, command: ColorCommand, now: I) {
        self.state = Some(AnimationState {
            color: command.color,
            period: command.period,
            started_at: now,
        });
    }

    /// Computes the duty values for `now`.
    ///
    /// Returns all channels off until the first command arrives.
    pub fn tick(&self, now: I) -> Srgb<u8> {
        match self.state {
            Some(state) => {
                let elapsed = now.duration_since(state.started_at);
                output::render(state.color, alpha_at(elapsed.as_millis(), state.period))
            }
            None => DUTY_OFF,
        }
    }

    /// Returns the state being animated, if any command has been applied.
    pub fn state(&self) -> Option<&AnimationState<I>> {
        self.state.as_ref()
    }

    /// Returns the color being animated, if any command has been applied.
    pub fn color(&self) -> Option<Color> {
        self.state.map(|state| state.color)
    }
}

impl<I: TimeInstant> Default for PulseEngine<I> {
    fn default() -> Self {
        Self::new()
    }
}
