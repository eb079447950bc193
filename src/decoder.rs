//! Command decoding: raw message payloads to colors and pulse periods.
//!
//! A command is exactly seven bytes: one sentinel byte (usually `#`, never
//! inspected) followed by six hex digits `RRGGBB`. Each accepted command also
//! gets a freshly drawn [`PulsePeriod`], so repeating the same color can still
//! change how fast the light breathes.

use crate::color::Color;
use rand_core::RngCore;

/// Length of a color command payload.
pub const PAYLOAD_LEN: usize = 7;

/// Number of hex digits following the sentinel byte.
const HEX_DIGITS: usize = PAYLOAD_LEN - 1;

/// Time-scale divisor of the breathing animation, always in `6..=15`.
///
/// The animation advances one alpha step every `period` milliseconds, so a
/// larger period means a slower pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulsePeriod(u8);

impl PulsePeriod {
    /// Shortest (fastest) period.
    pub const MIN: PulsePeriod = PulsePeriod(6);
    /// Longest (slowest) period.
    pub const MAX: PulsePeriod = PulsePeriod(15);

    /// Returns `None` when `value` is outside `6..=15`.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(PulsePeriod(value))
        } else {
            None
        }
    }

    /// Draws a period uniformly from `6..=15`.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let span = u32::from(Self::MAX.0 - Self::MIN.0) + 1;
        PulsePeriod(Self::MIN.0 + (rng.next_u32() % span) as u8)
    }

    /// Returns the period in milliseconds per alpha step.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A successfully decoded color command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorCommand {
    /// Target color.
    pub color: Color,
    /// Freshly drawn pulse period.
    pub period: PulsePeriod,
}

/// How non-hex characters in the digit field are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HexPolicy {
    /// Any non-hex character rejects the command.
    #[default]
    Strict,
    /// Parse like C `strtol`: stop at the first non-hex character and keep
    /// the value of the digits read so far (`"12G456"` decodes to `0x000012`).
    Lenient,
}

/// Reasons a payload is not a color command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload is not exactly [`PAYLOAD_LEN`] bytes.
    InvalidLength {
        /// Actual payload length.
        len: usize,
    },
    /// A digit position holds a non-hex character (strict policy only).
    InvalidHex {
        /// Byte offset within the payload.
        position: usize,
    },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::InvalidLength { len } => {
                write!(f, "expected {} payload bytes, got {}", PAYLOAD_LEN, len)
            }
            DecodeError::InvalidHex { position } => {
                write!(f, "non-hex character at payload offset {}", position)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Decodes color command payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoder {
    policy: HexPolicy,
}

impl Decoder {
    /// Creates a decoder with the given hex policy.
    pub const fn new(policy: HexPolicy) -> Self {
        Self { policy }
    }

    /// Returns the hex policy in use.
    pub const fn policy(&self) -> HexPolicy {
        self.policy
    }

    /// Decodes `payload` and draws a pulse period from `rng`.
    ///
    /// Nothing is drawn from `rng` when decoding fails.
    pub fn decode<R: RngCore + ?Sized>(
        &self,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<ColorCommand, DecodeError> {
        let color = match self.parse_color(payload) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("decoder: bad color {:?}: {}", Printable(payload), e);
                return Err(e);
            }
        };

        let period = PulsePeriod::random(rng);
        log::info!("decoder: color {} period {}", color, period.get());
        Ok(ColorCommand { color, period })
    }

    /// Parses the color without drawing a period.
    pub fn parse_color(&self, payload: &[u8]) -> Result<Color, DecodeError> {
        if payload.len() != PAYLOAD_LEN {
            return Err(DecodeError::InvalidLength { len: payload.len() });
        }

        let digits = &payload[PAYLOAD_LEN - HEX_DIGITS..];
        let mut packed = 0u32;
        for (i, &byte) in digits.iter().enumerate() {
            match hex_value(byte) {
                Some(nibble) => packed = (packed << 4) | u32::from(nibble),
                None => match self.policy {
                    HexPolicy::Strict => {
                        return Err(DecodeError::InvalidHex {
                            position: PAYLOAD_LEN - HEX_DIGITS + i,
                        });
                    }
                    HexPolicy::Lenient => break,
                },
            }
        }

        Ok(Color::from_packed(packed))
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Debug view of a payload that prints ASCII as text and escapes the rest.
struct Printable<'a>(&'a [u8]);

impl core::fmt::Debug for Printable<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("\"")?;
        for chunk in self.0.utf8_chunks() {
            write!(f, "{}", chunk.valid().escape_debug())?;
            for byte in chunk.invalid() {
                write!(f, "\\x{:02X}", byte)?;
            }
        }
        f.write_str("\"")
    }
}
