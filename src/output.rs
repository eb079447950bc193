//! Channel output: from a color and a brightness scale to three duty values.
//!
//! [`render`] is the pure part. [`RgbOutput`] is the hardware seam, and
//! [`PwmRgb`] implements it on top of three `embedded-hal` PWM channels.

use crate::color::Color;
use embedded_hal::pwm::{Error as _, SetDutyCycle};
use palette::Srgb;

/// Largest duty value; a duty of `DUTY_RANGE` keeps a channel always on.
pub const DUTY_RANGE: u8 = 255;

/// PWM frequency for the light channels.
pub const PWM_FREQUENCY_HZ: u32 = 100;

/// Output with every channel off.
pub const DUTY_OFF: Srgb<u8> = Srgb::new(0, 0, 0);

/// Scales every channel of `color` by `alpha / 255`.
///
/// Uses floor division, so a channel only reaches its full value at
/// `alpha == 255` and is always zero at `alpha == 0`.
#[inline]
pub fn render(color: Color, alpha: u8) -> Srgb<u8> {
    let rgb = color.to_srgb();
    Srgb::new(
        scale(rgb.red, alpha),
        scale(rgb.green, alpha),
        scale(rgb.blue, alpha),
    )
}

#[inline]
fn scale(channel: u8, alpha: u8) -> u8 {
    // Max product is 255 * 255, so the quotient always fits back into a byte.
    (u16::from(channel) * u16::from(alpha) / u16::from(DUTY_RANGE)) as u8
}

/// Trait for abstracting the three-channel light hardware.
///
/// Duty values are in `0..=DUTY_RANGE`. Handle any hardware errors
/// internally - this method cannot fail.
pub trait RgbOutput {
    /// Drives the red, green and blue channels with the given duty values.
    fn write(&mut self, duty: Srgb<u8>);
}

impl<T: RgbOutput + ?Sized> RgbOutput for &mut T {
    fn write(&mut self, duty: Srgb<u8>) {
        (**self).write(duty);
    }
}

/// [`RgbOutput`] over three independent PWM channels.
///
/// The channels should be configured for [`PWM_FREQUENCY_HZ`]. Duty values
/// are rescaled from `0..=DUTY_RANGE` to each channel's own resolution.
pub struct PwmRgb<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R, G, B> PwmRgb<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    /// Takes ownership of the channels and switches them off.
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut output = Self { red, green, blue };
        output.write(DUTY_OFF);
        output
    }

    /// Gives the channels back.
    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R, G, B> RgbOutput for PwmRgb<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn write(&mut self, duty: Srgb<u8>) {
        let range = u16::from(DUTY_RANGE);
        if let Err(e) = self.red.set_duty_cycle_fraction(u16::from(duty.red), range) {
            log::error!("pwm: red channel write failed: {:?}", e.kind());
        }
        if let Err(e) = self.green.set_duty_cycle_fraction(u16::from(duty.green), range) {
            log::error!("pwm: green channel write failed: {:?}", e.kind());
        }
        if let Err(e) = self.blue.set_duty_cycle_fraction(u16::from(duty.blue), range) {
            log::error!("pwm: blue channel write failed: {:?}", e.kind());
        }
    }
}
