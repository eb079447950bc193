//! Packed 24-bit color values.

use palette::Srgb;

/// A 24-bit color packed as `0xRRGGBB`.
///
/// Bits above the low 24 are always zero, so each channel is a plain byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(u32);

impl Color {
    /// All channels off.
    pub const BLACK: Color = Color(0x00_0000);
    /// Pure red.
    pub const RED: Color = Color(0xFF_0000);
    /// Pure green.
    pub const GREEN: Color = Color(0x00_FF00);
    /// Pure blue.
    pub const BLUE: Color = Color(0x00_00FF);
    /// All channels at full intensity.
    pub const WHITE: Color = Color(0xFF_FFFF);

    /// Creates a color from a packed value, discarding bits above 24.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Color(packed & 0xFF_FFFF)
    }

    /// Creates a color from its three channel bytes.
    #[inline]
    pub const fn from_channels(red: u8, green: u8, blue: u8) -> Self {
        Color(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Returns the packed `0xRRGGBB` value.
    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Returns the red channel.
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Returns the green channel.
    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Returns the blue channel.
    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns the channel bytes as an 8-bit sRGB triple.
    #[inline]
    pub const fn to_srgb(self) -> Srgb<u8> {
        Srgb::new(self.red(), self.green(), self.blue())
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}
