//! Per-device identifier used as messaging client id and update hostname.

use core::fmt::Write;
use heapless::String;

/// Capacity of a device identifier.
pub const DEVICE_ID_LEN: usize = 32;

/// Prefix used when none is configured.
pub const DEFAULT_ID_PREFIX: &str = "cheerlights";

/// Builds `{prefix}-{hardware_id:06x}`, e.g. `cheerlights-00a1b2`.
///
/// Prefixes too long for [`DEVICE_ID_LEN`] are cut short so the hardware id
/// always fits.
pub fn device_id(prefix: &str, hardware_id: u32) -> String<DEVICE_ID_LEN> {
    // '-' plus up to eight hex digits for a full u32.
    const SUFFIX_MAX: usize = 9;

    let mut id = String::new();
    let prefix = truncate_to(prefix, DEVICE_ID_LEN - SUFFIX_MAX);
    // Cannot overflow: the prefix is cut to leave room for the suffix.
    let written = write!(id, "{}-{:06x}", prefix, hardware_id);
    debug_assert!(written.is_ok());
    id
}

fn truncate_to(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
