//! Firmware-update transport boundary.
//!
//! The transport itself (network listener, flash writes, reboot) lives
//! outside this crate. The controller only services it once per loop pass and
//! reacts to the [`UpdateEvent`]s it reports.

/// Failure reported by the update transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateError {
    /// The sender failed authentication.
    Auth,
    /// The image could not be started.
    Begin,
    /// The transfer connection could not be opened.
    Connect,
    /// The image stream broke off.
    Receive,
    /// The image could not be finalized.
    End,
}

impl core::fmt::Display for UpdateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UpdateError::Auth => write!(f, "Auth Failed"),
            UpdateError::Begin => write!(f, "Begin Failed"),
            UpdateError::Connect => write!(f, "Connect Failed"),
            UpdateError::Receive => write!(f, "Receive Failed"),
            UpdateError::End => write!(f, "End Failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UpdateError {}

/// Progress notifications from an update session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateEvent {
    /// An image transfer began.
    Start,
    /// `done` of `total` bytes received.
    Progress { done: u32, total: u32 },
    /// The image was written; the device is about to restart.
    End,
    /// The session failed.
    Error(UpdateError),
}

impl UpdateEvent {
    /// Completion percentage of a `Progress` event, `None` for other events.
    ///
    /// An unknown (`0`) total reads as 0 %; values are capped at 100.
    pub fn percent(&self) -> Option<u8> {
        match *self {
            UpdateEvent::Progress { done, total } => {
                if total == 0 {
                    return Some(0);
                }
                let percent = u64::from(done) * 100 / u64::from(total);
                Some(percent.min(100) as u8)
            }
            _ => None,
        }
    }
}

/// Trait for abstracting the firmware-update transport.
pub trait UpdateTransport {
    /// Handles any pending update traffic, reporting what happened through
    /// `on_event`. Called once per control loop pass.
    fn handle_pending(&mut self, on_event: &mut dyn FnMut(UpdateEvent));
}

/// Transport for builds without over-the-air updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpdates;

impl UpdateTransport for NoUpdates {
    fn handle_pending(&mut self, _on_event: &mut dyn FnMut(UpdateEvent)) {}
}
