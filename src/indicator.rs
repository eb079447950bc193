//! Status patterns shown on the light while it is not animating a color.
//!
//! Channels are used as on/off lamps here, never dimmed.

use crate::output::{DUTY_OFF, DUTY_RANGE};
use crate::update::UpdateEvent;
use palette::Srgb;

/// Start-up phase, shown by lighting one more channel per completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootStage {
    /// Joining the network.
    Network,
    /// Bringing up the update transport.
    Updates,
    /// Configuring the messaging client.
    Messaging,
    /// Start-up finished; the light goes dark until the first color.
    Ready,
}

#[inline]
fn lamps(red: bool, green: bool, blue: bool) -> Srgb<u8> {
    let level = |on: bool| if on { DUTY_RANGE } else { 0 };
    Srgb::new(level(red), level(green), level(blue))
}

/// Pattern for a start-up stage.
pub fn boot_indicator(stage: BootStage) -> Srgb<u8> {
    match stage {
        BootStage::Network => lamps(true, false, false),
        BootStage::Updates => lamps(true, true, false),
        BootStage::Messaging => lamps(true, true, true),
        BootStage::Ready => DUTY_OFF,
    }
}

/// Pattern for a firmware-update event, or `None` when the light should be
/// left as it is.
///
/// Progress works as a three-segment bar: red above 25 %, blue above 50 %,
/// green above 75 %.
pub fn update_indicator(event: UpdateEvent) -> Option<Srgb<u8>> {
    match event {
        UpdateEvent::Start | UpdateEvent::End => Some(DUTY_OFF),
        UpdateEvent::Progress { .. } => {
            let percent = event.percent().unwrap_or(0);
            Some(lamps(percent > 25, percent > 75, percent > 50))
        }
        UpdateEvent::Error(_) => None,
    }
}
