//! Reset and power control lines

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::error::Error;

/// A control line that can be pulsed, such as the modem's `RESET_N` or
/// `PWRKEY` input.
///
/// A pulse drives the line active for the active width, then back to
/// inactive and holds it there for the inactive width. Both waits block.
pub trait Pulse {
    fn pulse(&mut self) -> Result<(), Error>;

    fn pulse_with(&mut self, active: Duration, inactive: Duration) -> Result<(), Error>;
}

impl<T: Pulse + ?Sized> Pulse for &mut T {
    fn pulse(&mut self) -> Result<(), Error> {
        T::pulse(self)
    }

    fn pulse_with(&mut self, active: Duration, inactive: Duration) -> Result<(), Error> {
        T::pulse_with(self, active, inactive)
    }
}

/// [`Pulse`] over an output pin and a blocking delay.
pub struct PulsePin<P, DL> {
    pin: P,
    delay: DL,
    inactive_level: PinState,
    active_width: Duration,
    inactive_width: Duration,
}

impl<P: OutputPin, DL: DelayNs> PulsePin<P, DL> {
    /// Configure `pin` and drive it to `inactive_level` right away.
    pub fn new(mut pin: P, delay: DL, inactive_level: PinState) -> Result<Self, Error> {
        pin.set_state(inactive_level).map_err(|_| Error::IoPin)?;
        Ok(Self {
            pin,
            delay,
            inactive_level,
            active_width: Duration::from_millis(100),
            inactive_width: Duration::from_millis(100),
        })
    }

    pub fn with_widths(self, active: Duration, inactive: Duration) -> Self {
        Self {
            active_width: active,
            inactive_width: inactive,
            ..self
        }
    }

    pub fn release(self) -> (P, DL) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, DL: DelayNs> Pulse for PulsePin<P, DL> {
    fn pulse(&mut self) -> Result<(), Error> {
        self.pulse_with(self.active_width, self.inactive_width)
    }

    fn pulse_with(&mut self, active: Duration, inactive: Duration) -> Result<(), Error> {
        self.pin
            .set_state(!self.inactive_level)
            .map_err(|_| Error::IoPin)?;
        self.delay
            .delay_ms(u32::try_from(active.as_millis()).unwrap_or(u32::MAX));
        self.pin
            .set_state(self.inactive_level)
            .map_err(|_| Error::IoPin)?;
        self.delay
            .delay_ms(u32::try_from(inactive.as_millis()).unwrap_or(u32::MAX));
        Ok(())
    }
}
