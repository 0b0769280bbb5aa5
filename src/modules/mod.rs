#[cfg(any(feature = "any-module", feature = "bg96"))]
pub(crate) mod bg96;
#[cfg(any(feature = "any-module", feature = "sim7600"))]
pub(crate) mod sim7600;
#[cfg(any(feature = "any-module", feature = "sim800"))]
pub(crate) mod sim800;

use embassy_time::Duration;

use crate::command::{names, Input};
use crate::config::FlowControl;
use crate::error::Error;
use crate::registry::Registry;
use crate::traits::Dte;

/// One command of a startup sequence, with its argument
pub type Step = (&'static str, Input<'static>);

const STARTUP_SYNC: &[Step] = &[(names::SYNC, Input::None)];

/// Sync, then store a profile with echo and flow control off
const STARTUP_DEFAULT_PROFILE: &[Step] = &[
    (names::SYNC, Input::None),
    (names::SET_ECHO, Input::Echo(false)),
    (names::SET_FLOW_CTRL, Input::FlowControl(FlowControl::None)),
    (names::STORE_PROFILE, Input::None),
];

pub trait ModuleParams: Copy {
    /// The time for which PWRKEY must be pulled to effect power-on
    fn power_on_pull_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    /// The time for which PWRKEY must be pulled to effect power-off
    fn power_off_pull_time(&self) -> Duration {
        Duration::from_millis(1500)
    }

    /// How long to wait before the module is ready after boot
    fn boot_wait(&self) -> Duration {
        Duration::from_secs(5)
    }

    /// How long to wait for an organised power-down to complete
    fn power_down_wait(&self) -> Duration {
        Duration::from_secs(5)
    }

    /// How long the reset line has to be held for to reset the module
    fn reset_hold(&self) -> Duration {
        Duration::from_millis(200)
    }

    /// How long to wait before a second sync attempt at startup, if the
    /// module needs one
    fn sync_retry_wait(&self) -> Option<Duration> {
        None
    }

    /// Commands run after power-up, in order
    fn startup(&self) -> &'static [Step] {
        STARTUP_SYNC
    }
}

/// Supported modem modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Module {
    #[cfg(any(feature = "any-module", feature = "bg96"))]
    Bg96(bg96::Bg96),
    #[cfg(any(feature = "any-module", feature = "sim800"))]
    Sim800(sim800::Sim800),
    #[cfg(any(feature = "any-module", feature = "sim7600"))]
    Sim7600(sim7600::Sim7600),
    Generic(Generic),
}

impl Module {
    /// Pick the module from the `AT+CGMM` model identification.
    pub fn from_model_name(model: &str) -> Self {
        match model {
            #[cfg(any(feature = "any-module", feature = "bg96"))]
            m if m.contains("BG96") => Self::Bg96(bg96::Bg96),
            #[cfg(any(feature = "any-module", feature = "sim7600"))]
            m if m.contains("SIM7600") => Self::Sim7600(sim7600::Sim7600),
            #[cfg(any(feature = "any-module", feature = "sim800"))]
            m if m.contains("SIM800") => Self::Sim800(sim800::Sim800),
            _m => {
                warn!(
                    "Attempting to run {} using generic module parameters! This may or may not work.",
                    _m
                );
                Self::Generic(Generic)
            }
        }
    }

    /// Replace the default commands this module implements differently.
    pub(crate) fn apply_overrides<'a, D: Dte + 'a>(
        &self,
        registry: &mut Registry<'a, D>,
    ) -> Result<(), Error> {
        match self {
            #[cfg(any(feature = "any-module", feature = "bg96"))]
            Self::Bg96(_) => Ok(()),
            #[cfg(any(feature = "any-module", feature = "sim800"))]
            Self::Sim800(_) => registry.extend(&sim800::overrides()),
            #[cfg(any(feature = "any-module", feature = "sim7600"))]
            Self::Sim7600(_) => registry.extend(&sim7600::overrides()),
            Self::Generic(_) => Ok(()),
        }
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::Generic(Generic)
    }
}

macro_rules! inner {
    ($self: ident, $fn: ident) => {
        match $self {
            #[cfg(any(feature = "any-module", feature = "bg96"))]
            Self::Bg96(inner) => inner.$fn(),
            #[cfg(any(feature = "any-module", feature = "sim800"))]
            Self::Sim800(inner) => inner.$fn(),
            #[cfg(any(feature = "any-module", feature = "sim7600"))]
            Self::Sim7600(inner) => inner.$fn(),
            Self::Generic(inner) => inner.$fn(),
        }
    };
}

impl ModuleParams for Module {
    fn power_on_pull_time(&self) -> Duration {
        inner!(self, power_on_pull_time)
    }

    fn power_off_pull_time(&self) -> Duration {
        inner!(self, power_off_pull_time)
    }

    fn boot_wait(&self) -> Duration {
        inner!(self, boot_wait)
    }

    fn power_down_wait(&self) -> Duration {
        inner!(self, power_down_wait)
    }

    fn reset_hold(&self) -> Duration {
        inner!(self, reset_hold)
    }

    fn sync_retry_wait(&self) -> Option<Duration> {
        inner!(self, sync_retry_wait)
    }

    fn startup(&self) -> &'static [Step] {
        inner!(self, startup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Generic;

impl ModuleParams for Generic {}
