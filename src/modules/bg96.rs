use super::{ModuleParams, Step, STARTUP_DEFAULT_PROFILE};
use embassy_time::Duration;

/// Quectel BG96, LTE Cat M1/NB1. Runs the default command set unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bg96;

impl ModuleParams for Bg96 {
    fn power_on_pull_time(&self) -> Duration {
        Duration::from_millis(500)
    }
    fn power_off_pull_time(&self) -> Duration {
        Duration::from_millis(650)
    }
    fn boot_wait(&self) -> Duration {
        Duration::from_millis(4900)
    }
    fn power_down_wait(&self) -> Duration {
        Duration::from_secs(2)
    }
    fn reset_hold(&self) -> Duration {
        Duration::from_millis(300)
    }
    fn startup(&self) -> &'static [Step] {
        STARTUP_DEFAULT_PROFILE
    }
}
