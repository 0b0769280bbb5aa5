use atat::atat_derive::AtatCmd;
use embassy_time::Duration;

use super::{ModuleParams, Step, STARTUP_DEFAULT_PROFILE};
use crate::classifier::{final_result, handle_enter_data_mode, Verdict};
use crate::command::{
    names, Command, Entry, Input, NoResponse, Output, TIMEOUT_MODE_CHANGE, TIMEOUT_POWER_OFF,
};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// SIMCom SIM800, quad-band GSM/GPRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sim800;

impl ModuleParams for Sim800 {
    fn power_on_pull_time(&self) -> Duration {
        Duration::from_millis(1100)
    }
    fn power_off_pull_time(&self) -> Duration {
        Duration::from_millis(1500)
    }
    fn boot_wait(&self) -> Duration {
        Duration::from_secs(3)
    }
    fn power_down_wait(&self) -> Duration {
        Duration::from_secs(2)
    }
    fn reset_hold(&self) -> Duration {
        Duration::from_millis(105)
    }
    fn sync_retry_wait(&self) -> Option<Duration> {
        Some(Duration::from_secs(30))
    }
    fn startup(&self) -> &'static [Step] {
        STARTUP_DEFAULT_PROFILE
    }
}

pub(crate) fn overrides<'a, D: Dte + 'a>() -> [Entry<'a, D>; 2] {
    [
        (names::SET_DATA_MODE, &EnterDataMode),
        (names::POWER_DOWN, &PowerDown),
    ]
}

/// Dial the packet service, SIM800 does not take a context id
#[derive(Clone, AtatCmd)]
#[at_cmd("D*99##", NoResponse, termination = "\r")]
pub struct EnterDataMode;

impl<D: Dte> Command<D> for EnterDataMode {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_MODE_CHANGE, handle_enter_data_mode, &mut ())
    }
}

/// Normal power off +CPOWD
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPOWD=1", NoResponse, termination = "\r")]
pub struct PowerDown;

impl<D: Dte> Command<D> for PowerDown {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_POWER_OFF, handle_power_down, &mut ())
    }
}

/// The modem answers `NORMAL POWER DOWN` instead of `OK`.
fn handle_power_down(line: &str, _: &mut ()) -> Verdict {
    if line.contains("POWER DOWN") {
        return Verdict::Success;
    }
    match final_result(line) {
        Some(Verdict::Fail) => Verdict::Fail,
        _ => Verdict::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_down_notification() {
        assert_eq!(
            handle_power_down("NORMAL POWER DOWN\r\n", &mut ()),
            Verdict::Success
        );
        assert_eq!(handle_power_down("OK", &mut ()), Verdict::Continue);
        assert_eq!(handle_power_down("ERROR", &mut ()), Verdict::Fail);
    }
}
