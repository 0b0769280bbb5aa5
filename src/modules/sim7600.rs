use atat::atat_derive::AtatCmd;
use embassy_time::Duration;

use super::{ModuleParams, Step, STARTUP_DEFAULT_PROFILE};
use crate::classifier::{final_result, handle_default, strip_cr_lf, Verdict};
use crate::command::mobile_control::responses::BatteryStatus;
use crate::command::{names, Command, Entry, Input, NoResponse, Output, TIMEOUT_POWER_OFF};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// `AT+CBC` can take long on SIM7600 while the ADC is busy
const TIMEOUT_BATTERY: Duration = Duration::from_secs(20);

/// SIMCom SIM7600, LTE Cat 1/Cat 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sim7600;

impl ModuleParams for Sim7600 {
    fn power_on_pull_time(&self) -> Duration {
        Duration::from_millis(500)
    }
    fn power_off_pull_time(&self) -> Duration {
        Duration::from_millis(2500)
    }
    fn boot_wait(&self) -> Duration {
        Duration::from_secs(16)
    }
    fn power_down_wait(&self) -> Duration {
        Duration::from_secs(26)
    }
    fn reset_hold(&self) -> Duration {
        Duration::from_millis(100)
    }
    fn startup(&self) -> &'static [Step] {
        STARTUP_DEFAULT_PROFILE
    }
}

pub(crate) fn overrides<'a, D: Dte + 'a>() -> [Entry<'a, D>; 2] {
    [
        (names::POWER_DOWN, &PowerDown),
        (names::GET_BATTERY_STATUS, &GetBatteryStatus),
    ]
}

/// Power down +CPOF
///
/// Acknowledged with a plain `OK`. A `NO CARRIER` of a dropped data call may
/// arrive first.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPOF", NoResponse, termination = "\r")]
pub struct PowerDown;

impl<D: Dte> Command<D> for PowerDown {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_POWER_OFF, handle_default, &mut ())
    }
}

/// Battery voltage +CBC
///
/// SIM7600 only reports the supply voltage, as `+CBC: 3.912V`. Charge status
/// and level are reported as -1.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CBC", NoResponse, termination = "\r")]
pub struct GetBatteryStatus;

impl<D: Dte> Command<D> for GetBatteryStatus {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let cbc = output.battery_status()?;
        dce.send_at(self, TIMEOUT_BATTERY, handle_battery_voltage, cbc)
    }
}

fn handle_battery_voltage(line: &str, cbc: &mut BatteryStatus) -> Verdict {
    if let Some(verdict) = final_result(line) {
        return verdict;
    }
    let Some(report) = line.strip_prefix("+CBC:") else {
        return Verdict::Continue;
    };

    match parse_millivolts(strip_cr_lf(report).trim()) {
        Some(voltage) => {
            *cbc = BatteryStatus {
                bcs: -1,
                bcl: -1,
                voltage,
            };
            Verdict::Captured
        }
        None => {
            warn!("Malformed battery voltage report");
            Verdict::Fail
        }
    }
}

/// `3.9V` -> 3900, `3.912V` -> 3912. Digits past millivolts are dropped.
fn parse_millivolts(volts: &str) -> Option<u32> {
    let volts = volts.strip_suffix('V')?;
    let (int, frac) = volts.split_once('.').unwrap_or((volts, ""));

    let mut mv = int.parse::<u32>().ok()?.checked_mul(1000)?;
    let mut scale = 100;
    for c in frac.chars() {
        let digit = c.to_digit(10)?;
        mv = mv.checked_add(digit * scale)?;
        scale /= 10;
    }
    Some(mv)
}
