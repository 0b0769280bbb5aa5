//! ### 5 - Mobile equipment control and status Commands
pub mod responses;

use atat::atat_derive::AtatCmd;

use super::{
    Command, Input, NoResponse, Output, TIMEOUT_DEFAULT, TIMEOUT_POWER_OFF, TIMEOUT_RESET,
};
use crate::classifier::{handle_battery_status, handle_power_down, handle_reset};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// 8.4 Battery charge +CBC
#[derive(Clone, AtatCmd)]
#[at_cmd("+CBC", NoResponse, termination = "\r")]
pub struct GetBatteryStatus;

impl<D: Dte> Command<D> for GetBatteryStatus {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let cbc = output.battery_status()?;
        dce.send_at(self, TIMEOUT_DEFAULT, handle_battery_status, cbc)
    }
}

/// Power off +QPOWD
///
/// Graceful switch off. The modem detaches from the network and reports
/// `POWERED DOWN` once it is safe to cut the supply.
#[derive(Clone, AtatCmd)]
#[at_cmd("+QPOWD=1", NoResponse, termination = "\r")]
pub struct PowerDown;

impl<D: Dte> Command<D> for PowerDown {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_POWER_OFF, handle_power_down, &mut ())
    }
}

/// Reset +CRESET
///
/// Software reset. Completes once the modem is back up and has read the SIM
/// phonebook (`PB DONE`).
#[derive(Clone, AtatCmd)]
#[at_cmd("+CRESET", NoResponse, termination = "\r")]
pub struct Reset;

impl<D: Dte> Command<D> for Reset {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_RESET, handle_reset, &mut ())
    }
}
