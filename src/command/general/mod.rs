//! ### 4 - General Commands
use atat::atat_derive::AtatCmd;

use super::{Command, Input, NoResponse, Output, TIMEOUT_DEFAULT};
use crate::classifier::{handle_default, handle_string};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// Attention
///
/// Bare `AT`, used to synchronise with the modem's autobauding and to check
/// that it responds at all.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse, termination = "\r")]
pub struct AT;

impl<D: Dte> Command<D> for AT {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_DEFAULT, handle_default, &mut ())
    }
}

/// 4.7 IMEI identification +CGSN
///
/// Returns the International Mobile Equipment Identity (IMEI) of the MT.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGSN", NoResponse, termination = "\r")]
pub struct GetImei;

impl<D: Dte> Command<D> for GetImei {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let buf = output.text()?;
        dce.send_at(self, TIMEOUT_DEFAULT, handle_string, buf)
    }
}

/// 4.11 International mobile subscriber identification +CIMI
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIMI", NoResponse, termination = "\r")]
pub struct GetImsi;

impl<D: Dte> Command<D> for GetImsi {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let buf = output.text()?;
        dce.send_at(self, TIMEOUT_DEFAULT, handle_string, buf)
    }
}

/// 4.3 Model identification +CGMM
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGMM", NoResponse, termination = "\r")]
pub struct GetModelId;

impl<D: Dte> Command<D> for GetModelId {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let buf = output.text()?;
        dce.send_at(self, TIMEOUT_DEFAULT, handle_string, buf)
    }
}
