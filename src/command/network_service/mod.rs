//! ### 7 - Network service
pub mod responses;

use atat::atat_derive::AtatCmd;

use super::{Command, Input, NoResponse, Output, TIMEOUT_DEFAULT, TIMEOUT_OPERATOR};
use crate::classifier::{handle_operator, handle_signal_quality};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// 7.2 Signal quality +CSQ
///
/// Returns the received signal strength indication <rssi> and the channel
/// bit error rate <ber>.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSQ", NoResponse, termination = "\r")]
pub struct GetSignalQuality;

impl<D: Dte> Command<D> for GetSignalQuality {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let csq = output.signal_quality()?;
        dce.send_at(self, TIMEOUT_DEFAULT, handle_signal_quality, csq)
    }
}

/// 7.5 Operator selection +COPS
///
/// Reads the name of the currently selected operator. The read command may
/// have to wait for an ongoing network search.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS?", NoResponse, termination = "\r")]
pub struct GetOperatorName;

impl<D: Dte> Command<D> for GetOperatorName {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let buf = output.text()?;
        dce.send_at(self, TIMEOUT_OPERATOR, handle_operator, buf)
    }
}
