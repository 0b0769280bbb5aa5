//! ### 6 - Call control
use atat::atat_derive::AtatCmd;

use super::{Command, Input, NoResponse, Output, TIMEOUT_HANG_UP};
use crate::classifier::handle_default;
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// 6.3 Hook control H
///
/// Disconnects the remote user. In case of multiple calls, all active calls
/// and held calls are released while waiting calls are not.
#[derive(Clone, AtatCmd)]
#[at_cmd("H", NoResponse, termination = "\r")]
pub struct HangUp;

impl<D: Dte> Command<D> for HangUp {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_HANG_UP, handle_default, &mut ())
    }
}
