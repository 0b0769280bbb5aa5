//! ### 15 - V24 control and V25ter
pub mod types;

use atat::atat_derive::AtatCmd;

use super::{Command, Input, NoResponse, Output, TIMEOUT_DEFAULT};
use crate::classifier::handle_default;
use crate::config::FlowControl;
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;
use types::Echo;

/// 15.11 Command echo E
///
/// Enables (`ATE1`) or disables (`ATE0`) the echo of characters received by
/// the modem in command mode.
#[derive(Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false, termination = "\r")]
pub struct SetEchoMode {
    #[at_arg(position = 0)]
    pub echo: Echo,
}

/// Registered `set_echo`, takes [`Input::Echo`].
pub struct SetEcho;

impl<D: Dte> Command<D> for SetEcho {
    fn execute(&self, dce: &mut Dce<'_, D>, input: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        let cmd = SetEchoMode {
            echo: input.echo()?.into(),
        };
        dce.send_at(&cmd, TIMEOUT_DEFAULT, handle_default, &mut ())
    }
}

/// 15.8 Store current configuration &W
#[derive(Clone, AtatCmd)]
#[at_cmd("&W", NoResponse, termination = "\r")]
pub struct StoreProfile;

impl<D: Dte> Command<D> for StoreProfile {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_DEFAULT, handle_default, &mut ())
    }
}

/// DTE-DCE local flow control +IFC
#[derive(Clone, AtatCmd)]
#[at_cmd("+IFC", NoResponse, termination = "\r")]
pub struct SetFlowControlMode {
    /// Flow control the DTE applies to data it receives from the modem
    #[at_arg(position = 0)]
    pub dte: FlowControl,
    /// Flow control the modem applies to data it receives from the DTE
    #[at_arg(position = 1)]
    pub dce: FlowControl,
}

/// Registered `set_flow_ctrl`.
///
/// The DTE side is reported as configured on the transport, the modem side
/// is set to [`Input::FlowControl`].
pub struct SetFlowControl;

impl<D: Dte> Command<D> for SetFlowControl {
    fn execute(&self, dce: &mut Dce<'_, D>, input: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        let cmd = SetFlowControlMode {
            dte: dce.dte().flow_control(),
            dce: input.flow_control()?,
        };
        dce.send_at(&cmd, TIMEOUT_DEFAULT, handle_default, &mut ())
    }
}
