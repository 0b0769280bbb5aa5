//! ### 18 - Packet switched data services
use atat::atat_derive::AtatCmd;

use super::{Command, Input, NoResponse, Output, TIMEOUT_DEFAULT, TIMEOUT_MODE_CHANGE};
use crate::classifier::{handle_default, handle_enter_data_mode, handle_exit_data_mode};
use crate::config::PdpContext;
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// 18.4 PDP context definition +CGDCONT
///
/// Defines the connection parameters for a PDP context, identified by the
/// local context identification parameter <cid>.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse, termination = "\r")]
pub struct SetPdpContextDefinition<'a> {
    #[at_arg(position = 0)]
    pub cid: u8,
    #[at_arg(position = 1, len = 6)]
    pub pdp_type: &'a str,
    #[at_arg(position = 2, len = 100)]
    pub apn: &'a str,
}

impl<'a> From<&'a PdpContext> for SetPdpContextDefinition<'a> {
    fn from(pdp: &'a PdpContext) -> Self {
        Self {
            cid: pdp.cid,
            pdp_type: pdp.pdp_type.as_str(),
            apn: pdp.apn.as_str(),
        }
    }
}

/// Registered `set_pdp_context`, takes [`Input::PdpContext`].
pub struct SetPdpContext;

impl<D: Dte> Command<D> for SetPdpContext {
    fn execute(&self, dce: &mut Dce<'_, D>, input: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        let cmd = SetPdpContextDefinition::from(input.pdp_context()?);
        dce.send_at(&cmd, TIMEOUT_DEFAULT, handle_default, &mut ())
    }
}

/// 18.2 Enter data state D*
///
/// Dials the packet data service of context 1. The modem answers `CONNECT`
/// and switches the link to PPP.
#[derive(Clone, AtatCmd)]
#[at_cmd("D*99***1#", NoResponse, termination = "\r")]
pub struct EnterDataMode;

impl<D: Dte> Command<D> for EnterDataMode {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_MODE_CHANGE, handle_enter_data_mode, &mut ())
    }
}

/// Escape sequence `+++`
///
/// Switches from data mode back to command mode. Neither prefix nor line
/// terminator is sent.
#[derive(Clone, AtatCmd)]
#[at_cmd("+++", NoResponse, cmd_prefix = "", termination = "")]
pub struct ExitDataMode;

impl<D: Dte> Command<D> for ExitDataMode {
    fn execute(&self, dce: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
        dce.send_at(self, TIMEOUT_MODE_CHANGE, handle_exit_data_mode, &mut ())
    }
}
