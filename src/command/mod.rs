//! AT commands understood by the DCE engine
//!
//! Each command is a [`Command`] implementation registered by name in the
//! [`Registry`](crate::registry::Registry). Default implementations follow
//! ITU-T V.250 and 3GPP TS 27.007; modem modules replace some of them with
//! vendor variants.

pub mod call_control;
pub mod control;
pub mod general;
pub mod mobile_control;
pub mod network_service;
pub mod psn;

use atat::atat_derive::AtatResp;
use atat::AtatCmd;
use embassy_time::Duration;

use crate::classifier::ResponseText;
use crate::config::{FlowControl, PdpContext};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

use mobile_control::responses::BatteryStatus;
use network_service::responses::SignalQuality;

/// Capacity of a serialized command line, sized for `+CGDCONT` with the
/// longest APN.
pub const MAX_COMMAND_LEN: usize = 160;

/// Response type of every command. Replies are classified line by line by
/// the handler passed to [`Dce::generic_command`] instead.
#[derive(Debug, Clone, AtatResp)]
pub struct NoResponse;

/// Serialize `cmd` into `buf` and return the wire text.
pub(crate) fn encode<'b, A: AtatCmd>(cmd: &A, buf: &'b mut [u8]) -> Result<&'b str, Error> {
    if A::MAX_LEN > buf.len() {
        return Err(Error::Overflow);
    }
    let len = cmd.write(buf);
    core::str::from_utf8(&buf[..len]).map_err(|_| Error::InvalidArgument)
}

/// Default timeout for most commands
pub const TIMEOUT_DEFAULT: Duration = Duration::from_millis(500);
/// Timeout for reading the operator, which may trigger a network search
pub const TIMEOUT_OPERATOR: Duration = Duration::from_secs(75);
/// Timeout for a reset, which only completes once the SIM phonebook is ready
pub const TIMEOUT_RESET: Duration = Duration::from_secs(60);
/// Timeout for switching between command and data mode
pub const TIMEOUT_MODE_CHANGE: Duration = Duration::from_secs(5);
/// Timeout for a graceful power down
pub const TIMEOUT_POWER_OFF: Duration = Duration::from_secs(1);
/// Timeout for hanging up an active call or data connection
pub const TIMEOUT_HANG_UP: Duration = Duration::from_secs(90);

/// Registry names of the default command set.
pub mod names {
    pub const SYNC: &str = "sync";
    pub const GET_IMEI_NUMBER: &str = "get_imei_number";
    pub const GET_IMSI_NUMBER: &str = "get_imsi_number";
    pub const GET_MODULE_NAME: &str = "get_module_name";
    pub const GET_OPERATOR_NAME: &str = "get_operator_name";
    pub const SET_ECHO: &str = "set_echo";
    pub const STORE_PROFILE: &str = "store_profile";
    pub const SET_FLOW_CTRL: &str = "set_flow_ctrl";
    pub const SET_PDP_CONTEXT: &str = "set_pdp_context";
    pub const HANG_UP: &str = "hang_up";
    pub const GET_SIGNAL_QUALITY: &str = "get_signal_quality";
    pub const SET_DATA_MODE: &str = "set_data_mode";
    pub const SET_COMMAND_MODE: &str = "set_command_mode";
    pub const GET_BATTERY_STATUS: &str = "get_battery_status";
    pub const POWER_DOWN: &str = "power_down";
    pub const RESET: &str = "reset";
}

/// Parameter handed to a command on invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'i> {
    None,
    Echo(bool),
    FlowControl(FlowControl),
    PdpContext(&'i PdpContext),
}

impl<'i> Input<'i> {
    pub(crate) fn echo(self) -> Result<bool, Error> {
        match self {
            Self::Echo(on) => Ok(on),
            _ => Err(Error::InvalidArgument),
        }
    }

    pub(crate) fn flow_control(self) -> Result<FlowControl, Error> {
        match self {
            Self::FlowControl(flow) => Ok(flow),
            _ => Err(Error::InvalidArgument),
        }
    }

    pub(crate) fn pdp_context(self) -> Result<&'i PdpContext, Error> {
        match self {
            Self::PdpContext(pdp) => Ok(pdp),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Destination for data a command reads back from the modem.
#[derive(Debug)]
pub enum Output<'o> {
    None,
    Text(&'o mut ResponseText),
    SignalQuality(&'o mut SignalQuality),
    BatteryStatus(&'o mut BatteryStatus),
}

impl<'o> Output<'o> {
    /// Shorter-lived copy pointing at the same destination, so a command
    /// can be attempted more than once.
    pub fn reborrow(&mut self) -> Output<'_> {
        match self {
            Self::None => Output::None,
            Self::Text(buf) => Output::Text(&mut **buf),
            Self::SignalQuality(csq) => Output::SignalQuality(&mut **csq),
            Self::BatteryStatus(cbc) => Output::BatteryStatus(&mut **cbc),
        }
    }

    pub(crate) fn text(self) -> Result<&'o mut ResponseText, Error> {
        match self {
            Self::Text(buf) => Ok(buf),
            _ => Err(Error::InvalidArgument),
        }
    }

    pub(crate) fn signal_quality(self) -> Result<&'o mut SignalQuality, Error> {
        match self {
            Self::SignalQuality(csq) => Ok(csq),
            _ => Err(Error::InvalidArgument),
        }
    }

    pub(crate) fn battery_status(self) -> Result<&'o mut BatteryStatus, Error> {
        match self {
            Self::BatteryStatus(cbc) => Ok(cbc),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// A named operation on the DCE.
///
/// Most implementations serialize one atat command and hand it to
/// [`Dce::send_at`] together with a timeout and a line classifier.
pub trait Command<D: Dte> {
    fn execute(&self, dce: &mut Dce<'_, D>, input: Input<'_>, output: Output<'_>)
        -> Result<(), Error>;
}

/// A `(name, implementation)` registry entry.
pub type Entry<'a, D> = (&'a str, &'a dyn Command<D>);

/// The default command table every DCE starts with.
pub fn default_commands<'a, D: Dte + 'a>() -> [Entry<'a, D>; 16] {
    [
        (names::SYNC, &general::AT),
        (names::GET_IMEI_NUMBER, &general::GetImei),
        (names::GET_IMSI_NUMBER, &general::GetImsi),
        (names::GET_MODULE_NAME, &general::GetModelId),
        (names::GET_OPERATOR_NAME, &network_service::GetOperatorName),
        (names::SET_ECHO, &control::SetEcho),
        (names::STORE_PROFILE, &control::StoreProfile),
        (names::SET_FLOW_CTRL, &control::SetFlowControl),
        (names::SET_PDP_CONTEXT, &psn::SetPdpContext),
        (names::HANG_UP, &call_control::HangUp),
        (names::GET_SIGNAL_QUALITY, &network_service::GetSignalQuality),
        (names::SET_DATA_MODE, &psn::EnterDataMode),
        (names::SET_COMMAND_MODE, &psn::ExitDataMode),
        (names::GET_BATTERY_STATUS, &mobile_control::GetBatteryStatus),
        (names::POWER_DOWN, &mobile_control::PowerDown),
        (names::RESET, &mobile_control::Reset),
    ]
}
