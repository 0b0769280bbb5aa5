use embassy_time::Duration;

use crate::classifier::Verdict;
use crate::config::FlowControl;
use crate::error::DteError;

/// Host side of the serial link (Data Terminal Equipment).
///
/// The DTE owns the UART, line detection and any background reader. The DCE
/// only relies on this contract:
///
/// - `send_command` writes `command` verbatim, then feeds every received,
///   line-delimited response into `on_line` until it returns a terminal
///   [`Verdict`] or `timeout` elapses. No other command may be interleaved
///   with an in-flight one.
/// - `send_data` is a raw passthrough, only used once the link is in data mode.
pub trait Dte {
    fn send_command(
        &mut self,
        command: &str,
        timeout: Duration,
        on_line: &mut dyn FnMut(&str) -> Verdict,
    ) -> Result<(), DteError>;

    fn send_data(&mut self, data: &[u8]) -> Result<usize, DteError>;

    /// Called by the DCE once a command cycle reached a terminal line, so the
    /// transport can reset its line buffer and echo suppression.
    fn command_done(&mut self) {}

    /// Flow control used on the DTE side of the link, reported to the modem
    /// by `AT+IFC`.
    fn flow_control(&self) -> FlowControl {
        FlowControl::None
    }
}

impl<T: Dte + ?Sized> Dte for &mut T {
    fn send_command(
        &mut self,
        command: &str,
        timeout: Duration,
        on_line: &mut dyn FnMut(&str) -> Verdict,
    ) -> Result<(), DteError> {
        T::send_command(self, command, timeout, on_line)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<usize, DteError> {
        T::send_data(self, data)
    }

    fn command_done(&mut self) {
        T::command_done(self)
    }

    fn flow_control(&self) -> FlowControl {
        T::flow_control(self)
    }
}
