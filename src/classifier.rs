//! Line classification
//!
//! Every command hands the executor a [`LineHandler`] which inspects one
//! received line at a time and decides whether the command is done. The
//! handler may also store data from the line into the command's context.

use heapless::String;

use crate::command::mobile_control::responses::BatteryStatus;
use crate::command::network_service::responses::{OperatorSelection, SignalQuality};

/// Capacity of a textual command result (IMEI, module name, operator, ..)
pub const MAX_RESPONSE_LEN: usize = 64;

pub type ResponseText = String<MAX_RESPONSE_LEN>;

/// Classifier for one received line, writing captured data into `C`.
pub type LineHandler<C> = fn(&str, &mut C) -> Verdict;

/// Outcome of classifying a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Line is not relevant, more lines expected
    Continue,
    /// Line data was stored in the context, more lines expected
    Captured,
    /// Command completed successfully
    Success,
    /// Command completed with an error
    Fail,
}

impl Verdict {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }
}

/// V.250 / 27.007 final and intermediate result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultCode {
    Ok,
    Connect,
    Ring,
    NoCarrier,
    Error,
    NoDialtone,
    Busy,
    NoAnswer,
}

impl ResultCode {
    /// Parse a whole line as a result code. Result codes are never matched
    /// inside other text, so `+COPS: 0,0,"TOKYO"` is not an `OK`.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = strip_cr_lf(line).trim();
        match line {
            "OK" => Some(Self::Ok),
            "RING" => Some(Self::Ring),
            "NO CARRIER" => Some(Self::NoCarrier),
            "ERROR" => Some(Self::Error),
            "NO DIALTONE" => Some(Self::NoDialtone),
            "BUSY" => Some(Self::Busy),
            "NO ANSWER" => Some(Self::NoAnswer),
            // CONNECT may report the link rate, e.g. `CONNECT 115200`
            l if l == "CONNECT" || l.starts_with("CONNECT ") => Some(Self::Connect),
            // Extended errors once `+CMEE` is enabled
            l if l.starts_with("+CME ERROR") || l.starts_with("+CMS ERROR") => Some(Self::Error),
            _ => None,
        }
    }
}

/// Strip the trailing `\r` / `\r\n` of a received line.
pub fn strip_cr_lf(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Copy `line` into `buf`, without its line terminator.
///
/// Lines of two characters or less (a bare `\r\n`) and blank lines do not
/// count as a result and leave `buf` untouched. Content exceeding the buffer
/// capacity is truncated.
pub fn store_line(buf: &mut ResponseText, line: &str) -> bool {
    if line.len() <= 2 {
        return false;
    }
    let stripped = strip_cr_lf(line);
    if stripped.trim().is_empty() {
        return false;
    }
    copy_truncated(buf, stripped);
    true
}

fn copy_truncated(buf: &mut ResponseText, s: &str) {
    buf.clear();
    for c in s.chars() {
        if buf.push(c).is_err() {
            break;
        }
    }
}

/// Verdict for the terminal tokens shared by most handlers.
pub(crate) fn final_result(line: &str) -> Option<Verdict> {
    match ResultCode::from_line(line)? {
        ResultCode::Ok => Some(Verdict::Success),
        ResultCode::Error => Some(Verdict::Fail),
        _ => None,
    }
}

/// `OK` completes, `ERROR` fails, everything else is ignored.
pub fn handle_default(line: &str, _: &mut ()) -> Verdict {
    trace!("> {}", line);
    final_result(line).unwrap_or(Verdict::Continue)
}

/// Captures the last non-empty line before `OK` (`+CGSN`, `+CIMI`, `+CGMM`).
pub fn handle_string(line: &str, buf: &mut ResponseText) -> Verdict {
    if let Some(verdict) = final_result(line) {
        return verdict;
    }
    if store_line(buf, line) {
        Verdict::Captured
    } else {
        Verdict::Continue
    }
}

/// Extract `<oper>` from `+COPS: <mode>[,<format>[,<oper>[,<AcT>]]]`.
///
/// The operator is the third field. It is taken positionally, as operator
/// names may contain commas and spaces.
pub fn operator_name(line: &str) -> Option<&str> {
    let body = strip_cr_lf(line);
    let mut fields = body.splitn(3, ',');
    fields.next()?;
    fields.next()?;
    let rest = fields.next()?.trim_start();
    let name = match rest.strip_prefix('"') {
        // Quoted names run up to the closing quote, commas included
        Some(quoted) => quoted.split('"').next()?,
        None => rest.split(',').next()?.trim_end(),
    };
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn handle_operator(line: &str, buf: &mut ResponseText) -> Verdict {
    if let Some(verdict) = final_result(line) {
        return verdict;
    }
    if !line.starts_with("+COPS") {
        return Verdict::Continue;
    }

    let line = strip_cr_lf(line);
    let quoted = atat::serde_at::from_str::<OperatorSelection>(line)
        .ok()
        .and_then(|cops| cops.oper)
        .filter(|name| !name.is_empty());
    if let Some(name) = quoted {
        *buf = name;
        return Verdict::Captured;
    }

    // Numeric operators and names longer than the buffer
    match operator_name(line) {
        Some(name) => {
            copy_truncated(buf, name);
            Verdict::Captured
        }
        None => Verdict::Continue,
    }
}

/// `+CSQ: <rssi>,<ber>`
pub fn handle_signal_quality(line: &str, csq: &mut SignalQuality) -> Verdict {
    if let Some(verdict) = final_result(line) {
        return verdict;
    }
    if line.starts_with("+CSQ") {
        return match atat::serde_at::from_str::<SignalQuality>(strip_cr_lf(line)) {
            Ok(parsed) => {
                *csq = parsed;
                Verdict::Captured
            }
            Err(_) => {
                warn!("Malformed signal quality report");
                Verdict::Fail
            }
        };
    }
    Verdict::Continue
}

/// `+CBC: <bcs>,<bcl>,<voltage>`
pub fn handle_battery_status(line: &str, cbc: &mut BatteryStatus) -> Verdict {
    if let Some(verdict) = final_result(line) {
        return verdict;
    }
    if line.starts_with("+CBC") {
        return match atat::serde_at::from_str::<BatteryStatus>(strip_cr_lf(line)) {
            Ok(parsed) => {
                *cbc = parsed;
                Verdict::Captured
            }
            Err(_) => {
                warn!("Malformed battery status report");
                Verdict::Fail
            }
        };
    }
    Verdict::Continue
}

/// Response to dialing into PPP: only `CONNECT` enters data mode.
pub fn handle_enter_data_mode(line: &str, _: &mut ()) -> Verdict {
    match ResultCode::from_line(line) {
        Some(ResultCode::Connect) => Verdict::Success,
        Some(
            ResultCode::Error
            | ResultCode::NoCarrier
            | ResultCode::Busy
            | ResultCode::NoAnswer
            | ResultCode::NoDialtone,
        ) => Verdict::Fail,
        _ => Verdict::Continue,
    }
}

/// Response to `+++`: the modem reports either `OK` or a dropped carrier.
pub fn handle_exit_data_mode(line: &str, _: &mut ()) -> Verdict {
    trace!(">>> {}", line);
    match ResultCode::from_line(line) {
        Some(ResultCode::Ok | ResultCode::NoCarrier) => Verdict::Success,
        Some(ResultCode::Error) => Verdict::Fail,
        _ => Verdict::Continue,
    }
}

/// `AT+CRESET` is acknowledged with `OK`, but only done at `PB DONE`.
pub fn handle_reset(line: &str, _: &mut ()) -> Verdict {
    trace!("> {}", line);
    match final_result(line) {
        Some(Verdict::Success) => Verdict::Continue,
        Some(verdict) => verdict,
        None if line.contains("PB DONE") => Verdict::Success,
        None => Verdict::Continue,
    }
}

/// `AT+QPOWD=1` is acknowledged with `OK`, but only done at `POWERED DOWN`.
pub fn handle_power_down(line: &str, _: &mut ()) -> Verdict {
    match final_result(line) {
        Some(Verdict::Success) => Verdict::Continue,
        Some(verdict) => verdict,
        None if line.contains("POWERED DOWN") => Verdict::Success,
        None => Verdict::Continue,
    }
}
