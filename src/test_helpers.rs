extern crate std;

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::sync::Once;
use std::vec::Vec;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};

use crate::classifier::Verdict;
use crate::config::FlowControl;
use crate::error::DteError;
use crate::traits::Dte;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
            .is_test(true)
            .init();
    });
}

/// What the scripted modem does in response to one command.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// Stay silent until the command times out
    Timeout,
    /// Fail the transport
    Io,
    /// Deliver these lines, stopping at the first terminal one. Runs into a
    /// timeout if none is terminal.
    Lines(&'static [&'static str]),
}

/// DTE answering each command with the next scripted [`Reply`]. Once the
/// script is exhausted every command times out.
pub struct ScriptedDte {
    replies: VecDeque<Reply>,
    sent: Vec<String>,
    timeouts: Vec<Duration>,
    data: Vec<u8>,
    done: usize,
    flow_control: FlowControl,
}

impl ScriptedDte {
    pub fn new(replies: &[Reply]) -> Self {
        init_logger();
        Self {
            replies: replies.iter().copied().collect(),
            sent: Vec::new(),
            timeouts: Vec::new(),
            data: Vec::new(),
            done: 0,
            flow_control: FlowControl::None,
        }
    }

    pub fn with_flow_control(self, flow_control: FlowControl) -> Self {
        Self {
            flow_control,
            ..self
        }
    }

    pub fn push(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    /// Commands written so far, verbatim
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Timeout each command was sent with
    pub fn timeouts(&self) -> &[Duration] {
        &self.timeouts
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of completed command cycles
    pub fn done(&self) -> usize {
        self.done
    }
}

impl Dte for ScriptedDte {
    fn send_command(
        &mut self,
        command: &str,
        timeout: Duration,
        on_line: &mut dyn FnMut(&str) -> Verdict,
    ) -> Result<(), DteError> {
        self.sent.push(command.to_string());
        self.timeouts.push(timeout);

        match self.replies.pop_front() {
            None | Some(Reply::Timeout) => Err(DteError::Timeout),
            Some(Reply::Io) => Err(DteError::Io),
            Some(Reply::Lines(lines)) => {
                for line in lines {
                    if on_line(line).is_terminal() {
                        return Ok(());
                    }
                }
                Err(DteError::Timeout)
            }
        }
    }

    fn send_data(&mut self, data: &[u8]) -> Result<usize, DteError> {
        self.data.extend_from_slice(data);
        Ok(data.len())
    }

    fn command_done(&mut self) {
        self.done += 1;
    }

    fn flow_control(&self) -> FlowControl {
        self.flow_control
    }
}

/// Output pin remembering every level it was driven to.
#[derive(Default)]
pub struct RecordingPin {
    levels: Vec<PinState>,
    broken: bool,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pin whose every write fails
    pub fn broken() -> Self {
        Self {
            levels: Vec::new(),
            broken: true,
        }
    }

    pub fn levels(&self) -> &[PinState] {
        &self.levels
    }
}

impl ErrorType for RecordingPin {
    type Error = ErrorKind;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        if self.broken {
            return Err(ErrorKind::Other);
        }
        self.levels.push(state);
        Ok(())
    }
}

/// Delay that returns immediately and records the requested waits, in ms.
#[derive(Default)]
pub struct RecordingDelay {
    waits: Vec<u32>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> &[u32] {
        &self.waits
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits.push(ns / 1_000_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.waits.push(us / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(ms);
    }
}
