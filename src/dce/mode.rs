use super::Dce;
use crate::command::{Input, Output};
use crate::error::Error;
use crate::registry::Frequent;
use crate::retry::RetryStrategy;
use crate::traits::Dte;

/// Whether the serial link carries AT commands or PPP frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkingMode {
    #[default]
    Command = 0,
    Data = 1,
}

impl TryFrom<u8> for WorkingMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Command),
            1 => Ok(Self::Data),
            _ => {
                warn!("Unsupported working mode: {}", value);
                Err(Error::InvalidArgument)
            }
        }
    }
}

impl<'a, D: Dte + 'a> Dce<'a, D> {
    /// Switch the link between command and data mode.
    ///
    /// Entering data mode defines the configured PDP context and dials it.
    /// The mode only changes if both succeed.
    ///
    /// Leaving data mode never runs a recovery action, as a modem already
    /// in command mode does not answer the escape sequence. A failed escape
    /// is followed by a sync. The link is considered in command mode
    /// afterwards in any case, and echo is switched off.
    pub fn set_working_mode(&mut self, mode: WorkingMode) -> Result<(), Error> {
        match mode {
            WorkingMode::Data => {
                let pdp = self.config.pdp_context.clone();
                self.invoke_frequent(
                    Frequent::SetPdpContext,
                    Input::PdpContext(&pdp),
                    Output::None,
                )?;
                self.invoke_frequent(Frequent::SetDataMode, Input::None, Output::None)?;
                self.mode = WorkingMode::Data;
                info!("Entered data mode");
            }
            WorkingMode::Command => {
                self.with_strategy(RetryStrategy::FailFast, |dce| {
                    if dce
                        .invoke_frequent(Frequent::SetCommandMode, Input::None, Output::None)
                        .is_err()
                    {
                        dce.sync().ok();
                    }
                });
                self.mode = WorkingMode::Command;
                info!("Entered command mode");
                self.set_echo(false)?;
            }
        }
        Ok(())
    }
}
