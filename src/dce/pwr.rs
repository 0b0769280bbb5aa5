use embassy_time::Duration;

use super::{Dce, WorkingMode};
use crate::command::{names, Input, Output};
use crate::error::Error;
use crate::modules::ModuleParams as _;
use crate::traits::Dte;

impl<'a, D: Dte + 'a> Dce<'a, D> {
    /// Reset the modem with the `reset` command, falling back to a hard
    /// reset through the reset line if the command fails.
    pub fn reset(&mut self) -> Result<(), Error> {
        match self.invoke(names::RESET, Input::None, Output::None) {
            Ok(()) => {}
            Err(e) if self.reset_line.is_none() => return Err(e),
            Err(_e) => {
                warn!("Reset command failed: {:?}", _e);
                self.hard_reset()?;
            }
        }
        self.mode = WorkingMode::Command;
        Ok(())
    }

    /// Hold the reset line active for the module's reset time, then wait
    /// for it to boot.
    pub fn hard_reset(&mut self) -> Result<(), Error> {
        let module = self.module;
        let line = self.reset_line.as_deref_mut().ok_or_else(|| {
            warn!("No reset line configured");
            Error::NotFound
        })?;

        warn!("Hard resetting modem");
        line.pulse_with(module.reset_hold(), module.boot_wait())?;
        self.mode = WorkingMode::Command;
        Ok(())
    }

    /// Switch the modem off with the `power_down` command, falling back to
    /// the power line if the command fails.
    pub fn power_down(&mut self) -> Result<(), Error> {
        match self.invoke(names::POWER_DOWN, Input::None, Output::None) {
            Ok(()) => {}
            Err(e) if self.power_line.is_none() => return Err(e),
            Err(_e) => {
                warn!("Power down command failed: {:?}", _e);
                self.hard_power_off()?;
            }
        }
        self.mode = WorkingMode::Command;
        debug!("Powered down");
        Ok(())
    }

    /// Pull the power line for the module's power-off time, then wait for
    /// the shutdown to complete.
    pub fn hard_power_off(&mut self) -> Result<(), Error> {
        let module = self.module;
        let line = self.power_line.as_deref_mut().ok_or_else(|| {
            warn!("No power line configured");
            Error::NotFound
        })?;

        warn!("Forcing modem off");
        line.pulse_with(module.power_off_pull_time(), module.power_down_wait())
    }

    /// Switch the modem on through the power line, if one is attached, and
    /// run the module's startup sequence.
    pub fn power_up(&mut self) -> Result<(), Error> {
        let module = self.module;
        if let Some(line) = self.power_line.as_deref_mut() {
            debug!("Attempting to power up device");
            line.pulse_with(module.power_on_pull_time(), module.boot_wait())?;
        }
        self.mode = WorkingMode::Command;

        for (i, &(name, input)) in module.startup().iter().enumerate() {
            let mut res = self.invoke(name, input, Output::None);
            if i == 0 && res.is_err() {
                if let Some(wait) = module.sync_retry_wait() {
                    if self.wait(wait) {
                        res = self.invoke(name, input, Output::None);
                    }
                }
            }
            if let Err(e) = res {
                error!("Startup command {} failed: {:?}", name, e);
                return Err(e);
            }
        }

        debug!("Powered up");
        Ok(())
    }

    /// Block for `duration` if a delay is attached.
    fn wait(&mut self, duration: Duration) -> bool {
        match self.delay.as_deref_mut() {
            Some(delay) => {
                debug!("Waiting {} ms", duration.as_millis());
                delay.delay_ms(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX));
                true
            }
            None => false,
        }
    }
}
