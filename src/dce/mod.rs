//! The DCE engine
//!
//! [`Dce`] owns the DTE, the command registry and the configuration, and is
//! the only way commands reach the modem. Everything runs on the caller's
//! thread: a command blocks until its terminal line arrives, its timeout
//! expires, or its retry budget is spent.

mod control;
mod executor;
mod mode;
mod pwr;

pub use mode::WorkingMode;

use embedded_hal::delay::DelayNs;

use crate::command::{default_commands, Input, Output};
use crate::config::DceConfig;
use crate::error::Error;
use crate::gpio::Pulse;
use crate::modules::Module;
use crate::registry::{Frequent, Registry};
use crate::retry::RetryStrategy;
use crate::traits::Dte;

pub struct Dce<'a, D: Dte> {
    dte: D,
    registry: Registry<'a, D>,
    config: DceConfig,
    mode: WorkingMode,
    module: Module,
    /// Set while a [`RetryCommand`](crate::retry::RetryCommand) owns the
    /// retry loop
    single_attempt: bool,
    reset_line: Option<&'a mut dyn Pulse>,
    power_line: Option<&'a mut dyn Pulse>,
    delay: Option<&'a mut dyn DelayNs>,
}

impl<'a, D: Dte + 'a> Dce<'a, D> {
    /// Create a DCE running the default command set.
    pub fn new(dte: D, config: DceConfig) -> Result<Self, Error> {
        Self::with_module(dte, config, Module::default())
    }

    /// Create a DCE running the default command set with the overrides of
    /// `module` applied.
    pub fn with_module(dte: D, config: DceConfig, module: Module) -> Result<Self, Error> {
        let mut registry = Registry::new();
        registry.extend(&default_commands())?;
        module.apply_overrides(&mut registry)?;

        debug!("DCE created for {:?}", module);
        Ok(Self {
            dte,
            registry,
            config,
            mode: WorkingMode::Command,
            module,
            single_attempt: false,
            reset_line: None,
            power_line: None,
            delay: None,
        })
    }

    /// Line used for hard resets when the `reset` command fails.
    pub fn with_reset_line(self, line: &'a mut dyn Pulse) -> Self {
        Self {
            reset_line: Some(line),
            ..self
        }
    }

    /// Line used to switch the module on, and off when `power_down` fails.
    pub fn with_power_line(self, line: &'a mut dyn Pulse) -> Self {
        Self {
            power_line: Some(line),
            ..self
        }
    }

    /// Blocking delay for waits between startup commands.
    pub fn with_delay(self, delay: &'a mut dyn DelayNs) -> Self {
        Self {
            delay: Some(delay),
            ..self
        }
    }

    /// Switch to another module. The default command set is restored
    /// before the module's overrides are applied, so commands registered by
    /// the application under a default name are replaced too.
    pub fn set_module(&mut self, module: Module) -> Result<(), Error> {
        self.registry.extend(&default_commands())?;
        module.apply_overrides(&mut self.registry)?;
        self.module = module;
        Ok(())
    }

    /// Run the command registered under `name`.
    pub fn invoke(&mut self, name: &str, input: Input<'_>, output: Output<'_>) -> Result<(), Error> {
        let cmd = self.registry.resolve(name).ok_or_else(|| {
            warn!("No command registered as {}", name);
            Error::NotFound
        })?;
        cmd.execute(self, input, output)
    }

    pub(crate) fn invoke_frequent(
        &mut self,
        which: Frequent,
        input: Input<'_>,
        output: Output<'_>,
    ) -> Result<(), Error> {
        let cmd = self.registry.frequent(which)?;
        cmd.execute(self, input, output)
    }

    pub fn registry(&self) -> &Registry<'a, D> {
        &self.registry
    }

    /// Register, override or remove commands.
    pub fn registry_mut(&mut self) -> &mut Registry<'a, D> {
        &mut self.registry
    }

    pub fn dte(&self) -> &D {
        &self.dte
    }

    pub fn dte_mut(&mut self) -> &mut D {
        &mut self.dte
    }

    pub fn config(&self) -> &DceConfig {
        &self.config
    }

    pub fn module(&self) -> Module {
        self.module
    }

    pub fn mode(&self) -> WorkingMode {
        self.mode
    }

    pub fn strategy(&self) -> RetryStrategy {
        self.config.strategy
    }

    pub fn set_strategy(&mut self, strategy: RetryStrategy) {
        self.config.strategy = strategy;
    }

    /// Run `f` with the retry strategy temporarily replaced by `strategy`.
    pub fn with_strategy<T>(
        &mut self,
        strategy: RetryStrategy,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = core::mem::replace(&mut self.config.strategy, strategy);
        let res = f(self);
        self.config.strategy = saved;
        res
    }

    /// Run `f` with every command sent exactly once, reporting its raw
    /// outcome instead of going through the retry loop.
    pub(crate) fn single_attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = core::mem::replace(&mut self.single_attempt, true);
        let res = f(self);
        self.single_attempt = saved;
        res
    }

    /// Tear down the engine and hand back the DTE.
    pub fn release(self) -> D {
        self.dte
    }
}
