//! AT command engine for cellular modems.
//!
//! The crate sits between a host-side serial transport (the [`Dte`]) and the
//! modem (the DCE). It keeps a registry of named AT commands, sends them with
//! per-command timeouts and line classifiers, retries failed attempts with a
//! configurable recovery strategy, and switches the link between command and
//! PPP data mode.
//!
//! ```ignore
//! let config = DceConfig::new("internet")?.with_retries(2, 1);
//! let mut dce = Dce::with_module(uart, config, Module::from_model_name("SIM7600"))?
//!     .with_power_line(&mut pwrkey);
//!
//! dce.power_up()?;
//! let csq = dce.get_signal_quality()?;
//! dce.set_working_mode(WorkingMode::Data)?;
//! ```
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod classifier;
pub mod command;
pub mod config;
pub mod dce;
pub mod error;
pub mod gpio;
pub mod modules;
pub mod registry;
pub mod retry;
mod traits;

#[cfg(test)]
mod test_helpers;

pub use atat;

pub use config::{DceConfig, FlowControl, NoPin, PdpContext, PdpType};
pub use dce::{Dce, WorkingMode};
pub use error::{DteError, Error};
pub use gpio::{Pulse, PulsePin};
pub use modules::{Module, ModuleParams};
pub use retry::{Recover, RetryCommand, RetryLimits, RetryStrategy};
pub use traits::Dte;
