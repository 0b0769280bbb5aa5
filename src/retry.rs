//! Retry and recovery between failed command attempts

use core::cell::RefCell;

use crate::command::{Command, Input, Output};
use crate::dce::Dce;
use crate::error::Error;
use crate::traits::Dte;

/// Action taken between two attempts of a failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryStrategy {
    /// Give up on the first failure, whatever the retry budget
    FailFast,
    /// Send the same command again
    Resend,
    /// Send `AT` before resending
    Resync,
    /// Reset the modem before resending
    Reset,
    /// Power the modem down and up again before resending
    PowerCycle,
}

/// Retry budget of a command. A command is attempted until it saw more
/// than `max_timeouts` timeouts or more than `max_errors` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryLimits {
    pub max_timeouts: u8,
    pub max_errors: u8,
}

impl RetryLimits {
    fn exhausted(&self, timeouts: u8, errors: u8) -> bool {
        timeouts > self.max_timeouts || errors > self.max_errors
    }
}

/// Recovery policy, run after every failed attempt that still has budget
/// left. Returning an error aborts the command with that error.
pub trait Recover<D: Dte> {
    fn recover(&mut self, dce: &mut Dce<'_, D>, timeouts: u8, errors: u8) -> Result<(), Error>;
}

impl<D: Dte> Recover<D> for RetryStrategy {
    fn recover(&mut self, dce: &mut Dce<'_, D>, _timeouts: u8, _errors: u8) -> Result<(), Error> {
        let res = match self {
            Self::FailFast => return Err(Error::Failed),
            Self::Resend => return Ok(()),
            Self::Resync => {
                debug!("Resyncing before resend");
                dce.with_strategy(Self::FailFast, |dce| dce.sync())
            }
            Self::Reset => {
                warn!("Resetting modem before resend");
                dce.with_strategy(Self::FailFast, |dce| dce.reset())
            }
            Self::PowerCycle => {
                warn!("Power cycling modem before resend");
                dce.with_strategy(Self::FailFast, |dce| {
                    if let Err(_e) = dce.power_down() {
                        error!("Power down failed: {:?}", _e);
                    }
                    dce.power_up()
                })
            }
        };

        if let Err(_e) = res {
            error!("Recovery action {:?} failed: {:?}", self, _e);
        }
        Ok(())
    }
}

impl<D, F> Recover<D> for F
where
    D: Dte,
    F: FnMut(&mut Dce<'_, D>, u8, u8) -> Result<(), Error>,
{
    fn recover(&mut self, dce: &mut Dce<'_, D>, timeouts: u8, errors: u8) -> Result<(), Error> {
        self(dce, timeouts, errors)
    }
}

/// Run `attempt` until it succeeds or `limits` are exhausted.
///
/// Timeouts and errors are counted separately. Errors other than
/// `Timeout`, `Protocol` and `Failed` end the loop immediately.
pub(crate) fn run_with_retry<D, R, F>(
    dce: &mut Dce<'_, D>,
    limits: RetryLimits,
    recover: &mut R,
    mut attempt: F,
) -> Result<(), Error>
where
    D: Dte,
    R: Recover<D> + ?Sized,
    F: FnMut(&mut Dce<'_, D>) -> Result<(), Error>,
{
    let mut timeouts = 0u8;
    let mut errors = 0u8;

    loop {
        match attempt(dce) {
            Ok(()) => return Ok(()),
            Err(Error::Timeout) => {
                timeouts = timeouts.saturating_add(1);
                warn!("Response timeout ({}/{})", timeouts, limits.max_timeouts);
            }
            Err(e) if e.is_recoverable() => {
                errors = errors.saturating_add(1);
                warn!("Command failed ({}/{}): {:?}", errors, limits.max_errors, e);
            }
            Err(e) => return Err(e),
        }

        if limits.exhausted(timeouts, errors) {
            return Err(Error::Failed);
        }

        recover.recover(dce, timeouts, errors)?;
    }
}

/// A registered command wrapped with its own retry budget and recovery.
///
/// Each attempt sends the wrapped command exactly once, so its timeouts
/// and errors are seen here instead of being absorbed by the DCE's own
/// strategy. Register it under the wrapped command's name to replace it.
pub struct RetryCommand<'a, D: Dte, R> {
    inner: &'a dyn Command<D>,
    recover: RefCell<R>,
    limits: RetryLimits,
}

impl<'a, D: Dte, R: Recover<D>> RetryCommand<'a, D, R> {
    pub fn new(inner: &'a dyn Command<D>, recover: R, limits: RetryLimits) -> Self {
        Self {
            inner,
            recover: RefCell::new(recover),
            limits,
        }
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }
}

impl<'a, D, F> RetryCommand<'a, D, F>
where
    D: Dte,
    F: FnMut(&mut Dce<'_, D>, u8, u8) -> Result<(), Error>,
{
    /// Wrap `inner` with a recovery closure, which receives the timeout and
    /// error counts so far.
    pub fn with_fn(inner: &'a dyn Command<D>, recover: F, limits: RetryLimits) -> Self {
        Self::new(inner, recover, limits)
    }
}

impl<'a, D: Dte, R: Recover<D>> Command<D> for RetryCommand<'a, D, R> {
    fn execute(
        &self,
        dce: &mut Dce<'_, D>,
        input: Input<'_>,
        mut output: Output<'_>,
    ) -> Result<(), Error> {
        // Re-entered from within our own recovery
        let mut recover = self.recover.try_borrow_mut().map_err(|_| Error::Busy)?;
        let inner = self.inner;

        run_with_retry(dce, self.limits, &mut *recover, |dce| {
            dce.single_attempt(|dce| inner.execute(dce, input, output.reborrow()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::general::AT;
    use crate::config::DceConfig;
    use crate::test_helpers::{Reply, ScriptedDte};

    fn dce_with(
        replies: &[Reply],
        strategy: RetryStrategy,
        limits: (u8, u8),
    ) -> Dce<'static, ScriptedDte> {
        let config = DceConfig::new("internet")
            .unwrap()
            .with_strategy(strategy)
            .with_retries(limits.0, limits.1);
        Dce::new(ScriptedDte::new(replies), config).unwrap()
    }

    #[test]
    fn fail_fast_attempts_once() {
        let mut dce = dce_with(
            &[Reply::Timeout, Reply::Lines(&["OK"])],
            RetryStrategy::FailFast,
            (5, 5),
        );

        assert_eq!(dce.sync(), Err(Error::Failed));
        assert_eq!(dce.release().sent().len(), 1);
    }

    #[test]
    fn resend_after_timeout() {
        let mut dce = dce_with(
            &[Reply::Timeout, Reply::Lines(&["OK"])],
            RetryStrategy::Resend,
            (1, 0),
        );

        assert_eq!(dce.sync(), Ok(()));
        assert_eq!(dce.release().sent(), ["AT\r", "AT\r"]);
    }

    #[test]
    fn resend_budget_exhausted() {
        let mut dce = dce_with(
            &[Reply::Timeout, Reply::Timeout, Reply::Lines(&["OK"])],
            RetryStrategy::Resend,
            (1, 0),
        );

        assert_eq!(dce.sync(), Err(Error::Failed));
        assert_eq!(dce.release().sent().len(), 2);
    }

    #[test]
    fn errors_have_their_own_budget() {
        let mut dce = dce_with(
            &[
                Reply::Lines(&["ERROR"]),
                Reply::Timeout,
                Reply::Lines(&["ERROR"]),
                Reply::Lines(&["OK"]),
            ],
            RetryStrategy::Resend,
            (1, 1),
        );

        assert_eq!(dce.sync(), Err(Error::Failed));
        assert_eq!(dce.release().sent().len(), 3);
    }

    #[test]
    fn resync_sends_at_between_attempts() {
        let mut dce = dce_with(
            &[
                Reply::Timeout,
                Reply::Lines(&["OK"]),
                Reply::Lines(&["+CSQ: 20,0", "OK"]),
            ],
            RetryStrategy::Resync,
            (1, 0),
        );

        let csq = dce.get_signal_quality().unwrap();
        assert_eq!(csq.rssi, 20);
        assert_eq!(dce.release().sent(), ["AT+CSQ\r", "AT\r", "AT+CSQ\r"]);
    }

    #[test]
    fn failed_recovery_is_not_fatal() {
        // The resync itself times out, the resend still goes out
        let mut dce = dce_with(
            &[Reply::Timeout, Reply::Timeout, Reply::Lines(&["OK"])],
            RetryStrategy::Resync,
            (2, 0),
        );

        assert_eq!(dce.store_profile(), Ok(()));
        assert_eq!(dce.strategy(), RetryStrategy::Resync);
        assert_eq!(dce.release().sent(), ["AT&W\r", "AT\r", "AT&W\r"]);
    }

    #[test]
    fn reset_before_resend() {
        let mut dce = dce_with(
            &[
                Reply::Timeout,
                Reply::Lines(&["OK", "RDY", "PB DONE"]),
                Reply::Lines(&["OK"]),
            ],
            RetryStrategy::Reset,
            (1, 0),
        );

        assert_eq!(dce.sync(), Ok(()));
        assert_eq!(dce.strategy(), RetryStrategy::Reset);
        assert_eq!(dce.release().sent(), ["AT\r", "AT+CRESET\r", "AT\r"]);
    }

    #[test]
    fn power_cycle_powers_up_after_failed_power_down() {
        // No power line, so the timed out power down cannot fall back
        let mut dce = dce_with(
            &[
                Reply::Timeout,
                Reply::Timeout,
                Reply::Lines(&["OK"]),
                Reply::Lines(&["+CSQ: 12,0", "OK"]),
            ],
            RetryStrategy::PowerCycle,
            (1, 0),
        );

        assert_eq!(dce.get_signal_quality().unwrap().rssi, 12);
        assert_eq!(
            dce.release().sent(),
            ["AT+CSQ\r", "AT+QPOWD=1\r", "AT\r", "AT+CSQ\r"]
        );
    }

    #[test]
    fn hard_errors_are_not_retried() {
        let mut dce = dce_with(
            &[Reply::Io, Reply::Lines(&["OK"])],
            RetryStrategy::Resend,
            (3, 3),
        );

        assert_eq!(dce.sync(), Err(Error::Io));
        assert_eq!(dce.release().sent().len(), 1);
    }

    #[test]
    fn retry_command_counts_raw_outcomes() {
        let mut dce = dce_with(
            &[Reply::Timeout, Reply::Timeout, Reply::Lines(&["OK"])],
            RetryStrategy::PowerCycle,
            (0, 0),
        );

        let mut seen = [(0u8, 0u8); 2];
        let mut calls = 0;
        let cmd = RetryCommand::with_fn(
            &AT,
            |_: &mut Dce<'_, ScriptedDte>, timeouts: u8, errors: u8| -> Result<(), Error> {
                seen[calls] = (timeouts, errors);
                calls += 1;
                Ok(())
            },
            RetryLimits {
                max_timeouts: 2,
                max_errors: 0,
            },
        );

        assert_eq!(cmd.execute(&mut dce, Input::None, Output::None), Ok(()));
        drop(cmd);
        assert_eq!(calls, 2);
        assert_eq!(seen, [(1, 0), (2, 0)]);
        assert_eq!(dce.release().sent().len(), 3);
    }

    #[test]
    fn retry_command_recovery_can_abort() {
        let mut dce = dce_with(
            &[Reply::Lines(&["ERROR"]), Reply::Lines(&["OK"])],
            RetryStrategy::Resend,
            (0, 0),
        );

        let cmd = RetryCommand::with_fn(
            &AT,
            |_: &mut Dce<'_, ScriptedDte>, _: u8, _: u8| -> Result<(), Error> {
                Err(Error::InvalidArgument)
            },
            RetryLimits {
                max_timeouts: 0,
                max_errors: 3,
            },
        );

        assert_eq!(
            cmd.execute(&mut dce, Input::None, Output::None),
            Err(Error::InvalidArgument)
        );
        assert_eq!(dce.release().sent().len(), 1);
    }
}
