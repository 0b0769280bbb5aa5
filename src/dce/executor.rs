use atat::AtatCmd;
use embassy_time::Duration;

use super::Dce;
use crate::classifier::{LineHandler, Verdict};
use crate::command::{encode, MAX_COMMAND_LEN};
use crate::error::Error;
use crate::retry::run_with_retry;
use crate::traits::Dte;

impl<'a, D: Dte + 'a> Dce<'a, D> {
    /// Send `command` and classify every received line with `handler` until
    /// it reports a terminal verdict.
    ///
    /// Failed attempts are retried according to the configured limits and
    /// recovery strategy. Once the budget is spent the command fails with
    /// [`Error::Failed`], whether it timed out or errored.
    pub fn generic_command<C>(
        &mut self,
        command: &str,
        timeout: Duration,
        handler: LineHandler<C>,
        ctx: &mut C,
    ) -> Result<(), Error> {
        if self.single_attempt {
            return self.attempt(command, timeout, handler, ctx);
        }

        let limits = self.config.limits;
        let mut strategy = self.config.strategy;
        run_with_retry(self, limits, &mut strategy, |dce| {
            dce.attempt(command, timeout, handler, ctx)
        })
    }

    /// Serialize `cmd` and run it through [`Self::generic_command`].
    pub fn send_at<A: AtatCmd, C>(
        &mut self,
        cmd: &A,
        timeout: Duration,
        handler: LineHandler<C>,
        ctx: &mut C,
    ) -> Result<(), Error> {
        let mut buf = [0; MAX_COMMAND_LEN];
        let command = encode(cmd, &mut buf)?;
        self.generic_command(command, timeout, handler, ctx)
    }

    /// One send/classify cycle.
    fn attempt<C>(
        &mut self,
        command: &str,
        timeout: Duration,
        handler: LineHandler<C>,
        ctx: &mut C,
    ) -> Result<(), Error> {
        debug!("Sending command: {:?}", command.trim_end());

        let mut state = Verdict::Continue;
        let res = self
            .dte
            .send_command(command, timeout, &mut |line: &str| -> Verdict {
                let verdict = handler(line, ctx);
                if verdict.is_terminal() {
                    state = verdict;
                }
                verdict
            });
        self.dte.command_done();

        if let Err(e) = res {
            return Err(e.into());
        }

        match state {
            Verdict::Success => {
                debug!("Command {:?} succeeded", command.trim_end());
                Ok(())
            }
            Verdict::Fail => Err(Error::Protocol),
            // The DTE gave up without a terminal line
            Verdict::Continue | Verdict::Captured => Err(Error::Protocol),
        }
    }
}
