/// Failure reported by the DTE while a command cycle was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DteError {
    /// No terminal line arrived within the command timeout
    Timeout,
    /// The transport failed, or was closed underneath the command
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    // Setup and lookup errors, never retried
    InvalidArgument,
    NotFound,

    // Recovered locally by the executor while retry budget remains
    Timeout,
    Protocol,

    /// A registry entry or a serialized command did not fit its fixed capacity
    Overflow,
    Io,

    /// Retry budget exhausted, or a fail-fast strategy aborted the command
    Failed,

    Busy,
    IoPin,
}

impl Error {
    /// Errors which the retry loop is allowed to absorb.
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Protocol | Self::Failed)
    }
}

impl From<DteError> for Error {
    fn from(e: DteError) -> Self {
        match e {
            DteError::Timeout => Self::Timeout,
            DteError::Io => Self::Io,
        }
    }
}
