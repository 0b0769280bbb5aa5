use atat::atat_derive::AtatEnum;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin};
use heapless::String;

use crate::error::Error;
use crate::retry::{RetryLimits, RetryStrategy};

/// Maximum length of an access point name, 3GPP TS 23.003
pub const MAX_APN_LEN: usize = 100;

/// Placeholder for boards that leave a control line unconnected.
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Flow control of the serial link, as numbered by `AT+IFC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    #[default]
    None = 0,
    /// XON/XOFF
    Software = 1,
    /// RTS/CTS
    Hardware = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdpType {
    #[default]
    Ip,
    Ipv6,
    Ipv4v6,
    Ppp,
}

impl PdpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Ipv6 => "IPV6",
            Self::Ipv4v6 => "IPV4V6",
            Self::Ppp => "PPP",
        }
    }
}

/// Packet data session descriptor bound by `AT+CGDCONT` before dialing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdpContext {
    pub cid: u8,
    pub pdp_type: PdpType,
    pub apn: String<MAX_APN_LEN>,
}

impl PdpContext {
    pub fn new(cid: u8, pdp_type: PdpType, apn: &str) -> Result<Self, Error> {
        Ok(Self {
            cid,
            pdp_type,
            apn: apn_from_str(apn)?,
        })
    }

    pub fn set_apn(&mut self, apn: &str) -> Result<(), Error> {
        self.apn = apn_from_str(apn)?;
        Ok(())
    }
}

fn apn_from_str(apn: &str) -> Result<String<MAX_APN_LEN>, Error> {
    // Serialized as a quoted AT argument, which has no escape for quotes
    if apn.contains('"') {
        return Err(Error::InvalidArgument);
    }
    String::try_from(apn).map_err(|_| Error::InvalidArgument)
}

#[derive(Debug, Clone)]
pub struct DceConfig {
    pub(crate) pdp_context: PdpContext,
    pub(crate) limits: RetryLimits,
    pub(crate) strategy: RetryStrategy,
}

impl DceConfig {
    /// Defaults to one resend after a timeout, none after an error, and a
    /// power cycle as recovery action.
    pub fn new(apn: &str) -> Result<Self, Error> {
        Ok(DceConfig {
            pdp_context: PdpContext::new(1, PdpType::Ip, apn)?,
            limits: RetryLimits {
                max_timeouts: 1,
                max_errors: 0,
            },
            strategy: RetryStrategy::PowerCycle,
        })
    }

    pub fn with_retries(self, max_timeouts: u8, max_errors: u8) -> Self {
        DceConfig {
            limits: RetryLimits {
                max_timeouts,
                max_errors,
            },
            ..self
        }
    }

    pub fn with_strategy(self, strategy: RetryStrategy) -> Self {
        DceConfig { strategy, ..self }
    }

    pub fn with_pdp_context(self, pdp_context: PdpContext) -> Self {
        DceConfig {
            pdp_context,
            ..self
        }
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }

    pub fn strategy(&self) -> RetryStrategy {
        self.strategy
    }

    pub fn pdp_context(&self) -> &PdpContext {
        &self.pdp_context
    }
}
