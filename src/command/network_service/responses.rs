//! Responses for Network service Commands
use atat::atat_derive::AtatResp;
use heapless::String;

use crate::classifier::MAX_RESPONSE_LEN;

/// 7.2 Signal quality +CSQ
#[derive(Debug, Clone, Default, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    /// Received signal strength indicator, 0..=31, 99 when not known
    #[at_arg(position = 0)]
    pub rssi: u8,
    /// Channel bit error rate, 0..=7, 99 when not known
    #[at_arg(position = 1)]
    pub ber: u8,
}

/// 7.5 Operator selection +COPS
///
/// Only the alphanumeric formats parse this way, a numeric `<oper>` is sent
/// unquoted.
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatorSelection {
    #[at_arg(position = 0)]
    pub mode: u8,
    #[at_arg(position = 1)]
    pub format: Option<u8>,
    #[at_arg(position = 2)]
    pub oper: Option<String<MAX_RESPONSE_LEN>>,
    /// Access technology
    #[at_arg(position = 3)]
    pub act: Option<u8>,
}
