//! Responses for Mobile equipment control and status Commands
use atat::atat_derive::AtatResp;

/// 8.4 Battery charge +CBC
#[derive(Debug, Clone, Default, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    /// Battery charge status, -1 when the modem does not report it
    #[at_arg(position = 0)]
    pub bcs: i8,
    /// Battery charge level in percent, -1 when the modem does not report it
    #[at_arg(position = 1)]
    pub bcl: i8,
    /// Supply voltage in mV
    #[at_arg(position = 2)]
    pub voltage: u32,
}
