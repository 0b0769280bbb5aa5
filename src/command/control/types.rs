//! Argument and parameter types used by V24 control and V25ter Commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Echo {
    Disable = 0,
    Enable = 1,
}

impl From<bool> for Echo {
    fn from(on: bool) -> Self {
        if on {
            Self::Enable
        } else {
            Self::Disable
        }
    }
}
