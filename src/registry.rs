//! Name to command lookup

use heapless::FnvIndexMap;

use crate::command::{names, Command, Entry};
use crate::error::Error;
use crate::traits::Dte;

/// Maximum number of registered commands. Must be a power of two.
pub const MAX_COMMANDS: usize = 32;

/// Commands the DCE runs on its own during mode changes and recovery. They
/// are resolved once per registry update instead of on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Frequent {
    SetDataMode = 0,
    SetCommandMode = 1,
    SetPdpContext = 2,
    HangUp = 3,
    SetEcho = 4,
}

impl Frequent {
    const ALL: [Self; 5] = [
        Self::SetDataMode,
        Self::SetCommandMode,
        Self::SetPdpContext,
        Self::HangUp,
        Self::SetEcho,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::SetDataMode => names::SET_DATA_MODE,
            Self::SetCommandMode => names::SET_COMMAND_MODE,
            Self::SetPdpContext => names::SET_PDP_CONTEXT,
            Self::HangUp => names::HANG_UP,
            Self::SetEcho => names::SET_ECHO,
        }
    }
}

/// Ordered set of named commands.
///
/// Registering an existing name replaces its implementation in place, which
/// is how modem modules override the defaults.
pub struct Registry<'a, D: Dte> {
    commands: FnvIndexMap<&'a str, &'a dyn Command<D>, MAX_COMMANDS>,
    frequent: [Option<&'a dyn Command<D>>; 5],
}

impl<'a, D: Dte> Registry<'a, D> {
    pub fn new() -> Self {
        Self {
            commands: FnvIndexMap::new(),
            frequent: [None; 5],
        }
    }

    /// Register `cmd` under `name`, replacing a previous entry of that name.
    ///
    /// The entry is stored even if the call fails with [`Error::Failed`],
    /// which signals that one of the commands the DCE relies on for mode
    /// changes is now missing.
    pub fn set(&mut self, name: &'a str, cmd: &'a dyn Command<D>) -> Result<(), Error> {
        self.insert(name, cmd)?;
        self.refresh()
    }

    /// Register a whole table, checking the frequent commands once at the end.
    pub fn extend(&mut self, entries: &[Entry<'a, D>]) -> Result<(), Error> {
        for &(name, cmd) in entries {
            self.insert(name, cmd)?;
        }
        self.refresh()
    }

    pub fn resolve(&self, name: &str) -> Option<&'a dyn Command<D>> {
        self.commands.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Unregister `name`, returning its implementation if it was registered.
    /// The remaining entries keep their order.
    pub fn remove(&mut self, name: &str) -> Option<&'a dyn Command<D>> {
        let removed = self.resolve(name)?;

        let mut kept = FnvIndexMap::new();
        for (&other, &cmd) in self.commands.iter() {
            if other != name {
                // Fewer entries than before, cannot be full
                kept.insert(other, cmd).ok();
            }
        }
        self.commands = kept;

        // A missing frequent command surfaces as NotFound when it is used
        self.refresh().ok();
        Some(removed)
    }

    pub fn remove_all(&mut self) {
        self.commands.clear();
        self.frequent = [None; 5];
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.commands.keys().copied()
    }

    pub(crate) fn frequent(&self, which: Frequent) -> Result<&'a dyn Command<D>, Error> {
        self.frequent[which as usize].ok_or(Error::NotFound)
    }

    fn insert(&mut self, name: &'a str, cmd: &'a dyn Command<D>) -> Result<(), Error> {
        self.commands.insert(name, cmd).map_err(|_| {
            error!("Command registry full, cannot add {}", name);
            Error::Overflow
        })?;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), Error> {
        let mut complete = true;
        for which in Frequent::ALL {
            let cmd = self.resolve(which.name());
            complete &= cmd.is_some();
            self.frequent[which as usize] = cmd;
        }

        if complete {
            Ok(())
        } else {
            Err(Error::Failed)
        }
    }
}

impl<'a, D: Dte> Default for Registry<'a, D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{default_commands, general::AT, Input, Output};
    use crate::dce::Dce;
    use crate::test_helpers::ScriptedDte;

    fn defaults() -> Registry<'static, ScriptedDte> {
        let mut registry = Registry::new();
        registry.extend(&default_commands()).unwrap();
        registry
    }

    #[test]
    fn holds_default_table() {
        let registry = defaults();

        assert_eq!(registry.len(), 16);
        assert!(registry.resolve("sync").is_some());
        assert!(registry.resolve("reset").is_some());
        assert!(registry.resolve("get_weather").is_none());
        for which in Frequent::ALL {
            assert!(registry.frequent(which).is_ok());
        }
    }

    #[test]
    fn keeps_registration_order() {
        let registry = defaults();
        let mut names = registry.names();

        assert_eq!(names.next(), Some("sync"));
        assert_eq!(names.last(), Some("reset"));
    }

    struct Tagged(#[allow(dead_code)] u8);

    impl<D: Dte> Command<D> for Tagged {
        fn execute(&self, _: &mut Dce<'_, D>, _: Input<'_>, _: Output<'_>) -> Result<(), Error> {
            Err(Error::Busy)
        }
    }

    static FIRST: Tagged = Tagged(1);
    static SECOND: Tagged = Tagged(2);

    #[test]
    fn override_replaces_in_place() {
        let mut registry = defaults();

        registry.set("power_down", &FIRST).unwrap();
        registry.set("power_down", &SECOND).unwrap();
        registry.set("my_sync", &AT).unwrap();
        assert_eq!(registry.len(), 17);

        let resolved = registry.resolve("power_down").unwrap();
        assert!(core::ptr::addr_eq(resolved, &SECOND));
        assert!(!core::ptr::addr_eq(resolved, &FIRST));
        assert_eq!(registry.names().nth(14), Some("power_down"));
    }

    #[test]
    fn remove_keeps_order() {
        let mut registry = defaults();

        assert!(registry.remove("sync").is_some());
        assert!(registry.remove("get_operator_name").is_some());

        let names: std::vec::Vec<_> = registry.names().collect();
        assert_eq!(names.len(), 14);
        assert_eq!(names[..3], ["get_imei_number", "get_imsi_number", "get_module_name"]);
        assert_eq!(names[3], "set_echo");
        assert_eq!(names.last(), Some(&"reset"));
    }

    #[test]
    fn incomplete_frequent_set_is_reported() {
        let mut registry = Registry::<ScriptedDte>::new();

        // Stored regardless
        assert_eq!(registry.set("sync", &AT), Err(Error::Failed));
        assert!(registry.resolve("sync").is_some());
        assert_eq!(
            registry.frequent(Frequent::SetEcho).err(),
            Some(Error::NotFound)
        );
    }

    #[test]
    fn remove_clears_frequent() {
        let mut registry = defaults();

        assert!(registry.remove("hang_up").is_some());
        assert!(registry.remove("hang_up").is_none());
        assert_eq!(
            registry.frequent(Frequent::HangUp).err(),
            Some(Error::NotFound)
        );
        assert!(registry.frequent(Frequent::SetEcho).is_ok());

        registry.remove_all();
        assert!(registry.is_empty());
        assert!(registry.frequent(Frequent::SetEcho).is_err());
    }

    #[test]
    fn full_registry_overflows() {
        const NAMES: [&str; MAX_COMMANDS + 1] = [
            "c00", "c01", "c02", "c03", "c04", "c05", "c06", "c07", "c08", "c09", "c10", "c11",
            "c12", "c13", "c14", "c15", "c16", "c17", "c18", "c19", "c20", "c21", "c22", "c23",
            "c24", "c25", "c26", "c27", "c28", "c29", "c30", "c31", "c32",
        ];
        let mut registry = Registry::<ScriptedDte>::new();

        for &name in &NAMES[..MAX_COMMANDS] {
            assert_eq!(registry.set(name, &AT), Err(Error::Failed));
        }
        assert_eq!(registry.set(NAMES[MAX_COMMANDS], &AT), Err(Error::Overflow));
        assert_eq!(registry.len(), MAX_COMMANDS);
    }
}
