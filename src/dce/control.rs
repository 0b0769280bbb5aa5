use super::{Dce, WorkingMode};
use crate::classifier::ResponseText;
use crate::command::mobile_control::responses::BatteryStatus;
use crate::command::network_service::responses::SignalQuality;
use crate::command::{names, Input, Output};
use crate::config::{FlowControl, PdpContext};
use crate::error::Error;
use crate::registry::Frequent;
use crate::traits::Dte;

impl<'a, D: Dte + 'a> Dce<'a, D> {
    /// Check that the modem responds to `AT`.
    pub fn sync(&mut self) -> Result<(), Error> {
        self.invoke(names::SYNC, Input::None, Output::None)
    }

    pub fn set_echo(&mut self, on: bool) -> Result<(), Error> {
        self.invoke_frequent(Frequent::SetEcho, Input::Echo(on), Output::None)
    }

    /// Store the current settings as the power-on profile.
    pub fn store_profile(&mut self) -> Result<(), Error> {
        self.invoke(names::STORE_PROFILE, Input::None, Output::None)
    }

    pub fn set_flow_control(&mut self, flow_control: FlowControl) -> Result<(), Error> {
        self.invoke(
            names::SET_FLOW_CTRL,
            Input::FlowControl(flow_control),
            Output::None,
        )
    }

    pub fn hang_up(&mut self) -> Result<(), Error> {
        self.invoke_frequent(Frequent::HangUp, Input::None, Output::None)
    }

    pub fn get_imei(&mut self) -> Result<ResponseText, Error> {
        self.get_text(names::GET_IMEI_NUMBER)
    }

    pub fn get_imsi(&mut self) -> Result<ResponseText, Error> {
        self.get_text(names::GET_IMSI_NUMBER)
    }

    pub fn get_module_name(&mut self) -> Result<ResponseText, Error> {
        self.get_text(names::GET_MODULE_NAME)
    }

    pub fn get_operator_name(&mut self) -> Result<ResponseText, Error> {
        self.get_text(names::GET_OPERATOR_NAME)
    }

    pub fn get_signal_quality(&mut self) -> Result<SignalQuality, Error> {
        let mut csq = SignalQuality::default();
        self.invoke(
            names::GET_SIGNAL_QUALITY,
            Input::None,
            Output::SignalQuality(&mut csq),
        )?;
        Ok(csq)
    }

    pub fn get_battery_status(&mut self) -> Result<BatteryStatus, Error> {
        let mut cbc = BatteryStatus::default();
        self.invoke(
            names::GET_BATTERY_STATUS,
            Input::None,
            Output::BatteryStatus(&mut cbc),
        )?;
        Ok(cbc)
    }

    /// Replace the APN used the next time data mode is entered.
    pub fn set_apn(&mut self, apn: &str) -> Result<(), Error> {
        self.config.pdp_context.set_apn(apn)
    }

    pub fn pdp_context(&self) -> &PdpContext {
        &self.config.pdp_context
    }

    /// Write raw bytes to the modem. Only valid in data mode.
    pub fn send_data(&mut self, data: &[u8]) -> Result<usize, Error> {
        if self.mode != WorkingMode::Data {
            return Err(Error::InvalidArgument);
        }
        Ok(self.dte.send_data(data)?)
    }

    fn get_text(&mut self, name: &str) -> Result<ResponseText, Error> {
        let mut buf = ResponseText::new();
        self.invoke(name, Input::None, Output::Text(&mut buf))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use super::*;
    use crate::config::DceConfig;
    use crate::modules::Module;
    use crate::retry::RetryStrategy;
    use crate::test_helpers::{Reply, ScriptedDte};

    fn dce(dte: ScriptedDte) -> Dce<'static, ScriptedDte> {
        let config = DceConfig::new("internet")
            .unwrap()
            .with_strategy(RetryStrategy::FailFast);
        Dce::new(dte, config).unwrap()
    }

    #[test]
    fn unknown_command_has_no_side_effect() {
        let mut dce = dce(ScriptedDte::new(&[]));

        assert_eq!(
            dce.invoke("get_weather", Input::None, Output::None),
            Err(Error::NotFound)
        );
        let dte = dce.release();
        assert!(dte.sent().is_empty());
        assert_eq!(dte.done(), 0);
    }

    #[test]
    fn wrong_payload_is_rejected() {
        let mut dce = dce(ScriptedDte::new(&[]));

        assert_eq!(
            dce.invoke("get_imei_number", Input::None, Output::None),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            dce.invoke("set_echo", Input::None, Output::None),
            Err(Error::InvalidArgument)
        );
        assert!(dce.release().sent().is_empty());
    }

    #[test]
    fn identification() {
        let mut dce = dce(ScriptedDte::new(&[
            Reply::Lines(&["861536030196001\r\n", "\r\n", "OK\r\n"]),
            Reply::Lines(&["240011234567890", "OK"]),
            Reply::Lines(&["BG96", "OK"]),
        ]));

        assert_eq!(dce.get_imei().unwrap().as_str(), "861536030196001");
        assert_eq!(dce.get_imsi().unwrap().as_str(), "240011234567890");
        assert_eq!(dce.get_module_name().unwrap().as_str(), "BG96");
        assert_eq!(
            dce.release().sent(),
            ["AT+CGSN\r", "AT+CIMI\r", "AT+CGMM\r"]
        );
    }

    #[test]
    fn operator_name() {
        let mut dce = dce(ScriptedDte::new(&[Reply::Lines(&[
            "+COPS: 0,0,\"NTT DOCOMO\",7",
            "OK",
        ])]));

        assert_eq!(dce.get_operator_name().unwrap().as_str(), "NTT DOCOMO");
        assert_eq!(dce.release().timeouts(), [Duration::from_secs(75)]);
    }

    #[test]
    fn signal_quality() {
        let mut dce = dce(ScriptedDte::new(&[Reply::Lines(&["+CSQ: 15,2", "OK"])]));

        assert_eq!(
            dce.get_signal_quality(),
            Ok(SignalQuality { rssi: 15, ber: 2 })
        );
    }

    #[test]
    fn battery_status() {
        let mut dce = dce(ScriptedDte::new(&[Reply::Lines(&["+CBC: 1,60,3950", "OK"])]));

        assert_eq!(
            dce.get_battery_status(),
            Ok(BatteryStatus {
                bcs: 1,
                bcl: 60,
                voltage: 3950
            })
        );
    }

    #[test]
    fn configuration_commands() {
        let dte = ScriptedDte::new(&[
            Reply::Lines(&["OK"]),
            Reply::Lines(&["OK"]),
            Reply::Lines(&["OK"]),
            Reply::Lines(&["OK"]),
            Reply::Lines(&["OK"]),
        ])
        .with_flow_control(FlowControl::Hardware);
        let mut dce = dce(dte);

        dce.set_echo(true).unwrap();
        dce.set_echo(false).unwrap();
        dce.set_flow_control(FlowControl::Software).unwrap();
        dce.store_profile().unwrap();
        dce.hang_up().unwrap();

        let dte = dce.release();
        assert_eq!(
            dte.sent(),
            ["ATE1\r", "ATE0\r", "AT+IFC=2,1\r", "AT&W\r", "ATH\r"]
        );
        assert_eq!(dte.timeouts()[4], Duration::from_secs(90));
    }

    #[test]
    fn apn_update() {
        let mut dce = dce(ScriptedDte::new(&[]));

        dce.set_apn("iot.example").unwrap();
        assert_eq!(dce.pdp_context().apn.as_str(), "iot.example");
        assert_eq!(dce.set_apn("bad\"apn"), Err(Error::InvalidArgument));
        assert_eq!(dce.pdp_context().apn.as_str(), "iot.example");
    }

    #[test]
    fn data_only_in_data_mode() {
        let mut dce = dce(ScriptedDte::new(&[]));

        assert_eq!(dce.send_data(b"~\xff"), Err(Error::InvalidArgument));
        assert!(dce.release().data().is_empty());
    }

    #[cfg(any(feature = "any-module", feature = "sim7600"))]
    #[test]
    fn vendor_overrides_resolve_by_name() {
        let config = DceConfig::new("internet")
            .unwrap()
            .with_strategy(RetryStrategy::FailFast);
        let dte = ScriptedDte::new(&[
            Reply::Lines(&["OK"]),
            Reply::Lines(&["OK"]),
            Reply::Lines(&["+CBC: 3.9V", "OK"]),
        ]);
        let mut dce = Dce::with_module(dte, config, Module::from_model_name("SIM7600")).unwrap();

        assert_eq!(dce.registry().len(), 16);
        dce.sync().unwrap();
        dce.invoke("power_down", Input::None, Output::None).unwrap();
        assert_eq!(dce.get_battery_status().unwrap().voltage, 3900);

        let dte = dce.release();
        assert_eq!(dte.sent(), ["AT\r", "AT+CPOF\r", "AT+CBC\r"]);
        assert_eq!(dte.timeouts()[2], Duration::from_secs(20));
    }
}
