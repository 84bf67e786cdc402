use core::fmt::Write;

use embassy_net::Stack;
use embassy_time::{Duration, WithTimeout};
use esp_radio::wifi::{AuthMethod, ClientConfig, ModeConfig, ScanConfig, WifiController, WifiError};
use log::{debug, info, warn};
use wordclock_core::network::{
    AddressText, ConnectError, MAX_NETWORKS, NetworkCandidate, NetworkList, NetworkProvider,
    SecurityClass,
};

const SCAN_TIMEOUT_MS: u64 = 10_000;

/// Station-mode radio plus the DHCP stack that rides on it.
pub struct StationRadio<'d> {
    controller: WifiController<'d>,
    stack: Stack<'d>,
}

impl<'d> StationRadio<'d> {
    pub fn new(controller: WifiController<'d>, stack: Stack<'d>) -> Self {
        Self { controller, stack }
    }

    async fn ensure_started(&mut self) -> Result<(), WifiError> {
        if !self.controller.is_started().unwrap_or(false) {
            self.controller.start_async().await?;
            info!("wifi: radio started");
        }
        Ok(())
    }

    async fn join(
        &mut self,
        ssid: &str,
        password: &str,
        security: SecurityClass,
    ) -> Result<(), WifiError> {
        if matches!(self.controller.is_connected(), Ok(true)) {
            let _ = self.controller.disconnect_async().await;
        }

        let auth_method = auth_method(security, password);
        let client = ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into())
            .with_auth_method(auth_method);
        self.controller.set_config(&ModeConfig::Client(client))?;
        self.ensure_started().await?;
        self.controller.connect_async().await?;

        self.stack.wait_config_up().await;
        Ok(())
    }
}

impl NetworkProvider for StationRadio<'_> {
    type Error = WifiError;

    async fn scan(&mut self, results: &mut NetworkList) -> Result<(), Self::Error> {
        results.clear();
        if !self.controller.is_started().unwrap_or(false) {
            self.controller
                .set_config(&ModeConfig::Client(ClientConfig::default()))?;
        }
        self.ensure_started().await?;

        let config = ScanConfig::default().with_max(MAX_NETWORKS);
        let found = match self
            .controller
            .scan_with_config_async(config)
            .with_timeout(Duration::from_millis(SCAN_TIMEOUT_MS))
            .await
        {
            Ok(found) => found?,
            Err(_) => {
                warn!("wifi: scan timeout={}ms", SCAN_TIMEOUT_MS);
                return Ok(());
            }
        };

        for ap in found.iter() {
            debug!(
                "wifi: scan ap ssid={} rssi={} auth={:?}",
                ap.ssid, ap.signal_strength, ap.auth_method
            );
            if ap.ssid.is_empty() || results.iter().any(|known| known.ssid == ap.ssid.as_str()) {
                continue;
            }
            results.insert(NetworkCandidate::new(
                ap.ssid.as_str(),
                ap.signal_strength,
                security_class(ap.auth_method),
            ));
        }
        Ok(())
    }

    async fn connect(
        &mut self,
        ssid: &str,
        password: &str,
        security: SecurityClass,
        timeout_ms: u32,
    ) -> Result<(), ConnectError> {
        match self
            .join(ssid, password, security)
            .with_timeout(Duration::from_millis(timeout_ms as u64))
            .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                warn!("wifi: join rejected ssid={} err={:?}", ssid, err);
                let _ = self.controller.disconnect_async().await;
                Err(ConnectError::Rejected)
            }
            Err(_) => {
                warn!("wifi: join timeout ssid={} after {}ms", ssid, timeout_ms);
                let _ = self.controller.disconnect_async().await;
                Err(ConnectError::Timeout)
            }
        }
    }

    fn local_address(&self) -> AddressText {
        let mut text = AddressText::new();
        match self.stack.config_v4() {
            Some(config) => {
                let _ = write!(text, "{}", config.address.address());
            }
            None => {
                let _ = text.push_str("0.0.0.0");
            }
        }
        text
    }
}

/// Auth method to request for a network seen as `security` during the scan.
fn auth_method(security: SecurityClass, password: &str) -> AuthMethod {
    match security {
        SecurityClass::Open => AuthMethod::None,
        SecurityClass::Wep => AuthMethod::Wep,
        SecurityClass::Wpa => AuthMethod::Wpa,
        SecurityClass::Wpa2 => AuthMethod::Wpa2Personal,
        SecurityClass::WpaWpa2 => AuthMethod::WpaWpa2Personal,
        SecurityClass::Wpa2Enterprise => AuthMethod::Wpa2Enterprise,
        SecurityClass::Wpa3 => AuthMethod::Wpa3Personal,
        SecurityClass::Wpa2Wpa3 => AuthMethod::Wpa2Wpa3Personal,
        SecurityClass::Unknown if password.is_empty() => AuthMethod::None,
        SecurityClass::Unknown => AuthMethod::WpaWpa2Personal,
    }
}

fn security_class(auth_method: Option<AuthMethod>) -> SecurityClass {
    match auth_method {
        Some(AuthMethod::None) => SecurityClass::Open,
        Some(AuthMethod::Wep) => SecurityClass::Wep,
        Some(AuthMethod::Wpa) => SecurityClass::Wpa,
        Some(AuthMethod::Wpa2Personal) => SecurityClass::Wpa2,
        Some(AuthMethod::WpaWpa2Personal) => SecurityClass::WpaWpa2,
        Some(AuthMethod::Wpa2Enterprise) => SecurityClass::Wpa2Enterprise,
        Some(AuthMethod::Wpa3Personal) => SecurityClass::Wpa3,
        Some(AuthMethod::Wpa2Wpa3Personal) => SecurityClass::Wpa2Wpa3,
        _ => SecurityClass::Unknown,
    }
}
