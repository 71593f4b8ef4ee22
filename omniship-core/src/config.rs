use crate::error::ConfigurationError;
use omniship_shared::Masked;
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const INPOST_DEFAULT_BASE_URL: &str = "https://api-shipx-pl.easypack24.net/v1";
pub const DPD_DEFAULT_BASE_URL: &str = "https://www.dpd.com.pl/api";
pub const DHL_DEFAULT_BASE_URL: &str = "https://api.dhl.com/v1";

/// Per-carrier credentials plus the sender warehouse.
///
/// A carrier is enabled only when its block is present. There is no
/// credential rotation: the config is read once when the orchestrator is built.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ShippingConfig {
    #[serde(default)]
    pub inpost: Option<InPostCredentials>,
    #[serde(default)]
    pub dpd: Option<DpdCredentials>,
    #[serde(default)]
    pub dhl: Option<DhlCredentials>,
    #[serde(default)]
    pub warehouse: Warehouse,
    /// Transport-level timeout for carrier HTTP calls
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InPostCredentials {
    pub api_key: Masked<String>,
    #[serde(default)]
    pub api_secret: Masked<String>,
    pub org_id: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DpdCredentials {
    pub api_key: Masked<String>,
    pub login: String,
    pub password: Masked<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DhlCredentials {
    pub api_key: Masked<String>,
    pub account_number: String,
    pub base_url: Option<String>,
}

/// The fixed sender used on every shipment
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Warehouse {
    pub company_name: String,
    pub contact_name: String,
    pub street: String,
    pub building_number: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

impl Default for Warehouse {
    fn default() -> Self {
        Self {
            company_name: "OMEX B2B".to_string(),
            contact_name: "OMEX Shipping".to_string(),
            street: "Warehouse Street".to_string(),
            building_number: "1".to_string(),
            city: "Warsaw".to_string(),
            postal_code: "00-001".to_string(),
            country: "PL".to_string(),
            phone: "+48123456789".to_string(),
            email: "shipping@omex.com".to_string(),
        }
    }
}

impl Warehouse {
    /// Street and building number on one line
    pub fn address_line(&self) -> String {
        format!("{} {}", self.street, self.building_number)
    }
}

impl InPostCredentials {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(INPOST_DEFAULT_BASE_URL)
    }
}

impl DpdCredentials {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DPD_DEFAULT_BASE_URL)
    }
}

impl DhlCredentials {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DHL_DEFAULT_BASE_URL)
    }
}

impl ShippingConfig {
    pub fn load() -> Result<Self, ConfigurationError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/shipping").required(false))
            .add_source(config::File::with_name(&format!("config/shipping.{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/shipping.local").required(false))
            // Eg. `OMNISHIP__DPD__LOGIN=omex` sets `dpd.login`
            .add_source(config::Environment::with_prefix("OMNISHIP").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigurationError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
