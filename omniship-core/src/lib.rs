pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod observer;
pub mod pricing;
pub mod provider;

pub use config::{DhlCredentials, DpdCredentials, InPostCredentials, ShippingConfig, Warehouse};
pub use error::{
    CarrierOperation, ConfigurationError, ProviderError, ProviderErrorKind, ProviderResult,
    ShippingError, ShippingResult,
};
pub use http::{CarrierAuth, CarrierHttp};
pub use observer::{NoopObserver, ShippingObserver, TracingObserver};
pub use pricing::{insurance_fee, weight_surcharge, RateTable, ServiceLevel};
pub use provider::{require_recipient, ShippingProvider};
