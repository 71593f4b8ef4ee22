pub mod dhl;
pub mod dpd;
pub mod inpost;

pub use dhl::DhlProvider;
pub use dpd::DpdProvider;
pub use inpost::{InPostOrganization, InPostProvider};

use omniship_core::{ConfigurationError, ShippingConfig, ShippingProvider};
use std::sync::Arc;

/// Build one provider per credential block present in `config`.
/// Carriers without credentials are skipped.
pub fn providers_from_config(
    config: &ShippingConfig,
) -> Result<Vec<Arc<dyn ShippingProvider>>, ConfigurationError> {
    let timeout = config.request_timeout();
    let mut providers: Vec<Arc<dyn ShippingProvider>> = Vec::new();

    if let Some(credentials) = &config.inpost {
        providers.push(Arc::new(InPostProvider::new(credentials, config.warehouse.clone(), timeout)?));
    }
    if let Some(credentials) = &config.dpd {
        providers.push(Arc::new(DpdProvider::new(credentials, config.warehouse.clone(), timeout)?));
    }
    if let Some(credentials) = &config.dhl {
        providers.push(Arc::new(DhlProvider::new(credentials, config.warehouse.clone(), timeout)?));
    }

    Ok(providers)
}
