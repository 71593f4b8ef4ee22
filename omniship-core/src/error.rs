use omniship_shared::{ProviderKind, UnknownProvider};
use std::fmt;

/// The carrier call a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierOperation {
    Quote,
    CreateShipment,
    GenerateLabel,
    Track,
    Cancel,
    ListOrganizations,
}

impl fmt::Display for CarrierOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CarrierOperation::Quote => "quote rates",
            CarrierOperation::CreateShipment => "create shipment",
            CarrierOperation::GenerateLabel => "generate label",
            CarrierOperation::Track => "track shipment",
            CarrierOperation::Cancel => "cancel shipment",
            CarrierOperation::ListOrganizations => "list organizations",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderErrorKind {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A failure raised by one carrier integration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to {operation} with {}: {kind}", .provider.display_name())]
pub struct ProviderError {
    pub provider: ProviderKind,
    pub operation: CarrierOperation,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: ProviderKind, operation: CarrierOperation, kind: ProviderErrorKind) -> Self {
        Self { provider, operation, kind }
    }

    pub fn malformed(provider: ProviderKind, operation: CarrierOperation, reason: impl Into<String>) -> Self {
        Self::new(provider, operation, ProviderErrorKind::Malformed(reason.into()))
    }

    pub fn invalid_request(provider: ProviderKind, operation: CarrierOperation, reason: impl Into<String>) -> Self {
        Self::new(provider, operation, ProviderErrorKind::InvalidRequest(reason.into()))
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// HTTP status of the failed call; 0 when the carrier was never reached
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ProviderErrorKind::Http { status, .. } => Some(*status),
            ProviderErrorKind::Transport(_) => Some(0),
            _ => None,
        }
    }

    /// Raw response body for HTTP rejections
    pub fn body(&self) -> Option<&str> {
        match &self.kind {
            ProviderErrorKind::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Shipping provider {0} not configured")]
    NotConfigured(ProviderKind),

    #[error("No shipping providers configured; unable to calculate shipping rates")]
    NoProvidersConfigured,

    #[error("Unable to determine shipping provider for order {order_id}")]
    UnresolvedProvider { order_id: String },

    #[error(transparent)]
    UnknownProvider(#[from] UnknownProvider),

    #[error("Invalid base URL for {provider}: {url}")]
    InvalidBaseUrl { provider: ProviderKind, url: String },

    #[error("Failed to build HTTP client for {provider}: {reason}")]
    HttpClient { provider: ProviderKind, reason: String },

    #[error("Failed to load shipping configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ShippingError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
pub type ShippingResult<T> = Result<T, ShippingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message_names_carrier() {
        let err = ProviderError::new(
            ProviderKind::Dpd,
            CarrierOperation::CreateShipment,
            ProviderErrorKind::Http { status: 422, body: "{\"error\":\"bad postcode\"}".to_string() },
        );
        assert_eq!(
            err.to_string(),
            "Failed to create shipment with DPD: HTTP 422: {\"error\":\"bad postcode\"}"
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.body(), Some("{\"error\":\"bad postcode\"}"));
    }

    #[test]
    fn test_transport_failure_reports_status_zero() {
        let err = ProviderError::new(
            ProviderKind::Dhl,
            CarrierOperation::Track,
            ProviderErrorKind::Transport("connection refused".to_string()),
        );
        assert_eq!(err.status(), Some(0));
        assert_eq!(err.provider(), ProviderKind::Dhl);

        let malformed = ProviderError::malformed(ProviderKind::Dhl, CarrierOperation::Track, "no shipments");
        assert_eq!(malformed.status(), None);
    }

    #[test]
    fn test_shipping_error_wraps_both_kinds() {
        let err: ShippingError = ConfigurationError::NotConfigured(ProviderKind::InPost).into();
        assert_eq!(err.to_string(), "Shipping provider inpost not configured");
        assert!(matches!(err, ShippingError::Configuration(_)));
    }
}
