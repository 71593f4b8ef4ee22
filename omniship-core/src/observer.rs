use crate::error::ProviderError;
use omniship_shared::ProviderKind;

/// Hooks the orchestrator calls when fanning out to carriers.
///
/// Injected at construction so callers choose where per-carrier failures go.
pub trait ShippingObserver: Send + Sync {
    /// A carrier call failed and was either dropped (quotes, cancellation) or propagated
    fn provider_failed(&self, error: &ProviderError);

    /// A carrier answered a quote request
    fn rates_collected(&self, _provider: ProviderKind, _count: usize) {}
}

/// Default observer: structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ShippingObserver for TracingObserver {
    fn provider_failed(&self, error: &ProviderError) {
        tracing::warn!(
            provider = %error.provider,
            operation = %error.operation,
            status = error.status(),
            "{}",
            error
        );
    }

    fn rates_collected(&self, provider: ProviderKind, count: usize) {
        tracing::debug!(%provider, count, "Collected shipping rates");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ShippingObserver for NoopObserver {
    fn provider_failed(&self, _error: &ProviderError) {}
}
