use crate::selection;
use futures_util::future::join_all;
use omniship_carriers::providers_from_config;
use omniship_core::{
    ConfigurationError, ProviderError, ShippingConfig, ShippingObserver, ShippingProvider,
    ShippingResult, TracingObserver,
};
use omniship_shared::{
    Address, Parcel, ProviderKind, Rate, RateId, Shipment, ShippingOrder, TrackingInfo,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Routes shipping operations to the configured carriers.
///
/// The registry is fixed at construction. A carrier without credentials stays
/// unavailable for the orchestrator's lifetime.
pub struct ShippingOrchestrator {
    providers: BTreeMap<ProviderKind, Arc<dyn ShippingProvider>>,
    observer: Arc<dyn ShippingObserver>,
}

impl ShippingOrchestrator {
    pub fn from_config(config: &ShippingConfig) -> Result<Self, ConfigurationError> {
        let orchestrator = Self::with_providers(providers_from_config(config)?, Arc::new(TracingObserver));

        for kind in ProviderKind::ALL {
            if !orchestrator.is_available(kind) {
                tracing::info!(provider = %kind, "Shipping provider not configured, disabled");
            }
        }
        Ok(orchestrator)
    }

    pub fn with_providers(
        providers: impl IntoIterator<Item = Arc<dyn ShippingProvider>>,
        observer: Arc<dyn ShippingObserver>,
    ) -> Self {
        let providers = providers.into_iter().map(|p| (p.kind(), p)).collect();
        Self { providers, observer }
    }

    /// Registered carriers, in `inpost`, `dpd`, `dhl` order
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Parse a wire key such as `"dpd"` and check that the carrier is registered
    pub fn provider_key(&self, key: &str) -> Result<ProviderKind, ConfigurationError> {
        let kind: ProviderKind = key.parse()?;
        self.provider(kind)?;
        Ok(kind)
    }

    pub fn select_provider(&self, destination: &Address, shipping_method: Option<&str>) -> ProviderKind {
        selection::select_provider(destination, shipping_method)
    }

    fn provider(&self, kind: ProviderKind) -> Result<&Arc<dyn ShippingProvider>, ConfigurationError> {
        self.providers
            .get(&kind)
            .ok_or(ConfigurationError::NotConfigured(kind))
    }

    fn report(&self, error: ProviderError) -> ProviderError {
        self.observer.provider_failed(&error);
        error
    }

    /// Quote every registered carrier concurrently, cheapest first.
    ///
    /// A carrier that fails is reported to the observer and left out; only an
    /// empty registry is an error. Rates a carrier tags with another carrier's
    /// kind are dropped.
    pub async fn get_rates(
        &self,
        origin: &Address,
        destination: &Address,
        parcel: &Parcel,
    ) -> ShippingResult<Vec<Rate>> {
        if self.providers.is_empty() {
            return Err(ConfigurationError::NoProvidersConfigured.into());
        }

        let quotes = join_all(
            self.providers
                .values()
                .map(|provider| provider.calculate_rate(origin, destination, parcel, None)),
        )
        .await;

        let mut rates = Vec::new();
        for (kind, quote) in self.providers.keys().zip(quotes) {
            match quote {
                Ok(found) => {
                    let (own, foreign): (Vec<Rate>, Vec<Rate>) =
                        found.into_iter().partition(|rate| rate.provider == *kind);
                    if !foreign.is_empty() {
                        tracing::warn!(provider = %kind, dropped = foreign.len(), "Dropping rates tagged with another carrier");
                    }
                    self.observer.rates_collected(*kind, own.len());
                    rates.extend(own);
                }
                Err(err) => self.observer.provider_failed(&err),
            }
        }

        rates.sort_by_key(|r| r.price_minor);
        Ok(rates)
    }

    /// Quotes for one checkout option, e.g. `inpost_courier`
    pub async fn get_rates_for_option(
        &self,
        origin: &Address,
        destination: &Address,
        parcel: &Parcel,
        option: &RateId,
    ) -> ShippingResult<Vec<Rate>> {
        let rates = self.get_rates(origin, destination, parcel).await?;
        Ok(option.filter(rates))
    }

    /// Book a shipment with `provider`, or with the carrier selected for the
    /// order's destination. Never falls back to another carrier.
    pub async fn create_shipment(
        &self,
        order: &ShippingOrder,
        shipping_method: &str,
        parcel: &Parcel,
        provider: Option<ProviderKind>,
    ) -> ShippingResult<Shipment> {
        let kind = match provider {
            Some(kind) => kind,
            None => {
                let destination = order.destination().ok_or_else(|| {
                    ConfigurationError::UnresolvedProvider { order_id: order.id.clone() }
                })?;
                self.select_provider(&destination, Some(shipping_method))
            }
        };

        let carrier = self.provider(kind)?;
        tracing::info!(provider = %kind, order_id = %order.id, shipping_method, "Creating shipment");

        carrier
            .create_shipment(order, shipping_method, parcel)
            .await
            .map_err(|err| self.report(err).into())
    }

    pub async fn get_label(&self, shipment_id: &str, provider: ProviderKind) -> ShippingResult<String> {
        self.provider(provider)?
            .generate_label(shipment_id)
            .await
            .map_err(|err| self.report(err).into())
    }

    pub async fn track(&self, tracking_number: &str, provider: ProviderKind) -> ShippingResult<TrackingInfo> {
        self.provider(provider)?
            .track_shipment(tracking_number)
            .await
            .map_err(|err| self.report(err).into())
    }

    /// `Ok(false)` when the carrier refused or could not be reached.
    /// Only an unregistered carrier is an error.
    pub async fn cancel_shipment(&self, shipment_id: &str, provider: ProviderKind) -> ShippingResult<bool> {
        let carrier = self.provider(provider)?;
        match carrier.request_cancellation(shipment_id).await {
            Ok(()) => {
                tracing::info!(%provider, shipment_id, "Shipment cancelled");
                Ok(true)
            }
            Err(err) => {
                self.observer.provider_failed(&err);
                Ok(false)
            }
        }
    }
}
