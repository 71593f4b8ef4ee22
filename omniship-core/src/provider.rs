use crate::error::{CarrierOperation, ProviderError, ProviderResult};
use async_trait::async_trait;
use omniship_shared::{
    Address, Parcel, ProviderKind, Rate, Recipient, Shipment, ShippingOrder, TrackingInfo,
};

/// The contract every carrier integration implements.
///
/// Carrier quirks (auth scheme, field names, units) stay behind this trait so
/// the orchestrator can treat all carriers the same way.
#[async_trait]
pub trait ShippingProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Quote every method the carrier offers, or only `service_type`.
    ///
    /// Origin and destination are accepted for zone pricing; current carriers
    /// price from a flat table.
    async fn calculate_rate(
        &self,
        origin: &Address,
        destination: &Address,
        parcel: &Parcel,
        service_type: Option<&str>,
    ) -> ProviderResult<Vec<Rate>>;

    /// Book a parcel from the warehouse to the order's shipping address
    async fn create_shipment(
        &self,
        order: &ShippingOrder,
        shipping_method: &str,
        parcel: &Parcel,
    ) -> ProviderResult<Shipment>;

    /// Label URL or carrier handle for a booked shipment
    async fn generate_label(&self, shipment_id: &str) -> ProviderResult<String>;

    async fn track_shipment(&self, tracking_number: &str) -> ProviderResult<TrackingInfo>;

    /// Ask the carrier to cancel; errors are reported, not swallowed
    async fn request_cancellation(&self, shipment_id: &str) -> ProviderResult<()>;

    /// Best-effort cancellation: `true` only when the carrier confirmed it
    async fn cancel_shipment(&self, shipment_id: &str) -> bool {
        match self.request_cancellation(shipment_id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(provider = %self.kind(), shipment_id, error = %err, "Shipment cancellation failed");
                false
            }
        }
    }
}

/// The order's recipient, or an `InvalidRequest` for orders without a shipping address
pub fn require_recipient(
    provider: ProviderKind,
    order: &ShippingOrder,
) -> Result<&Recipient, ProviderError> {
    order.shipping_address.as_ref().ok_or_else(|| {
        ProviderError::invalid_request(
            provider,
            CarrierOperation::CreateShipment,
            format!("Order {} missing shipping address", order.id),
        )
    })
}
