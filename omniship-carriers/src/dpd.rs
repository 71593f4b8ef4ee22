//! DPD: the EU-regional courier.
//!
//! Authenticates with a bearer API key plus a login/password header pair and
//! sends weight in kilograms.

use async_trait::async_trait;
use omniship_core::decode::{event_timestamp, first_present, string_or_number};
use omniship_core::{
    require_recipient, CarrierAuth, CarrierHttp, CarrierOperation, ConfigurationError,
    DpdCredentials, ProviderError, ProviderResult, RateTable, ServiceLevel, ShippingProvider,
    Warehouse,
};
use omniship_shared::{
    Address, Parcel, ProviderKind, Rate, Shipment, ShippingOrder, TrackingEvent, TrackingInfo,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const KIND: ProviderKind = ProviderKind::Dpd;

pub const RATES: RateTable = RateTable::new(
    KIND,
    "USD",
    &[
        ServiceLevel { method: "economy", base_price_minor: 699, delivery_days: 3 },
        ServiceLevel { method: "express", base_price_minor: 1299, delivery_days: 1 },
    ],
);

pub struct DpdProvider {
    http: CarrierHttp,
    warehouse: Warehouse,
}

#[derive(Debug, Serialize)]
struct ShipmentRequest<'a> {
    receiver: Party<'a>,
    parcels: Vec<ParcelSpec>,
    service: &'a str,
    reference: &'a str,
    sender: Party<'a>,
}

#[derive(Debug, Serialize)]
struct Party<'a> {
    name: String,
    phone: &'a str,
    email: &'a str,
    address: PartyAddress<'a>,
}

#[derive(Debug, Serialize)]
struct PartyAddress<'a> {
    street: String,
    city: &'a str,
    postal_code: &'a str,
    country: &'a str,
}

#[derive(Debug, Serialize)]
struct ParcelSpec {
    /// kilograms
    weight: f64,
    length: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct ShipmentResponse {
    #[serde(default, deserialize_with = "string_or_number")]
    shipment_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    tracking_number: Option<String>,
    parcel_number: Option<String>,
    label_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    label_url: Option<String>,
    pdf_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackingResponse {
    status: Option<String>,
    #[serde(default)]
    events: Vec<TrackingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackingEntry {
    timestamp: Option<String>,
    status: Option<String>,
    location: Option<String>,
    description: Option<String>,
}

impl DpdProvider {
    pub fn new(
        credentials: &DpdCredentials,
        warehouse: Warehouse,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        let auth = CarrierAuth::bearer(credentials.api_key.expose().as_str())
            .with_header("X-DPD-Login", credentials.login.as_str())
            .with_header("X-DPD-Password", credentials.password.expose().as_str());

        Ok(Self {
            http: CarrierHttp::new(KIND, credentials.base_url(), auth, timeout)?,
            warehouse,
        })
    }

    fn sender(&self) -> Party<'_> {
        let w = &self.warehouse;
        Party {
            name: w.company_name.clone(),
            phone: &w.phone,
            email: &w.email,
            address: PartyAddress {
                street: w.address_line(),
                city: &w.city,
                postal_code: &w.postal_code,
                country: &w.country,
            },
        }
    }
}

#[async_trait]
impl ShippingProvider for DpdProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn calculate_rate(
        &self,
        _origin: &Address,
        _destination: &Address,
        parcel: &Parcel,
        service_type: Option<&str>,
    ) -> ProviderResult<Vec<Rate>> {
        Ok(RATES.quote(parcel, service_type))
    }

    async fn create_shipment(
        &self,
        order: &ShippingOrder,
        shipping_method: &str,
        parcel: &Parcel,
    ) -> ProviderResult<Shipment> {
        let recipient = require_recipient(KIND, order)?;

        let request = ShipmentRequest {
            receiver: Party {
                name: recipient.full_name(),
                phone: recipient.phone_str(),
                email: order.email_str(),
                address: PartyAddress {
                    street: recipient.address_1.clone(),
                    city: &recipient.city,
                    postal_code: &recipient.postal_code,
                    country: &recipient.country_code,
                },
            },
            parcels: vec![ParcelSpec {
                weight: parcel.weight_kg(),
                length: parcel.length(),
                width: parcel.width(),
                height: parcel.height(),
            }],
            service: shipping_method,
            reference: &order.id,
            sender: self.sender(),
        };

        let response: ShipmentResponse = self
            .http
            .post(CarrierOperation::CreateShipment, &["shipments"], &request)
            .await?;

        let shipment_id = first_present([response.shipment_id, response.id]).ok_or_else(|| {
            ProviderError::malformed(KIND, CarrierOperation::CreateShipment, "response has no shipment id")
        })?;
        let tracking_number = first_present([response.tracking_number, response.parcel_number])
            .ok_or_else(|| {
                ProviderError::malformed(KIND, CarrierOperation::CreateShipment, "response has no parcel number")
            })?;

        tracing::info!(provider = %KIND, %shipment_id, order_id = %order.id, "Shipment created");
        Ok(Shipment::booked(
            KIND,
            shipment_id,
            tracking_number,
            response.label_url.unwrap_or_default(),
        ))
    }

    async fn generate_label(&self, shipment_id: &str) -> ProviderResult<String> {
        let response: LabelResponse = self
            .http
            .get(CarrierOperation::GenerateLabel, &["shipments", shipment_id, "label"])
            .await?;
        Ok(first_present([response.label_url, response.pdf_url]).unwrap_or_default())
    }

    async fn track_shipment(&self, tracking_number: &str) -> ProviderResult<TrackingInfo> {
        let response: TrackingResponse = self
            .http
            .get(CarrierOperation::Track, &["tracking", tracking_number])
            .await?;

        let events = response
            .events
            .into_iter()
            .map(|entry| {
                Ok(TrackingEvent {
                    timestamp: event_timestamp(KIND, entry.timestamp.as_deref())?,
                    status: entry.status.unwrap_or_default(),
                    location: entry.location.unwrap_or_default(),
                    description: entry.description.unwrap_or_default(),
                })
            })
            .collect::<ProviderResult<Vec<_>>>()?;

        Ok(TrackingInfo::new(
            tracking_number,
            first_present([response.status]).unwrap_or_else(|| "unknown".to_string()),
            events,
        ))
    }

    async fn request_cancellation(&self, shipment_id: &str) -> ProviderResult<()> {
        self.http
            .post::<_, serde_json::Value>(
                CarrierOperation::Cancel,
                &["shipments", shipment_id, "cancel"],
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }
}
