//! InPost ShipX: the home-country courier (parcel lockers and courier).

use async_trait::async_trait;
use omniship_core::decode::{event_timestamp, first_present, string_or_number};
use omniship_core::{
    require_recipient, CarrierAuth, CarrierHttp, CarrierOperation, ConfigurationError,
    InPostCredentials, ProviderError, ProviderResult, RateTable, ServiceLevel, ShippingProvider,
    Warehouse,
};
use omniship_shared::{
    Address, Parcel, ProviderKind, Rate, Shipment, ShippingOrder, TrackingEvent, TrackingInfo,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const KIND: ProviderKind = ProviderKind::InPost;

pub const RATES: RateTable = RateTable::new(
    KIND,
    "PLN",
    &[
        ServiceLevel { method: "paczkomat_24_7", base_price_minor: 1399, delivery_days: 2 },
        ServiceLevel { method: "courier", base_price_minor: 1899, delivery_days: 1 },
        ServiceLevel { method: "parcel_locker", base_price_minor: 1299, delivery_days: 3 },
    ],
);

pub struct InPostProvider {
    http: CarrierHttp,
    org_id: String,
    warehouse: Warehouse,
}

/// An organization (sender account) on the ShipX platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InPostOrganization {
    pub id: String,
    pub name: String,
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
    email: &'a str,
    phone: &'a str,
    address: PartyAddress<'a>,
}

/// ShipX wants street name and building number as separate fields
#[derive(Debug, Serialize)]
struct PartyAddress<'a> {
    street: &'a str,
    building_number: &'a str,
    city: &'a str,
    post_code: &'a str,
    country_code: &'a str,
}

#[derive(Debug, Serialize)]
struct ParcelSpec {
    dimensions: Dimensions,
    weight: Weight,
}

#[derive(Debug, Serialize)]
struct Dimensions {
    length: String,
    width: String,
    height: String,
    unit: &'static str,
}

#[derive(Debug, Serialize)]
struct Weight {
    amount: String,
    unit: &'static str,
}

#[derive(Debug, Deserialize)]
struct ShipmentResponse {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    tracking_number: Option<String>,
    label_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    label_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackingResponse {
    status: Option<String>,
    #[serde(default)]
    tracking_details: Vec<TrackingDetail>,
}

#[derive(Debug, Deserialize)]
struct TrackingDetail {
    datetime: Option<String>,
    status: Option<String>,
    location: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganizationsResponse {
    #[serde(default)]
    items: Vec<OrganizationItem>,
}

#[derive(Debug, Deserialize)]
struct OrganizationItem {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default)]
    name: String,
}

impl InPostProvider {
    pub fn new(
        credentials: &InPostCredentials,
        warehouse: Warehouse,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        let auth = CarrierAuth::bearer(credentials.api_key.expose().as_str());
        Ok(Self {
            http: CarrierHttp::new(KIND, credentials.base_url(), auth, timeout)?,
            org_id: credentials.org_id.clone(),
            warehouse,
        })
    }

    /// Organizations visible to the API token. Best effort: empty on any failure.
    pub async fn organizations(&self) -> Vec<InPostOrganization> {
        match self
            .http
            .get::<OrganizationsResponse>(CarrierOperation::ListOrganizations, &["organizations"])
            .await
        {
            Ok(response) => response
                .items
                .into_iter()
                .filter_map(|item| {
                    item.id.map(|id| InPostOrganization { id, name: item.name })
                })
                .collect(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch InPost organizations");
                Vec::new()
            }
        }
    }

    fn sender(&self) -> Party<'_> {
        let w = &self.warehouse;
        Party {
            name: w.company_name.clone(),
            email: &w.email,
            phone: &w.phone,
            address: PartyAddress {
                street: &w.street,
                building_number: &w.building_number,
                city: &w.city,
                post_code: &w.postal_code,
                country_code: &w.country,
            },
        }
    }
}

fn parcel_spec(parcel: &Parcel) -> ParcelSpec {
    ParcelSpec {
        dimensions: Dimensions {
            length: parcel.length().to_string(),
            width: parcel.width().to_string(),
            height: parcel.height().to_string(),
            unit: "cm",
        },
        weight: Weight {
            amount: parcel.weight_kg().to_string(),
            unit: "kg",
        },
    }
}

#[async_trait]
impl ShippingProvider for InPostProvider {
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
        let country_code = if recipient.country_code.is_empty() {
            "PL"
        } else {
            recipient.country_code.as_str()
        };

        let request = ShipmentRequest {
            receiver: Party {
                name: recipient.full_name(),
                email: order.email_str(),
                phone: recipient.phone_str(),
                address: PartyAddress {
                    street: &recipient.address_1,
                    building_number: recipient
                        .address_2
                        .as_deref()
                        .filter(|b| !b.is_empty())
                        .unwrap_or("1"),
                    city: &recipient.city,
                    post_code: &recipient.postal_code,
                    country_code,
                },
            },
            parcels: vec![parcel_spec(parcel)],
            service: shipping_method,
            reference: &order.id,
            sender: self.sender(),
        };

        let path = ["organizations", self.org_id.as_str(), "shipments"];
        let response: ShipmentResponse = self
            .http
            .post(CarrierOperation::CreateShipment, &path, &request)
            .await?;

        let shipment_id = response.id.ok_or_else(|| {
            ProviderError::malformed(KIND, CarrierOperation::CreateShipment, "response has no shipment id")
        })?;
        let tracking_number = first_present([response.tracking_number]).ok_or_else(|| {
            ProviderError::malformed(KIND, CarrierOperation::CreateShipment, "response has no tracking number")
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
        Ok(first_present([response.label_url, response.url]).unwrap_or_default())
    }

    async fn track_shipment(&self, tracking_number: &str) -> ProviderResult<TrackingInfo> {
        let response: TrackingResponse = self
            .http
            .get(CarrierOperation::Track, &["tracking", tracking_number])
            .await?;

        let events = response
            .tracking_details
            .into_iter()
            .map(|detail| {
                Ok(TrackingEvent {
                    timestamp: event_timestamp(KIND, detail.datetime.as_deref())?,
                    status: detail.status.unwrap_or_default(),
                    location: detail.location.unwrap_or_default(),
                    description: detail.description.unwrap_or_default(),
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
            .delete::<serde_json::Value>(CarrierOperation::Cancel, &["shipments", shipment_id])
            .await?;
        Ok(())
    }
}
