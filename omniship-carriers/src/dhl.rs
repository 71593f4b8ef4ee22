//! DHL Express: the global courier.
//!
//! Authenticates with a `DHL-API-Key` header; the shipper account number
//! travels in the request body.

use async_trait::async_trait;
use chrono::Utc;
use omniship_core::decode::{event_timestamp, first_present};
use omniship_core::{
    require_recipient, CarrierAuth, CarrierHttp, CarrierOperation, ConfigurationError,
    DhlCredentials, ProviderError, ProviderResult, RateTable, ServiceLevel, ShippingProvider,
    Warehouse,
};
use omniship_shared::{
    Address, Parcel, ProviderKind, Rate, Shipment, ShippingOrder, TrackingEvent, TrackingInfo,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const KIND: ProviderKind = ProviderKind::Dhl;

const LABEL_TEMPLATE: &str = "ECOM26_A4_001";

pub const RATES: RateTable = RateTable::new(
    KIND,
    "PLN",
    &[
        ServiceLevel { method: "standard", base_price_minor: 1999, delivery_days: 3 },
        ServiceLevel { method: "express", base_price_minor: 3499, delivery_days: 1 },
        ServiceLevel { method: "economy", base_price_minor: 2999, delivery_days: 5 },
    ],
);

pub struct DhlProvider {
    http: CarrierHttp,
    account_number: String,
    warehouse: Warehouse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShipmentResponse {
    shipment_tracking_number: Option<String>,
    dispatch_confirmation_number: Option<String>,
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    label_url: Option<String>,
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct TrackingResponse {
    #[serde(default)]
    shipments: Vec<TrackedShipment>,
}

#[derive(Debug, Deserialize)]
struct TrackedShipment {
    status: Option<StatusBlock>,
    #[serde(default)]
    events: Vec<TrackedEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBlock {
    status_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackedEvent {
    timestamp: Option<String>,
    status_code: Option<String>,
    location: Option<EventLocation>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventLocation {
    address: Option<LocationAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationAddress {
    address_locality: Option<String>,
}

/// DHL product code: `P` for express, `N` for everything else
pub fn product_code(shipping_method: &str) -> &'static str {
    if shipping_method == "express" {
        "P"
    } else {
        "N"
    }
}

fn first_document(documents: Vec<Document>) -> Option<String> {
    documents.into_iter().next().and_then(|d| d.content)
}

impl DhlProvider {
    pub fn new(
        credentials: &DhlCredentials,
        warehouse: Warehouse,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        let auth = CarrierAuth::none().with_header("DHL-API-Key", credentials.api_key.expose().as_str());
        Ok(Self {
            http: CarrierHttp::new(KIND, credentials.base_url(), auth, timeout)?,
            account_number: credentials.account_number.clone(),
            warehouse,
        })
    }

    fn shipment_request(
        &self,
        order: &ShippingOrder,
        shipping_method: &str,
        parcel: &Parcel,
    ) -> ProviderResult<Value> {
        let recipient = require_recipient(KIND, order)?;
        let w = &self.warehouse;

        Ok(json!({
            "plannedShippingDateAndTime": Utc::now().to_rfc3339(),
            "pickup": { "isRequested": false },
            "productCode": product_code(shipping_method),
            "accounts": [
                { "typeCode": "shipper", "number": self.account_number }
            ],
            "customerDetails": {
                "shipperDetails": {
                    "postalAddress": {
                        "postalCode": w.postal_code,
                        "cityName": w.city,
                        "countryCode": w.country,
                        "addressLine1": w.address_line(),
                    },
                    "contactInformation": {
                        "email": w.email,
                        "phone": w.phone,
                        "companyName": w.company_name,
                        "fullName": w.contact_name,
                    }
                },
                "receiverDetails": {
                    "postalAddress": {
                        "postalCode": recipient.postal_code,
                        "cityName": recipient.city,
                        "countryCode": recipient.country_code,
                        "addressLine1": recipient.address_1,
                        "addressLine2": recipient.address_2.as_deref().unwrap_or_default(),
                    },
                    "contactInformation": {
                        "email": order.email_str(),
                        "phone": recipient.phone_str(),
                        "fullName": recipient.full_name(),
                    }
                }
            },
            "content": {
                "packages": [
                    {
                        "weight": parcel.weight_kg(),
                        "dimensions": {
                            "length": parcel.length(),
                            "width": parcel.width(),
                            "height": parcel.height(),
                        }
                    }
                ],
                "isCustomsDeclarable": false,
                "description": "E-commerce order",
                "incoterm": "DAP",
            },
            "outputImageProperties": {
                "imageOptions": [
                    { "typeCode": "label", "templateName": LABEL_TEMPLATE }
                ]
            }
        }))
    }
}

#[async_trait]
impl ShippingProvider for DhlProvider {
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
        let request = self.shipment_request(order, shipping_method, parcel)?;
        let response: ShipmentResponse = self
            .http
            .post(CarrierOperation::CreateShipment, &["shipments"], &request)
            .await?;

        // DHL uses the waybill number as both shipment id and tracking number
        let waybill = first_present([
            response.shipment_tracking_number,
            response.dispatch_confirmation_number,
        ])
        .ok_or_else(|| {
            ProviderError::malformed(KIND, CarrierOperation::CreateShipment, "response has no waybill number")
        })?;

        tracing::info!(provider = %KIND, shipment_id = %waybill, order_id = %order.id, "Shipment created");
        Ok(Shipment::booked(
            KIND,
            waybill.clone(),
            waybill,
            first_document(response.documents).unwrap_or_default(),
        ))
    }

    async fn generate_label(&self, shipment_id: &str) -> ProviderResult<String> {
        let response: LabelResponse = self
            .http
            .get(CarrierOperation::GenerateLabel, &["shipments", shipment_id, "label"])
            .await?;
        Ok(first_present([response.label_url, first_document(response.documents)]).unwrap_or_default())
    }

    async fn track_shipment(&self, tracking_number: &str) -> ProviderResult<TrackingInfo> {
        let response: TrackingResponse = self
            .http
            .get_with_query(
                CarrierOperation::Track,
                &["track", "shipments"],
                &[("trackingNumber", tracking_number)],
            )
            .await?;

        let shipment = response.shipments.into_iter().next().ok_or_else(|| {
            ProviderError::malformed(KIND, CarrierOperation::Track, "Shipment not found")
        })?;

        let events = shipment
            .events
            .into_iter()
            .map(|event| {
                Ok(TrackingEvent {
                    timestamp: event_timestamp(KIND, event.timestamp.as_deref())?,
                    status: event.status_code.unwrap_or_default(),
                    location: event
                        .location
                        .and_then(|l| l.address)
                        .and_then(|a| a.address_locality)
                        .unwrap_or_default(),
                    description: event.description.unwrap_or_default(),
                })
            })
            .collect::<ProviderResult<Vec<_>>>()?;

        let status = first_present([shipment.status.and_then(|s| s.status_code)])
            .unwrap_or_else(|| "unknown".to_string());
        Ok(TrackingInfo::new(tracking_number, status, events))
    }

    async fn request_cancellation(&self, shipment_id: &str) -> ProviderResult<()> {
        self.http
            .delete::<Value>(CarrierOperation::Cancel, &["shipments", shipment_id])
            .await?;
        Ok(())
    }
}
