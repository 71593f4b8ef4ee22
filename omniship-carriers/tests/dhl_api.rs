mod common;

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use common::{header, small_parcel, spawn_stub, Captured};
use omniship_carriers::DhlProvider;
use omniship_core::{DhlCredentials, ProviderErrorKind, ShippingProvider, Warehouse};
use omniship_shared::{Masked, ProviderKind, Recipient, ShippingOrder};
use serde_json::{json, Value};
use std::collections::HashMap;

fn provider(base_url: String) -> DhlProvider {
    let credentials = DhlCredentials {
        api_key: "dhl-key".into(),
        account_number: "987654321".to_string(),
        base_url: Some(base_url),
    };
    DhlProvider::new(&credentials, Warehouse::default(), None).unwrap()
}

fn new_york_order() -> ShippingOrder {
    ShippingOrder::new(
        "order_01JE0",
        Some(Recipient {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: Some(Masked::from("+12125550100")),
            address_1: "350 5th Ave".to_string(),
            address_2: Some("Suite 100".to_string()),
            city: "New York".to_string(),
            postal_code: "10118".to_string(),
            country_code: "US".to_string(),
            province: Some("NY".to_string()),
        }),
    )
    .with_email("john@example.com")
}

fn dhl_stub(captured: Captured) -> Router {
    Router::new()
        .route(
            "/shipments",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().unwrap().push(json!({
                        "api_key": header(&headers, "dhl-api-key"),
                        "authorization": header(&headers, "authorization"),
                        "body": body,
                    }));
                    Json(json!({
                        "shipmentTrackingNumber": "1234567890",
                        "documents": [ { "typeCode": "label", "content": "JVBERi0xLjQK" } ]
                    }))
                }
            }),
        )
        .route(
            "/track/shipments",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let number = params.get("trackingNumber").cloned().unwrap_or_default();
                if number != "1234567890" {
                    return Json(json!({ "shipments": [] }));
                }
                Json(json!({
                    "shipments": [{
                        "id": number,
                        "status": { "statusCode": "transit" },
                        "events": [
                            {
                                "timestamp": "2024-12-04T06:10:00",
                                "statusCode": "transit",
                                "location": { "address": { "addressLocality": "Leipzig - Germany" } },
                                "description": "Processed at LEIPZIG - GERMANY"
                            },
                            {
                                "timestamp": "2024-12-03T18:00:00",
                                "statusCode": "pre-transit",
                                "description": "Shipment picked up"
                            }
                        ]
                    }]
                }))
            }),
        )
        .route(
            "/shipments/{id}/label",
            get(|| async { Json(json!({ "documents": [ { "content": "JVBERi0xLjQK" } ] })) }),
        )
        .route(
            "/shipments/{id}",
            delete(|Path(id): Path<String>| async move {
                if id == "1234567890" {
                    StatusCode::OK
                } else {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            }),
        )
}

#[tokio::test]
async fn test_booking_uses_api_key_header_and_waybill() {
    let captured = Captured::default();
    let base = spawn_stub(dhl_stub(captured.clone())).await;

    let shipment = provider(base)
        .create_shipment(&new_york_order(), "standard", &small_parcel())
        .await
        .unwrap();

    assert_eq!(shipment.provider, ProviderKind::Dhl);
    assert_eq!(shipment.shipment_id, "1234567890");
    assert_eq!(shipment.tracking_number, "1234567890");
    assert_eq!(shipment.label, "JVBERi0xLjQK");

    let requests = captured.lock().unwrap();
    let sent = &requests[0];
    assert_eq!(sent["api_key"], "dhl-key");
    assert_eq!(sent["authorization"], "");

    let body = &sent["body"];
    assert_eq!(body["productCode"], "N");
    let receiver = &body["customerDetails"]["receiverDetails"];
    assert_eq!(receiver["postalAddress"]["addressLine2"], "Suite 100");
    assert_eq!(receiver["contactInformation"]["email"], "john@example.com");
    assert_eq!(receiver["contactInformation"]["phone"], "+12125550100");
}

#[tokio::test]
async fn test_tracking_round_trip() {
    let base = spawn_stub(dhl_stub(Captured::default())).await;
    let dhl = provider(base);

    let shipment = dhl
        .create_shipment(&new_york_order(), "express", &small_parcel())
        .await
        .unwrap();
    let info = dhl.track_shipment(&shipment.tracking_number).await.unwrap();

    assert_eq!(info.tracking_number, shipment.tracking_number);
    assert_eq!(info.status, "transit");
    assert_eq!(info.events[0].status, "pre-transit");
    assert_eq!(info.events[0].location, "");
    assert_eq!(info.events[1].location, "Leipzig - Germany");
}

#[tokio::test]
async fn test_unknown_waybill_is_malformed() {
    let base = spawn_stub(dhl_stub(Captured::default())).await;
    let err = provider(base).track_shipment("0000000000").await.unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::Malformed(ref reason) if reason == "Shipment not found"));
}

#[tokio::test]
async fn test_label_from_documents() {
    let base = spawn_stub(dhl_stub(Captured::default())).await;
    assert_eq!(provider(base).generate_label("1234567890").await.unwrap(), "JVBERi0xLjQK");
}

#[tokio::test]
async fn test_cancel() {
    let base = spawn_stub(dhl_stub(Captured::default())).await;
    let dhl = provider(base);

    assert!(dhl.cancel_shipment("1234567890").await);
    assert!(!dhl.cancel_shipment("1111111111").await);
}

#[tokio::test]
async fn test_cancel_does_not_strip_query_from_waybill() {
    let base = spawn_stub(dhl_stub(Captured::default())).await;
    assert!(!provider(base).cancel_shipment("1234567890?force=1").await);
}
