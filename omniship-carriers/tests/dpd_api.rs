mod common;

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use common::{berlin_order, header, small_parcel, spawn_stub, Captured};
use omniship_carriers::DpdProvider;
use omniship_core::{CarrierOperation, DpdCredentials, ShippingProvider, Warehouse};
use omniship_shared::{Parcel, ProviderKind};
use serde_json::{json, Value};

fn provider(base_url: String) -> DpdProvider {
    let credentials = DpdCredentials {
        api_key: "dpd-key".into(),
        login: "omex".to_string(),
        password: "dpd-pass".into(),
        base_url: Some(base_url),
    };
    DpdProvider::new(&credentials, Warehouse::default(), None).unwrap()
}

fn dpd_stub(captured: Captured) -> Router {
    let cancels = captured.clone();
    Router::new()
        .route(
            "/shipments",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().unwrap().push(json!({
                        "authorization": header(&headers, "authorization"),
                        "login": header(&headers, "x-dpd-login"),
                        "password": header(&headers, "x-dpd-password"),
                        "body": body,
                    }));
                    Json(json!({ "id": "DPD-778", "parcel_number": "13572468" }))
                }
            }),
        )
        .route(
            "/shipments/{id}/label",
            get(|| async { Json(json!({ "pdf_url": "https://dpd.example/label.pdf" })) }),
        )
        .route(
            "/shipments/{id}/cancel",
            post(move |Path(id): Path<String>| {
                let cancels = cancels.clone();
                async move {
                    cancels.lock().unwrap().push(json!({ "cancelled": id }));
                    if id == "DPD-778" {
                        StatusCode::OK
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }
            }),
        )
        .route(
            "/tracking/{number}",
            get(|| async {
                Json(json!({
                    "status": "in_transit",
                    "events": [
                        { "timestamp": "2024-12-02T07:00:00Z", "status": "picked_up", "location": "Warszawa", "description": "Parcel picked up" },
                        { "timestamp": "2024-12-02T21:40:00Z", "status": "in_transit", "location": "Poznań" }
                    ]
                }))
            }),
        )
}

#[tokio::test]
async fn test_booking_sends_login_headers_and_kilograms() {
    let captured = Captured::default();
    let base = spawn_stub(dpd_stub(captured.clone())).await;
    let parcel = Parcel::new(40.0, 30.0, 15.0, 2750).unwrap();

    let shipment = provider(base)
        .create_shipment(&berlin_order(), "express", &parcel)
        .await
        .unwrap();

    assert_eq!(shipment.provider, ProviderKind::Dpd);
    assert_eq!(shipment.shipment_id, "DPD-778");
    assert_eq!(shipment.tracking_number, "13572468");
    assert_eq!(shipment.label, "");

    let requests = captured.lock().unwrap();
    let sent = &requests[0];
    assert_eq!(sent["authorization"], "Bearer dpd-key");
    assert_eq!(sent["login"], "omex");
    assert_eq!(sent["password"], "dpd-pass");

    let body = &sent["body"];
    assert_eq!(body["parcels"][0]["weight"], 2.75);
    assert_eq!(body["parcels"][0]["length"], 40.0);
    assert_eq!(body["receiver"]["address"]["street"], "Unter den Linden 5");
    assert_eq!(body["receiver"]["address"]["country"], "DE");
    assert_eq!(body["receiver"]["phone"], "");
    assert_eq!(body["sender"]["address"]["street"], "Warehouse Street 1");
    assert_eq!(body["service"], "express");
}

#[tokio::test]
async fn test_label_uses_pdf_url() {
    let base = spawn_stub(dpd_stub(Captured::default())).await;
    let label = provider(base).generate_label("DPD-778").await.unwrap();
    assert_eq!(label, "https://dpd.example/label.pdf");
}

#[tokio::test]
async fn test_tracking_normalizes_events() {
    let base = spawn_stub(dpd_stub(Captured::default())).await;
    let info = provider(base).track_shipment("13572468").await.unwrap();

    assert_eq!(info.tracking_number, "13572468");
    assert_eq!(info.status, "in_transit");
    assert_eq!(info.events[0].description, "Parcel picked up");
    assert_eq!(info.events[1].location, "Poznań");
    assert_eq!(info.events[1].description, "");
    assert!(info.events[0].timestamp < info.events[1].timestamp);
}

#[tokio::test]
async fn test_cancel_posts_to_cancel_endpoint() {
    let captured = Captured::default();
    let base = spawn_stub(dpd_stub(captured.clone())).await;
    let dpd = provider(base);

    assert!(dpd.cancel_shipment("DPD-778").await);
    assert!(!dpd.cancel_shipment("DPD-999").await);

    let err = dpd.request_cancellation("DPD-999").await.unwrap_err();
    assert_eq!(err.operation, CarrierOperation::Cancel);
    assert_eq!(err.status(), Some(500));

    assert_eq!(captured.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_quotes_ignore_carrier_availability() {
    // Flat-table quoting never calls the carrier
    let dpd = provider(common::dead_endpoint().await);
    let order = berlin_order();
    let destination = order.destination().unwrap();

    let rates = dpd
        .calculate_rate(&destination, &destination, &small_parcel(), None)
        .await
        .unwrap();
    assert_eq!(rates.len(), 2);
}

#[tokio::test]
async fn test_ids_with_reserved_characters_reach_their_own_shipment() {
    let captured = Captured::default();
    let base = spawn_stub(dpd_stub(captured.clone())).await;
    let dpd = provider(base);

    assert!(!dpd.cancel_shipment("DPD-778?force=1").await);
    assert!(!dpd.cancel_shipment("DPD-778/../DPD-778").await);

    let requests = captured.lock().unwrap();
    assert_eq!(requests[0]["cancelled"], "DPD-778?force=1");
    assert_eq!(requests[1]["cancelled"], "DPD-778/../DPD-778");
}
