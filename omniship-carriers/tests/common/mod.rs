#![allow(dead_code)]

use axum::http::HeaderMap;
use axum::Router;
use omniship_shared::{Masked, Parcel, Recipient, ShippingOrder};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Requests seen by a stub carrier, one JSON object per request holding
/// whichever ids, headers and body fields that stub records
pub type Captured = Arc<Mutex<Vec<Value>>>;

pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Address of a port nothing listens on
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn krakow_order() -> ShippingOrder {
    ShippingOrder::new(
        "order_01JDX",
        Some(Recipient {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            phone: Some(Masked::from("+48600100200")),
            address_1: "Floriańska".to_string(),
            address_2: Some("15".to_string()),
            city: "Kraków".to_string(),
            postal_code: "31-019".to_string(),
            country_code: "PL".to_string(),
            province: None,
        }),
    )
    .with_email("jan@example.com")
}

pub fn berlin_order() -> ShippingOrder {
    ShippingOrder::new(
        "order_01JDY",
        Some(Recipient {
            first_name: "Anna".to_string(),
            last_name: "Schmidt".to_string(),
            phone: None,
            address_1: "Unter den Linden 5".to_string(),
            address_2: None,
            city: "Berlin".to_string(),
            postal_code: "10117".to_string(),
            country_code: "DE".to_string(),
            province: None,
        }),
    )
}

pub fn small_parcel() -> Parcel {
    Parcel::new(30.0, 20.0, 10.0, 1000).unwrap()
}
