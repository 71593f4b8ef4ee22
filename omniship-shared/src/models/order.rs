use crate::models::Address;
use crate::pii::Masked;
use serde::{Deserialize, Serialize};

/// The slice of a customer order that fulfillment needs to book a parcel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingOrder {
    pub id: String,
    #[serde(default)]
    pub email: Option<Masked<String>>,
    #[serde(default)]
    pub shipping_address: Option<Recipient>,
}

/// Delivery recipient as captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<Masked<String>>,
    pub address_1: String,
    #[serde(default)]
    pub address_2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
    #[serde(default)]
    pub province: Option<String>,
}

impl ShippingOrder {
    pub fn new(id: impl Into<String>, shipping_address: Option<Recipient>) -> Self {
        Self {
            id: id.into(),
            email: None,
            shipping_address,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(Masked::new(email.into()));
        self
    }

    pub fn email_str(&self) -> &str {
        self.email.as_ref().map(|e| e.expose().as_str()).unwrap_or_default()
    }

    /// Destination address, if the order carries one
    pub fn destination(&self) -> Option<Address> {
        self.shipping_address.as_ref().map(Recipient::address)
    }
}

impl Recipient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn phone_str(&self) -> &str {
        self.phone.as_ref().map(|p| p.expose().as_str()).unwrap_or_default()
    }

    pub fn address(&self) -> Address {
        Address {
            street: self.address_1.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country_code.clone(),
            state: self.province.clone(),
        }
    }
}
