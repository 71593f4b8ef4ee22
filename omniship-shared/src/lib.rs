pub mod models;
pub mod pii;

pub use models::{
    Address, Parcel, ParcelError, ParcelItem, ProviderKind, ProviderRole, Rate, RateId, Recipient,
    Shipment, ShipmentStatus, ShippingOrder, StatusTransitionError, TrackingEvent, TrackingInfo,
    UnknownProvider,
};
pub use pii::Masked;
