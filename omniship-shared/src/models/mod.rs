mod address;
mod order;
mod parcel;
mod provider;
mod rate;
mod shipment;
mod tracking;

pub use address::Address;
pub use order::{Recipient, ShippingOrder};
pub use parcel::{Parcel, ParcelError, ParcelItem};
pub use provider::{ProviderKind, ProviderRole, UnknownProvider};
pub use rate::{Rate, RateId};
pub use shipment::{Shipment, ShipmentStatus, StatusTransitionError};
pub use tracking::{TrackingEvent, TrackingInfo};
