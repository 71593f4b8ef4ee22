use crate::models::ProviderKind;
use serde::{Deserialize, Serialize};

/// Shipment status lifecycle.
///
/// Advances `Pending -> InTransit -> Delivered`, or terminates at
/// `Cancelled` / `Failed`. Only a carrier report moves it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
    Failed,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
            ShipmentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ShipmentStatus::Delivered | ShipmentStatus::Cancelled | ShipmentStatus::Failed
        )
    }

    fn progress(&self) -> u8 {
        match self {
            ShipmentStatus::Pending => 0,
            ShipmentStatus::InTransit => 1,
            ShipmentStatus::Delivered => 2,
            ShipmentStatus::Cancelled | ShipmentStatus::Failed => u8::MAX,
        }
    }

    /// Whether a persisted shipment in `self` may move to `next`.
    /// Re-applying the current status is allowed so repeated polls are harmless.
    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            ShipmentStatus::Cancelled | ShipmentStatus::Failed => true,
            _ => next.progress() > self.progress(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid shipment status transition from {from:?} to {to:?}")]
pub struct StatusTransitionError {
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
}

/// Carrier-side booking record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub shipment_id: String,
    pub tracking_number: String,
    /// Label URL or an opaque carrier handle; may be empty until generated
    pub label: String,
    pub provider: ProviderKind,
    pub status: ShipmentStatus,
}

impl Shipment {
    /// A freshly booked shipment, always `Pending`
    pub fn booked(
        provider: ProviderKind,
        shipment_id: impl Into<String>,
        tracking_number: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            tracking_number: tracking_number.into(),
            label: label.into(),
            provider,
            status: ShipmentStatus::Pending,
        }
    }

    /// Apply a carrier-reported status; used by the fulfillment workflow that owns the record
    pub fn advance(&mut self, next: ShipmentStatus) -> Result<(), StatusTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(StatusTransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
