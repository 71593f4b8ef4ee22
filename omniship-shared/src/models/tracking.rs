use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One timestamped entry in a carrier's delivery timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub location: String,
    pub description: String,
}

impl TrackingEvent {
    /// Identity of an event within one shipment's timeline.
    /// Carriers resend the same events on every poll.
    pub fn dedup_key(&self) -> (DateTime<Utc>, &str) {
        (self.timestamp, self.status.as_str())
    }
}

/// Current tracking state, events ordered oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub tracking_number: String,
    pub status: String,
    pub events: Vec<TrackingEvent>,
}

impl TrackingInfo {
    pub fn new(
        tracking_number: impl Into<String>,
        status: impl Into<String>,
        mut events: Vec<TrackingEvent>,
    ) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self {
            tracking_number: tracking_number.into(),
            status: status.into(),
            events,
        }
    }

    pub fn latest_event(&self) -> Option<&TrackingEvent> {
        self.events.last()
    }

    /// Events not present in `known`, in timeline order
    pub fn new_events_since<'a>(&'a self, known: &[TrackingEvent]) -> Vec<&'a TrackingEvent> {
        let seen: HashSet<(DateTime<Utc>, &str)> = known.iter().map(TrackingEvent::dedup_key).collect();
        self.events
            .iter()
            .filter(|e| !seen.contains(&e.dedup_key()))
            .collect()
    }
}
