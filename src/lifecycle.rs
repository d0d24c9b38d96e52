//! Shipment lifecycle model.
//!
//! Pure derivations over a shipment's status and its tracking-update
//! history: position in the canonical delivery sequence, the progress
//! fraction shown on the tracking page, the current location, and the
//! per-step timeline classification. Nothing in this module performs I/O;
//! callers pass in the shipment status and the update history explicitly.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Shipment status enumeration.
///
/// Six statuses form the canonical delivery sequence; `Delayed` and
/// `FailedDelivery` are exception states that sit outside it and never map
/// to a sequence position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "picked_up")]
    PickedUp,
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "held_by_customs")]
    HeldByCustoms,
    #[sea_orm(string_value = "out_for_delivery")]
    OutForDelivery,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "delayed")]
    Delayed,
    #[sea_orm(string_value = "failed_delivery")]
    FailedDelivery,
}

/// The canonical six-step delivery sequence, in order.
pub const SEQUENCE: [ShipmentStatus; 6] = [
    ShipmentStatus::Pending,
    ShipmentStatus::PickedUp,
    ShipmentStatus::InTransit,
    ShipmentStatus::HeldByCustoms,
    ShipmentStatus::OutForDelivery,
    ShipmentStatus::Delivered,
];

impl ShipmentStatus {
    /// Zero-based position in the canonical sequence, or `None` for the
    /// exception states.
    pub fn sequence_index(self) -> Option<usize> {
        SEQUENCE.iter().position(|s| *s == self)
    }

    /// Whether this status is an exception state rather than a sequence step.
    pub fn is_exception(self) -> bool {
        matches!(self, Self::Delayed | Self::FailedDelivery)
    }

    /// Wire/database representation (`snake_case`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PickedUp => "picked_up",
            Self::InTransit => "in_transit",
            Self::HeldByCustoms => "held_by_customs",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Delayed => "delayed",
            Self::FailedDelivery => "failed_delivery",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::PickedUp => "Picked Up",
            Self::InTransit => "In Transit",
            Self::HeldByCustoms => "Held by Customs",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Delayed => "Delayed",
            Self::FailedDelivery => "Failed Delivery",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized shipment status '{0}'")]
pub struct ParseShipmentStatusError(pub String);

impl FromStr for ShipmentStatus {
    type Err = ParseShipmentStatusError;

    /// Parses the case-sensitive `snake_case` wire form. Anything outside
    /// the nine recognized values is rejected here rather than carried
    /// through as an untyped string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "picked_up" => Ok(Self::PickedUp),
            "in_transit" => Ok(Self::InTransit),
            "held_by_customs" => Ok(Self::HeldByCustoms),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "delayed" => Ok(Self::Delayed),
            "failed_delivery" => Ok(Self::FailedDelivery),
            other => Err(ParseShipmentStatusError(other.to_string())),
        }
    }
}

/// Classification of one canonical step relative to the shipment's
/// position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

/// Classifies `step` against `current`, both of which must be in-sequence
/// statuses. Returns `None` when either side is an exception state; for
/// exception-state shipments use [`Timeline::derive`], which anchors the
/// classification at the last known sequence position.
pub fn step_classification(
    step: ShipmentStatus,
    current: ShipmentStatus,
) -> Option<StepState> {
    let step_idx = step.sequence_index()?;
    let current_idx = current.sequence_index()?;
    Some(match step_idx.cmp(&current_idx) {
        std::cmp::Ordering::Less => StepState::Completed,
        std::cmp::Ordering::Equal => StepState::Active,
        std::cmp::Ordering::Greater => StepState::Pending,
    })
}

/// Minimal view of a tracking update used by the lifecycle derivations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrackingEvent {
    pub status: ShipmentStatus,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Location of the most recent update by timestamp, or `None` when no
/// updates exist. Accepts the history in any order.
pub fn current_location(events: &[TrackingEvent]) -> Option<&str> {
    events
        .iter()
        .max_by_key(|e| e.timestamp)
        .map(|e| e.location.as_str())
}

/// The in-sequence status the progress display anchors on.
///
/// For an in-sequence `current` this is `current` itself. For an exception
/// state the bar freezes at the most recent sequence-bearing status in the
/// history; with no such update the shipment has not advanced past
/// `Pending`.
pub fn progress_anchor(current: ShipmentStatus, events: &[TrackingEvent]) -> ShipmentStatus {
    if !current.is_exception() {
        return current;
    }
    let mut sorted: Vec<&TrackingEvent> = events.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
    sorted
        .into_iter()
        .map(|e| e.status)
        .find(|s| !s.is_exception())
        .unwrap_or(ShipmentStatus::Pending)
}

/// Progress fraction in `[0, 1]` for the tracking page's progress bar:
/// `(sequence_index + 1) / 6` of the anchor status.
pub fn progress_fraction(current: ShipmentStatus, events: &[TrackingEvent]) -> f64 {
    let anchor = progress_anchor(current, events);
    // The anchor is always in-sequence by construction.
    let idx = anchor.sequence_index().unwrap_or(0);
    (idx + 1) as f64 / SEQUENCE.len() as f64
}

/// One canonical step with its classification, as rendered on the
/// tracking timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimelineStep {
    pub status: ShipmentStatus,
    pub state: StepState,
}

/// Derived display view of a shipment's journey: the classified six-step
/// timeline, the progress fraction, the current location, and the active
/// exception state if the shipment has deviated from the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Timeline {
    pub steps: Vec<TimelineStep>,
    pub progress: f64,
    pub current_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ShipmentStatus>,
}

impl Timeline {
    /// Derives the timeline for a shipment with status `current` and the
    /// given update history (any order). Exception states freeze the step
    /// classification and progress at the last known sequence position and
    /// are reported separately via `exception`.
    pub fn derive(current: ShipmentStatus, events: &[TrackingEvent]) -> Self {
        let anchor = progress_anchor(current, events);
        let steps = SEQUENCE
            .iter()
            .map(|&step| TimelineStep {
                status: step,
                // Both sides are in-sequence, so classification is total.
                state: step_classification(step, anchor).unwrap_or(StepState::Pending),
            })
            .collect();

        Self {
            steps,
            progress: progress_fraction(current, events),
            current_location: current_location(events).map(str::to_string),
            exception: current.is_exception().then_some(current),
        }
    }
}
