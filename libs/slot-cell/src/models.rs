use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::OwnerKind;
use shared_utils::clock;

pub const DEFAULT_MAX_BOOKINGS: i32 = 5;

/// A bookable time slot on a doctor's (or clinic's) roster.
///
/// Expired slots are deactivated, never deleted, so facility dashboards keep
/// their history. `current_bookings` is only ever moved through the storage
/// layer's atomic reserve/release operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: i32,
    /// 0 for clinic-owned slots.
    pub hospital_id: i32,
    pub owner_kind: OwnerKind,
    pub date: NaiveDate,
    #[serde(with = "clock::hhmm")]
    pub time: NaiveTime,
    pub max_bookings: i32,
    pub current_bookings: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    /// The slot's (date, time) pair as a facility-local instant.
    pub fn instant(&self) -> NaiveDateTime {
        clock::slot_instant(self.date, self.time)
    }

    /// Live bookability check. Read paths must use this rather than trusting
    /// `is_active` alone: the sweep interval leaves a window where a
    /// just-expired slot is still flagged active.
    pub fn is_bookable_at(&self, now: NaiveDateTime) -> bool {
        self.is_active && self.instant() > now
    }

    pub fn has_capacity(&self) -> bool {
        self.current_bookings < self.max_bookings
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub doctor_id: i32,
    #[serde(default)]
    pub hospital_id: i32,
    pub date: NaiveDate,
    #[serde(with = "clock::hhmm")]
    pub time: NaiveTime,
    pub max_bookings: Option<i32>,
    /// Defaults from `hospital_id` when omitted (0 means clinic-owned).
    pub owner_kind: Option<OwnerKind>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "clock::hhmm_option")]
    pub time: Option<NaiveTime>,
    pub max_bookings: Option<i32>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SlotError {
    #[error("Slot not found")]
    NotFound,

    #[error("Cannot create or move a slot into the past")]
    PastSlot,

    #[error("Slot already exists for this doctor at this date/time")]
    DuplicateSlot,

    #[error("Cannot shrink capacity below the {current} existing bookings")]
    CapacityBelowBooked { current: i32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}
