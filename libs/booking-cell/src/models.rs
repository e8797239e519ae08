use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::OwnerKind;
use shared_utils::clock;

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// A patient's claim on a time slot.
///
/// Doctor/hospital names and the slot's date/time are denormalized at booking
/// time so listings render without a join, and so the record survives its
/// slot being deleted (an orphaned booking stays valid for display and
/// cancellation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    /// Human-readable reference shown to patients, e.g. `BK1717236000000`.
    pub reference: String,
    /// None for guest-context bookings.
    pub patient_id: Option<Uuid>,
    pub patient_name: String,
    pub patient_age: Option<i32>,
    pub patient_contact: Option<String>,
    pub patient_description: Option<String>,
    pub doctor_id: i32,
    pub doctor_name: String,
    pub specialization: String,
    pub hospital_id: i32,
    pub hospital_name: String,
    pub owner_kind: OwnerKind,
    pub slot_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(with = "clock::hhmm")]
    pub time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The booked (date, time) as a facility-local instant; matches the
    /// referenced slot's instant unless the slot has been deleted.
    pub fn instant(&self) -> NaiveDateTime {
        clock::slot_instant(self.date, self.time)
    }

    /// History clearing removes cancelled and already-passed bookings;
    /// upcoming confirmed bookings are never swept away.
    pub fn is_clearable_at(&self, now: NaiveDateTime) -> bool {
        self.status == BookingStatus::Cancelled || self.instant() < now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub patient_id: Option<Uuid>,
    pub patient_name: String,
    pub patient_age: Option<i32>,
    pub patient_contact: Option<String>,
    pub patient_description: Option<String>,
    pub doctor_id: i32,
    pub hospital_id: i32,
    pub slot_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleBookingRequest {
    pub new_slot_id: Uuid,
}

/// Dashboard counters for one facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityStats {
    pub today_bookings: i64,
    pub total_bookings: i64,
    pub upcoming_slots: i64,
    /// Server clock so dashboards can sync their countdown displays.
    pub server_time: DateTime<Utc>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found")]
    NotFound,

    #[error("Time slot not found")]
    SlotNotFound,

    #[error("This slot is no longer active")]
    SlotInactive,

    #[error("This slot has already passed, please choose another time")]
    SlotExpired,

    #[error("This slot is fully booked")]
    SlotFull,

    #[error("You have already booked this time slot")]
    DuplicateSlotBooking,

    #[error("You already have an upcoming booking with this doctor on {date}")]
    DuplicateDoctorDay { date: NaiveDate },

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Directory lookup failed: {0}")]
    Directory(String),

    #[error("Database error: {0}")]
    Database(String),
}
