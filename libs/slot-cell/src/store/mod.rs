pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::models::{SlotError, TimeSlot};

pub use memory::MemorySlotStore;
pub use supabase::SupabaseSlotStore;

/// Storage seam for time slots.
///
/// `try_reserve` and `release` are the only way `current_bookings` moves;
/// both are atomic at the backend (a conditional single-statement update),
/// never an application-level read-modify-write. That closes the race where
/// two concurrent bookings both observe the last free seat.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn insert(&self, slot: TimeSlot) -> Result<TimeSlot, SlotError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<TimeSlot>, SlotError>;

    async fn find_by_schedule(
        &self,
        doctor_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<TimeSlot>, SlotError>;

    /// Active slots strictly after `now`, ordered by (date, time) ascending.
    async fn list_bookable_for_doctor(
        &self,
        doctor_id: i32,
        now: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>, SlotError>;

    /// All slots from `from` onward regardless of state, ordered by
    /// (date, time) ascending, so dashboards see same-day expired slots.
    async fn list_for_facility(
        &self,
        hospital_id: i32,
        from: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SlotError>;

    async fn update(&self, slot: &TimeSlot) -> Result<TimeSlot, SlotError>;

    /// Returns false when no slot had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, SlotError>;

    /// Atomically increment `current_bookings` if capacity remains.
    /// Ok(false) means the slot was full at the moment of the update.
    async fn try_reserve(&self, id: Uuid) -> Result<bool, SlotError>;

    /// Atomically decrement `current_bookings`, never below zero. Releasing
    /// a deleted slot is a no-op (orphaned bookings are tolerated).
    async fn release(&self, id: Uuid) -> Result<(), SlotError>;

    /// Bulk-deactivate every active slot whose instant is at or before
    /// `now`. Idempotent; returns the number of slots flipped.
    async fn deactivate_expired(&self, now: NaiveDateTime) -> Result<u64, SlotError>;
}
