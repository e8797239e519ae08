pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Booking, BookingError};

pub use memory::MemoryBookingStore;
pub use supabase::SupabaseBookingStore;

/// Storage seam for bookings. Capacity lives on the slot side; this store
/// only persists booking rows and answers the duplicate-prevention queries.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: Booking) -> Result<Booking, BookingError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<Booking>, BookingError>;

    async fn update(&self, booking: &Booking) -> Result<Booking, BookingError>;

    /// Returns false when no booking had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, BookingError>;

    /// Non-cancelled booking by this patient on this exact slot.
    async fn find_active_on_slot(
        &self,
        slot_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<Booking>, BookingError>;

    /// Non-cancelled bookings by this patient with this doctor on this day.
    async fn find_active_for_doctor_day(
        &self,
        doctor_id: i32,
        patient_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError>;

    /// All of a patient's bookings, newest date first.
    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Booking>, BookingError>;

    /// Non-cancelled bookings for a hospital, (date, time) ascending.
    async fn list_for_hospital(&self, hospital_id: i32) -> Result<Vec<Booking>, BookingError>;

    /// Every booking for a hospital including cancelled, newest date first.
    async fn list_all_for_hospital(&self, hospital_id: i32) -> Result<Vec<Booking>, BookingError>;

    /// Non-cancelled clinic bookings; clinic bookings carry the clinic id as
    /// their doctor id.
    async fn list_for_clinic(&self, clinic_id: i32) -> Result<Vec<Booking>, BookingError>;
}
