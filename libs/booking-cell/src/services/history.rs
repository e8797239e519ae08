use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shared_utils::clock;
use slot_cell::store::SlotRepository;

use crate::models::{BookingError, BookingStatus, FacilityStats};
use crate::store::BookingRepository;

/// Bulk maintenance over past bookings plus the facility dashboard counters.
pub struct HistoryService {
    bookings: Arc<dyn BookingRepository>,
    slots: Arc<dyn SlotRepository>,
}

impl HistoryService {
    pub fn new(bookings: Arc<dyn BookingRepository>, slots: Arc<dyn SlotRepository>) -> Self {
        Self { bookings, slots }
    }

    /// Removes a patient's cancelled and already-passed bookings. Upcoming
    /// confirmed bookings are kept, so no capacity release is needed here.
    pub async fn clear_patient_history(&self, patient_id: Uuid) -> Result<u64, BookingError> {
        let now = clock::now_local();
        let mut removed = 0u64;

        for booking in self.bookings.list_for_patient(patient_id).await? {
            if booking.is_clearable_at(now) && self.bookings.delete(booking.id).await? {
                removed += 1;
            }
        }

        info!("Cleared {} history bookings for patient {}", removed, patient_id);
        Ok(removed)
    }

    /// Same sweep over every booking of a hospital.
    pub async fn clear_facility_history(&self, hospital_id: i32) -> Result<u64, BookingError> {
        let now = clock::now_local();
        let mut removed = 0u64;

        for booking in self.bookings.list_all_for_hospital(hospital_id).await? {
            if booking.is_clearable_at(now) && self.bookings.delete(booking.id).await? {
                removed += 1;
            }
        }

        info!("Cleared {} history bookings for hospital {}", removed, hospital_id);
        Ok(removed)
    }

    pub async fn facility_stats(&self, hospital_id: i32) -> Result<FacilityStats, BookingError> {
        let now = clock::now_local();
        let today = now.date();

        let bookings = self.bookings.list_all_for_hospital(hospital_id).await?;
        let active: Vec<_> = bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Cancelled)
            .collect();
        let today_bookings = active.iter().filter(|b| b.date == today).count() as i64;
        let total_bookings = active.len() as i64;

        let upcoming_slots = self
            .slots
            .list_for_facility(hospital_id, today)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .into_iter()
            .filter(|s| s.is_bookable_at(now))
            .count() as i64;

        Ok(FacilityStats {
            today_bookings,
            total_bookings,
            upcoming_slots,
            server_time: Utc::now(),
        })
    }
}
