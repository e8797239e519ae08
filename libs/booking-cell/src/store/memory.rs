use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Booking, BookingError, BookingStatus};
use crate::store::BookingRepository;

/// In-memory booking store used by the test suites and single-process
/// deployments.
#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<F>(&self, predicate: F) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let bookings = self.bookings.lock().expect("booking store lock poisoned");
        bookings.values().filter(|b| predicate(b)).cloned().collect()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingStore {
    async fn insert(&self, booking: Booking) -> Result<Booking, BookingError> {
        let mut bookings = self.bookings.lock().expect("booking store lock poisoned");
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let bookings = self.bookings.lock().expect("booking store lock poisoned");
        Ok(bookings.get(&id).cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, BookingError> {
        let mut bookings = self.bookings.lock().expect("booking store lock poisoned");
        if !bookings.contains_key(&booking.id) {
            return Err(BookingError::NotFound);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BookingError> {
        let mut bookings = self.bookings.lock().expect("booking store lock poisoned");
        Ok(bookings.remove(&id).is_some())
    }

    async fn find_active_on_slot(
        &self,
        slot_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<Booking>, BookingError> {
        Ok(self
            .collect(|b| {
                b.slot_id == Some(slot_id)
                    && b.patient_id == Some(patient_id)
                    && b.status != BookingStatus::Cancelled
            })
            .into_iter()
            .next())
    }

    async fn find_active_for_doctor_day(
        &self,
        doctor_id: i32,
        patient_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        Ok(self.collect(|b| {
            b.doctor_id == doctor_id
                && b.patient_id == Some(patient_id)
                && b.date == date
                && b.status != BookingStatus::Cancelled
        }))
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        let mut result = self.collect(|b| b.patient_id == Some(patient_id));
        result.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(result)
    }

    async fn list_for_hospital(&self, hospital_id: i32) -> Result<Vec<Booking>, BookingError> {
        let mut result = self.collect(|b| {
            b.hospital_id == hospital_id && b.status != BookingStatus::Cancelled
        });
        result.sort_by_key(|b| (b.date, b.time));
        Ok(result)
    }

    async fn list_all_for_hospital(&self, hospital_id: i32) -> Result<Vec<Booking>, BookingError> {
        let mut result = self.collect(|b| b.hospital_id == hospital_id);
        result.sort_by(|a, b| b.date.cmp(&a.date).then(a.time.cmp(&b.time)));
        Ok(result)
    }

    async fn list_for_clinic(&self, clinic_id: i32) -> Result<Vec<Booking>, BookingError> {
        let mut result = self.collect(|b| {
            b.doctor_id == clinic_id && b.status != BookingStatus::Cancelled
        });
        result.sort_by_key(|b| (b.date, b.time));
        Ok(result)
    }
}
