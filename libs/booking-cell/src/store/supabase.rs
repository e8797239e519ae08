use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use shared_database::SupabaseClient;

use crate::models::{Booking, BookingError};
use crate::store::BookingRepository;

/// PostgREST-backed booking store.
pub struct SupabaseBookingStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseBookingStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn query(&self, path: &str) -> Result<Vec<Booking>, BookingError> {
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Self::parse_rows(rows)
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Booking>, BookingError> {
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| BookingError::Database(format!("Failed to parse booking: {}", e)))
            })
            .collect()
    }

    fn first_row(rows: Vec<Value>, context: &str) -> Result<Booking, BookingError> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::Database(format!("{} returned no rows", context)))?;
        serde_json::from_value(row)
            .map_err(|e| BookingError::Database(format!("Failed to parse booking: {}", e)))
    }
}

#[async_trait]
impl BookingRepository for SupabaseBookingStore {
    async fn insert(&self, booking: Booking) -> Result<Booking, BookingError> {
        let body = serde_json::to_value(&booking)
            .map_err(|e| BookingError::Database(format!("Failed to serialize booking: {}", e)))?;

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/bookings",
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Self::first_row(rows, "booking insert")
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}", id);
        Ok(self.query(&path).await?.into_iter().next())
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}", booking.id);
        let body = serde_json::to_value(booking)
            .map_err(|e| BookingError::Database(format!("Failed to serialize booking: {}", e)))?;

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(BookingError::NotFound);
        }
        Self::first_row(rows, "booking update")
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}", id);
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(!rows.is_empty())
    }

    async fn find_active_on_slot(
        &self,
        slot_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?slot_id=eq.{}&patient_id=eq.{}&status=neq.cancelled",
            slot_id, patient_id,
        );
        Ok(self.query(&path).await?.into_iter().next())
    }

    async fn find_active_for_doctor_day(
        &self,
        doctor_id: i32,
        patient_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?doctor_id=eq.{}&patient_id=eq.{}&date=eq.{}&status=neq.cancelled",
            doctor_id, patient_id, date,
        );
        self.query(&path).await
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?patient_id=eq.{}&order=date.desc",
            patient_id,
        );
        self.query(&path).await
    }

    async fn list_for_hospital(&self, hospital_id: i32) -> Result<Vec<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?hospital_id=eq.{}&status=neq.cancelled&order=date.asc,time.asc",
            hospital_id,
        );
        self.query(&path).await
    }

    async fn list_all_for_hospital(&self, hospital_id: i32) -> Result<Vec<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?hospital_id=eq.{}&order=date.desc,time.asc",
            hospital_id,
        );
        self.query(&path).await
    }

    async fn list_for_clinic(&self, clinic_id: i32) -> Result<Vec<Booking>, BookingError> {
        // Clinic bookings carry the clinic id in the doctor_id column.
        let path = format!(
            "/rest/v1/bookings?doctor_id=eq.{}&status=neq.cancelled&order=date.asc,time.asc",
            clinic_id,
        );
        self.query(&path).await
    }
}
