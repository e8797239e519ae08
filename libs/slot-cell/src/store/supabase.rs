use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::SupabaseClient;
use shared_utils::clock;

use crate::models::{SlotError, TimeSlot};
use crate::store::SlotRepository;

/// PostgREST-backed slot store.
///
/// Capacity mutations go through the `reserve_slot_capacity` /
/// `release_slot_capacity` SQL functions, each a single conditional
/// `UPDATE ... WHERE current_bookings < max_bookings` (resp. `> 0`), so the
/// counter never goes through an application-level read-modify-write.
pub struct SupabaseSlotStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseSlotStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<TimeSlot>, SlotError> {
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| SlotError::Database(format!("Failed to parse slot: {}", e)))
            })
            .collect()
    }

    fn first_row(rows: Vec<Value>, context: &str) -> Result<TimeSlot, SlotError> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SlotError::Database(format!("{} returned no rows", context)))?;
        serde_json::from_value(row)
            .map_err(|e| SlotError::Database(format!("Failed to parse slot: {}", e)))
    }
}

#[async_trait]
impl SlotRepository for SupabaseSlotStore {
    async fn insert(&self, slot: TimeSlot) -> Result<TimeSlot, SlotError> {
        let body = serde_json::to_value(&slot)
            .map_err(|e| SlotError::Database(format!("Failed to serialize slot: {}", e)))?;

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/time_slots",
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Self::first_row(rows, "slot insert")
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<TimeSlot>, SlotError> {
        let path = format!("/rest/v1/time_slots?id=eq.{}", id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Ok(Self::parse_rows(rows)?.into_iter().next())
    }

    async fn find_by_schedule(
        &self,
        doctor_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<TimeSlot>, SlotError> {
        let path = format!(
            "/rest/v1/time_slots?doctor_id=eq.{}&date=eq.{}&time=eq.{}",
            doctor_id,
            date,
            urlencoding::encode(&clock::format_hhmm(time)),
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Ok(Self::parse_rows(rows)?.into_iter().next())
    }

    async fn list_bookable_for_doctor(
        &self,
        doctor_id: i32,
        now: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let today = now.date();
        let now_hhmm = clock::format_hhmm(now.time());
        // Future = later date, or today with a strictly later time.
        let horizon = format!("(date.gt.{today},and(date.eq.{today},time.gt.{now_hhmm}))");
        let path = format!(
            "/rest/v1/time_slots?doctor_id=eq.{}&is_active=eq.true&or={}&order=date.asc,time.asc",
            doctor_id,
            urlencoding::encode(&horizon),
        );
        debug!("Listing bookable slots for doctor {}", doctor_id);

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Self::parse_rows(rows)
    }

    async fn list_for_facility(
        &self,
        hospital_id: i32,
        from: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let path = format!(
            "/rest/v1/time_slots?hospital_id=eq.{}&date=gte.{}&order=date.asc,time.asc",
            hospital_id, from,
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Self::parse_rows(rows)
    }

    async fn update(&self, slot: &TimeSlot) -> Result<TimeSlot, SlotError> {
        let path = format!("/rest/v1/time_slots?id=eq.{}", slot.id);
        let body = serde_json::to_value(slot)
            .map_err(|e| SlotError::Database(format!("Failed to serialize slot: {}", e)))?;

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(SlotError::NotFound);
        }
        Self::first_row(rows, "slot update")
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SlotError> {
        let path = format!("/rest/v1/time_slots?id=eq.{}", id);
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Ok(!rows.is_empty())
    }

    async fn try_reserve(&self, id: Uuid) -> Result<bool, SlotError> {
        let reserved: Value = self
            .supabase
            .request(
                Method::POST,
                "/rest/v1/rpc/reserve_slot_capacity",
                Some(json!({ "p_slot_id": id })),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Ok(reserved.as_bool().unwrap_or(false))
    }

    async fn release(&self, id: Uuid) -> Result<(), SlotError> {
        let _: Value = self
            .supabase
            .request(
                Method::POST,
                "/rest/v1/rpc/release_slot_capacity",
                Some(json!({ "p_slot_id": id })),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Ok(())
    }

    async fn deactivate_expired(&self, now: NaiveDateTime) -> Result<u64, SlotError> {
        let today = now.date();
        let now_hhmm = clock::format_hhmm(now.time());
        let body = json!({ "is_active": false });

        // Two filtered bulk updates: past dates, then today's passed times.
        let past_dates = format!(
            "/rest/v1/time_slots?date=lt.{}&is_active=eq.true",
            today,
        );
        let past_rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &past_dates,
                Some(body.clone()),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        let today_passed = format!(
            "/rest/v1/time_slots?date=eq.{}&time=lte.{}&is_active=eq.true",
            today,
            urlencoding::encode(&now_hhmm),
        );
        let today_rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &today_passed,
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await
            .map_err(|e| SlotError::Database(e.to_string()))?;

        Ok((past_rows.len() + today_rows.len()) as u64)
    }
}
