use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::OwnerKind;
use shared_utils::clock;

use crate::models::{CreateSlotRequest, SlotError, TimeSlot, UpdateSlotRequest, DEFAULT_MAX_BOOKINGS};
use crate::store::SlotRepository;

pub struct SlotService {
    repo: Arc<dyn SlotRepository>,
}

impl SlotService {
    pub fn new(repo: Arc<dyn SlotRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> Arc<dyn SlotRepository> {
        Arc::clone(&self.repo)
    }

    pub async fn create_slot(&self, request: CreateSlotRequest) -> Result<TimeSlot, SlotError> {
        let max_bookings = request.max_bookings.unwrap_or(DEFAULT_MAX_BOOKINGS);
        if max_bookings < 1 {
            return Err(SlotError::Validation(
                "max_bookings must be at least 1".to_string(),
            ));
        }

        let now = clock::now_local();
        if !clock::is_future(request.date, request.time, now) {
            return Err(SlotError::PastSlot);
        }

        if self
            .repo
            .find_by_schedule(request.doctor_id, request.date, request.time)
            .await?
            .is_some()
        {
            return Err(SlotError::DuplicateSlot);
        }

        let created_at = Utc::now();
        let slot = TimeSlot {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            hospital_id: request.hospital_id,
            owner_kind: request
                .owner_kind
                .unwrap_or_else(|| OwnerKind::from_hospital_id(request.hospital_id)),
            date: request.date,
            time: request.time,
            max_bookings,
            current_bookings: 0,
            is_active: true,
            created_at,
            updated_at: created_at,
        };

        let slot = self.repo.insert(slot).await?;
        info!(
            "Created slot {} for doctor {} at {} {}",
            slot.id,
            slot.doctor_id,
            slot.date,
            clock::format_hhmm(slot.time)
        );
        Ok(slot)
    }

    /// Patient-facing listing: active, strictly-future slots only. The
    /// bookability of every row is re-derived from the live clock so a slot
    /// that expired a second ago never shows, even before the next sweep.
    pub async fn list_slots_for_doctor(&self, doctor_id: i32) -> Result<Vec<TimeSlot>, SlotError> {
        let now = clock::now_local();
        let slots = self.repo.list_bookable_for_doctor(doctor_id, now).await?;
        Ok(slots
            .into_iter()
            .filter(|s| s.is_bookable_at(now))
            .collect())
    }

    /// Dashboard listing: everything from today onward, expired or not.
    pub async fn list_slots_for_facility(
        &self,
        hospital_id: i32,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let today = clock::now_local().date();
        self.repo.list_for_facility(hospital_id, today).await
    }

    pub async fn update_slot(
        &self,
        id: Uuid,
        request: UpdateSlotRequest,
    ) -> Result<TimeSlot, SlotError> {
        let mut slot = self.repo.fetch(id).await?.ok_or(SlotError::NotFound)?;

        if request.date.is_some() || request.time.is_some() {
            let new_date = request.date.unwrap_or(slot.date);
            let new_time = request.time.unwrap_or(slot.time);
            if !clock::is_future(new_date, new_time, clock::now_local()) {
                return Err(SlotError::PastSlot);
            }
            slot.date = new_date;
            slot.time = new_time;
            // A moved slot is a new future commitment.
            slot.is_active = true;
        }

        if let Some(max_bookings) = request.max_bookings {
            if max_bookings < 1 {
                return Err(SlotError::Validation(
                    "max_bookings must be at least 1".to_string(),
                ));
            }
            if max_bookings < slot.current_bookings {
                return Err(SlotError::CapacityBelowBooked {
                    current: slot.current_bookings,
                });
            }
            slot.max_bookings = max_bookings;
        }

        slot.updated_at = Utc::now();
        debug!("Updating slot {}", id);
        self.repo.update(&slot).await
    }

    /// Unconditional removal. Bookings still referencing the slot become
    /// orphaned but keep their denormalized date/time for display and
    /// cancellation.
    pub async fn delete_slot(&self, id: Uuid) -> Result<(), SlotError> {
        if !self.repo.delete(id).await? {
            return Err(SlotError::NotFound);
        }
        info!("Deleted slot {}", id);
        Ok(())
    }
}
