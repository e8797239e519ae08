use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use directory_cell::store::DirectoryLookup;
use shared_utils::clock;
use slot_cell::models::{SlotError, TimeSlot};
use slot_cell::store::SlotRepository;

use crate::models::{Booking, BookingError, BookingStatus, CreateBookingRequest, RescheduleBookingRequest};
use crate::store::BookingRepository;

/// Booking lifecycle: create, cancel, reschedule, hard delete.
///
/// Capacity is claimed with `try_reserve` before the booking row exists and
/// released with a compensating call when the insert fails, so a crashed
/// insert never strands a seat and a successful insert never exceeds
/// `max_bookings`.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    slots: Arc<dyn SlotRepository>,
    directory: Arc<dyn DirectoryLookup>,
}

struct ResolvedNames {
    doctor_name: String,
    specialization: String,
    hospital_name: String,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        slots: Arc<dyn SlotRepository>,
        directory: Arc<dyn DirectoryLookup>,
    ) -> Self {
        Self {
            bookings,
            slots,
            directory,
        }
    }

    pub fn repository(&self) -> Arc<dyn BookingRepository> {
        Arc::clone(&self.bookings)
    }

    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        if request.patient_name.trim().is_empty() {
            return Err(BookingError::Validation(
                "patient_name is required".to_string(),
            ));
        }

        let now = clock::now_local();
        let slot = self
            .slots
            .fetch(request.slot_id)
            .await
            .map_err(map_slot_db_error)?
            .ok_or(BookingError::SlotNotFound)?;

        // The booking is stamped from the slot; reject a payload that claims
        // a different doctor or facility rather than silently ignoring it.
        if request.doctor_id != slot.doctor_id || request.hospital_id != slot.hospital_id {
            return Err(BookingError::Validation(
                "doctor_id and hospital_id must match the requested slot".to_string(),
            ));
        }

        if !slot.is_active {
            return Err(BookingError::SlotInactive);
        }
        if !clock::is_future(slot.date, slot.time, now) {
            return Err(BookingError::SlotExpired);
        }
        if !slot.has_capacity() {
            return Err(BookingError::SlotFull);
        }

        if let Some(patient_id) = request.patient_id {
            if self
                .bookings
                .find_active_on_slot(slot.id, patient_id)
                .await?
                .is_some()
            {
                return Err(BookingError::DuplicateSlotBooking);
            }

            // One upcoming booking per patient per doctor per day. A prior
            // same-day booking whose time has already passed does not block.
            let same_day = self
                .bookings
                .find_active_for_doctor_day(slot.doctor_id, patient_id, slot.date)
                .await?;
            for prior in same_day {
                let prior_instant = match prior.slot_id {
                    Some(prior_slot_id) => self
                        .slots
                        .fetch(prior_slot_id)
                        .await
                        .map_err(map_slot_db_error)?
                        .map(|s| s.instant())
                        // Orphaned booking: fall back to its stamped date/time.
                        .unwrap_or_else(|| prior.instant()),
                    None => prior.instant(),
                };
                if prior_instant > now {
                    return Err(BookingError::DuplicateDoctorDay { date: slot.date });
                }
            }
        }

        let names = self.resolve_names(&slot).await?;

        if !self
            .slots
            .try_reserve(slot.id)
            .await
            .map_err(map_slot_db_error)?
        {
            return Err(BookingError::SlotFull);
        }

        let created_at = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            reference: format!("BK{}", created_at.timestamp_millis()),
            patient_id: request.patient_id,
            patient_name: request.patient_name,
            patient_age: request.patient_age,
            patient_contact: request.patient_contact,
            patient_description: request.patient_description,
            doctor_id: slot.doctor_id,
            doctor_name: names.doctor_name,
            specialization: names.specialization,
            hospital_id: slot.hospital_id,
            hospital_name: names.hospital_name,
            owner_kind: slot.owner_kind,
            slot_id: Some(slot.id),
            date: slot.date,
            time: slot.time,
            status: BookingStatus::Confirmed,
            created_at,
            updated_at: created_at,
        };

        match self.bookings.insert(booking).await {
            Ok(booking) => {
                info!(
                    "Created booking {} on slot {} for doctor {}",
                    booking.reference, slot.id, slot.doctor_id
                );
                Ok(booking)
            }
            Err(e) => {
                // Compensate: give the reserved seat back before surfacing.
                if let Err(release_err) = self.slots.release(slot.id).await {
                    warn!(
                        "Failed to release slot {} after insert failure: {}",
                        slot.id, release_err
                    );
                }
                Err(e)
            }
        }
    }

    /// The status flip is durable before the release runs, so a repeat call
    /// gets `AlreadyCancelled` and the seat is only given back once. A failed
    /// release surfaces as a storage error even though the booking is already
    /// cancelled.
    pub async fn cancel_booking(&self, id: Uuid) -> Result<Booking, BookingError> {
        let mut booking = self.bookings.fetch(id).await?.ok_or(BookingError::NotFound)?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled);
        }

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();
        let booking = self.bookings.update(&booking).await?;

        if let Some(slot_id) = booking.slot_id {
            if let Err(e) = self.slots.release(slot_id).await {
                warn!("Failed to release slot {} on cancellation: {}", slot_id, e);
                return Err(BookingError::Database(e.to_string()));
            }
        }

        info!("Cancelled booking {}", booking.reference);
        Ok(booking)
    }

    pub async fn reschedule_booking(
        &self,
        id: Uuid,
        request: RescheduleBookingRequest,
    ) -> Result<Booking, BookingError> {
        let mut booking = self.bookings.fetch(id).await?.ok_or(BookingError::NotFound)?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled);
        }
        if booking.slot_id == Some(request.new_slot_id) {
            return Err(BookingError::Validation(
                "Booking is already on that slot".to_string(),
            ));
        }

        let now = clock::now_local();
        let new_slot = self
            .slots
            .fetch(request.new_slot_id)
            .await
            .map_err(map_slot_db_error)?
            .ok_or(BookingError::SlotNotFound)?;

        if !new_slot.is_active {
            return Err(BookingError::SlotInactive);
        }
        if !clock::is_future(new_slot.date, new_slot.time, now) {
            return Err(BookingError::SlotExpired);
        }

        // Reserve the new seat first so a full target never touches the
        // existing booking.
        if !self
            .slots
            .try_reserve(new_slot.id)
            .await
            .map_err(map_slot_db_error)?
        {
            return Err(BookingError::SlotFull);
        }

        let old_slot_id = booking.slot_id;
        booking.slot_id = Some(new_slot.id);
        booking.date = new_slot.date;
        booking.time = new_slot.time;
        booking.updated_at = Utc::now();

        match self.bookings.update(&booking).await {
            Ok(booking) => {
                if let Some(old_slot_id) = old_slot_id {
                    if let Err(e) = self.slots.release(old_slot_id).await {
                        warn!(
                            "Failed to release slot {} after reschedule: {}",
                            old_slot_id, e
                        );
                    }
                }
                info!(
                    "Rescheduled booking {} to slot {}",
                    booking.reference, new_slot.id
                );
                Ok(booking)
            }
            Err(e) => {
                if let Err(release_err) = self.slots.release(new_slot.id).await {
                    warn!(
                        "Failed to release slot {} after reschedule failure: {}",
                        new_slot.id, release_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Removes the booking row outright. A still-confirmed booking gives its
    /// seat back; a cancelled one already did at cancellation time.
    pub async fn hard_delete_booking(&self, id: Uuid) -> Result<(), BookingError> {
        let booking = self.bookings.fetch(id).await?.ok_or(BookingError::NotFound)?;

        if !self.bookings.delete(id).await? {
            return Err(BookingError::NotFound);
        }

        if booking.status != BookingStatus::Cancelled {
            if let Some(slot_id) = booking.slot_id {
                if let Err(e) = self.slots.release(slot_id).await {
                    warn!("Failed to release slot {} on deletion: {}", slot_id, e);
                }
            }
        }

        info!("Deleted booking {}", booking.reference);
        Ok(())
    }

    /// Hospital doctors resolve through the doctor directory; clinics reuse
    /// the same identifier in the clinic directory, with the clinic's name as
    /// the facility. Unknown identifiers still book, with placeholder names.
    /// A known hospital overrides the facility name on every branch.
    async fn resolve_names(&self, slot: &TimeSlot) -> Result<ResolvedNames, BookingError> {
        let doctor = self
            .directory
            .doctor_by_id(slot.doctor_id)
            .await
            .map_err(|e| BookingError::Directory(e.to_string()))?;

        let mut names = if let Some(doctor) = doctor {
            ResolvedNames {
                doctor_name: doctor.name,
                specialization: doctor.specialization,
                hospital_name: "Unknown Hospital".to_string(),
            }
        } else if let Some(clinic) = self
            .directory
            .clinic_by_id(slot.doctor_id)
            .await
            .map_err(|e| BookingError::Directory(e.to_string()))?
        {
            ResolvedNames {
                doctor_name: clinic.doctor_name,
                specialization: clinic.specialization,
                hospital_name: clinic.name,
            }
        } else {
            ResolvedNames {
                doctor_name: "Unknown Doctor".to_string(),
                specialization: "General".to_string(),
                hospital_name: "Unknown Facility".to_string(),
            }
        };

        if let Some(hospital) = self
            .directory
            .hospital_by_id(slot.hospital_id)
            .await
            .map_err(|e| BookingError::Directory(e.to_string()))?
        {
            names.hospital_name = hospital.name;
        }

        Ok(names)
    }
}

fn map_slot_db_error(e: SlotError) -> BookingError {
    match e {
        SlotError::NotFound => BookingError::SlotNotFound,
        other => BookingError::Database(other.to_string()),
    }
}
