// libs/slot-cell/tests/slot_service_test.rs
//
// Slot lifecycle tests against the in-memory store: creation guards,
// listings, capacity edits, and the expiry sweep.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;

use shared_models::OwnerKind;
use shared_utils::clock;
use slot_cell::models::{CreateSlotRequest, SlotError, UpdateSlotRequest, DEFAULT_MAX_BOOKINGS};
use slot_cell::services::{ExpirySweeper, SlotService};
use slot_cell::store::{MemorySlotStore, SlotRepository};

// ==============================================================================
// FIXTURES
// ==============================================================================

fn service() -> (SlotService, Arc<MemorySlotStore>) {
    let store = Arc::new(MemorySlotStore::new());
    (SlotService::new(store.clone()), store)
}

fn future_request(doctor_id: i32, minutes_ahead: i64) -> CreateSlotRequest {
    let when = clock::now_local() + Duration::minutes(minutes_ahead);
    CreateSlotRequest {
        doctor_id,
        hospital_id: 1,
        date: when.date(),
        time: when.time(),
        max_bookings: None,
        owner_kind: None,
    }
}

// ==============================================================================
// CREATION
// ==============================================================================

#[tokio::test]
async fn create_slot_defaults_and_activates() {
    let (service, _) = service();

    let slot = service.create_slot(future_request(7, 60)).await.unwrap();

    assert_eq!(slot.doctor_id, 7);
    assert_eq!(slot.max_bookings, DEFAULT_MAX_BOOKINGS);
    assert_eq!(slot.current_bookings, 0);
    assert!(slot.is_active);
    assert_eq!(slot.owner_kind, OwnerKind::HospitalDoctor);
}

#[tokio::test]
async fn clinic_slot_owner_kind_defaults_from_zero_hospital() {
    let (service, _) = service();

    let mut request = future_request(42, 60);
    request.hospital_id = 0;
    let slot = service.create_slot(request).await.unwrap();

    assert_eq!(slot.owner_kind, OwnerKind::Clinic);
}

#[tokio::test]
async fn create_slot_in_the_past_is_rejected() {
    let (service, _) = service();

    let result = service.create_slot(future_request(7, -10)).await;

    assert_matches!(result, Err(SlotError::PastSlot));
}

#[tokio::test]
async fn duplicate_doctor_schedule_is_rejected() {
    let (service, _) = service();

    let request = future_request(7, 60);
    service.create_slot(request.clone()).await.unwrap();
    let result = service.create_slot(request).await;

    assert_matches!(result, Err(SlotError::DuplicateSlot));
}

#[tokio::test]
async fn zero_capacity_is_rejected() {
    let (service, _) = service();

    let mut request = future_request(7, 60);
    request.max_bookings = Some(0);
    let result = service.create_slot(request).await;

    assert_matches!(result, Err(SlotError::Validation(_)));
}

// ==============================================================================
// LISTINGS
// ==============================================================================

#[tokio::test]
async fn doctor_listing_hides_expired_even_before_sweep() {
    let (service, store) = service();

    let upcoming = service.create_slot(future_request(7, 60)).await.unwrap();

    // Slip a slot into the past behind the service's back, still flagged
    // active, as if the sweeper had not caught it yet.
    let mut stale = upcoming.clone();
    stale.id = uuid::Uuid::new_v4();
    let past = clock::now_local() - Duration::minutes(5);
    stale.date = past.date();
    stale.time = past.time();
    store.insert(stale).await.unwrap();

    let listed = service.list_slots_for_doctor(7).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, upcoming.id);
}

#[tokio::test]
async fn facility_listing_keeps_todays_expired_slots() {
    let (service, store) = service();

    let slot = service.create_slot(future_request(7, 120)).await.unwrap();

    let mut expired_today = slot.clone();
    expired_today.id = uuid::Uuid::new_v4();
    expired_today.doctor_id = 8;
    let earlier = clock::now_local() - Duration::minutes(30);
    expired_today.date = earlier.date();
    expired_today.time = earlier.time();
    expired_today.is_active = false;
    store.insert(expired_today.clone()).await.unwrap();

    let listed = service.list_slots_for_facility(1).await.unwrap();

    assert_eq!(listed.len(), 2);
}

// ==============================================================================
// UPDATES
// ==============================================================================

#[tokio::test]
async fn moving_a_slot_forward_reactivates_it() {
    let (service, store) = service();

    let slot = service.create_slot(future_request(7, 60)).await.unwrap();

    let mut deactivated = slot.clone();
    deactivated.is_active = false;
    store.update(&deactivated).await.unwrap();

    let later = clock::now_local() + Duration::minutes(180);
    let updated = service
        .update_slot(
            slot.id,
            UpdateSlotRequest {
                date: Some(later.date()),
                time: Some(later.time()),
                max_bookings: None,
            },
        )
        .await
        .unwrap();

    assert!(updated.is_active);
    assert_eq!(updated.date, later.date());
}

#[tokio::test]
async fn moving_a_slot_into_the_past_is_rejected() {
    let (service, _) = service();

    let slot = service.create_slot(future_request(7, 60)).await.unwrap();
    let earlier = clock::now_local() - Duration::minutes(60);
    let result = service
        .update_slot(
            slot.id,
            UpdateSlotRequest {
                date: Some(earlier.date()),
                time: Some(earlier.time()),
                max_bookings: None,
            },
        )
        .await;

    assert_matches!(result, Err(SlotError::PastSlot));
}

#[tokio::test]
async fn shrinking_capacity_below_booked_is_rejected() {
    let (service, store) = service();

    let slot = service.create_slot(future_request(7, 60)).await.unwrap();
    store.try_reserve(slot.id).await.unwrap();
    store.try_reserve(slot.id).await.unwrap();

    let result = service
        .update_slot(
            slot.id,
            UpdateSlotRequest {
                date: None,
                time: None,
                max_bookings: Some(1),
            },
        )
        .await;

    assert_matches!(result, Err(SlotError::CapacityBelowBooked { current: 2 }));
}

#[tokio::test]
async fn delete_missing_slot_is_not_found() {
    let (service, _) = service();

    let result = service.delete_slot(uuid::Uuid::new_v4()).await;

    assert_matches!(result, Err(SlotError::NotFound));
}

// ==============================================================================
// EXPIRY SWEEP
// ==============================================================================

#[tokio::test]
async fn sweep_deactivates_only_passed_slots_and_is_idempotent() {
    let store = Arc::new(MemorySlotStore::new());
    let service = SlotService::new(store.clone());

    let upcoming = service.create_slot(future_request(7, 90)).await.unwrap();

    let mut expired = upcoming.clone();
    expired.id = uuid::Uuid::new_v4();
    expired.doctor_id = 8;
    let past = clock::now_local() - Duration::minutes(15);
    expired.date = past.date();
    expired.time = past.time();
    store.insert(expired.clone()).await.unwrap();

    let sweeper = ExpirySweeper::new(store.clone(), 60);
    assert_eq!(sweeper.run_once().await.unwrap(), 1);
    // Second pass finds nothing left to flip.
    assert_eq!(sweeper.run_once().await.unwrap(), 0);

    assert!(store.fetch(upcoming.id).await.unwrap().unwrap().is_active);
    assert!(!store.fetch(expired.id).await.unwrap().unwrap().is_active);
}
