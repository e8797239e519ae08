use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreateSlotRequest, SlotError, UpdateSlotRequest};
use crate::services::SlotService;

fn map_slot_error(e: SlotError) -> AppError {
    match e {
        SlotError::NotFound => AppError::NotFound("Slot not found".to_string()),
        SlotError::PastSlot => AppError::Conflict("Cannot create or move a slot into the past".to_string()),
        SlotError::DuplicateSlot => AppError::Conflict(
            "Slot already exists for this doctor at this date/time".to_string(),
        ),
        SlotError::CapacityBelowBooked { current } => AppError::Conflict(format!(
            "Cannot shrink capacity below the {} existing bookings",
            current
        )),
        SlotError::Validation(msg) => AppError::ValidationError(msg),
        SlotError::Database(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_slot(
    State(service): State<Arc<SlotService>>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = service
        .create_slot(request)
        .await
        .map_err(map_slot_error)?;

    Ok(Json(json!({
        "success": true,
        "slot": slot
    })))
}

#[axum::debug_handler]
pub async fn list_doctor_slots(
    State(service): State<Arc<SlotService>>,
    Path(doctor_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let slots = service
        .list_slots_for_doctor(doctor_id)
        .await
        .map_err(map_slot_error)?;

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn list_facility_slots(
    State(service): State<Arc<SlotService>>,
    Path(hospital_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let slots = service
        .list_slots_for_facility(hospital_id)
        .await
        .map_err(map_slot_error)?;

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(service): State<Arc<SlotService>>,
    Path(slot_id): Path<Uuid>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = service
        .update_slot(slot_id, request)
        .await
        .map_err(map_slot_error)?;

    Ok(Json(json!({
        "success": true,
        "slot": slot
    })))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(service): State<Arc<SlotService>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete_slot(slot_id).await.map_err(map_slot_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Slot removed"
    })))
}
