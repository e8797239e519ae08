use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{BookingError, CreateBookingRequest, RescheduleBookingRequest};
use crate::router::BookingCellState;

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        BookingError::SlotNotFound => AppError::NotFound("Time slot not found".to_string()),
        BookingError::SlotInactive
        | BookingError::SlotExpired
        | BookingError::SlotFull
        | BookingError::DuplicateSlotBooking
        | BookingError::DuplicateDoctorDay { .. }
        | BookingError::AlreadyCancelled => AppError::Conflict(e.to_string()),
        BookingError::Validation(msg) => AppError::ValidationError(msg),
        BookingError::Directory(msg) => AppError::ExternalService(msg),
        BookingError::Database(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<BookingCellState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = state
        .booking
        .create_booking(request)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": booking
    })))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<BookingCellState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = state
        .booking
        .cancel_booking(booking_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": booking
    })))
}

#[axum::debug_handler]
pub async fn delete_booking(
    State(state): State<BookingCellState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .booking
        .hard_delete_booking(booking_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Booking removed"
    })))
}

#[axum::debug_handler]
pub async fn reschedule_booking(
    State(state): State<BookingCellState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<RescheduleBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = state
        .booking
        .reschedule_booking(booking_id, request)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": booking
    })))
}

#[axum::debug_handler]
pub async fn list_patient_bookings(
    State(state): State<BookingCellState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let bookings = state
        .booking
        .repository()
        .list_for_patient(patient_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(bookings)))
}

#[axum::debug_handler]
pub async fn list_hospital_bookings(
    State(state): State<BookingCellState>,
    Path(hospital_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let bookings = state
        .booking
        .repository()
        .list_for_hospital(hospital_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(bookings)))
}

#[axum::debug_handler]
pub async fn list_all_hospital_bookings(
    State(state): State<BookingCellState>,
    Path(hospital_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let bookings = state
        .booking
        .repository()
        .list_all_for_hospital(hospital_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(bookings)))
}

#[axum::debug_handler]
pub async fn list_clinic_bookings(
    State(state): State<BookingCellState>,
    Path(clinic_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let bookings = state
        .booking
        .repository()
        .list_for_clinic(clinic_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(bookings)))
}

#[axum::debug_handler]
pub async fn clear_patient_history(
    State(state): State<BookingCellState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let removed = state
        .history
        .clear_patient_history(patient_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "removed": removed
    })))
}

#[axum::debug_handler]
pub async fn clear_hospital_history(
    State(state): State<BookingCellState>,
    Path(hospital_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let removed = state
        .history
        .clear_facility_history(hospital_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "removed": removed
    })))
}

#[axum::debug_handler]
pub async fn hospital_stats(
    State(state): State<BookingCellState>,
    Path(hospital_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let stats = state
        .history
        .facility_stats(hospital_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(stats)))
}
