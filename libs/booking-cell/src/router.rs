use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers;
use crate::services::{BookingService, HistoryService};

#[derive(Clone)]
pub struct BookingCellState {
    pub booking: Arc<BookingService>,
    pub history: Arc<HistoryService>,
}

pub fn booking_routes(state: BookingCellState) -> Router {
    Router::new()
        .route("/", post(handlers::create_booking))
        .route("/{booking_id}/cancel", post(handlers::cancel_booking))
        .route("/{booking_id}", delete(handlers::delete_booking))
        .route(
            "/{booking_id}/reschedule",
            patch(handlers::reschedule_booking),
        )
        .route("/patient/{patient_id}", get(handlers::list_patient_bookings))
        .route(
            "/patient/{patient_id}/history",
            delete(handlers::clear_patient_history),
        )
        .route(
            "/hospital/{hospital_id}",
            get(handlers::list_hospital_bookings),
        )
        .route(
            "/hospital/{hospital_id}/all",
            get(handlers::list_all_hospital_bookings),
        )
        .route(
            "/hospital/{hospital_id}/history",
            delete(handlers::clear_hospital_history),
        )
        .route("/clinic/{clinic_id}", get(handlers::list_clinic_bookings))
        .with_state(state)
}

pub fn stats_routes(state: BookingCellState) -> Router {
    Router::new()
        .route("/hospital/{hospital_id}", get(handlers::hospital_stats))
        .with_state(state)
}
