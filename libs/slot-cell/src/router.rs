use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::services::SlotService;

pub fn slot_routes(service: Arc<SlotService>) -> Router {
    Router::new()
        .route("/", post(handlers::create_slot))
        .route("/doctor/{doctor_id}", get(handlers::list_doctor_slots))
        .route("/facility/{hospital_id}", get(handlers::list_facility_slots))
        .route("/{slot_id}", put(handlers::update_slot))
        .route("/{slot_id}", delete(handlers::delete_slot))
        .with_state(service)
}
