// libs/booking-cell/tests/supabase_store_test.rs
//
// Request-shape tests for the PostgREST booking store.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::store::{BookingRepository, SupabaseBookingStore};
use shared_database::SupabaseClient;
use shared_utils::test_utils::TestConfig;

async fn store_for(server: &MockServer) -> SupabaseBookingStore {
    let config = TestConfig::for_server(&server.uri()).to_app_config();
    SupabaseBookingStore::new(Arc::new(SupabaseClient::new(&config)))
}

fn booking_row(id: Uuid, patient_id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "reference": "BK1717236000000",
        "patient_id": patient_id,
        "patient_name": "Thandi Mwale",
        "patient_age": 34,
        "patient_contact": null,
        "patient_description": null,
        "doctor_id": 7,
        "doctor_name": "Dr. Banda",
        "specialization": "Cardiology",
        "hospital_id": 1,
        "hospital_name": "City General",
        "owner_kind": "hospital_doctor",
        "slot_id": Uuid::new_v4(),
        "date": "2030-06-01",
        "time": "10:30",
        "status": "confirmed",
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339()
    })
}

#[tokio::test]
async fn duplicate_slot_lookup_excludes_cancelled_rows() {
    let server = MockServer::start().await;
    let slot_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("slot_id", format!("eq.{}", slot_id)))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .and(query_param("status", "neq.cancelled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let found = store.find_active_on_slot(slot_id, patient_id).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn patient_listing_orders_newest_first() {
    let server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .and(query_param("order", "date.desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([booking_row(Uuid::new_v4(), patient_id)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let bookings = store.list_for_patient(patient_id).await.unwrap();

    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].doctor_name, "Dr. Banda");
}

#[tokio::test]
async fn insert_sends_the_anon_key_and_asks_for_representation() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .and(header("apikey", "test-anon-key"))
        .and(header("Prefer", "return=representation"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([booking_row(id, patient_id)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let booking = serde_json::from_value(booking_row(id, patient_id)).unwrap();
    let created = store.insert(booking).await.unwrap();

    assert_eq!(created.id, id);
}

#[tokio::test]
async fn update_on_a_missing_booking_is_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let booking: booking_cell::models::Booking =
        serde_json::from_value(booking_row(id, Uuid::new_v4())).unwrap();
    let result = store.update(&booking).await;

    assert!(matches!(
        result,
        Err(booking_cell::models::BookingError::NotFound)
    ));
}
