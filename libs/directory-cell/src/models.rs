use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Directory records are owned and mutated by the dashboard CRUD layer; the
// booking core only reads them to stamp denormalized names onto bookings.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub doctor_id: i32,
    pub name: String,
    pub specialization: String,
    pub hospital_id: i32,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicRecord {
    pub clinic_id: i32,
    /// Display name of the clinic itself, used as the facility name.
    pub name: String,
    pub doctor_name: String,
    pub specialization: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub hospital_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<i32>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(String),
}
