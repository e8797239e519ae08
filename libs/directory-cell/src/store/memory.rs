use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{ClinicRecord, DirectoryError, DoctorRecord, HospitalRecord};
use crate::store::DirectoryLookup;

/// In-memory directory, used by tests and by single-process deployments
/// that seed the directory at startup.
#[derive(Default)]
pub struct MemoryDirectory {
    doctors: Mutex<HashMap<i32, DoctorRecord>>,
    clinics: Mutex<HashMap<i32, ClinicRecord>>,
    hospitals: Mutex<HashMap<i32, HospitalRecord>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_doctor(&self, record: DoctorRecord) {
        self.doctors
            .lock()
            .expect("directory lock poisoned")
            .insert(record.doctor_id, record);
    }

    pub fn add_clinic(&self, record: ClinicRecord) {
        self.clinics
            .lock()
            .expect("directory lock poisoned")
            .insert(record.clinic_id, record);
    }

    pub fn add_hospital(&self, record: HospitalRecord) {
        self.hospitals
            .lock()
            .expect("directory lock poisoned")
            .insert(record.hospital_id, record);
    }
}

#[async_trait]
impl DirectoryLookup for MemoryDirectory {
    async fn doctor_by_id(&self, doctor_id: i32) -> Result<Option<DoctorRecord>, DirectoryError> {
        Ok(self
            .doctors
            .lock()
            .expect("directory lock poisoned")
            .get(&doctor_id)
            .cloned())
    }

    async fn clinic_by_id(&self, clinic_id: i32) -> Result<Option<ClinicRecord>, DirectoryError> {
        Ok(self
            .clinics
            .lock()
            .expect("directory lock poisoned")
            .get(&clinic_id)
            .cloned())
    }

    async fn hospital_by_id(
        &self,
        hospital_id: i32,
    ) -> Result<Option<HospitalRecord>, DirectoryError> {
        Ok(self
            .hospitals
            .lock()
            .expect("directory lock poisoned")
            .get(&hospital_id)
            .cloned())
    }
}
