use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_database::SupabaseClient;

use crate::models::{ClinicRecord, DirectoryError, DoctorRecord, HospitalRecord};
use crate::store::DirectoryLookup;

pub struct SupabaseDirectory {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDirectory {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn fetch_first<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, DirectoryError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| DirectoryError::Database(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| DirectoryError::Database(format!("Failed to parse record: {}", e))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DirectoryLookup for SupabaseDirectory {
    async fn doctor_by_id(&self, doctor_id: i32) -> Result<Option<DoctorRecord>, DirectoryError> {
        debug!("Looking up doctor {}", doctor_id);
        self.fetch_first(&format!("/rest/v1/doctors?doctor_id=eq.{}", doctor_id))
            .await
    }

    async fn clinic_by_id(&self, clinic_id: i32) -> Result<Option<ClinicRecord>, DirectoryError> {
        debug!("Looking up clinic {}", clinic_id);
        self.fetch_first(&format!("/rest/v1/clinics?clinic_id=eq.{}", clinic_id))
            .await
    }

    async fn hospital_by_id(
        &self,
        hospital_id: i32,
    ) -> Result<Option<HospitalRecord>, DirectoryError> {
        debug!("Looking up hospital {}", hospital_id);
        self.fetch_first(&format!("/rest/v1/hospitals?hospital_id=eq.{}", hospital_id))
            .await
    }
}
