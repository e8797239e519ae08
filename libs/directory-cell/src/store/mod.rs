pub mod memory;
pub mod supabase;

use async_trait::async_trait;

use crate::models::{ClinicRecord, DirectoryError, DoctorRecord, HospitalRecord};

pub use memory::MemoryDirectory;
pub use supabase::SupabaseDirectory;

/// Read-only view of the hospital/doctor/clinic directory.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn doctor_by_id(&self, doctor_id: i32) -> Result<Option<DoctorRecord>, DirectoryError>;

    /// Clinic doctors reuse the clinic id as their doctor id, so booking
    /// name resolution falls back to this with the same identifier.
    async fn clinic_by_id(&self, clinic_id: i32) -> Result<Option<ClinicRecord>, DirectoryError>;

    async fn hospital_by_id(
        &self,
        hospital_id: i32,
    ) -> Result<Option<HospitalRecord>, DirectoryError>;
}
