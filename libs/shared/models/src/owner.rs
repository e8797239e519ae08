use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinics and hospital doctors share one identifier namespace: a clinic's
/// `clinic_id` is used as the `doctor_id` on its slots and bookings. The tag
/// records which kind of owner a record belongs to instead of leaving callers
/// to infer it from lookup fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    HospitalDoctor,
    Clinic,
}

impl OwnerKind {
    /// Clinic-owned slots are created with `hospital_id = 0`.
    pub fn from_hospital_id(hospital_id: i32) -> Self {
        if hospital_id == 0 {
            OwnerKind::Clinic
        } else {
            OwnerKind::HospitalDoctor
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKind::HospitalDoctor => write!(f, "hospital_doctor"),
            OwnerKind::Clinic => write!(f, "clinic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hospital_id_means_clinic() {
        assert_eq!(OwnerKind::from_hospital_id(0), OwnerKind::Clinic);
        assert_eq!(OwnerKind::from_hospital_id(3), OwnerKind::HospitalDoctor);
    }
}
