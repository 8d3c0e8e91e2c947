use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{PatientSummary, VisitAssignment};

/// Read-only view of patient and visit records. The alert engine only
/// needs a name, a hospital, and the doctor on the current visit.
pub struct PatientLookupService {
    supabase: SupabaseClient,
}

impl PatientLookupService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_patient_summary(
        &self,
        patient_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Option<PatientSummary>> {
        let path = format!(
            "/rest/v1/patients?id=eq.{}&select=id,full_name,hospital_id",
            patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// The doctor assigned to the patient's current (undischarged) visit,
    /// if there is one. None means the patient has no attending doctor
    /// right now and alerts for them broadcast.
    pub async fn current_visit_doctor(
        &self,
        patient_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Option<Uuid>> {
        let path = format!(
            "/rest/v1/patient_visits?patient_id=eq.{}&discharged_at=is.null&select=assigned_doctor_id&order=admitted_at.desc&limit=1",
            patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let assignment = match result.into_iter().next() {
            Some(row) => serde_json::from_value::<VisitAssignment>(row)?,
            None => {
                debug!("Patient {} has no active visit", patient_id);
                return Ok(None);
            }
        };

        Ok(assignment.assigned_doctor_id)
    }
}
