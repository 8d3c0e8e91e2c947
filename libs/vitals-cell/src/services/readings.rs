use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{supabase::return_representation, SupabaseClient};

use crate::models::{RecordVitalsRequest, VitalReading};

pub struct ReadingService {
    supabase: SupabaseClient,
}

impl ReadingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Persist a reading exactly as submitted. Readings are immutable;
    /// there is no update path.
    pub async fn record_reading(
        &self,
        request: RecordVitalsRequest,
        auth_token: Option<&str>,
    ) -> Result<VitalReading> {
        debug!("Recording vitals for patient {}", request.patient_id);

        let reading_data = json!({
            "patient_id": request.patient_id,
            "visit_id": request.visit_id,
            "heart_rate": request.heart_rate,
            "blood_pressure_systolic": request.blood_pressure_systolic,
            "blood_pressure_diastolic": request.blood_pressure_diastolic,
            "temperature": request.temperature,
            "respiratory_rate": request.respiratory_rate,
            "spo2": request.spo2,
            "recorded_by": request.recorded_by,
            "recorded_at": chrono::Utc::now().to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/vital_readings",
                auth_token,
                Some(reading_data),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Reading insert returned no row"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn get_reading(
        &self,
        reading_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Option<VitalReading>> {
        let path = format!("/rest/v1/vital_readings?id=eq.{}", reading_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}
