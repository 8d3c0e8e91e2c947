use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use alert_cell::models::Alert;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::Severity;
use sla_policy_cell::PolicyService;
use staff_cell::StaffDirectoryService;

use crate::error::ScorecardError;
use crate::models::{DoctorScorecard, HospitalScorecard, SlaScorecard};

pub struct ScorecardService {
    supabase: SupabaseClient,
    policies: PolicyService,
    staff: StaffDirectoryService,
    fallback_response_minutes: i64,
}

impl ScorecardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            policies: PolicyService::new(config),
            staff: StaffDirectoryService::new(config),
            fallback_response_minutes: config.fallback_response_minutes,
        }
    }

    pub async fn doctor_scorecard(
        &self,
        doctor_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<DoctorScorecard, ScorecardError> {
        let doctor = self
            .staff
            .get_user(doctor_id, auth_token)
            .await
            .map_err(|_| ScorecardError::NotFound(format!("User {}", doctor_id)))?;

        let window = match doctor.hospital_id {
            Some(hospital_id) => self.response_window(hospital_id, auth_token).await?,
            None => self.fallback_response_minutes,
        };

        let alerts = self.alerts_for_doctor(doctor_id, auth_token).await?;
        let scorecard = SlaScorecard::compute(&alerts, window);

        Ok(DoctorScorecard {
            doctor_id,
            doctor_name: doctor.display_name().to_string(),
            scorecard,
        })
    }

    /// Per-doctor rows for every active doctor plus a rollup over all of
    /// their alerts, everything measured against the hospital's window.
    pub async fn hospital_scorecard(
        &self,
        hospital_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<HospitalScorecard, ScorecardError> {
        let window = self.response_window(hospital_id, auth_token).await?;
        let doctors = self
            .staff
            .list_active_doctors(hospital_id, auth_token)
            .await?;

        let mut rows = Vec::with_capacity(doctors.len());
        let mut all_alerts = Vec::new();
        for doctor in doctors {
            let alerts = self.alerts_for_doctor(doctor.id, auth_token).await?;
            rows.push(DoctorScorecard {
                doctor_id: doctor.id,
                doctor_name: doctor.display_name().to_string(),
                scorecard: SlaScorecard::compute(&alerts, window),
            });
            all_alerts.extend(alerts);
        }

        let overall = SlaScorecard::compute(&all_alerts, window);

        Ok(HospitalScorecard {
            hospital_id,
            doctors: rows,
            overall,
        })
    }

    /// The hospital's critical response window, or the fallback when no
    /// active policy exists.
    async fn response_window(
        &self,
        hospital_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<i64, ScorecardError> {
        let policy = self
            .policies
            .get_active_policy(hospital_id, Severity::Critical, auth_token)
            .await?;

        Ok(match policy {
            Some(p) => p.response_time_minutes,
            None => {
                debug!(
                    "No critical policy for hospital {}, scoring against {}m",
                    hospital_id, self.fallback_response_minutes
                );
                self.fallback_response_minutes
            }
        })
    }

    async fn alerts_for_doctor(
        &self,
        doctor_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Vec<Alert>, ScorecardError> {
        let path = format!(
            "/rest/v1/vital_alerts?assigned_doctor_id=eq.{}&order=created_at.desc",
            doctor_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        result
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(Into::into))
            .collect()
    }
}
