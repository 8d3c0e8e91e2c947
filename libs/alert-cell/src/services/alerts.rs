use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use messaging_cell::NotificationService;
use shared_config::AppConfig;
use shared_database::{supabase::return_representation, SupabaseClient};
use shared_models::Severity;
use sla_policy_cell::{PolicyError, PolicyService, SLAPolicy};
use staff_cell::StaffDirectoryService;
use vitals_cell::models::{RecordVitalsRequest, VitalMetric, VitalReading, VitalsClassification};
use vitals_cell::services::evaluator::evaluate_reading;
use vitals_cell::ReadingService;

use crate::error::AlertError;
use crate::models::{
    Alert, AlertAction, AlertListQuery, AlertStatus, PatientSummary, SlaStateResponse,
    VitalsIntakeResponse,
};
use crate::services::lifecycle::AlertLifecycleService;
use crate::services::logs::AlertLogService;
use crate::services::patients::PatientLookupService;

pub const ALERT_SUBJECT: &str = "🚨 CRITICAL VITAL ALERT";

/// Creates, acknowledges and resolves alerts. Escalation itself belongs
/// to the escalation monitor; this service only freezes or finishes what
/// the monitor drives.
pub struct AlertService {
    supabase: SupabaseClient,
    lifecycle: AlertLifecycleService,
    policies: PolicyService,
    staff: StaffDirectoryService,
    notifier: NotificationService,
    logs: AlertLogService,
    patients: PatientLookupService,
    readings: ReadingService,
}

impl AlertService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            lifecycle: AlertLifecycleService::new(),
            policies: PolicyService::new(config),
            staff: StaffDirectoryService::new(config),
            notifier: NotificationService::new(config),
            logs: AlertLogService::new(config),
            patients: PatientLookupService::new(config),
            readings: ReadingService::new(config),
        }
    }

    /// Intake flow: persist the reading, classify it, and open an alert
    /// when anything is critical. The reading insert stands even if the
    /// alert step fails; that failure is logged, not propagated.
    pub async fn record_vitals(
        &self,
        request: RecordVitalsRequest,
        auth_token: Option<&str>,
    ) -> Result<VitalsIntakeResponse, AlertError> {
        let reading = self.readings.record_reading(request, auth_token).await?;

        let classification = evaluate_reading(&reading);

        let alert = match self
            .open_alert_if_critical(&reading, &classification, auth_token)
            .await
        {
            Ok(alert) => alert,
            Err(e) => {
                warn!(
                    "Reading {} stored but alert creation failed: {}",
                    reading.id, e
                );
                None
            }
        };

        Ok(VitalsIntakeResponse {
            reading,
            classification,
            alert,
        })
    }

    /// No-op unless the classification contains at least one critical
    /// metric.
    pub async fn open_alert_if_critical(
        &self,
        reading: &VitalReading,
        classification: &VitalsClassification,
        auth_token: Option<&str>,
    ) -> Result<Option<Alert>, AlertError> {
        if !classification.has_critical() {
            return Ok(None);
        }
        let alert = self.open_alert(reading, classification, auth_token).await?;
        Ok(Some(alert))
    }

    pub async fn open_alert(
        &self,
        reading: &VitalReading,
        classification: &VitalsClassification,
        auth_token: Option<&str>,
    ) -> Result<Alert, AlertError> {
        if !classification.has_critical() {
            return Err(AlertError::Validation(
                "reading has no critical vitals".to_string(),
            ));
        }

        let patient = self
            .patients
            .get_patient_summary(reading.patient_id, auth_token)
            .await?
            .ok_or_else(|| AlertError::NotFound(format!("Patient {}", reading.patient_id)))?;

        // No active critical policy is a valid state: the alert is opened
        // without deadlines and never escalates automatically.
        let policy = self
            .policies
            .get_active_policy(patient.hospital_id, Severity::Critical, auth_token)
            .await?;

        let assigned_doctor = self
            .patients
            .current_visit_doctor(reading.patient_id, auth_token)
            .await?;

        let now = Utc::now();
        let deadline = policy
            .as_ref()
            .map(|p| now + Duration::minutes(p.response_time_minutes));
        let message = build_alert_message(&patient.full_name, reading, classification);

        let alert_data = json!({
            "patient_id": patient.id,
            "reading_id": reading.id,
            "assigned_doctor_id": assigned_doctor,
            "policy_id": policy.as_ref().map(|p| p.id),
            "message": message,
            "status": AlertStatus::Open,
            "escalation_level": 0,
            "escalated_to": Value::Null,
            "acknowledge_deadline": deadline.map(|d| d.to_rfc3339()),
            "escalation_deadline": deadline.map(|d| d.to_rfc3339()),
            "created_at": now.to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/vital_alerts",
                auth_token,
                Some(alert_data),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| AlertError::Database("Alert insert returned no row".to_string()))?;
        let alert: Alert = serde_json::from_value(row)?;

        info!(
            alert_id = %alert.id,
            patient_id = %alert.patient_id,
            "Opened critical vital alert"
        );

        if let Err(e) = self
            .logs
            .append(alert.id, AlertAction::Created, None, None, auth_token)
            .await
        {
            warn!("Failed to append created log for alert {}: {}", alert.id, e);
        }

        self.notify_on_open(&alert, &patient, auth_token).await;

        Ok(alert)
    }

    /// Acknowledge freezes escalation. Valid only from open/escalated and
    /// only for roles in the escalation chain.
    pub async fn acknowledge(
        &self,
        alert_id: Uuid,
        user_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Alert, AlertError> {
        let alert = self.get_alert(alert_id, auth_token).await?;

        let actor = self
            .staff
            .get_user(user_id, auth_token)
            .await
            .map_err(|_| AlertError::NotFound(format!("User {}", user_id)))?;
        if !actor.role.can_acknowledge() {
            return Err(AlertError::Validation(format!(
                "role {} cannot acknowledge alerts",
                actor.role
            )));
        }

        self.lifecycle
            .validate_transition(alert.status, AlertStatus::Acknowledged)?;

        // Conditional update: the filter re-checks status so a concurrent
        // sweep or second acknowledger loses cleanly instead of clobbering.
        let now = Utc::now();
        let path = format!(
            "/rest/v1/vital_alerts?id=eq.{}&status=in.(open,escalated)",
            alert_id
        );
        let patch = json!({
            "status": AlertStatus::Acknowledged,
            "acknowledged_at": now.to_rfc3339(),
            "escalation_deadline": Value::Null,
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                auth_token,
                Some(patch),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or(AlertError::InvalidState(alert.status))?;
        let updated: Alert = serde_json::from_value(row)?;

        info!(
            alert_id = %alert_id,
            user_id = %user_id,
            "Alert acknowledged"
        );

        if let Err(e) = self
            .logs
            .append(
                alert_id,
                AlertAction::Acknowledged,
                Some(user_id),
                None,
                auth_token,
            )
            .await
        {
            warn!("Failed to append acknowledged log for alert {}: {}", alert_id, e);
        }

        Ok(updated)
    }

    /// Resolve closes the alert for good. Requires clinical notes.
    pub async fn resolve(
        &self,
        alert_id: Uuid,
        user_id: Uuid,
        notes: &str,
        auth_token: Option<&str>,
    ) -> Result<Alert, AlertError> {
        if notes.trim().is_empty() {
            return Err(AlertError::Validation(
                "resolution notes required".to_string(),
            ));
        }

        let alert = self.get_alert(alert_id, auth_token).await?;
        self.lifecycle
            .validate_transition(alert.status, AlertStatus::Resolved)?;

        let now = Utc::now();
        let path = format!(
            "/rest/v1/vital_alerts?id=eq.{}&status=neq.resolved",
            alert_id
        );
        let patch = json!({
            "status": AlertStatus::Resolved,
            "resolved_at": now.to_rfc3339(),
            "escalation_deadline": Value::Null,
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                auth_token,
                Some(patch),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or(AlertError::InvalidState(alert.status))?;
        let updated: Alert = serde_json::from_value(row)?;

        info!(
            alert_id = %alert_id,
            user_id = %user_id,
            "Alert resolved"
        );

        if let Err(e) = self
            .logs
            .append(
                alert_id,
                AlertAction::Resolved,
                Some(user_id),
                Some(notes),
                auth_token,
            )
            .await
        {
            warn!("Failed to append resolved log for alert {}: {}", alert_id, e);
        }

        Ok(updated)
    }

    pub async fn get_alert(
        &self,
        alert_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Alert, AlertError> {
        let path = format!("/rest/v1/vital_alerts?id=eq.{}", alert_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| AlertError::NotFound(alert_id.to_string()))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_alerts(
        &self,
        query: AlertListQuery,
        auth_token: Option<&str>,
    ) -> Result<Vec<Alert>, AlertError> {
        let mut path = String::from("/rest/v1/vital_alerts?order=created_at.desc");
        if let Some(patient_id) = query.patient_id {
            path.push_str(&format!("&patient_id=eq.{}", patient_id));
        }
        if let Some(doctor_id) = query.assigned_doctor_id {
            path.push_str(&format!("&assigned_doctor_id=eq.{}", doctor_id));
        }
        if let Some(status) = query.status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        if let Some(limit) = query.limit {
            path.push_str(&format!("&limit={}", limit));
        }
        if let Some(offset) = query.offset {
            path.push_str(&format!("&offset={}", offset));
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        result
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(Into::into))
            .collect()
    }

    /// Live SLA position of one alert.
    pub async fn sla_state(
        &self,
        alert_id: Uuid,
        now: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<SlaStateResponse, AlertError> {
        let alert = self.get_alert(alert_id, auth_token).await?;
        let policy = self.bound_policy(&alert, auth_token).await?;

        let state = self.lifecycle.sla_state(&alert, policy.as_ref(), now);
        let deadline = self.lifecycle.next_deadline(&alert, policy.as_ref());
        let remaining = self
            .lifecycle
            .remaining_seconds(&alert, policy.as_ref(), now);

        Ok(SlaStateResponse {
            alert_id,
            state,
            deadline,
            remaining_seconds: remaining,
        })
    }

    async fn bound_policy(
        &self,
        alert: &Alert,
        auth_token: Option<&str>,
    ) -> Result<Option<SLAPolicy>, AlertError> {
        let Some(policy_id) = alert.policy_id else {
            return Ok(None);
        };

        match self.policies.get_policy(policy_id, auth_token).await {
            Ok(policy) => Ok(Some(policy)),
            Err(PolicyError::NotFound(_)) => {
                warn!("Alert {} references missing policy {}", alert.id, policy_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Notify the assigned doctor, or broadcast to every active doctor of
    /// the hospital when nobody is assigned. Delivery failures are logged
    /// and never unwind the alert.
    async fn notify_on_open(
        &self,
        alert: &Alert,
        patient: &PatientSummary,
        auth_token: Option<&str>,
    ) {
        let body = format!(
            "Patient: {}\nSeverity: CRITICAL\n\n{}",
            patient.full_name, alert.message
        );

        let recipients = match alert.assigned_doctor_id {
            Some(doctor_id) => vec![doctor_id],
            None => match self
                .staff
                .list_active_doctors(patient.hospital_id, auth_token)
                .await
            {
                Ok(doctors) => doctors.into_iter().map(|d| d.id).collect(),
                Err(e) => {
                    warn!(
                        "Could not list doctors for hospital {}: {}",
                        patient.hospital_id, e
                    );
                    Vec::new()
                }
            },
        };

        if recipients.is_empty() {
            warn!("Alert {} has no notification recipients", alert.id);
            return;
        }

        for recipient in recipients {
            if let Err(e) = self
                .notifier
                .notify(recipient, ALERT_SUBJECT, &body, auth_token)
                .await
            {
                warn!(
                    "Failed to notify user {} about alert {}: {}",
                    recipient, alert.id, e
                );
            } else {
                debug!("Notified user {} about alert {}", recipient, alert.id);
            }
        }
    }
}

/// Human-readable summary of the critical metrics, with the recorded
/// values spelled out. Carried into every escalation notification.
pub fn build_alert_message(
    patient_name: &str,
    reading: &VitalReading,
    classification: &VitalsClassification,
) -> String {
    let mut parts = Vec::new();
    for metric in classification.critical_metrics() {
        let value = match metric {
            VitalMetric::BloodPressure => format!(
                "blood pressure {}/{} mmHg",
                reading.blood_pressure_systolic.unwrap_or_default(),
                reading.blood_pressure_diastolic.unwrap_or_default()
            ),
            VitalMetric::Temperature => {
                format!("temperature {:.1}°C", reading.temperature.unwrap_or_default())
            }
            VitalMetric::Pulse => {
                format!("pulse {} bpm", reading.heart_rate.unwrap_or_default())
            }
            VitalMetric::Spo2 => format!("SpO2 {}%", reading.spo2.unwrap_or_default()),
        };
        parts.push(value);
    }

    format!(
        "Critical vitals recorded for {}: {}",
        patient_name,
        parts.join("; ")
    )
}
