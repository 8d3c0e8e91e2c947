use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use alert_cell::models::{Alert, AlertAction, AlertStatus};
use alert_cell::{AlertLogService, PatientLookupService};
use messaging_cell::NotificationService;
use shared_config::AppConfig;
use shared_database::{supabase::return_representation, SupabaseClient};
use sla_policy_cell::{PolicyError, PolicyService, SLAPolicy};
use staff_cell::StaffDirectoryService;

use crate::error::EscalationError;
use crate::models::{EscalationConfig, SweepOutcome, SweepReport};
use crate::services::planner::plan_escalation;

pub const ESCALATION_SUBJECT: &str = "🚨 ESCALATED CRITICAL VITAL ALERT";

/// Walks lapsed alerts up the escalation chain. One long-lived instance
/// is shared by the interval task and the manual sweep endpoint; the
/// mutex guarantees a single sweep at a time without queueing ticks.
pub struct EscalationMonitor {
    supabase: SupabaseClient,
    policies: PolicyService,
    staff: StaffDirectoryService,
    notifier: NotificationService,
    logs: AlertLogService,
    patients: PatientLookupService,
    config: EscalationConfig,
    sweep_lock: Mutex<()>,
}

impl EscalationMonitor {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_chain(config, EscalationConfig::default())
    }

    pub fn with_chain(config: &AppConfig, chain: EscalationConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            policies: PolicyService::new(config),
            staff: StaffDirectoryService::new(config),
            notifier: NotificationService::new(config),
            logs: AlertLogService::new(config),
            patients: PatientLookupService::new(config),
            config: chain,
            sweep_lock: Mutex::new(()),
        }
    }

    /// One pass over every alert whose escalation deadline has lapsed.
    /// A tick that arrives while a sweep is still running is dropped,
    /// not queued.
    pub async fn sweep(&self, auth_token: Option<&str>) -> Result<SweepOutcome, EscalationError> {
        let Ok(_guard) = self.sweep_lock.try_lock() else {
            debug!("Sweep already in progress, dropping this tick");
            return Ok(SweepOutcome::Skipped);
        };

        let now = Utc::now();
        let due = self.due_alerts(now, auth_token).await?;

        let mut report = SweepReport {
            examined: due.len(),
            ..SweepReport::default()
        };

        for alert in due {
            match self.escalate_one(&alert, now, auth_token).await {
                Ok(true) => report.escalated += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    warn!("Escalation of alert {} failed: {}", alert.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            escalated = report.escalated,
            skipped = report.skipped,
            failed = report.failed,
            "Escalation sweep complete"
        );

        Ok(SweepOutcome::Completed(report))
    }

    /// Open or escalated alerts whose escalation deadline is at or before
    /// `now`. Acknowledged and resolved alerts carry a null deadline and
    /// never match.
    async fn due_alerts(
        &self,
        now: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<Vec<Alert>, EscalationError> {
        let cutoff = urlencoding::encode(&now.to_rfc3339()).into_owned();
        let path = format!(
            "/rest/v1/vital_alerts?status=in.(open,escalated)&escalation_deadline=not.is.null&escalation_deadline=lte.{}&order=escalation_deadline.asc",
            cutoff
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

    /// Returns Ok(true) when the alert climbed one level, Ok(false) when
    /// it was skipped (lost race, no policy, no target, plan says no).
    async fn escalate_one(
        &self,
        alert: &Alert,
        now: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<bool, EscalationError> {
        let Some(policy) = self.bound_policy(alert, auth_token).await? else {
            return Ok(false);
        };

        let Some(step) = plan_escalation(alert, Some(&policy), &self.config, now) else {
            return Ok(false);
        };

        let Some(patient) = self
            .patients
            .get_patient_summary(alert.patient_id, auth_token)
            .await?
        else {
            warn!("Alert {} references missing patient {}", alert.id, alert.patient_id);
            return Ok(false);
        };

        // Resolve the target before touching the row. No active user in
        // the role means the alert stays where it is until one exists.
        let Some(target) = self
            .staff
            .find_active_user_by_role(patient.hospital_id, step.target_role, auth_token)
            .await?
        else {
            warn!(
                "No active {} at hospital {} for alert {}",
                step.target_role, patient.hospital_id, alert.id
            );
            return Ok(false);
        };

        // Conditional update: the filter re-checks level and status so a
        // concurrent acknowledge or duplicate sweep loses cleanly.
        let path = format!(
            "/rest/v1/vital_alerts?id=eq.{}&escalation_level=eq.{}&status=in.(open,escalated)",
            alert.id, alert.escalation_level
        );
        let patch = json!({
            "status": AlertStatus::Escalated,
            "escalation_level": step.new_level,
            "escalated_to": step.target_role,
            "escalated_at": now.to_rfc3339(),
            "escalation_deadline": step.new_deadline.map(|d| d.to_rfc3339()),
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

        if result.is_empty() {
            debug!("Alert {} moved before the sweep could escalate it", alert.id);
            return Ok(false);
        }

        info!(
            alert_id = %alert.id,
            level = step.new_level,
            target = %step.target_role,
            "Alert escalated"
        );

        if let Err(e) = self
            .logs
            .append(
                alert.id,
                AlertAction::Escalated,
                None,
                Some(&format!("escalated to {} (level {})", step.target_role, step.new_level)),
                auth_token,
            )
            .await
        {
            warn!("Failed to append escalated log for alert {}: {}", alert.id, e);
        }

        let body = format!(
            "Patient: {}\nSeverity: CRITICAL\nEscalation Level: {}\n\n{}",
            patient.full_name, step.new_level, alert.message
        );
        if let Err(e) = self
            .notifier
            .notify(target.id, ESCALATION_SUBJECT, &body, auth_token)
            .await
        {
            warn!(
                "Failed to notify {} about escalated alert {}: {}",
                target.id, alert.id, e
            );
        }

        Ok(true)
    }

    async fn bound_policy(
        &self,
        alert: &Alert,
        auth_token: Option<&str>,
    ) -> Result<Option<SLAPolicy>, EscalationError> {
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
}
