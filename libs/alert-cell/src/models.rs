use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::Role;
use vitals_cell::models::{VitalReading, VitalsClassification};

// ==============================================================================
// CORE ALERT MODELS
// ==============================================================================

/// A tracked critical-vitals event requiring acknowledgement. Alerts are
/// never deleted; the paired log rows are the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub reading_id: Uuid,
    /// The doctor on the patient's current visit, if any. None means the
    /// alert was broadcast to every active doctor of the hospital.
    pub assigned_doctor_id: Option<Uuid>,
    /// Bound SLA policy. None means no automatic escalation for this alert.
    pub policy_id: Option<Uuid>,
    /// Human-readable summary of the critical metrics, carried verbatim
    /// into every escalation notification.
    pub message: String,
    pub status: AlertStatus,
    pub escalation_level: i32,
    pub escalated_to: Option<Role>,
    pub acknowledge_deadline: Option<DateTime<Utc>>,
    pub escalation_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub escalated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Resolved,
    Escalated,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Open => write!(f, "open"),
            AlertStatus::Acknowledged => write!(f, "acknowledged"),
            AlertStatus::Resolved => write!(f, "resolved"),
            AlertStatus::Escalated => write!(f, "escalated"),
        }
    }
}

/// Append-only audit record, one per lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertLog {
    pub id: Uuid,
    pub alert_id: Uuid,
    pub action: AlertAction,
    pub performed_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    Created,
    Acknowledged,
    Resolved,
    Escalated,
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertAction::Created => write!(f, "created"),
            AlertAction::Acknowledged => write!(f, "acknowledged"),
            AlertAction::Resolved => write!(f, "resolved"),
            AlertAction::Escalated => write!(f, "escalated"),
        }
    }
}

/// Where an alert stands against its deadline right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlaState {
    /// Acknowledged or resolved; no deadline is running.
    Resolved,
    Breached,
    Warning,
    Safe,
}

// ==============================================================================
// PATIENT / VISIT READ MODELS
// ==============================================================================

/// The slice of the patient record the alert engine needs. Patient CRUD
/// belongs to a different cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub full_name: String,
    pub hospital_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitAssignment {
    pub assigned_doctor_id: Option<Uuid>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgeRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub user_id: Uuid,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertListQuery {
    pub patient_id: Option<Uuid>,
    pub assigned_doctor_id: Option<Uuid>,
    pub status: Option<AlertStatus>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

/// Result of recording vitals through the intake endpoint: the stored
/// reading, its classification, and the alert when one was opened.
#[derive(Debug, Clone, Serialize)]
pub struct VitalsIntakeResponse {
    pub reading: VitalReading,
    pub classification: VitalsClassification,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlaStateResponse {
    pub alert_id: Uuid,
    pub state: SlaState,
    pub deadline: Option<DateTime<Utc>>,
    pub remaining_seconds: Option<i64>,
}
