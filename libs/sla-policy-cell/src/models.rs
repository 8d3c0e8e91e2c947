use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::Severity;

/// Response-time policy for one (hospital, severity) pair. At most one
/// active policy may exist per pair; absence of a policy means no
/// automatic SLA enforcement for that severity at that hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SLAPolicy {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub severity: Severity,
    /// Minutes allowed until first acknowledgement.
    pub response_time_minutes: i64,
    /// Minutes between escalation steps once the chain is climbing.
    pub escalation_time_minutes: i64,
    /// Depth of the escalation chain for alerts bound to this policy.
    pub max_escalation_level: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_MAX_ESCALATION_LEVEL: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePolicyRequest {
    pub hospital_id: Uuid,
    pub severity: Severity,
    pub response_time_minutes: i64,
    pub escalation_time_minutes: i64,
    pub max_escalation_level: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePolicyRequest {
    pub response_time_minutes: Option<i64>,
    pub escalation_time_minutes: Option<i64>,
    pub max_escalation_level: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyListQuery {
    pub hospital_id: Option<Uuid>,
    pub severity: Option<Severity>,
}
