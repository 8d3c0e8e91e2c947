use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use sla_policy_cell::SLAPolicy;

use crate::error::AlertError;
use crate::models::{Alert, AlertStatus, SlaState};

/// Remaining time at or under which a running deadline counts as a
/// warning (the "last five minutes" banner).
pub const WARNING_WINDOW_SECONDS: i64 = 300;

/// Pure state-machine rules for alerts: which transitions are legal,
/// when the next deadline falls, and how an alert stands against it.
/// Nothing here touches the store.
pub struct AlertLifecycleService;

impl AlertLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed.
    pub fn validate_transition(
        &self,
        current: AlertStatus,
        next: AlertStatus,
    ) -> Result<(), AlertError> {
        debug!("Validating alert transition {:?} -> {:?}", current, next);

        if !self.valid_transitions(current).contains(&next) {
            warn!("Invalid alert transition attempted: {:?} -> {:?}", current, next);
            return Err(AlertError::InvalidState(current));
        }

        Ok(())
    }

    /// All valid next statuses for a given current status. Acknowledged
    /// and resolved are sticky: no path leads back to escalation.
    pub fn valid_transitions(&self, current: AlertStatus) -> Vec<AlertStatus> {
        match current {
            AlertStatus::Open => vec![
                AlertStatus::Acknowledged,
                AlertStatus::Resolved,
                AlertStatus::Escalated,
            ],
            // Escalated alerts keep climbing (level+1 stays "escalated")
            // until someone acknowledges or resolves them.
            AlertStatus::Escalated => vec![
                AlertStatus::Acknowledged,
                AlertStatus::Resolved,
                AlertStatus::Escalated,
            ],
            AlertStatus::Acknowledged => vec![AlertStatus::Resolved],
            // Terminal
            AlertStatus::Resolved => vec![],
        }
    }

    /// The next deadline the alert is racing, if any. None once the alert
    /// is acknowledged or resolved, and None when no policy is bound.
    pub fn next_deadline(
        &self,
        alert: &Alert,
        policy: Option<&SLAPolicy>,
    ) -> Option<DateTime<Utc>> {
        if matches!(alert.status, AlertStatus::Resolved | AlertStatus::Acknowledged) {
            return None;
        }

        let policy = policy?;

        if alert.escalation_level == 0 {
            Some(alert.created_at + Duration::minutes(policy.response_time_minutes))
        } else {
            alert
                .escalated_at
                .map(|at| at + Duration::minutes(policy.escalation_time_minutes))
        }
    }

    pub fn remaining_seconds(
        &self,
        alert: &Alert,
        policy: Option<&SLAPolicy>,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        self.next_deadline(alert, policy)
            .map(|deadline| (deadline - now).num_seconds())
    }

    /// Where the alert stands against its deadline at `now`.
    pub fn sla_state(
        &self,
        alert: &Alert,
        policy: Option<&SLAPolicy>,
        now: DateTime<Utc>,
    ) -> SlaState {
        if matches!(alert.status, AlertStatus::Resolved | AlertStatus::Acknowledged) {
            return SlaState::Resolved;
        }

        match self.remaining_seconds(alert, policy, now) {
            // No policy bound: nothing to breach.
            None => SlaState::Safe,
            Some(remaining) if remaining <= 0 => SlaState::Breached,
            Some(remaining) if remaining <= WARNING_WINDOW_SECONDS => SlaState::Warning,
            Some(_) => SlaState::Safe,
        }
    }
}

impl Default for AlertLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
