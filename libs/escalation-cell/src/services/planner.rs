use chrono::{DateTime, Duration, Utc};

use alert_cell::models::{Alert, AlertStatus};
use sla_policy_cell::SLAPolicy;

use crate::models::{EscalationConfig, EscalationStep};

/// Decide whether an alert is due to climb the chain at `now`, and to
/// where. Pure; the monitor owns all side effects.
///
/// None means no escalation fires: the alert is already in someone's
/// hands, has no policy, has not lapsed yet, sits at the policy cap, or
/// the chain has no role for the next level.
pub fn plan_escalation(
    alert: &Alert,
    policy: Option<&SLAPolicy>,
    config: &EscalationConfig,
    now: DateTime<Utc>,
) -> Option<EscalationStep> {
    let policy = policy?;

    if !matches!(alert.status, AlertStatus::Open | AlertStatus::Escalated) {
        return None;
    }

    let deadline = alert.escalation_deadline?;
    if now < deadline {
        return None;
    }

    if alert.escalation_level >= policy.max_escalation_level {
        return None;
    }

    let new_level = alert.escalation_level + 1;
    let target_role = config.role_for_level(new_level)?;

    // The next deadline only runs while another step above this one
    // exists; at the cap the clock stops.
    let can_climb_further =
        new_level < policy.max_escalation_level && config.role_for_level(new_level + 1).is_some();
    let new_deadline =
        can_climb_further.then(|| now + Duration::minutes(policy.escalation_time_minutes));

    Some(EscalationStep {
        new_level,
        target_role,
        new_deadline,
    })
}
