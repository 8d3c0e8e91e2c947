use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use alert_cell::models::{Alert, AlertStatus};
use escalation_cell::models::EscalationConfig;
use escalation_cell::plan_escalation;
use shared_models::{Role, Severity};
use sla_policy_cell::SLAPolicy;

fn alert(created_at: DateTime<Utc>, status: AlertStatus) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        reading_id: Uuid::new_v4(),
        assigned_doctor_id: None,
        policy_id: Some(Uuid::new_v4()),
        message: "Critical vitals".to_string(),
        status,
        escalation_level: 0,
        escalated_to: None,
        acknowledge_deadline: Some(created_at + Duration::minutes(5)),
        escalation_deadline: Some(created_at + Duration::minutes(5)),
        created_at,
        acknowledged_at: None,
        resolved_at: None,
        escalated_at: None,
    }
}

fn policy(response_minutes: i64, escalation_minutes: i64, max_level: i32) -> SLAPolicy {
    SLAPolicy {
        id: Uuid::new_v4(),
        hospital_id: Uuid::new_v4(),
        severity: Severity::Critical,
        response_time_minutes: response_minutes,
        escalation_time_minutes: escalation_minutes,
        max_escalation_level: max_level,
        active: true,
        created_at: Utc::now(),
    }
}

#[test]
fn walks_the_whole_chain_then_stops() {
    let config = EscalationConfig::default();
    let policy = policy(5, 10, 2);
    let t0 = Utc::now();

    // First lapse: level 0 -> 1, to the head doctor, next deadline runs.
    let mut alert = alert(t0, AlertStatus::Open);
    let t1 = t0 + Duration::minutes(11);
    let step = plan_escalation(&alert, Some(&policy), &config, t1).unwrap();
    assert_eq!(step.new_level, 1);
    assert_eq!(step.target_role, Role::HeadDoctor);
    assert_eq!(step.new_deadline, Some(t1 + Duration::minutes(10)));

    // Second lapse: level 1 -> 2, to the admin. The cap is reached so the
    // clock stops.
    alert.status = AlertStatus::Escalated;
    alert.escalation_level = 1;
    alert.escalated_at = Some(t1);
    alert.escalation_deadline = step.new_deadline;
    let t2 = t1 + Duration::minutes(11);
    let step = plan_escalation(&alert, Some(&policy), &config, t2).unwrap();
    assert_eq!(step.new_level, 2);
    assert_eq!(step.target_role, Role::Admin);
    assert_eq!(step.new_deadline, None);

    // At the cap nothing more fires, no matter how late it gets.
    alert.escalation_level = 2;
    alert.escalated_at = Some(t2);
    alert.escalation_deadline = Some(t2);
    let t3 = t2 + Duration::days(1);
    assert!(plan_escalation(&alert, Some(&policy), &config, t3).is_none());
}

#[test]
fn nothing_fires_before_the_deadline() {
    let config = EscalationConfig::default();
    let policy = policy(5, 10, 2);
    let t0 = Utc::now();
    let alert = alert(t0, AlertStatus::Open);

    assert!(plan_escalation(&alert, Some(&policy), &config, t0 + Duration::minutes(4)).is_none());
    // The deadline instant itself counts as lapsed.
    assert!(plan_escalation(&alert, Some(&policy), &config, t0 + Duration::minutes(5)).is_some());
}

#[test]
fn acknowledged_and_resolved_alerts_never_escalate() {
    let config = EscalationConfig::default();
    let policy = policy(5, 10, 2);
    let t0 = Utc::now();
    let late = t0 + Duration::hours(5);

    for status in [AlertStatus::Acknowledged, AlertStatus::Resolved] {
        let alert = alert(t0, status);
        assert!(plan_escalation(&alert, Some(&policy), &config, late).is_none());
    }
}

#[test]
fn no_policy_or_no_deadline_means_no_escalation() {
    let config = EscalationConfig::default();
    let policy = policy(5, 10, 2);
    let t0 = Utc::now();
    let late = t0 + Duration::hours(5);

    let unbound = alert(t0, AlertStatus::Open);
    assert!(plan_escalation(&unbound, None, &config, late).is_none());

    let mut frozen = alert(t0, AlertStatus::Open);
    frozen.escalation_deadline = None;
    assert!(plan_escalation(&frozen, Some(&policy), &config, late).is_none());
}

#[test]
fn chain_shorter_than_the_policy_cap_stops_the_climb() {
    // Only one role in the chain but the policy allows three levels.
    let config = EscalationConfig {
        chain: vec![Role::HeadDoctor],
    };
    let policy = policy(5, 10, 3);
    let t0 = Utc::now();
    let late = t0 + Duration::hours(1);

    let fresh = alert(t0, AlertStatus::Open);
    let step = plan_escalation(&fresh, Some(&policy), &config, late).unwrap();
    assert_eq!(step.new_level, 1);
    assert_eq!(step.target_role, Role::HeadDoctor);
    // Level 2 has no role, so no further deadline runs.
    assert_eq!(step.new_deadline, None);

    let mut at_end = alert(t0, AlertStatus::Escalated);
    at_end.escalation_level = 1;
    at_end.escalation_deadline = Some(late);
    assert!(plan_escalation(&at_end, Some(&policy), &config, late + Duration::hours(1)).is_none());
}

#[test]
fn role_for_level_indexes_the_chain_from_one() {
    let config = EscalationConfig::default();
    assert_eq!(config.role_for_level(0), None);
    assert_eq!(config.role_for_level(1), Some(Role::HeadDoctor));
    assert_eq!(config.role_for_level(2), Some(Role::Admin));
    assert_eq!(config.role_for_level(3), None);
}
