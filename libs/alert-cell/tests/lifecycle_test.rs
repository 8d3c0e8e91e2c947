use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use alert_cell::models::{Alert, AlertStatus, SlaState};
use alert_cell::services::lifecycle::AlertLifecycleService;
use shared_models::Severity;
use sla_policy_cell::SLAPolicy;

fn alert_at(created_at: DateTime<Utc>, status: AlertStatus) -> Alert {
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

fn policy(response_minutes: i64, escalation_minutes: i64) -> SLAPolicy {
    SLAPolicy {
        id: Uuid::new_v4(),
        hospital_id: Uuid::new_v4(),
        severity: Severity::Critical,
        response_time_minutes: response_minutes,
        escalation_time_minutes: escalation_minutes,
        max_escalation_level: 2,
        active: true,
        created_at: Utc::now(),
    }
}

#[test]
fn open_can_be_acknowledged_resolved_or_escalated() {
    let lifecycle = AlertLifecycleService::new();
    for next in [
        AlertStatus::Acknowledged,
        AlertStatus::Resolved,
        AlertStatus::Escalated,
    ] {
        assert!(lifecycle.validate_transition(AlertStatus::Open, next).is_ok());
    }
}

#[test]
fn escalated_keeps_climbing_until_someone_acts() {
    let lifecycle = AlertLifecycleService::new();
    assert!(lifecycle
        .validate_transition(AlertStatus::Escalated, AlertStatus::Escalated)
        .is_ok());
    assert!(lifecycle
        .validate_transition(AlertStatus::Escalated, AlertStatus::Acknowledged)
        .is_ok());
    assert!(lifecycle
        .validate_transition(AlertStatus::Escalated, AlertStatus::Resolved)
        .is_ok());
}

#[test]
fn acknowledged_is_sticky_with_respect_to_escalation() {
    let lifecycle = AlertLifecycleService::new();
    assert!(lifecycle
        .validate_transition(AlertStatus::Acknowledged, AlertStatus::Escalated)
        .is_err());
    assert!(lifecycle
        .validate_transition(AlertStatus::Acknowledged, AlertStatus::Acknowledged)
        .is_err());
    // Resolving after acknowledgement is still fine.
    assert!(lifecycle
        .validate_transition(AlertStatus::Acknowledged, AlertStatus::Resolved)
        .is_ok());
}

#[test]
fn resolved_is_terminal() {
    let lifecycle = AlertLifecycleService::new();
    assert!(lifecycle.valid_transitions(AlertStatus::Resolved).is_empty());
    for next in [
        AlertStatus::Open,
        AlertStatus::Acknowledged,
        AlertStatus::Resolved,
        AlertStatus::Escalated,
    ] {
        assert!(lifecycle
            .validate_transition(AlertStatus::Resolved, next)
            .is_err());
    }
}

#[test]
fn first_deadline_runs_from_creation() {
    let lifecycle = AlertLifecycleService::new();
    let created = Utc::now();
    let alert = alert_at(created, AlertStatus::Open);
    let policy = policy(5, 10);

    assert_eq!(
        lifecycle.next_deadline(&alert, Some(&policy)),
        Some(created + Duration::minutes(5))
    );
}

#[test]
fn escalated_deadline_runs_from_last_escalation() {
    let lifecycle = AlertLifecycleService::new();
    let created = Utc::now();
    let escalated_at = created + Duration::minutes(11);
    let mut alert = alert_at(created, AlertStatus::Escalated);
    alert.escalation_level = 1;
    alert.escalated_at = Some(escalated_at);
    let policy = policy(5, 10);

    assert_eq!(
        lifecycle.next_deadline(&alert, Some(&policy)),
        Some(escalated_at + Duration::minutes(10))
    );
}

#[test]
fn no_policy_means_no_deadline() {
    let lifecycle = AlertLifecycleService::new();
    let alert = alert_at(Utc::now(), AlertStatus::Open);
    assert_eq!(lifecycle.next_deadline(&alert, None), None);
}

#[test]
fn acknowledged_and_resolved_have_no_deadline() {
    let lifecycle = AlertLifecycleService::new();
    let policy = policy(5, 10);
    for status in [AlertStatus::Acknowledged, AlertStatus::Resolved] {
        let alert = alert_at(Utc::now(), status);
        assert_eq!(lifecycle.next_deadline(&alert, Some(&policy)), None);
    }
}

#[test]
fn sla_state_tracks_the_running_deadline() {
    let lifecycle = AlertLifecycleService::new();
    let created = Utc::now();
    let alert = alert_at(created, AlertStatus::Open);
    let policy = policy(10, 10);

    // Plenty of time left.
    assert_eq!(
        lifecycle.sla_state(&alert, Some(&policy), created + Duration::minutes(1)),
        SlaState::Safe
    );
    // Inside the five-minute warning window.
    assert_eq!(
        lifecycle.sla_state(&alert, Some(&policy), created + Duration::minutes(6)),
        SlaState::Warning
    );
    // Past the deadline.
    assert_eq!(
        lifecycle.sla_state(&alert, Some(&policy), created + Duration::minutes(11)),
        SlaState::Breached
    );
}

#[test]
fn sla_state_is_resolved_once_someone_acted() {
    let lifecycle = AlertLifecycleService::new();
    let policy = policy(10, 10);
    let now = Utc::now() + Duration::hours(2);

    for status in [AlertStatus::Acknowledged, AlertStatus::Resolved] {
        let alert = alert_at(Utc::now(), status);
        assert_eq!(
            lifecycle.sla_state(&alert, Some(&policy), now),
            SlaState::Resolved
        );
    }
}

#[test]
fn sla_state_without_policy_is_safe() {
    let lifecycle = AlertLifecycleService::new();
    let alert = alert_at(Utc::now(), AlertStatus::Open);
    assert_eq!(
        lifecycle.sla_state(&alert, None, Utc::now() + Duration::days(3)),
        SlaState::Safe
    );
}
