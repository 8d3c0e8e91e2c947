use assert_matches::assert_matches;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use sla_policy_cell::models::{CreatePolicyRequest, UpdatePolicyRequest};
use sla_policy_cell::{PolicyError, PolicyService};
use shared_models::Severity;

struct TestSetup {
    service: PolicyService,
    mock_server: MockServer,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = AppConfig {
            supabase_url: mock_server.uri(),
            supabase_anon_key: "test-key".to_string(),
            sweep_interval_seconds: 60,
            fallback_response_minutes: 15,
        };
        Self {
            service: PolicyService::new(&config),
            mock_server,
        }
    }
}

fn policy_row(policy_id: Uuid, hospital_id: Uuid, active: bool) -> Value {
    json!({
        "id": policy_id,
        "hospital_id": hospital_id,
        "severity": "critical",
        "response_time_minutes": 5,
        "escalation_time_minutes": 10,
        "max_escalation_level": 2,
        "active": active,
        "created_at": chrono::Utc::now().to_rfc3339(),
    })
}

#[tokio::test]
async fn no_active_policy_is_a_silent_none() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/sla_policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let policy = setup
        .service
        .get_active_policy(Uuid::new_v4(), Severity::Critical, None)
        .await
        .unwrap();
    assert!(policy.is_none());
}

#[tokio::test]
async fn active_lookup_filters_on_hospital_severity_and_active() {
    let setup = TestSetup::new().await;
    let hospital_id = Uuid::new_v4();
    let policy_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sla_policies"))
        .and(query_param("hospital_id", format!("eq.{}", hospital_id)))
        .and(query_param("severity", "eq.critical"))
        .and(query_param("active", "eq.true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![policy_row(policy_id, hospital_id, true)]),
        )
        .mount(&setup.mock_server)
        .await;

    let policy = setup
        .service
        .get_active_policy(hospital_id, Severity::Critical, None)
        .await
        .unwrap()
        .expect("the mocked row must come back");
    assert_eq!(policy.id, policy_id);
    assert_eq!(policy.response_time_minutes, 5);
}

#[tokio::test]
async fn creating_an_active_policy_displaces_the_previous_one() {
    let setup = TestSetup::new().await;
    let hospital_id = Uuid::new_v4();
    let old_id = Uuid::new_v4();
    let new_id = Uuid::new_v4();

    // The old active row is patched inactive before the insert.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/sla_policies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![policy_row(old_id, hospital_id, false)]),
        )
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/sla_policies"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(vec![policy_row(new_id, hospital_id, true)]),
        )
        .mount(&setup.mock_server)
        .await;

    let created = setup
        .service
        .create_policy(
            CreatePolicyRequest {
                hospital_id,
                severity: Severity::Critical,
                response_time_minutes: 5,
                escalation_time_minutes: 10,
                max_escalation_level: Some(2),
                active: None,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(created.id, new_id);

    let requests = setup.mock_server.received_requests().await.unwrap();
    let patch_pos = requests
        .iter()
        .position(|r| r.method.as_str() == "PATCH")
        .expect("deactivation PATCH must have happened");
    let post_pos = requests
        .iter()
        .position(|r| r.method.as_str() == "POST")
        .expect("insert POST must have happened");
    assert!(patch_pos < post_pos);

    let patch_body: Value = serde_json::from_slice(&requests[patch_pos].body).unwrap();
    assert_eq!(patch_body, json!({ "active": false }));
}

#[tokio::test]
async fn creating_an_inactive_policy_touches_nothing_else() {
    let setup = TestSetup::new().await;
    let hospital_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/sla_policies"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(vec![policy_row(Uuid::new_v4(), hospital_id, false)]),
        )
        .mount(&setup.mock_server)
        .await;

    setup
        .service
        .create_policy(
            CreatePolicyRequest {
                hospital_id,
                severity: Severity::Critical,
                response_time_minutes: 5,
                escalation_time_minutes: 10,
                max_escalation_level: None,
                active: Some(false),
            },
            None,
        )
        .await
        .unwrap();

    let patches = setup
        .mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .count();
    assert_eq!(patches, 0);
}

#[tokio::test]
async fn invalid_windows_never_reach_the_store() {
    let setup = TestSetup::new().await;

    let err = setup
        .service
        .create_policy(
            CreatePolicyRequest {
                hospital_id: Uuid::new_v4(),
                severity: Severity::Critical,
                response_time_minutes: 0,
                escalation_time_minutes: 10,
                max_escalation_level: None,
                active: None,
            },
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, PolicyError::Validation(_));

    assert!(setup
        .mock_server
        .received_requests()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn update_with_no_fields_returns_the_current_row_unchanged() {
    let setup = TestSetup::new().await;
    let policy_id = Uuid::new_v4();
    let hospital_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sla_policies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![policy_row(policy_id, hospital_id, true)]),
        )
        .mount(&setup.mock_server)
        .await;

    let policy = setup
        .service
        .update_policy(
            policy_id,
            UpdatePolicyRequest {
                response_time_minutes: None,
                escalation_time_minutes: None,
                max_escalation_level: None,
                active: None,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(policy.id, policy_id);

    let patches = setup
        .mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .count();
    assert_eq!(patches, 0);
}

#[tokio::test]
async fn missing_policy_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/sla_policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let err = setup
        .service
        .get_policy(Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert_matches!(err, PolicyError::NotFound(_));
}
