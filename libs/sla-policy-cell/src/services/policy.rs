use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{supabase::return_representation, SupabaseClient};
use shared_models::Severity;

use crate::error::PolicyError;
use crate::models::{
    CreatePolicyRequest, PolicyListQuery, SLAPolicy, UpdatePolicyRequest,
    DEFAULT_MAX_ESCALATION_LEVEL,
};

pub struct PolicyService {
    supabase: SupabaseClient,
}

impl PolicyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Resolve the unique active policy for a (hospital, severity) pair.
    /// None is a valid, silent answer: no automatic SLA enforcement.
    pub async fn get_active_policy(
        &self,
        hospital_id: Uuid,
        severity: Severity,
        auth_token: Option<&str>,
    ) -> Result<Option<SLAPolicy>, PolicyError> {
        let path = format!(
            "/rest/v1/sla_policies?hospital_id=eq.{}&severity=eq.{}&active=eq.true&order=created_at.desc",
            hospital_id, severity
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        if result.len() > 1 {
            warn!(
                "{} active {} policies for hospital {}, using newest",
                result.len(),
                severity,
                hospital_id
            );
        }

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_policies(
        &self,
        query: PolicyListQuery,
        auth_token: Option<&str>,
    ) -> Result<Vec<SLAPolicy>, PolicyError> {
        let mut path = String::from("/rest/v1/sla_policies?order=created_at.desc");
        if let Some(hospital_id) = query.hospital_id {
            path.push_str(&format!("&hospital_id=eq.{}", hospital_id));
        }
        if let Some(severity) = query.severity {
            path.push_str(&format!("&severity=eq.{}", severity));
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

    /// Create a policy. When the new policy is active, any existing active
    /// policy for the same (hospital, severity) is deactivated first so the
    /// uniqueness invariant holds without silent duplication.
    pub async fn create_policy(
        &self,
        request: CreatePolicyRequest,
        auth_token: Option<&str>,
    ) -> Result<SLAPolicy, PolicyError> {
        validate_windows(
            request.response_time_minutes,
            request.escalation_time_minutes,
            request.max_escalation_level,
        )?;

        let active = request.active.unwrap_or(true);
        if active {
            self.deactivate_active_policies(request.hospital_id, request.severity, auth_token)
                .await?;
        }

        let policy_data = json!({
            "hospital_id": request.hospital_id,
            "severity": request.severity,
            "response_time_minutes": request.response_time_minutes,
            "escalation_time_minutes": request.escalation_time_minutes,
            "max_escalation_level": request
                .max_escalation_level
                .unwrap_or(DEFAULT_MAX_ESCALATION_LEVEL),
            "active": active,
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/sla_policies",
                auth_token,
                Some(policy_data),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| PolicyError::Database("Policy insert returned no row".to_string()))?;

        let policy: SLAPolicy = serde_json::from_value(row)?;
        debug!("Created {} policy {} ", policy.severity, policy.id);
        Ok(policy)
    }

    pub async fn update_policy(
        &self,
        policy_id: Uuid,
        request: UpdatePolicyRequest,
        auth_token: Option<&str>,
    ) -> Result<SLAPolicy, PolicyError> {
        let current = self.get_policy(policy_id, auth_token).await?;

        let response_minutes = request
            .response_time_minutes
            .unwrap_or(current.response_time_minutes);
        let escalation_minutes = request
            .escalation_time_minutes
            .unwrap_or(current.escalation_time_minutes);
        validate_windows(response_minutes, escalation_minutes, request.max_escalation_level)?;

        // Activating a previously inactive policy displaces the current
        // active one for the pair.
        if request.active == Some(true) && !current.active {
            self.deactivate_active_policies(current.hospital_id, current.severity, auth_token)
                .await?;
        }

        let mut patch = Map::new();
        if let Some(v) = request.response_time_minutes {
            patch.insert("response_time_minutes".to_string(), json!(v));
        }
        if let Some(v) = request.escalation_time_minutes {
            patch.insert("escalation_time_minutes".to_string(), json!(v));
        }
        if let Some(v) = request.max_escalation_level {
            patch.insert("max_escalation_level".to_string(), json!(v));
        }
        if let Some(v) = request.active {
            patch.insert("active".to_string(), json!(v));
        }

        if patch.is_empty() {
            return Ok(current);
        }

        let path = format!("/rest/v1/sla_policies?id=eq.{}", policy_id);
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                auth_token,
                Some(Value::Object(patch)),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| PolicyError::NotFound(policy_id.to_string()))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn get_policy(
        &self,
        policy_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<SLAPolicy, PolicyError> {
        let path = format!("/rest/v1/sla_policies?id=eq.{}", policy_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| PolicyError::NotFound(policy_id.to_string()))?;

        Ok(serde_json::from_value(row)?)
    }

    async fn deactivate_active_policies(
        &self,
        hospital_id: Uuid,
        severity: Severity,
        auth_token: Option<&str>,
    ) -> Result<(), PolicyError> {
        let path = format!(
            "/rest/v1/sla_policies?hospital_id=eq.{}&severity=eq.{}&active=eq.true",
            hospital_id, severity
        );
        let displaced: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                auth_token,
                Some(json!({ "active": false })),
                Some(return_representation()),
            )
            .await?;

        if !displaced.is_empty() {
            debug!(
                "Deactivated {} previous {} policy row(s) for hospital {}",
                displaced.len(),
                severity,
                hospital_id
            );
        }

        Ok(())
    }
}

fn validate_windows(
    response_minutes: i64,
    escalation_minutes: i64,
    max_level: Option<i32>,
) -> Result<(), PolicyError> {
    if response_minutes <= 0 {
        return Err(PolicyError::Validation(
            "response_time_minutes must be positive".to_string(),
        ));
    }
    if escalation_minutes <= 0 {
        return Err(PolicyError::Validation(
            "escalation_time_minutes must be positive".to_string(),
        ));
    }
    if let Some(level) = max_level {
        if level < 1 {
            return Err(PolicyError::Validation(
                "max_escalation_level must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}
