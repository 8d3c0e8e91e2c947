use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::{Role, User};

pub struct StaffDirectoryService {
    supabase: SupabaseClient,
}

impl StaffDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// First active user carrying `role` at the hospital, or None.
    /// Escalation targets are resolved through this lookup.
    pub async fn find_active_user_by_role(
        &self,
        hospital_id: Uuid,
        role: Role,
        auth_token: Option<&str>,
    ) -> Result<Option<User>> {
        debug!("Looking up active {} for hospital {}", role, hospital_id);

        let path = format!(
            "/rest/v1/users?hospital_id=eq.{}&role=eq.{}&is_active=eq.true&order=created_at.asc&limit=1",
            hospital_id, role
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Every active doctor of the hospital. Unassigned alerts broadcast
    /// their notification to this set.
    pub async fn list_active_doctors(
        &self,
        hospital_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Vec<User>> {
        let path = format!(
            "/rest/v1/users?hospital_id=eq.{}&role=eq.doctor&is_active=eq.true",
            hospital_id
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

    pub async fn get_user(&self, user_id: Uuid, auth_token: Option<&str>) -> Result<User> {
        let path = format!("/rest/v1/users?id=eq.{}", user_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("User not found: {}", user_id))?;

        Ok(serde_json::from_value(row)?)
    }
}
