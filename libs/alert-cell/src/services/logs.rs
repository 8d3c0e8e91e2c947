use anyhow::Result;
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{supabase::return_representation, SupabaseClient};

use crate::models::{AlertAction, AlertLog};

/// Append-only writer/reader for the alert audit trail. Rows are never
/// updated or deleted; ordering by creation time is the trail.
pub struct AlertLogService {
    supabase: SupabaseClient,
}

impl AlertLogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn append(
        &self,
        alert_id: Uuid,
        action: AlertAction,
        performed_by: Option<Uuid>,
        notes: Option<&str>,
        auth_token: Option<&str>,
    ) -> Result<()> {
        let log_data = json!({
            "alert_id": alert_id,
            "action": action,
            "performed_by": performed_by,
            "notes": notes,
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        let _: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/vital_alert_logs",
                auth_token,
                Some(log_data),
                Some(return_representation()),
            )
            .await?;

        Ok(())
    }

    pub async fn list_for_alert(
        &self,
        alert_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Vec<AlertLog>> {
        let path = format!(
            "/rest/v1/vital_alert_logs?alert_id=eq.{}&order=created_at.asc",
            alert_id
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
}
