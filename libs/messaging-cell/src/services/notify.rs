use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{supabase::return_representation, SupabaseClient};

use crate::models::Message;

/// Fire-and-forget message delivery. Callers treat a failure here as a
/// logging event, never as a reason to roll back alert state.
pub struct NotificationService {
    supabase: SupabaseClient,
}

impl NotificationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn notify(
        &self,
        recipient_id: Uuid,
        subject: &str,
        body: &str,
        auth_token: Option<&str>,
    ) -> Result<Message> {
        debug!("Delivering notification to user {}", recipient_id);

        let message_data = json!({
            "sender_id": Value::Null,
            "recipient_id": recipient_id,
            "subject": subject,
            "body": body,
            "is_read": false,
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/messages",
                auth_token,
                Some(message_data),
                Some(return_representation()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Message insert returned no row"))?;

        Ok(serde_json::from_value(row)?)
    }
}
