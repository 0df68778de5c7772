use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of record an admin acted on. Corresponds to the `admin_target` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "admin_target", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    User,
    Project,
    Application,
}

/// Audit entry written for every effective moderation decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminAction {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub previous_state: Option<String>,
    pub new_state: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminAction {
    pub fn new(admin_id: Uuid, action: &str, target_type: TargetType, target_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            admin_id,
            action: action.to_string(),
            target_type,
            target_id,
            previous_state: None,
            new_state: None,
            reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_transition(mut self, previous: impl ToString, next: impl ToString) -> Self {
        self.previous_state = Some(previous.to_string());
        self.new_state = Some(next.to_string());
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason.filter(|r| !r.trim().is_empty());
        self
    }
}
