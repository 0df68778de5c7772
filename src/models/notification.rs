use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pagination::PageRequest;
use crate::search::Filter;

/// Corresponds to the `notification_type` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Application,
    Project,
    System,
    Featured,
    Reminder,
}

string_enum!(NotificationType, "notification type", {
    Application => "application",
    Project => "project",
    System => "system",
    Featured => "featured",
    Reminder => "reminder",
});

/// Corresponds to the `notification_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    View,
    Approve,
    Reject,
    Download,
}

/// Optional call to action rendered with a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub url: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSender {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: Uuid,
    pub title: String,
}

/// A message addressed to a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub priority: NotificationPriority,
    pub action: Option<NotificationAction>,
    pub sender: Option<NotificationSender>,
    pub project: Option<ProjectRef>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread, medium-priority notification. Title and message are cut
    /// to their stored maximums (100 and 500 characters).
    pub fn new(user_id: Uuid, kind: NotificationType, title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: truncate(title, 100),
            message: truncate(message, 500),
            read: false,
            priority: NotificationPriority::Medium,
            action: None,
            sender: None,
            project: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_action(mut self, kind: ActionKind, url: &str, label: &str) -> Self {
        self.action = Some(NotificationAction {
            kind,
            url: Some(url.to_string()),
            label: Some(label.to_string()),
        });
        self
    }

    pub fn with_sender(mut self, id: Uuid, name: &str) -> Self {
        self.sender = Some(NotificationSender {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_project(mut self, id: Uuid, title: &str) -> Self {
        self.project = Some(ProjectRef {
            id,
            title: title.to_string(),
        });
        self
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

/// Criteria for `GET /api/notifications`. Always scoped to one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationQuery {
    pub read: Filter<bool>,
    pub kind: Filter<NotificationType>,
    pub page: PageRequest,
}

impl NotificationQuery {
    pub fn matches(&self, notification: &Notification) -> bool {
        self.read.accepts(&notification.read) && self.kind.accepts(&notification.kind)
    }
}
