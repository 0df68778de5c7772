//! Persistence seams.
//!
//! Handlers and services talk to storage only through the traits below.
//! `PgStore` is the production implementation; `MemoryStore` backs tests and
//! local runs without a database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    ActivityError, AdminAction, Application, ApplicationQuery, ApplicationStats, Notification,
    NotificationQuery, Page, Project, ProjectActivity, ProjectQuery, User,
};
use crate::search::TalentQuery;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failure reported by a repository.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ActivityError> for StoreError {
    fn from(error: ActivityError) -> Self {
        match error {
            ActivityError::UnknownRole => StoreError::NotFound("Role"),
            ActivityError::RoleFilled => StoreError::Conflict(error.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: User) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Replaces the stored account. Fails with `NotFound` for unknown ids.
    async fn update_user(&self, user: User) -> StoreResult<User>;
    /// Listed talents matching `query`, newest first.
    async fn list_talents(&self, query: &TalentQuery) -> StoreResult<Page<User>>;
    async fn talent_categories(&self) -> StoreResult<Vec<String>>;
    async fn talent_locations(&self) -> StoreResult<Vec<String>>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, project: Project) -> StoreResult<Project>;
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    /// Writes the owner-editable fields (title, status, description, location,
    /// budget, timeline, tags). Roles and stats are left as stored.
    async fn update_project(&self, project: Project) -> StoreResult<Project>;
    /// Applies `activity` to the current record atomically and returns the result.
    async fn record_project_activity(
        &self,
        id: Uuid,
        activity: &ProjectActivity,
    ) -> StoreResult<Project>;
    /// Returns whether a project was removed.
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;
    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Page<Project>>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert_application(&self, application: Application) -> StoreResult<Application>;
    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>>;
    async fn update_application(&self, application: Application) -> StoreResult<Application>;
    async fn list_applications(&self, query: &ApplicationQuery) -> StoreResult<Page<Application>>;
    async fn application_stats(&self) -> StoreResult<ApplicationStats>;
    /// The application `applicant` already filed for a role, if any.
    async fn find_application_for_role(
        &self,
        applicant: Uuid,
        project: Uuid,
        role_id: &str,
    ) -> StoreResult<Option<Application>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification>;
    /// Notifications addressed to `user`, newest first.
    async fn list_notifications(
        &self,
        user: Uuid,
        query: &NotificationQuery,
    ) -> StoreResult<Page<Notification>>;
    /// Marks one notification read. `None` when it does not belong to `user`.
    async fn mark_notification_read(&self, user: Uuid, id: Uuid)
        -> StoreResult<Option<Notification>>;
    /// Returns how many notifications changed state.
    async fn mark_all_notifications_read(&self, user: Uuid) -> StoreResult<u64>;
    async fn unread_notifications(&self, user: Uuid) -> StoreResult<u64>;
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record_admin_action(&self, action: AdminAction) -> StoreResult<AdminAction>;
    /// Audit trail for one target, oldest first.
    async fn admin_actions_for(&self, target_id: Uuid) -> StoreResult<Vec<AdminAction>>;
}

/// Everything the application needs from storage.
pub trait Store: UserStore + ProjectStore + ApplicationStore + NotificationStore + AuditStore {}

impl<T> Store for T where
    T: UserStore + ProjectStore + ApplicationStore + NotificationStore + AuditStore
{
}
