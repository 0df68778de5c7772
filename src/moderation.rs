//! Admin moderation of applications and accounts.
//!
//! A decision on an application is taken once: approving moves a pending
//! application to `shortlisted`, rejecting moves it to `rejected`. Repeating
//! the decision already recorded is accepted and changes nothing; a
//! conflicting decision is refused. Every effective decision is audited and
//! the applicant is notified. Audit and notification failures are logged and
//! never fail the decision itself.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    ActionKind, AdminAction, Application, ApplicationQuery, ApplicationStats, ApplicationStatus,
    Notification, NotificationPriority, NotificationType, Page, PageRequest, Project,
    ProjectActivity, TargetType, User,
};
use crate::search::Filter;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(&self) -> ApplicationStatus {
        match self {
            Decision::Approve => ApplicationStatus::Shortlisted,
            Decision::Reject => ApplicationStatus::Rejected,
        }
    }

    fn action_name(&self) -> &'static str {
        match self {
            Decision::Approve => "approve_application",
            Decision::Reject => "reject_application",
        }
    }
}

pub struct ModerationService<'a> {
    store: &'a dyn Store,
}

impl<'a> ModerationService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        status: Filter<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>, AppError> {
        let query = ApplicationQuery {
            status,
            page,
            ..ApplicationQuery::default()
        };
        Ok(self.store.list_applications(&query).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Application, AppError> {
        self.store
            .find_application(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))
    }

    pub async fn stats(&self) -> Result<ApplicationStats, AppError> {
        Ok(self.store.application_stats().await?)
    }

    pub async fn approve(&self, admin: Uuid, id: Uuid) -> Result<Application, AppError> {
        self.decide(admin, id, Decision::Approve, None).await
    }

    pub async fn reject(
        &self,
        admin: Uuid,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<Application, AppError> {
        self.decide(admin, id, Decision::Reject, reason).await
    }

    async fn decide(
        &self,
        admin: Uuid,
        id: Uuid,
        decision: Decision,
        reason: Option<String>,
    ) -> Result<Application, AppError> {
        let mut application = self.get(id).await?;
        let target = decision.target_status();

        if application.status == target {
            log::info!("Application {} already {}; nothing to do", id, target);
            return Ok(application);
        }
        if application.status != ApplicationStatus::Pending {
            return Err(AppError::BadRequest(
                "Application has already been processed".into(),
            ));
        }

        let previous = application.status;
        application.review(target, admin);
        let reason = reason.filter(|r| !r.trim().is_empty());
        if let Some(reason) = &reason {
            application.notes = Some(reason.trim().to_string());
        }
        let application = self.store.update_application(application).await?;
        log::info!("Admin {} set application {} to {}", admin, id, target);

        let project = self.bump_project_stats(&application, decision).await;

        self.audit(
            AdminAction::new(admin, decision.action_name(), TargetType::Application, id)
                .with_transition(previous, target)
                .with_reason(reason),
        )
        .await;

        self.notify_applicant(admin, &application, project.as_ref(), decision)
            .await;

        Ok(application)
    }

    async fn bump_project_stats(
        &self,
        application: &Application,
        decision: Decision,
    ) -> Option<Project> {
        let result = match decision {
            Decision::Approve => {
                self.store
                    .record_project_activity(application.project_id, &ProjectActivity::Shortlisted)
                    .await
            }
            Decision::Reject => self
                .store
                .find_project(application.project_id)
                .await
                .and_then(|project| project.ok_or(StoreError::NotFound("Project"))),
        };
        match result {
            Ok(project) => Some(project),
            Err(StoreError::NotFound(_)) => {
                log::warn!(
                    "Project {} of application {} no longer exists",
                    application.project_id,
                    application.id
                );
                None
            }
            Err(e) => {
                log::error!(
                    "Failed to update stats of project {}: {}",
                    application.project_id,
                    e
                );
                None
            }
        }
    }

    async fn notify_applicant(
        &self,
        admin: Uuid,
        application: &Application,
        project: Option<&Project>,
        decision: Decision,
    ) {
        let project_title = project.map_or("a project", |p| p.title.as_str());
        let (title, message, priority) = match decision {
            Decision::Approve => (
                "Application shortlisted",
                format!("Your application for {} has been shortlisted.", project_title),
                NotificationPriority::High,
            ),
            Decision::Reject => (
                "Application update",
                format!("Your application for {} was not selected.", project_title),
                NotificationPriority::Medium,
            ),
        };

        let mut notification = Notification::new(
            application.applicant_id,
            NotificationType::Application,
            title,
            &message,
        )
        .with_priority(priority)
        .with_sender(admin, "Admin")
        .with_action(ActionKind::View, "/applications", "View application");
        if let Some(project) = project {
            notification = notification.with_project(project.id, &project.title);
        }

        if let Err(e) = self.store.insert_notification(notification).await {
            log::error!(
                "Failed to notify applicant {} about application {}: {}",
                application.applicant_id,
                application.id,
                e
            );
        }
    }

    async fn audit(&self, action: AdminAction) {
        let target = action.target_id;
        if let Err(e) = self.store.record_admin_action(action).await {
            log::error!("Failed to record admin action on {}: {}", target, e);
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Marks an account verified. Verifying twice is a no-op.
    pub async fn verify_user(&self, admin: Uuid, id: Uuid) -> Result<User, AppError> {
        let mut user = self.find_user(id).await?;
        if user.is_verified {
            return Ok(user);
        }
        user.is_verified = true;
        user.updated_at = Utc::now();
        let user = self.store.update_user(user).await?;
        log::info!("Admin {} verified user {}", admin, id);

        self.audit(
            AdminAction::new(admin, "verify_user", TargetType::User, id)
                .with_transition("unverified", "verified"),
        )
        .await;
        Ok(user)
    }

    /// Soft-deletes an account: it can no longer log in or appear in listings.
    pub async fn deactivate_user(&self, admin: Uuid, id: Uuid) -> Result<User, AppError> {
        if admin == id {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".into(),
            ));
        }
        let mut user = self.find_user(id).await?;
        if !user.is_active {
            return Ok(user);
        }
        user.is_active = false;
        user.updated_at = Utc::now();
        let user = self.store.update_user(user).await?;
        log::info!("Admin {} deactivated user {}", admin, id);

        self.audit(
            AdminAction::new(admin, "deactivate_user", TargetType::User, id)
                .with_transition("active", "inactive"),
        )
        .await;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountRole, ApplicationInput, Budget, ProjectInput, ProjectRoleInput, ProjectStatus,
        ProjectType, Purpose, RoleBudget, TalentRole, Timeline,
    };
    use crate::store::{
        ApplicationStore, AuditStore, MemoryStore, NotificationStore, ProjectStore, UserStore,
    };
    use chrono::Duration;

    async fn seed(store: &MemoryStore) -> (Uuid, Application) {
        let start = Utc::now();
        let owner = User::new(
            "Studio",
            "studio@example.com",
            "hash".into(),
            AccountRole::Client,
            Purpose::Professional,
        );
        let applicant = User::new(
            "Ana",
            "ana@example.com",
            "hash".into(),
            AccountRole::Talent,
            Purpose::Talent,
        );
        let admin = Uuid::new_v4();
        let mut project = Project::new(
            ProjectInput {
                title: "Night Shift".into(),
                project_type: ProjectType::Film,
                status: Some(ProjectStatus::Casting),
                description: "A short film".into(),
                location: "Austin, TX".into(),
                budget: Budget {
                    min: 0.0,
                    max: 100.0,
                    currency: "USD".into(),
                },
                timeline: Timeline {
                    start_date: start,
                    end_date: start + Duration::days(10),
                    casting_deadline: start + Duration::days(2),
                },
                roles: vec![ProjectRoleInput {
                    id: None,
                    title: "Lead".into(),
                    description: "Lead role".into(),
                    role_type: TalentRole::Acting,
                    category: "Drama".into(),
                    experience: "Any".into(),
                    skills: vec![],
                    budget: RoleBudget { min: 0.0, max: 50.0 },
                }],
                company_name: "Studio".into(),
                tags: vec![],
            },
            owner.id,
        );
        project.stats.applications = 1;
        let application = Application::new(
            ApplicationInput {
                project_id: project.id,
                role_id: "role-1".into(),
                cover_letter: None,
                portfolio: vec![],
                proposed_rate: None,
            },
            applicant.id,
        );
        store.insert_user(owner).await.unwrap();
        store.insert_user(applicant).await.unwrap();
        store.insert_project(project).await.unwrap();
        let application = store.insert_application(application).await.unwrap();
        (admin, application)
    }

    #[actix_rt::test]
    async fn test_approve_shortlists_audits_and_notifies() {
        let store = MemoryStore::new();
        let (admin, application) = seed(&store).await;
        let service = ModerationService::new(&store);

        let approved = service.approve(admin, application.id).await.unwrap();
        assert_eq!(approved.status, ApplicationStatus::Shortlisted);
        assert_eq!(approved.reviewed_by, Some(admin));

        let project = store.find_project(application.project_id).await.unwrap().unwrap();
        assert_eq!(project.stats.shortlisted, 1);

        let trail = store.admin_actions_for(application.id).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].new_state.as_deref(), Some("shortlisted"));

        assert_eq!(
            store.unread_notifications(application.applicant_id).await.unwrap(),
            1
        );
    }

    #[actix_rt::test]
    async fn test_reapproval_is_a_silent_no_op() {
        let store = MemoryStore::new();
        let (admin, application) = seed(&store).await;
        let service = ModerationService::new(&store);

        let first = service.approve(admin, application.id).await.unwrap();
        let second = service.approve(admin, application.id).await.unwrap();
        assert_eq!(first, second);

        let project = store.find_project(application.project_id).await.unwrap().unwrap();
        assert_eq!(project.stats.shortlisted, 1);
        assert_eq!(store.admin_actions_for(application.id).await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_conflicting_decision_is_refused() {
        let store = MemoryStore::new();
        let (admin, application) = seed(&store).await;
        let service = ModerationService::new(&store);

        service
            .reject(admin, application.id, Some("Role recast".into()))
            .await
            .unwrap();
        let result = service.approve(admin, application.id).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let stored = service.get(application.id).await.unwrap();
        assert_eq!(stored.status, ApplicationStatus::Rejected);
        assert_eq!(stored.notes.as_deref(), Some("Role recast"));
    }

    #[actix_rt::test]
    async fn test_unknown_application_is_not_found() {
        let store = MemoryStore::new();
        let service = ModerationService::new(&store);
        let result = service.reject(Uuid::new_v4(), Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_user_verification_and_deactivation() {
        let store = MemoryStore::new();
        let (admin, application) = seed(&store).await;
        let service = ModerationService::new(&store);
        let talent = application.applicant_id;

        assert!(service.verify_user(admin, talent).await.unwrap().is_verified);
        assert!(!service.deactivate_user(admin, talent).await.unwrap().is_active);
        assert!(matches!(
            service.deactivate_user(admin, admin).await,
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(store.admin_actions_for(talent).await.unwrap().len(), 2);
    }

    #[actix_rt::test]
    async fn test_stats_count_by_status() {
        let store = MemoryStore::new();
        let (admin, application) = seed(&store).await;
        let service = ModerationService::new(&store);
        service.approve(admin, application.id).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.shortlisted, 1);
        assert_eq!(stats.pending, 0);
    }
}
