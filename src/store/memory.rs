use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{
    ApplicationStore, AuditStore, NotificationStore, ProjectStore, StoreError, StoreResult,
    UserStore,
};
use crate::models::{
    AdminAction, Application, ApplicationQuery, ApplicationStats, Notification,
    NotificationQuery, Page, Project, ProjectActivity, ProjectQuery, User,
};
use crate::search::TalentQuery;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
    admin_actions: Vec<AdminAction>,
}

/// Process-local store. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

/// Newest first. Among equal timestamps the later insertion wins.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = rows.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted
}

fn distinct_sorted<'a>(values: impl Iterator<Item = Option<&'a String>>) -> Vec<String> {
    values
        .flatten()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = crate::models::user::normalize_email(email);
        Ok(self
            .read()?
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.write()?;
        let slot = tables
            .users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(StoreError::NotFound("User"))?;
        *slot = user.clone();
        Ok(user)
    }

    async fn list_talents(&self, query: &TalentQuery) -> StoreResult<Page<User>> {
        let tables = self.read()?;
        let matching: Vec<User> = newest_first(&tables.users, |user| user.created_at)
            .into_iter()
            .filter(|user| query.matches(user))
            .collect();
        Ok(query.page.slice(matching))
    }

    async fn talent_categories(&self) -> StoreResult<Vec<String>> {
        let tables = self.read()?;
        Ok(distinct_sorted(
            tables
                .users
                .iter()
                .filter(|user| user.is_listed_talent())
                .map(|user| user.category.as_ref()),
        ))
    }

    async fn talent_locations(&self) -> StoreResult<Vec<String>> {
        let tables = self.read()?;
        Ok(distinct_sorted(
            tables
                .users
                .iter()
                .filter(|user| user.is_listed_talent())
                .map(|user| user.location.as_ref()),
        ))
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, project: Project) -> StoreResult<Project> {
        self.write()?.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self
            .read()?
            .projects
            .iter()
            .find(|project| project.id == id)
            .cloned())
    }

    async fn update_project(&self, project: Project) -> StoreResult<Project> {
        let mut tables = self.write()?;
        let slot = tables
            .projects
            .iter_mut()
            .find(|existing| existing.id == project.id)
            .ok_or(StoreError::NotFound("Project"))?;
        slot.title = project.title;
        slot.status = project.status;
        slot.description = project.description;
        slot.location = project.location;
        slot.budget = project.budget;
        slot.timeline = project.timeline;
        slot.tags = project.tags;
        slot.updated_at = project.updated_at;
        Ok(slot.clone())
    }

    async fn record_project_activity(
        &self,
        id: Uuid,
        activity: &ProjectActivity,
    ) -> StoreResult<Project> {
        let mut tables = self.write()?;
        let slot = tables
            .projects
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or(StoreError::NotFound("Project"))?;
        activity.apply(slot)?;
        Ok(slot.clone())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let before = tables.projects.len();
        tables.projects.retain(|project| project.id != id);
        Ok(tables.projects.len() != before)
    }

    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Page<Project>> {
        let tables = self.read()?;
        let matching: Vec<Project> = newest_first(&tables.projects, |project| project.created_at)
            .into_iter()
            .filter(|project| query.matches(project))
            .collect();
        Ok(query.page.slice(matching))
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(&self, application: Application) -> StoreResult<Application> {
        let mut tables = self.write()?;
        let duplicate = tables.applications.iter().any(|existing| {
            existing.applicant_id == application.applicant_id
                && existing.project_id == application.project_id
                && existing.role_id == application.role_id
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "You have already applied for this role".into(),
            ));
        }
        tables.applications.push(application.clone());
        Ok(application)
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self
            .read()?
            .applications
            .iter()
            .find(|application| application.id == id)
            .cloned())
    }

    async fn update_application(&self, application: Application) -> StoreResult<Application> {
        let mut tables = self.write()?;
        let slot = tables
            .applications
            .iter_mut()
            .find(|existing| existing.id == application.id)
            .ok_or(StoreError::NotFound("Application"))?;
        *slot = application.clone();
        Ok(application)
    }

    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> StoreResult<Page<Application>> {
        let tables = self.read()?;
        let matching: Vec<Application> =
            newest_first(&tables.applications, |application| application.created_at)
                .into_iter()
                .filter(|application| query.matches(application))
                .collect();
        Ok(query.page.slice(matching))
    }

    async fn application_stats(&self) -> StoreResult<ApplicationStats> {
        let tables = self.read()?;
        let mut stats = ApplicationStats::default();
        for application in &tables.applications {
            stats.count(application.status, 1);
        }
        Ok(stats)
    }

    async fn find_application_for_role(
        &self,
        applicant: Uuid,
        project: Uuid,
        role_id: &str,
    ) -> StoreResult<Option<Application>> {
        Ok(self
            .read()?
            .applications
            .iter()
            .find(|application| {
                application.applicant_id == applicant
                    && application.project_id == project
                    && application.role_id == role_id
            })
            .cloned())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification> {
        self.write()?.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user: Uuid,
        query: &NotificationQuery,
    ) -> StoreResult<Page<Notification>> {
        let tables = self.read()?;
        let matching: Vec<Notification> =
            newest_first(&tables.notifications, |notification| notification.created_at)
                .into_iter()
                .filter(|notification| notification.user_id == user && query.matches(notification))
                .collect();
        Ok(query.page.slice(matching))
    }

    async fn mark_notification_read(
        &self,
        user: Uuid,
        id: Uuid,
    ) -> StoreResult<Option<Notification>> {
        let mut tables = self.write()?;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id && notification.user_id == user)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            }))
    }

    async fn mark_all_notifications_read(&self, user: Uuid) -> StoreResult<u64> {
        let mut tables = self.write()?;
        let mut changed = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|notification| notification.user_id == user && !notification.read)
        {
            notification.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn unread_notifications(&self, user: Uuid) -> StoreResult<u64> {
        Ok(self
            .read()?
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user && !notification.read)
            .count() as u64)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn record_admin_action(&self, action: AdminAction) -> StoreResult<AdminAction> {
        self.write()?.admin_actions.push(action.clone());
        Ok(action)
    }

    async fn admin_actions_for(&self, target_id: Uuid) -> StoreResult<Vec<AdminAction>> {
        Ok(self
            .read()?
            .admin_actions
            .iter()
            .filter(|action| action.target_id == target_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountRole, NotificationType, ProjectInput, ProjectStatus, Purpose, TalentRole,
    };
    use crate::search::Filter;
    use serde_json::json;

    fn project() -> Project {
        let input: ProjectInput = serde_json::from_value(json!({
            "title": "Night Shift",
            "type": "film",
            "status": "active",
            "description": "A short film",
            "location": "Austin, TX",
            "budget": { "min": 100, "max": 900 },
            "timeline": {
                "startDate": "2026-01-01T00:00:00Z",
                "endDate": "2026-02-01T00:00:00Z",
                "castingDeadline": "2026-01-10T00:00:00Z"
            },
            "roles": [{
                "title": "Sound Designer",
                "description": "Foley and mix",
                "type": "production",
                "category": "Sound Design",
                "experience": "3+ years",
                "budget": { "min": 100, "max": 500 }
            }],
            "companyName": "Indie Co"
        }))
        .unwrap();
        Project::new(input, Uuid::new_v4())
    }

    fn talent(name: &str, category: &str) -> User {
        let mut user = User::new(
            name,
            &format!("{}@example.com", name.to_lowercase()),
            "hash".into(),
            AccountRole::Talent,
            Purpose::Talent,
        );
        user.talent_role = Some(TalentRole::Production);
        user.category = Some(category.into());
        user.location = Some("Austin, TX".into());
        user
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_user(talent("ana", "Drama")).await.unwrap();
        let result = store.insert_user(talent("ana", "Editing")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn test_list_talents_is_newest_first_and_paginated() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert_user(talent(name, "Drama")).await.unwrap();
        }
        let query = TalentQuery {
            page: crate::models::PageRequest::from_params(Some(1), Some(2)),
            ..TalentQuery::default()
        };
        let page = store.list_talents(&query).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b"]);
        assert_eq!(page.total, 3);
    }

    #[actix_rt::test]
    async fn test_categories_are_distinct_and_sorted() {
        let store = MemoryStore::new();
        store.insert_user(talent("a", "Sound Design")).await.unwrap();
        store.insert_user(talent("b", "Drama")).await.unwrap();
        store.insert_user(talent("c", "Drama")).await.unwrap();
        assert_eq!(
            store.talent_categories().await.unwrap(),
            vec!["Drama".to_string(), "Sound Design".to_string()]
        );
    }

    #[actix_rt::test]
    async fn test_category_values_are_trimmed() {
        let store = MemoryStore::new();
        store.insert_user(talent("a", "  Drama ")).await.unwrap();
        store.insert_user(talent("b", "Drama")).await.unwrap();
        store.insert_user(talent("c", "   ")).await.unwrap();
        assert_eq!(store.talent_categories().await.unwrap(), vec!["Drama".to_string()]);
    }

    #[actix_rt::test]
    async fn test_owner_edits_leave_counters_alone() {
        let store = MemoryStore::new();
        let stale = store.insert_project(project()).await.unwrap();

        let viewed = store
            .record_project_activity(stale.id, &ProjectActivity::Viewed)
            .await
            .unwrap();
        assert_eq!(viewed.stats.views, 1);

        // An edit based on a copy read before the view keeps the view
        let mut edit = stale.clone();
        edit.title = "Day Shift".into();
        edit.status = ProjectStatus::Casting;
        let updated = store.update_project(edit).await.unwrap();
        assert_eq!(updated.title, "Day Shift");
        assert_eq!(updated.status, ProjectStatus::Casting);
        assert_eq!(updated.stats.views, 1);
    }

    #[actix_rt::test]
    async fn test_second_hire_on_a_role_is_refused() {
        let store = MemoryStore::new();
        let project = store.insert_project(project()).await.unwrap();
        let hired = ProjectActivity::Hired {
            role_id: "role-1".into(),
        };

        let filled = store.record_project_activity(project.id, &hired).await.unwrap();
        assert_eq!(filled.requirements.filled_roles, 1);
        assert_eq!(filled.stats.hired, 1);

        let again = store.record_project_activity(project.id, &hired).await;
        assert!(matches!(again, Err(StoreError::Conflict(_))));
        let missing = store
            .record_project_activity(Uuid::new_v4(), &ProjectActivity::Viewed)
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound("Project"))));
        assert_eq!(store.find_project(project.id).await.unwrap().unwrap().stats.hired, 1);
    }

    #[actix_rt::test]
    async fn test_notifications_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mine = store
            .insert_notification(Notification::new(owner, NotificationType::System, "Hi", "One"))
            .await
            .unwrap();
        store
            .insert_notification(Notification::new(owner, NotificationType::Project, "Hi", "Two"))
            .await
            .unwrap();

        assert!(store.mark_notification_read(other, mine.id).await.unwrap().is_none());
        assert!(store.mark_notification_read(owner, mine.id).await.unwrap().is_some());
        assert_eq!(store.unread_notifications(owner).await.unwrap(), 1);

        let unread = NotificationQuery {
            read: Filter::Only(false),
            ..NotificationQuery::default()
        };
        let page = store.list_notifications(owner, &unread).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(store.mark_all_notifications_read(owner).await.unwrap(), 1);
        assert_eq!(store.unread_notifications(owner).await.unwrap(), 0);
    }
}
