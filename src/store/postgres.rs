//! `sqlx` implementation of the repository traits.
//!
//! Listing queries are assembled the same way for every table: a fixed base
//! predicate, then one `AND` condition per constrained filter with a numbered
//! placeholder, then the binds in the same order. Every dynamic bind is text
//! and cast inside the SQL, so one bind list serves both the `COUNT(*)` and
//! the page query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{
    ApplicationStore, AuditStore, NotificationStore, ProjectStore, StoreError, StoreResult,
    UserStore,
};
use crate::models::{
    AdminAction, Application, ApplicationQuery, ApplicationStats, ApplicationStatus,
    Budget, Company, Notification, NotificationAction, NotificationPriority, NotificationQuery,
    NotificationSender, NotificationType, Page, PageRequest, PortfolioItem, Project,
    ProjectActivity, ProjectQuery, ProjectRef, ProjectStats, ProjectStatus, ProjectType,
    Requirements, Timeline, User,
};
use crate::search::{contains_pattern, Filter, TalentQuery};

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, role, purpose, talent_role, \
     category, experience, skills, languages, location, has_disability, disability_type, bio, \
     profile_picture, company_name, is_verified, is_active, created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, title, project_type, status, description, location, budget, \
     timeline, requirements, company, stats, tags, created_by, created_at, updated_at";

const APPLICATION_COLUMNS: &str = "id, project_id, role_id, applicant_id, status, cover_letter, \
     portfolio, proposed_rate, notes, reviewed_by, reviewed_at, created_at, updated_at";

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, message, read, priority, action, sender, project, created_at";

const LISTED_TALENT: &str = "role = 'talent' AND purpose = 'talent' AND is_active";

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn count(&self, sql: &str, binds: &[String]) -> StoreResult<u64> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for value in binds {
            query = query.bind(value);
        }
        let total = query.fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }
}

/// Accumulates `AND` conditions with numbered text placeholders.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    binds: Vec<String>,
}

impl Conditions {
    /// Adds a clause; every `{}` in `template` becomes the next placeholder.
    fn push(&mut self, template: &str, value: String) {
        self.binds.push(value);
        let placeholder = format!("${}", self.binds.len());
        self.clauses.push(template.replace("{}", &placeholder));
    }

    fn push_filter<T: ToString>(&mut self, template: &str, filter: &Filter<T>) {
        if let Some(value) = filter.as_option() {
            self.push(template, value.to_string());
        }
    }

    fn where_clause(&self, base: &str) -> String {
        let mut sql = format!(" WHERE {}", base);
        for clause in &self.clauses {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }
        sql
    }
}

fn page_clause(page: &PageRequest) -> String {
    format!(" LIMIT {} OFFSET {}", page.limit, page.offset())
}

/// Distinct non-blank values of a listed-talent column, trimmed and in byte order.
async fn distinct_trimmed(pool: &PgPool, column: &str) -> StoreResult<Vec<String>> {
    let sql = format!(
        "SELECT DISTINCT btrim({col}, E' \\t\\r\\n') COLLATE \"C\" AS value FROM users \
         WHERE {listed} AND btrim({col}, E' \\t\\r\\n') <> '' ORDER BY value",
        col = column,
        listed = LISTED_TALENT
    );
    Ok(sqlx::query_scalar::<_, String>(&sql).fetch_all(pool).await?)
}

fn conflict_on_unique(error: sqlx::Error, message: &str) -> StoreError {
    let unique = error
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION);
    if unique {
        StoreError::Conflict(message.to_string())
    } else {
        StoreError::Database(error)
    }
}

#[derive(FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    project_type: ProjectType,
    status: ProjectStatus,
    description: String,
    location: String,
    budget: Json<Budget>,
    timeline: Json<Timeline>,
    requirements: Json<Requirements>,
    company: Json<Company>,
    stats: Json<ProjectStats>,
    tags: Vec<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            project_type: row.project_type,
            status: row.status,
            description: row.description,
            location: row.location,
            budget: row.budget.0,
            timeline: row.timeline.0,
            requirements: row.requirements.0,
            company: row.company.0,
            stats: row.stats.0,
            tags: row.tags,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: Uuid,
    project_id: Uuid,
    role_id: String,
    applicant_id: Uuid,
    status: ApplicationStatus,
    cover_letter: Option<String>,
    portfolio: Json<Vec<PortfolioItem>>,
    proposed_rate: Option<f64>,
    notes: Option<String>,
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Application {
            id: row.id,
            project_id: row.project_id,
            role_id: row.role_id,
            applicant_id: row.applicant_id,
            status: row.status,
            cover_letter: row.cover_letter,
            portfolio: row.portfolio.0,
            proposed_rate: row.proposed_rate,
            notes: row.notes,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    kind: NotificationType,
    title: String,
    message: String,
    read: bool,
    priority: NotificationPriority,
    action: Option<Json<NotificationAction>>,
    sender: Option<Json<NotificationSender>>,
    project: Option<Json<ProjectRef>>,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind,
            title: row.title,
            message: row.message,
            read: row.read,
            priority: row.priority,
            action: row.action.map(|json| json.0),
            sender: row.sender.map(|json| json.0),
            project: row.project.map(|json| json.0),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22) \
             RETURNING {cols}",
            cols = USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.phone)
            .bind(user.role)
            .bind(user.purpose)
            .bind(user.talent_role)
            .bind(&user.category)
            .bind(&user.experience)
            .bind(&user.skills)
            .bind(&user.languages)
            .bind(&user.location)
            .bind(user.has_disability)
            .bind(&user.disability_type)
            .bind(&user.bio)
            .bind(&user.profile_picture)
            .bind(&user.company_name)
            .bind(user.is_verified)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| conflict_on_unique(err, "Email already registered"))
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(crate::models::user::normalize_email(email))
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users SET name = $2, phone = $3, role = $4, talent_role = $5, category = $6, \
             experience = $7, skills = $8, languages = $9, location = $10, has_disability = $11, \
             disability_type = $12, bio = $13, profile_picture = $14, company_name = $15, \
             is_verified = $16, is_active = $17, updated_at = $18 \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.phone)
            .bind(user.role)
            .bind(user.talent_role)
            .bind(&user.category)
            .bind(&user.experience)
            .bind(&user.skills)
            .bind(&user.languages)
            .bind(&user.location)
            .bind(user.has_disability)
            .bind(&user.disability_type)
            .bind(&user.bio)
            .bind(&user.profile_picture)
            .bind(&user.company_name)
            .bind(user.is_verified)
            .bind(user.is_active)
            .bind(user.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("User"))
    }

    async fn list_talents(&self, query: &TalentQuery) -> StoreResult<Page<User>> {
        let mut conditions = Conditions::default();
        conditions.push_filter("talent_role::text = {}", &query.role);
        conditions.push_filter("category = {}", &query.category);
        conditions.push_filter("location = {}", &query.location);
        if let Some(term) = query.search.as_option() {
            conditions.push(
                "(name ILIKE {} OR category ILIKE {} OR bio ILIKE {} \
                 OR EXISTS (SELECT 1 FROM unnest(skills) AS skill WHERE skill ILIKE {}))",
                contains_pattern(term),
            );
        }
        let filter = conditions.where_clause(LISTED_TALENT);

        let total = self
            .count(&format!("SELECT COUNT(*) FROM users{}", filter), &conditions.binds)
            .await?;

        let sql = format!(
            "SELECT {} FROM users{} ORDER BY created_at DESC{}",
            USER_COLUMNS,
            filter,
            page_clause(&query.page)
        );
        let mut select = sqlx::query_as::<_, User>(&sql);
        for value in &conditions.binds {
            select = select.bind(value);
        }
        let users = select.fetch_all(&self.pool).await?;

        Ok(Page::new(users, total, query.page))
    }

    async fn talent_categories(&self) -> StoreResult<Vec<String>> {
        distinct_trimmed(&self.pool, "category").await
    }

    async fn talent_locations(&self) -> StoreResult<Vec<String>> {
        distinct_trimmed(&self.pool, "location").await
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, project: Project) -> StoreResult<Project> {
        let sql = format!(
            "INSERT INTO projects ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {cols}",
            cols = PROJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(project.id)
            .bind(&project.title)
            .bind(project.project_type)
            .bind(project.status)
            .bind(&project.description)
            .bind(&project.location)
            .bind(Json(&project.budget))
            .bind(Json(&project.timeline))
            .bind(Json(&project.requirements))
            .bind(Json(&project.company))
            .bind(Json(&project.stats))
            .bind(&project.tags)
            .bind(project.created_by)
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Project::from))
    }

    async fn update_project(&self, project: Project) -> StoreResult<Project> {
        let sql = format!(
            "UPDATE projects SET title = $2, status = $3, description = $4, location = $5, \
             budget = $6, timeline = $7, tags = $8, updated_at = $9 WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(project.id)
            .bind(&project.title)
            .bind(project.status)
            .bind(&project.description)
            .bind(&project.location)
            .bind(Json(&project.budget))
            .bind(Json(&project.timeline))
            .bind(&project.tags)
            .bind(project.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Project"))?;
        Ok(row.into())
    }

    async fn record_project_activity(
        &self,
        id: Uuid,
        activity: &ProjectActivity,
    ) -> StoreResult<Project> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM projects WHERE id = $1 FOR UPDATE", PROJECT_COLUMNS);
        let mut project: Project = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("Project"))?
            .into();
        activity.apply(&mut project)?;

        let sql = format!(
            "UPDATE projects SET requirements = $2, stats = $3 WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .bind(Json(&project.requirements))
            .bind(Json(&project.stats))
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Page<Project>> {
        let mut conditions = Conditions::default();
        conditions.push_filter("project_type::text = {}", &query.project_type);
        conditions.push_filter("status::text = {}", &query.status);
        conditions.push_filter("location = {}", &query.location);
        conditions.push_filter("created_by = {}::uuid", &query.created_by);
        let filter = conditions.where_clause("TRUE");

        let total = self
            .count(&format!("SELECT COUNT(*) FROM projects{}", filter), &conditions.binds)
            .await?;

        let sql = format!(
            "SELECT {} FROM projects{} ORDER BY created_at DESC{}",
            PROJECT_COLUMNS,
            filter,
            page_clause(&query.page)
        );
        let mut select = sqlx::query_as::<_, ProjectRow>(&sql);
        for value in &conditions.binds {
            select = select.bind(value);
        }
        let rows = select.fetch_all(&self.pool).await?;

        Ok(Page::new(
            rows.into_iter().map(Project::from).collect(),
            total,
            query.page,
        ))
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert_application(&self, application: Application) -> StoreResult<Application> {
        let sql = format!(
            "INSERT INTO applications ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {cols}",
            cols = APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(application.id)
            .bind(application.project_id)
            .bind(&application.role_id)
            .bind(application.applicant_id)
            .bind(application.status)
            .bind(&application.cover_letter)
            .bind(Json(&application.portfolio))
            .bind(application.proposed_rate)
            .bind(&application.notes)
            .bind(application.reviewed_by)
            .bind(application.reviewed_at)
            .bind(application.created_at)
            .bind(application.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| conflict_on_unique(err, "You have already applied for this role"))?;
        Ok(row.into())
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let sql = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Application::from))
    }

    async fn update_application(&self, application: Application) -> StoreResult<Application> {
        let sql = format!(
            "UPDATE applications SET status = $2, notes = $3, reviewed_by = $4, \
             reviewed_at = $5, updated_at = $6 WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(application.id)
            .bind(application.status)
            .bind(&application.notes)
            .bind(application.reviewed_by)
            .bind(application.reviewed_at)
            .bind(application.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Application"))?;
        Ok(row.into())
    }

    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> StoreResult<Page<Application>> {
        let mut conditions = Conditions::default();
        conditions.push_filter("status::text = {}", &query.status);
        conditions.push_filter("project_id = {}::uuid", &query.project_id);
        conditions.push_filter("applicant_id = {}::uuid", &query.applicant_id);
        let filter = conditions.where_clause("TRUE");

        let total = self
            .count(
                &format!("SELECT COUNT(*) FROM applications{}", filter),
                &conditions.binds,
            )
            .await?;

        let sql = format!(
            "SELECT {} FROM applications{} ORDER BY created_at DESC{}",
            APPLICATION_COLUMNS,
            filter,
            page_clause(&query.page)
        );
        let mut select = sqlx::query_as::<_, ApplicationRow>(&sql);
        for value in &conditions.binds {
            select = select.bind(value);
        }
        let rows = select.fetch_all(&self.pool).await?;

        Ok(Page::new(
            rows.into_iter().map(Application::from).collect(),
            total,
            query.page,
        ))
    }

    async fn application_stats(&self) -> StoreResult<ApplicationStats> {
        let counts = sqlx::query_as::<_, (ApplicationStatus, i64)>(
            "SELECT status, COUNT(*) FROM applications GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = ApplicationStats::default();
        for (status, count) in counts {
            stats.count(status, count.max(0) as u64);
        }
        Ok(stats)
    }

    async fn find_application_for_role(
        &self,
        applicant: Uuid,
        project: Uuid,
        role_id: &str,
    ) -> StoreResult<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications \
             WHERE applicant_id = $1 AND project_id = $2 AND role_id = $3",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(applicant)
            .bind(project)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Application::from))
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification> {
        let sql = format!(
            "INSERT INTO notifications ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {cols}",
            cols = NOTIFICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(notification.id)
            .bind(notification.user_id)
            .bind(notification.kind)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.read)
            .bind(notification.priority)
            .bind(notification.action.as_ref().map(Json))
            .bind(notification.sender.as_ref().map(Json))
            .bind(notification.project.as_ref().map(Json))
            .bind(notification.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list_notifications(
        &self,
        user: Uuid,
        query: &NotificationQuery,
    ) -> StoreResult<Page<Notification>> {
        let mut conditions = Conditions::default();
        conditions.push("user_id = {}::uuid", user.to_string());
        conditions.push_filter("read = {}::boolean", &query.read);
        conditions.push_filter("kind::text = {}", &query.kind);
        let filter = conditions.where_clause("TRUE");

        let total = self
            .count(
                &format!("SELECT COUNT(*) FROM notifications{}", filter),
                &conditions.binds,
            )
            .await?;

        let sql = format!(
            "SELECT {} FROM notifications{} ORDER BY created_at DESC{}",
            NOTIFICATION_COLUMNS,
            filter,
            page_clause(&query.page)
        );
        let mut select = sqlx::query_as::<_, NotificationRow>(&sql);
        for value in &conditions.binds {
            select = select.bind(value);
        }
        let rows = select.fetch_all(&self.pool).await?;

        Ok(Page::new(
            rows.into_iter().map(Notification::from).collect(),
            total,
            query.page,
        ))
    }

    async fn mark_notification_read(
        &self,
        user: Uuid,
        id: Uuid,
    ) -> StoreResult<Option<Notification>> {
        let sql = format!(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2 RETURNING {}",
            NOTIFICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(id)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Notification::from))
    }

    async fn mark_all_notifications_read(&self, user: Uuid) -> StoreResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
                .bind(user)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn unread_notifications(&self, user: Uuid) -> StoreResult<u64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await?;
        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl AuditStore for PgStore {
    async fn record_admin_action(&self, action: AdminAction) -> StoreResult<AdminAction> {
        Ok(sqlx::query_as::<_, AdminAction>(
            "INSERT INTO admin_actions \
             (id, admin_id, action, target_type, target_id, previous_state, new_state, reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id, admin_id, action, target_type, target_id, previous_state, new_state, reason, created_at",
        )
        .bind(action.id)
        .bind(action.admin_id)
        .bind(&action.action)
        .bind(action.target_type)
        .bind(action.target_id)
        .bind(&action.previous_state)
        .bind(&action.new_state)
        .bind(&action.reason)
        .bind(action.created_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn admin_actions_for(&self, target_id: Uuid) -> StoreResult<Vec<AdminAction>> {
        Ok(sqlx::query_as::<_, AdminAction>(
            "SELECT id, admin_id, action, target_type, target_id, previous_state, new_state, reason, created_at \
             FROM admin_actions WHERE target_id = $1 ORDER BY created_at",
        )
        .bind(target_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
