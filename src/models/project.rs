use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::pagination::PageRequest;
use super::user::{clean_list, TalentRole};
use crate::search::Filter;

/// Kind of production. Corresponds to the `project_type` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "project_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Film,
    Tv,
    Commercial,
    Theater,
    Voice,
    Other,
}

string_enum!(ProjectType, "project type", {
    Film => "film",
    Tv => "tv",
    Commercial => "commercial",
    Theater => "theater",
    Voice => "voice",
    Other => "other",
});

/// Lifecycle of a project. Corresponds to the `project_status` SQL enum.
///
/// `draft -> active -> casting -> in_production -> completed`, with `cancelled`
/// reachable from every non-terminal state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Active,
    Casting,
    InProduction,
    Completed,
    Cancelled,
}

string_enum!(ProjectStatus, "project status", {
    Draft => "draft",
    Active => "active",
    Casting => "casting",
    InProduction => "in_production",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl ProjectStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }

    /// Whether a project in this state may move to `next`. Staying put is always allowed.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        if *self == next {
            return true;
        }
        match (self, next) {
            (from, Cancelled) => !from.is_terminal(),
            (Draft, Active) | (Active, Casting) | (Casting, InProduction) => true,
            (InProduction, Completed) => true,
            _ => false,
        }
    }

    /// States a project may be created in.
    pub fn is_initial(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Draft | ProjectStatus::Active | ProjectStatus::Casting
        )
    }

    /// Whether talents may still apply to the project's roles.
    pub fn accepts_applications(&self) -> bool {
        matches!(self, ProjectStatus::Active | ProjectStatus::Casting)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub casting_deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleBudget {
    pub min: f64,
    pub max: f64,
}

/// A role to be filled on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRole {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub role_type: TalentRole,
    pub category: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub budget: RoleBudget,
    pub filled: bool,
    pub applications: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub roles: Vec<ProjectRole>,
    pub total_roles: u32,
    pub filled_roles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub views: u64,
    pub applications: u64,
    pub shortlisted: u64,
    pub hired: u64,
}

/// A job posting owned by a client account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub description: String,
    pub location: String,
    pub budget: Budget,
    pub timeline: Timeline,
    pub requirements: Requirements,
    pub company: Company,
    pub stats: ProjectStats,
    pub tags: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Builds a new project from validated input. Role ids are assigned sequentially
    /// (`role-1`, `role-2`, ...) when the input leaves them blank.
    pub fn new(input: ProjectInput, created_by: Uuid) -> Self {
        let now = Utc::now();
        let roles: Vec<ProjectRole> = input
            .roles
            .into_iter()
            .enumerate()
            .map(|(index, role)| ProjectRole {
                id: role
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| format!("role-{}", index + 1)),
                title: role.title.trim().to_string(),
                description: role.description.trim().to_string(),
                role_type: role.role_type,
                category: role.category.trim().to_string(),
                experience: role.experience.trim().to_string(),
                skills: clean_list(role.skills),
                budget: role.budget,
                filled: false,
                applications: 0,
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            project_type: input.project_type,
            status: input.status.unwrap_or(ProjectStatus::Draft),
            description: input.description.trim().to_string(),
            location: input.location.trim().to_string(),
            budget: input.budget,
            timeline: input.timeline,
            requirements: Requirements {
                total_roles: roles.len() as u32,
                filled_roles: 0,
                roles,
            },
            company: Company {
                name: input.company_name.trim().to_string(),
                verified: false,
            },
            stats: ProjectStats::default(),
            tags: clean_list(input.tags),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self, role_id: &str) -> Option<&ProjectRole> {
        self.requirements.roles.iter().find(|role| role.id == role_id)
    }

    pub fn role_mut(&mut self, role_id: &str) -> Option<&mut ProjectRole> {
        self.requirements
            .roles
            .iter_mut()
            .find(|role| role.id == role_id)
    }

    /// Marks a role filled and keeps the `filledRoles` counter in step.
    pub fn fill_role(&mut self, role_id: &str) {
        if let Some(role) = self.role_mut(role_id) {
            if !role.filled {
                role.filled = true;
                self.requirements.filled_roles += 1;
            }
        }
    }
}

/// Failure applying a [`ProjectActivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("Role not found")]
    UnknownRole,
    #[error("Role has already been filled")]
    RoleFilled,
}

/// Counter and role changes driven by traffic on a project. Stores apply them
/// against the current record, so concurrent activity never overwrites
/// owner edits or other counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectActivity {
    Viewed,
    Applied { role_id: String },
    Shortlisted,
    Hired { role_id: String },
}

impl ProjectActivity {
    pub fn apply(&self, project: &mut Project) -> Result<(), ActivityError> {
        match self {
            ProjectActivity::Viewed => project.stats.views += 1,
            ProjectActivity::Applied { role_id } => {
                let role = project.role_mut(role_id).ok_or(ActivityError::UnknownRole)?;
                role.applications += 1;
                project.stats.applications += 1;
            }
            ProjectActivity::Shortlisted => project.stats.shortlisted += 1,
            ProjectActivity::Hired { role_id } => {
                let role = project.role_mut(role_id).ok_or(ActivityError::UnknownRole)?;
                if role.filled {
                    return Err(ActivityError::RoleFilled);
                }
                project.fill_role(role_id);
                project.stats.hired += 1;
            }
        }
        Ok(())
    }
}

/// Payload describing one role of a new project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRoleInput {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    #[serde(rename = "type")]
    pub role_type: TalentRole,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub experience: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub budget: RoleBudget,
}

/// Payload for `POST /api/projects`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: Option<ProjectStatus>,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    pub budget: Budget,
    pub timeline: Timeline,
    #[validate(length(min = 1, message = "At least one role is required"))]
    pub roles: Vec<ProjectRoleInput>,
    #[validate(length(min = 1, max = 100))]
    pub company_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update accepted by `PUT /api/projects/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    pub status: Option<ProjectStatus>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub location: Option<String>,
    pub budget: Option<Budget>,
    pub timeline: Option<Timeline>,
    pub tags: Option<Vec<String>>,
}

/// Checks that a budget range is non-negative and ordered.
pub fn check_budget(field: &'static str, min: f64, max: f64) -> Result<(), (&'static str, &'static str)> {
    if min < 0.0 || max < 0.0 || !min.is_finite() || !max.is_finite() {
        return Err((field, "Budget cannot be negative"));
    }
    if min > max {
        return Err((field, "Minimum budget cannot exceed maximum budget"));
    }
    Ok(())
}

/// Checks that a timeline ends after it starts and casting closes before the end.
pub fn check_timeline(timeline: &Timeline) -> Result<(), (&'static str, &'static str)> {
    if timeline.start_date > timeline.end_date {
        return Err(("timeline", "Start date must not be after end date"));
    }
    if timeline.casting_deadline > timeline.end_date {
        return Err(("timeline", "Casting deadline must not be after end date"));
    }
    Ok(())
}

impl ProjectInput {
    /// Cross-field rules the derive cannot express.
    pub fn check_consistency(&self) -> Result<(), (&'static str, &'static str)> {
        if let Some(status) = self.status {
            if !status.is_initial() {
                return Err(("status", "Projects must start as draft, active or casting"));
            }
        }
        check_budget("budget", self.budget.min, self.budget.max)?;
        check_timeline(&self.timeline)?;
        for role in &self.roles {
            check_budget("roles", role.budget.min, role.budget.max)?;
        }
        Ok(())
    }
}

/// Criteria for `GET /api/projects`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectQuery {
    pub project_type: Filter<ProjectType>,
    pub status: Filter<ProjectStatus>,
    pub location: Filter<String>,
    pub created_by: Filter<Uuid>,
    pub page: PageRequest,
}

impl ProjectQuery {
    pub fn matches(&self, project: &Project) -> bool {
        self.project_type.accepts(&project.project_type)
            && self.status.accepts(&project.status)
            && self.location.accepts(&project.location)
            && self.created_by.accepts(&project.created_by)
    }
}
