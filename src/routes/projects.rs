use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    auth::Session,
    error::AppError,
    models::{
        project::{check_budget, check_timeline},
        AccountRole, PageRequest, Project, ProjectActivity, ProjectInput, ProjectQuery,
        ProjectStatus, ProjectType, ProjectUpdate,
    },
    routes::{created, paginated, success},
    search::{parse_selection, Filter},
};

/// Query string accepted by `GET /api/projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<ProjectListParams> for ProjectQuery {
    type Error = AppError;

    fn try_from(params: ProjectListParams) -> Result<Self, Self::Error> {
        let project_type = parse_selection::<ProjectType>(params.project_type.as_deref())
            .map_err(|err| AppError::invalid_field("type", &err.to_string()))?;
        let status = parse_selection::<ProjectStatus>(params.status.as_deref())
            .map_err(|err| AppError::invalid_field("status", &err.to_string()))?;
        Ok(ProjectQuery {
            project_type,
            status,
            location: Filter::from_selection(params.location.as_deref()),
            created_by: Filter::Any,
            page: PageRequest::from_params(params.page, params.limit),
        })
    }
}

fn reject_inconsistent((field, message): (&'static str, &'static str)) -> AppError {
    AppError::invalid_field(field, message)
}

async fn load_project(state: &AppState, id: Uuid) -> Result<Project, AppError> {
    state
        .store
        .find_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

/// Loads a project the session owns; other sessions get 403.
async fn owned_project(state: &AppState, session: &Session, id: Uuid) -> Result<Project, AppError> {
    let project = load_project(state, id).await?;
    if project.created_by != session.user_id {
        return Err(AppError::Forbidden(
            "Not authorized to modify this project".into(),
        ));
    }
    Ok(project)
}

/// List projects
///
/// Public listing, newest first, filtered by `type`, `status` and `location`.
#[get("")]
pub async fn list_projects(
    state: web::Data<AppState>,
    params: web::Query<ProjectListParams>,
) -> Result<impl Responder, AppError> {
    let query = ProjectQuery::try_from(params.into_inner())?;
    let page = state.store.list_projects(&query).await?;
    Ok(paginated(page))
}

/// Create a project
///
/// Only client and admin accounts may post projects.
///
/// ## Responses:
/// - `201 Created`: the stored project.
/// - `403 Forbidden`: the caller is a talent.
/// - `422 Unprocessable Entity`: invalid fields, roles, budget or timeline, or a
///   starting status past `casting`.
#[post("")]
pub async fn create_project(
    state: web::Data<AppState>,
    session: Session,
    input: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    if session.role == AccountRole::Talent {
        return Err(AppError::Forbidden(
            "Only client accounts can create projects".into(),
        ));
    }

    input.validate()?;
    for role in &input.roles {
        role.validate()?;
    }
    input.check_consistency().map_err(reject_inconsistent)?;

    let project = state
        .store
        .insert_project(Project::new(input.into_inner(), session.user_id))
        .await?;
    log::info!("User {} created project {}", session.user_id, project.id);
    Ok(created(project))
}

/// Fetch one project. Every read counts as a view.
#[get("/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = state
        .store
        .record_project_activity(path.into_inner(), &ProjectActivity::Viewed)
        .await?;
    Ok(success(project))
}

/// Update a project
///
/// Owner only. Status changes must follow the project lifecycle.
#[put("/{id}")]
pub async fn update_project(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    update: web::Json<ProjectUpdate>,
) -> Result<impl Responder, AppError> {
    update.validate()?;
    let mut project = owned_project(&state, &session, path.into_inner()).await?;
    let update = update.into_inner();

    if let Some(status) = update.status {
        if !project.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Invalid status transition from {} to {}",
                project.status, status
            )));
        }
        project.status = status;
    }
    if let Some(budget) = update.budget {
        check_budget("budget", budget.min, budget.max).map_err(reject_inconsistent)?;
        project.budget = budget;
    }
    if let Some(timeline) = update.timeline {
        check_timeline(&timeline).map_err(reject_inconsistent)?;
        project.timeline = timeline;
    }
    if let Some(title) = update.title {
        project.title = title.trim().to_string();
    }
    if let Some(description) = update.description {
        project.description = description.trim().to_string();
    }
    if let Some(location) = update.location {
        project.location = location.trim().to_string();
    }
    if let Some(tags) = update.tags {
        project.tags = crate::models::user::clean_list(tags);
    }
    project.updated_at = Utc::now();

    let project = state.store.update_project(project).await?;
    log::info!("Project {} updated by {}", project.id, session.user_id);
    Ok(success(project))
}

/// Delete a project. Owner only.
#[delete("/{id}")]
pub async fn delete_project(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = owned_project(&state, &session, path.into_inner()).await?;
    if !state.store.delete_project(project.id).await? {
        return Err(AppError::NotFound("Project not found".into()));
    }
    log::info!("Project {} deleted by {}", project.id, session.user_id);
    Ok(HttpResponse::NoContent().finish())
}
