use actix_web::{get, post, put, web, Responder};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    auth::Session,
    error::AppError,
    models::{
        AccountRole, ActionKind, Application, ApplicationInput, ApplicationQuery,
        ApplicationStatus, ApplicationStatusUpdate, Notification, NotificationType, PageRequest,
        Project, ProjectActivity,
    },
    routes::{created, paginated, success},
    search::{parse_selection, Filter},
};

/// Query string accepted by `GET /api/applications`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListParams {
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

async fn load_project(state: &AppState, id: Uuid) -> Result<Project, AppError> {
    state
        .store
        .find_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

async fn load_application(state: &AppState, id: Uuid) -> Result<Application, AppError> {
    state
        .store
        .find_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))
}

/// Apply to a project role
///
/// Talent accounts only. The project must be open (`active` or `casting`),
/// the role must exist and still be open, and each talent applies to a role
/// at most once.
#[post("")]
pub async fn create_application(
    state: web::Data<AppState>,
    session: Session,
    input: web::Json<ApplicationInput>,
) -> Result<impl Responder, AppError> {
    if session.role != AccountRole::Talent {
        return Err(AppError::Forbidden(
            "Only talent accounts can apply to projects".into(),
        ));
    }
    input.validate()?;
    for item in &input.portfolio {
        item.validate()?;
    }

    let project = load_project(&state, input.project_id).await?;
    if !project.status.accepts_applications() {
        return Err(AppError::BadRequest(
            "Project is not accepting applications".into(),
        ));
    }
    match project.role(&input.role_id) {
        None => return Err(AppError::NotFound("Role not found".into())),
        Some(role) if role.filled => {
            return Err(AppError::BadRequest("Role has already been filled".into()))
        }
        Some(_) => {}
    }
    if state
        .store
        .find_application_for_role(session.user_id, project.id, &input.role_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "You have already applied for this role".into(),
        ));
    }

    let application = state
        .store
        .insert_application(Application::new(input.into_inner(), session.user_id))
        .await?;

    let applied = ProjectActivity::Applied {
        role_id: application.role_id.clone(),
    };
    if let Err(e) = state
        .store
        .record_project_activity(application.project_id, &applied)
        .await
    {
        log::error!(
            "Failed to count application {} on project {}: {}",
            application.id,
            application.project_id,
            e
        );
    }
    log::info!(
        "Talent {} applied to project {} role {}",
        session.user_id,
        application.project_id,
        application.role_id
    );

    Ok(created(application))
}

/// List applications
///
/// With `projectId` the project owner sees that project's applications;
/// otherwise the caller sees the applications they filed.
#[get("")]
pub async fn list_applications(
    state: web::Data<AppState>,
    session: Session,
    params: web::Query<ApplicationListParams>,
) -> Result<impl Responder, AppError> {
    let params = params.into_inner();
    let status = parse_selection::<ApplicationStatus>(params.status.as_deref())
        .map_err(|err| AppError::invalid_field("status", &err.to_string()))?;

    let mut query = ApplicationQuery {
        status,
        page: PageRequest::from_params(params.page, params.limit),
        ..ApplicationQuery::default()
    };
    match params.project_id {
        Some(project_id) => {
            let project = load_project(&state, project_id).await?;
            if project.created_by != session.user_id && !session.is_admin() {
                return Err(AppError::Forbidden(
                    "Not authorized to view applications for this project".into(),
                ));
            }
            query.project_id = Filter::Only(project_id);
        }
        None => query.applicant_id = Filter::Only(session.user_id),
    }

    let page = state.store.list_applications(&query).await?;
    Ok(paginated(page))
}

/// One application, visible to its applicant, the project owner and admins.
#[get("/{id}")]
pub async fn get_application(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let application = load_application(&state, path.into_inner()).await?;
    if application.applicant_id != session.user_id && !session.is_admin() {
        let project = load_project(&state, application.project_id).await?;
        if project.created_by != session.user_id {
            return Err(AppError::Forbidden(
                "Not authorized to view this application".into(),
            ));
        }
    }
    Ok(success(application))
}

/// Review an application
///
/// Project owner (or admin) moves the application along
/// `pending -> shortlisted -> hired`, or rejects it. Hiring fills the role.
#[put("/{id}")]
pub async fn update_application_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    update: web::Json<ApplicationStatusUpdate>,
) -> Result<impl Responder, AppError> {
    update.validate()?;
    let mut application = load_application(&state, path.into_inner()).await?;
    let mut project = load_project(&state, application.project_id).await?;
    if project.created_by != session.user_id && !session.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to review this application".into(),
        ));
    }

    let update = update.into_inner();
    let previous = application.status;
    if !previous.can_transition_to(update.status) {
        return Err(AppError::BadRequest(format!(
            "Invalid status transition from {} to {}",
            previous, update.status
        )));
    }

    // Claim the role first; a filled role refuses a second hire.
    if previous != update.status && update.status == ApplicationStatus::Hired {
        let hired = ProjectActivity::Hired {
            role_id: application.role_id.clone(),
        };
        project = state
            .store
            .record_project_activity(project.id, &hired)
            .await?;
    }

    application.review(update.status, session.user_id);
    if let Some(notes) = update.notes {
        application.notes = Some(notes.trim().to_string()).filter(|n| !n.is_empty());
    }
    let application = state.store.update_application(application).await?;

    if previous != application.status {
        if application.status == ApplicationStatus::Shortlisted {
            match state
                .store
                .record_project_activity(project.id, &ProjectActivity::Shortlisted)
                .await
            {
                Ok(updated) => project = updated,
                Err(e) => {
                    log::error!("Failed to update stats of project {}: {}", project.id, e)
                }
            }
        }
        notify_applicant(&state, &application, &project).await;
    }

    Ok(success(application))
}

async fn notify_applicant(state: &AppState, application: &Application, project: &Project) {
    let notification = Notification::new(
        application.applicant_id,
        NotificationType::Application,
        "Application status updated",
        &format!(
            "Your application for {} is now {}.",
            project.title, application.status
        ),
    )
    .with_project(project.id, &project.title)
    .with_action(ActionKind::View, "/applications", "View application");

    if let Err(e) = state.store.insert_notification(notification).await {
        log::warn!(
            "Could not notify applicant {} about application {}: {}",
            application.applicant_id,
            application.id,
            e
        );
    }
}
