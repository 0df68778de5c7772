use actix_web::{get, put, web, Responder};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    auth::AdminSession,
    error::AppError,
    models::{ApplicationStatus, PageRequest},
    routes::{paginated, success},
    search::parse_selection,
};

/// Query string accepted by `GET /api/admin/applications`.
#[derive(Debug, Default, Deserialize)]
pub struct ModerationListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Optional body of `PUT /api/admin/applications/{id}/reject`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(max = 1000, message = "Reason cannot be more than 1000 characters"))]
    pub reason: Option<String>,
}

/// List applications for moderation
///
/// Newest first, optionally filtered by `status` (`all` disables the filter).
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<AppState>,
    _admin: AdminSession,
    params: web::Query<ModerationListParams>,
) -> Result<impl Responder, AppError> {
    let params = params.into_inner();
    let status = parse_selection::<ApplicationStatus>(params.status.as_deref())
        .map_err(|err| AppError::invalid_field("status", &err.to_string()))?;
    let page = state
        .moderation()
        .list(status, PageRequest::from_params(params.page, params.limit))
        .await?;
    Ok(paginated(page))
}

#[get("/applications/stats")]
pub async fn application_stats(
    state: web::Data<AppState>,
    _admin: AdminSession,
) -> Result<impl Responder, AppError> {
    Ok(success(state.moderation().stats().await?))
}

#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<AppState>,
    _admin: AdminSession,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    Ok(success(state.moderation().get(path.into_inner()).await?))
}

/// Approve an application
///
/// Moves a pending application to `shortlisted`. Approving again is a no-op.
///
/// ## Responses:
/// - `200 OK`: the updated application.
/// - `400 Bad Request`: the application was already rejected or hired.
/// - `404 Not Found`: no such application.
#[put("/applications/{id}/approve")]
pub async fn approve_application(
    state: web::Data<AppState>,
    AdminSession(admin): AdminSession,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let application = state
        .moderation()
        .approve(admin.user_id, path.into_inner())
        .await?;
    Ok(success(application))
}

/// Reject an application
///
/// Moves a pending application to `rejected`. The body is optional and may
/// carry a `reason`, stored as the application's notes.
#[put("/applications/{id}/reject")]
pub async fn reject_application(
    state: web::Data<AppState>,
    AdminSession(admin): AdminSession,
    path: web::Path<Uuid>,
    body: Option<web::Json<RejectRequest>>,
) -> Result<impl Responder, AppError> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    request.validate()?;
    let application = state
        .moderation()
        .reject(admin.user_id, path.into_inner(), request.reason)
        .await?;
    Ok(success(application))
}

#[put("/users/{id}/verify")]
pub async fn verify_user(
    state: web::Data<AppState>,
    AdminSession(admin): AdminSession,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let user = state
        .moderation()
        .verify_user(admin.user_id, path.into_inner())
        .await?;
    Ok(success(user))
}

/// Soft-deactivates an account. Admins cannot deactivate themselves.
#[put("/users/{id}/deactivate")]
pub async fn deactivate_user(
    state: web::Data<AppState>,
    AdminSession(admin): AdminSession,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let user = state
        .moderation()
        .deactivate_user(admin.user_id, path.into_inner())
        .await?;
    Ok(success(user))
}
