use actix_web::{get, put, web, Responder};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    app::AppState,
    auth::Session,
    error::AppError,
    models::{NotificationQuery, NotificationType, PageRequest},
    routes::{paginated, success},
    search::parse_selection,
};

/// Query string accepted by `GET /api/notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListParams {
    pub read: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<NotificationListParams> for NotificationQuery {
    type Error = AppError;

    fn try_from(params: NotificationListParams) -> Result<Self, Self::Error> {
        let read = parse_selection::<bool>(params.read.as_deref())
            .map_err(|_| AppError::invalid_field("read", "read must be true or false"))?;
        let kind = parse_selection::<NotificationType>(params.kind.as_deref())
            .map_err(|err| AppError::invalid_field("type", &err.to_string()))?;
        Ok(NotificationQuery {
            read,
            kind,
            page: PageRequest::from_params(params.page, params.limit),
        })
    }
}

/// The caller's notifications, newest first.
#[get("")]
pub async fn list_notifications(
    state: web::Data<AppState>,
    session: Session,
    params: web::Query<NotificationListParams>,
) -> Result<impl Responder, AppError> {
    let query = NotificationQuery::try_from(params.into_inner())?;
    let page = state
        .store
        .list_notifications(session.user_id, &query)
        .await?;
    Ok(paginated(page))
}

#[get("/unread-count")]
pub async fn unread_count(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let count = state.store.unread_notifications(session.user_id).await?;
    Ok(success(json!({ "count": count })))
}

#[put("/read-all")]
pub async fn mark_all_read(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let marked = state
        .store
        .mark_all_notifications_read(session.user_id)
        .await?;
    log::info!("Marked {} notifications read for {}", marked, session.user_id);
    Ok(success(json!({ "markedRead": marked })))
}

/// Marks one of the caller's notifications read. Other users' notifications
/// are reported as missing.
#[put("/{id}/read")]
pub async fn mark_read(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let notification = state
        .store
        .mark_notification_read(session.user_id, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".into()))?;
    Ok(success(notification))
}
