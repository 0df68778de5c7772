use actix_web::{get, post, web, Responder};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    auth::Session,
    error::AppError,
    messaging::MessengerError,
    routes::{paginated, success},
    search::{TalentListParams, TalentQuery},
};

/// Payload for `POST /api/talents/{id}/contact`.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Subject must be 1 to 100 characters"))]
    pub subject: String,
    #[serde(alias = "message")]
    #[validate(length(min = 1, max = 2000, message = "Message must be 1 to 2000 characters"))]
    pub body: String,
}

/// List talents
///
/// Public directory of active talents. `role`, `category` and `location`
/// match exactly (`all` or blank disables a filter); `search` matches name,
/// category, skills and bio case-insensitively.
#[get("")]
pub async fn list_talents(
    state: web::Data<AppState>,
    params: web::Query<TalentListParams>,
) -> Result<impl Responder, AppError> {
    let query = TalentQuery::try_from(params.into_inner())?;
    let page = state.store.list_talents(&query).await?;
    Ok(paginated(page.map(|user| user.talent_view())))
}

#[get("/categories")]
pub async fn categories(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.store.talent_categories().await?))
}

#[get("/locations")]
pub async fn locations(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.store.talent_locations().await?))
}

#[get("/{id}")]
pub async fn get_talent(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let user = state
        .store
        .find_user(path.into_inner())
        .await?
        .filter(|user| user.is_listed_talent())
        .ok_or_else(|| AppError::NotFound("Talent not found".into()))?;
    Ok(success(user.talent_view()))
}

/// Contact a talent
///
/// Relays a message to the talent through the configured messenger.
/// Requires a session.
#[post("/{id}/contact")]
pub async fn contact_talent(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    contact: web::Json<ContactRequest>,
) -> Result<impl Responder, AppError> {
    contact.validate()?;
    let talent_id = path.into_inner();
    if talent_id == session.user_id {
        return Err(AppError::BadRequest("You cannot contact yourself".into()));
    }

    let talent = state
        .store
        .find_user(talent_id)
        .await?
        .filter(|user| user.is_listed_talent())
        .ok_or_else(|| AppError::NotFound("Talent not found".into()))?;

    state
        .messenger
        .send(talent.id, contact.subject.trim(), contact.body.trim())
        .await
        .map_err(|err| match err {
            MessengerError::Transport(reason) => {
                log::error!("Failed to contact talent {}: {}", talent.id, reason);
                AppError::ServiceUnavailable("Message could not be delivered".into())
            }
        })?;
    log::info!("User {} contacted talent {}", session.user_id, talent.id);

    Ok(success(json!({ "delivered": true })))
}
