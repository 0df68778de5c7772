use actix_web::{http::header, post, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::{app::AppState, auth::Session, error::AppError, upload::encode_image};

/// Raw body limit for the upload scope. Images above `MAX_IMAGE_BYTES` but
/// below this limit are refused with a 413 envelope.
pub const BODY_LIMIT: usize = 1 << 20;

/// Upload a profile image
///
/// Accepts the raw image bytes with an image `Content-Type`, stores them as a
/// base64 data URI on the caller's profile and returns the URI.
///
/// ## Responses:
/// - `200 OK`: `{ success, profile_picture }`.
/// - `400 Bad Request`: empty body or unsupported type.
/// - `413 Payload Too Large`: image over 500KB.
#[post("/profile-image")]
pub async fn profile_image(
    state: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let data_uri = encode_image(content_type, &body)?;

    let mut user = state
        .store
        .find_user(session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    user.profile_picture = Some(data_uri.clone());
    user.updated_at = Utc::now();
    state.store.update_user(user).await?;
    log::info!(
        "Stored {} byte profile image for {}",
        body.len(),
        session.user_id
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "profile_picture": data_uri,
    })))
}
