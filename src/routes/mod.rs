pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod projects;
pub mod talents;
pub mod upload;

use actix_web::{error, web, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::error::AppError;
use crate::models::Page;

/// Largest JSON body accepted by any endpoint.
const JSON_LIMIT: usize = 1 << 20;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::admin_login)
                .service(auth::me)
                .service(auth::update_profile)
                .service(auth::refresh),
        )
        .service(
            web::scope("/talents")
                .service(talents::list_talents)
                .service(talents::categories)
                .service(talents::locations)
                .service(talents::get_talent)
                .service(talents::contact_talent),
        )
        .service(
            web::scope("/projects")
                .service(projects::list_projects)
                .service(projects::create_project)
                .service(projects::get_project)
                .service(projects::update_project)
                .service(projects::delete_project),
        )
        .service(
            web::scope("/applications")
                .service(applications::list_applications)
                .service(applications::create_application)
                .service(applications::get_application)
                .service(applications::update_application_status),
        )
        .service(
            web::scope("/notifications")
                .service(notifications::list_notifications)
                .service(notifications::unread_count)
                .service(notifications::mark_all_read)
                .service(notifications::mark_read),
        )
        .service(
            web::scope("/admin")
                .service(admin::list_applications)
                .service(admin::application_stats)
                .service(admin::get_application)
                .service(admin::approve_application)
                .service(admin::reject_application)
                .service(admin::verify_user)
                .service(admin::deactivate_user),
        )
        .service(
            web::scope("/upload")
                .app_data(web::PayloadConfig::new(upload::BODY_LIMIT))
                .service(upload::profile_image),
        );
}

/// Malformed or mistyped JSON bodies become 400 envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let app_error = match &err {
                error::JsonPayloadError::Overflow { .. }
                | error::JsonPayloadError::OverflowKnownLength { .. } => {
                    AppError::PayloadTooLarge("Request body is too large".into())
                }
                error::JsonPayloadError::ContentType => {
                    AppError::BadRequest("Expected a JSON request body".into())
                }
                other => AppError::BadRequest(format!("Invalid request body: {}", other)),
            };
            app_error.into()
        })
}

/// Unparseable query strings (e.g. `page=abc`) become 400 envelopes.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query parameters: {}", err)).into()
    })
}

/// Path segments that do not parse (e.g. a malformed UUID) become 400 envelopes.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::BadRequest("Invalid identifier".into()).into())
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!("Route {} not found", req.path())))
}

/// `{ success: true, data }`
pub(crate) fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}

/// `201 { success: true, data }`
pub(crate) fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(json!({ "success": true, "data": data }))
}

/// `{ success: true, data: [...], pagination }`
pub(crate) fn paginated<T: Serialize>(page: Page<T>) -> HttpResponse {
    let pagination = page.meta();
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": page.items,
        "pagination": pagination,
    }))
}
