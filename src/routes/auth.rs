use crate::{
    app::AppState,
    auth::{hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest, Session},
    error::AppError,
    models::{ProfileUpdate, User},
    routes::success,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

async fn current_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Checks credentials; unknown email, wrong password and inactive accounts all
/// produce the same 401.
async fn authenticate(state: &AppState, credentials: &LoginRequest) -> Result<User, AppError> {
    let user = state
        .store
        .find_user_by_email(&credentials.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify_password(&credentials.password, &user.password_hash) {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }
    if !user.is_active {
        log::info!("Login refused for inactive account {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }
    Ok(user)
}

/// Register a new account
///
/// Creates the account and returns an authentication token.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse`.
/// - `400 Bad Request`: email already registered.
/// - `422 Unprocessable Entity`: validation failure, including purpose-specific fields.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    register_data.check_purpose_fields()?;

    if state
        .store
        .find_user_by_email(&register_data.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let user = state
        .store
        .insert_user(register_data.into_inner().into_user(password_hash))
        .await?;
    log::info!("Registered {} account {}", user.role, user.id);

    let issued = state.keys.issue(user.id, user.role)?;
    Ok(HttpResponse::Created().json(AuthResponse::new(issued, &user)))
}

/// Login
///
/// Authenticates a user and returns an authentication token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let user = authenticate(&state, &login_data).await?;
    let issued = state.keys.issue(user.id, user.role)?;
    Ok(HttpResponse::Ok().json(AuthResponse::new(issued, &user)))
}

/// Admin login
///
/// As `/login`, but only admin accounts receive a token.
#[post("/admin/login")]
pub async fn admin_login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let user = authenticate(&state, &login_data).await?;
    if !user.is_admin() {
        log::warn!("Non-admin account {} attempted admin login", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }
    let issued = state.keys.issue(user.id, user.role)?;
    Ok(HttpResponse::Ok().json(AuthResponse::new(issued, &user)))
}

/// The caller's own account.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let user = current_user(&state, session.user_id).await?;
    Ok(success(user))
}

/// Partial update of the caller's profile fields.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    session: Session,
    update: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    update.validate()?;
    let mut user = current_user(&state, session.user_id).await?;
    user.apply(update.into_inner());
    let user = state.store.update_user(user).await?;
    Ok(success(user))
}

/// Issues a fresh token for a valid session. The role is re-read from storage
/// so promotions and deactivations take effect.
#[post("/refresh")]
pub async fn refresh(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let user = current_user(&state, session.user_id).await?;
    if !user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".into()));
    }
    let issued = state.keys.issue(user.id, user.role)?;
    Ok(HttpResponse::Ok().json(AuthResponse::new(issued, &user)))
}
