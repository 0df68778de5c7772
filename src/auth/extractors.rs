use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::AccountRole;

/// The authenticated principal of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: AccountRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

/// Outcome of bearer-token decoding, stored in request extensions by
/// `SessionMiddleware`. Absent when the request carried no credentials.
#[derive(Debug, Clone)]
pub enum SessionState {
    Valid(Session),
    Rejected(String),
}

fn session_from(req: &HttpRequest) -> Result<Session, AppError> {
    match req.extensions().get::<SessionState>() {
        Some(SessionState::Valid(session)) => Ok(*session),
        Some(SessionState::Rejected(reason)) => Err(AppError::Unauthorized(reason.clone())),
        None => Err(AppError::Unauthorized("Not authorized, no token".into())),
    }
}

impl FromRequest for Session {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(session_from(req).map_err(Into::into))
    }
}

/// A session whose role is `admin`. Rejects other sessions with 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession(pub Session);

impl FromRequest for AdminSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = session_from(req).and_then(|session| {
            if session.is_admin() {
                Ok(AdminSession(session))
            } else {
                Err(AppError::Forbidden("Not authorized as an admin".into()))
            }
        });
        ready(result.map_err(Into::into))
    }
}
