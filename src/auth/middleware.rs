use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::extractors::{Session, SessionState};
use crate::app::AppState;

/// Decodes `Authorization: Bearer <token>` when present and records the
/// outcome in request extensions as a [`SessionState`].
///
/// Requests are never rejected here; the `Session` and `AdminSession`
/// extractors decide per route whether a session is required, so public
/// routes can live in the same scope.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService { service }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default().to_string());

        if let Some(value) = auth_header {
            let state = match value.strip_prefix("Bearer ").map(str::trim) {
                Some(token) if !token.is_empty() => match req.app_data::<web::Data<AppState>>() {
                    Some(app) => match app.keys.verify(token) {
                        Ok(claims) => SessionState::Valid(Session {
                            user_id: claims.sub,
                            role: claims.role,
                        }),
                        Err(err) => {
                            log::debug!("Rejected bearer token on {}: {}", req.path(), err);
                            SessionState::Rejected("Not authorized, token failed".into())
                        }
                    },
                    None => {
                        log::error!("Application state missing; cannot verify tokens");
                        SessionState::Rejected("Not authorized, token failed".into())
                    }
                },
                _ => SessionState::Rejected("Not authorized, malformed authorization header".into()),
            };
            req.extensions_mut().insert(state);
        }

        Box::pin(self.service.call(req))
    }
}
