//! HTTP client for the talent directory API, built on [`reqwest`].

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::query::TalentFilters;
use super::session::ClientSession;
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::{
    Application, ApplicationStatus, PageRequest, PaginationMeta, TalentView, User, UserSummary,
};
use crate::search::Filter;

/// Errors from the API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection, body decoding, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An authenticated call was made without a live session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The server answered with an error envelope.
    #[error("{message} ({status})")]
    Api { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(err) => err.status().map(|s| s.as_u16()),
            ClientError::NotAuthenticated => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

/// One page of a listing endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Listing<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Client for one API server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// * `base_url` - server origin, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/api{}", self.base_url, path))
    }

    // ---- talents ----

    pub async fn list_talents(
        &self,
        filters: &TalentFilters,
    ) -> Result<Listing<TalentView>, ClientError> {
        let response = self
            .request(Method::GET, "/talents")
            .query(&filters.to_query_params())
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn get_talent(&self, id: Uuid) -> Result<TalentView, ClientError> {
        let response = self
            .request(Method::GET, &format!("/talents/{}", id))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .request(Method::GET, "/talents/categories")
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn locations(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .request(Method::GET, "/talents/locations")
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn contact_talent(
        &self,
        session: &mut ClientSession,
        talent: Uuid,
        subject: &str,
        body: &str,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::POST, &format!("/talents/{}/contact", talent))
            .json(&json!({ "subject": subject, "body": body }));
        let response = Self::send_authenticated(session, request).await?;
        Self::parse_data::<serde_json::Value>(response).await?;
        Ok(())
    }

    // ---- auth ----

    pub async fn register(
        &self,
        session: &mut ClientSession,
        registration: &RegisterRequest,
    ) -> Result<UserSummary, ClientError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(registration)
            .send()
            .await?;
        Self::sign_in(session, response).await
    }

    pub async fn login(
        &self,
        session: &mut ClientSession,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        self.login_at("/auth/login", session, email, password).await
    }

    pub async fn admin_login(
        &self,
        session: &mut ClientSession,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        self.login_at("/auth/admin/login", session, email, password)
            .await
    }

    async fn login_at(
        &self,
        path: &str,
        session: &mut ClientSession,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .request(Method::POST, path)
            .json(&credentials)
            .send()
            .await?;
        Self::sign_in(session, response).await
    }

    pub async fn me(&self, session: &mut ClientSession) -> Result<User, ClientError> {
        let response =
            Self::send_authenticated(session, self.request(Method::GET, "/auth/me")).await?;
        Self::parse_data(response).await
    }

    /// Exchanges the current token for a fresh one.
    pub async fn refresh(&self, session: &mut ClientSession) -> Result<(), ClientError> {
        let response =
            Self::send_authenticated(session, self.request(Method::POST, "/auth/refresh")).await?;
        let auth: AuthResponse = Self::parse(response).await?;
        session.refresh(auth);
        Ok(())
    }

    // ---- admin ----

    pub async fn admin_applications(
        &self,
        session: &mut ClientSession,
        status: &Filter<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Listing<Application>, ClientError> {
        let mut params = vec![
            ("page", page.page.to_string()),
            ("limit", page.limit.to_string()),
        ];
        if let Filter::Only(status) = status {
            params.push(("status", status.to_string()));
        }
        let request = self
            .request(Method::GET, "/admin/applications")
            .query(&params);
        let response = Self::send_authenticated(session, request).await?;
        Self::parse(response).await
    }

    pub async fn approve_application(
        &self,
        session: &mut ClientSession,
        id: Uuid,
    ) -> Result<Application, ClientError> {
        let request = self.request(Method::PUT, &format!("/admin/applications/{}/approve", id));
        let response = Self::send_authenticated(session, request).await?;
        Self::parse_data(response).await
    }

    pub async fn reject_application(
        &self,
        session: &mut ClientSession,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Application, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/admin/applications/{}/reject", id))
            .json(&json!({ "reason": reason }));
        let response = Self::send_authenticated(session, request).await?;
        Self::parse_data(response).await
    }

    // ---- private helpers ----

    /// Attaches the session's bearer token and clears the session when the
    /// server reports it as no longer valid.
    async fn send_authenticated(
        session: &mut ClientSession,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let bearer = session.bearer().ok_or(ClientError::NotAuthenticated)?;
        let response = request
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            log::info!("Session rejected by the server; signing out");
            session.clear();
        }
        Ok(response)
    }

    async fn sign_in(
        session: &mut ClientSession,
        response: Response,
    ) -> Result<UserSummary, ClientError> {
        let auth: AuthResponse = Self::parse(response).await?;
        let user = auth.user.clone();
        session.issue(auth);
        Ok(user)
    }

    /// Turns an error status into [`ClientError::Api`] carrying the
    /// envelope's message (or the raw body when it is not an envelope).
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.message)
            .unwrap_or(body);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn parse_data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let envelope: Envelope<T> = Self::parse(response).await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[actix_rt::test]
    async fn test_authenticated_call_without_session() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let mut session = ClientSession::new();
        let err = client.me(&mut session).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert_eq!(err.status(), None);
    }
}
