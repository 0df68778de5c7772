//! Application state and service wiring shared by `main.rs` and the tests.

use actix_web::web;
use std::sync::Arc;

use crate::auth::{hash_password, SessionMiddleware, TokenKeys};
use crate::config::AdminBootstrap;
use crate::error::AppError;
use crate::messaging::{LogMessenger, Messenger};
use crate::models::{AccountRole, Purpose, User};
use crate::moderation::ModerationService;
use crate::routes;
use crate::store::Store;

/// Shared, read-only state handed to every handler through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: TokenKeys,
    pub messenger: Arc<dyn Messenger>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: TokenKeys) -> Self {
        Self {
            store,
            keys,
            messenger: Arc::new(LogMessenger),
        }
    }

    pub fn with_messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = messenger;
        self
    }

    pub fn moderation(&self) -> ModerationService<'_> {
        ModerationService::new(self.store.as_ref())
    }
}

/// Registers the health check and the `/api` scope behind `SessionMiddleware`.
///
/// The caller provides `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(routes::json_config())
        .app_data(routes::query_config())
        .app_data(routes::path_config())
        .service(
            web::scope("/api")
                .wrap(SessionMiddleware)
                .configure(routes::config),
        )
        .default_service(web::route().to(routes::not_found));
}

/// Ensures an active admin account exists for the configured credentials.
/// An existing account with that email is promoted and reactivated.
pub async fn bootstrap_admin(store: &dyn Store, admin: &AdminBootstrap) -> Result<User, AppError> {
    if let Some(mut user) = store.find_user_by_email(&admin.email).await? {
        if user.is_admin() && user.is_active {
            return Ok(user);
        }
        user.role = AccountRole::Admin;
        user.is_active = true;
        user.updated_at = chrono::Utc::now();
        log::info!("Promoted existing account {} to admin", user.email);
        return Ok(store.update_user(user).await?);
    }

    let mut user = User::new(
        "Admin User",
        &admin.email,
        hash_password(&admin.password)?,
        AccountRole::Admin,
        Purpose::Professional,
    );
    user.is_verified = true;
    let user = store.insert_user(user).await?;
    log::info!("Created admin account {}", user.email);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UserStore};

    #[actix_rt::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let store = MemoryStore::new();
        let credentials = AdminBootstrap {
            email: "Admin@Example.com".into(),
            password: "admin123".into(),
        };

        let first = bootstrap_admin(&store, &credentials).await.unwrap();
        let second = bootstrap_admin(&store, &credentials).await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(second.is_admin());
        assert_eq!(second.email, "admin@example.com");
    }

    #[actix_rt::test]
    async fn test_bootstrap_promotes_existing_account() {
        let store = MemoryStore::new();
        let mut existing = User::new(
            "Ops",
            "ops@example.com",
            "hash".into(),
            AccountRole::Client,
            Purpose::Professional,
        );
        existing.is_active = false;
        store.insert_user(existing).await.unwrap();

        let admin = bootstrap_admin(
            &store,
            &AdminBootstrap {
                email: "ops@example.com".into(),
                password: "ignored".into(),
            },
        )
        .await
        .unwrap();
        assert!(admin.is_admin());
        assert!(admin.is_active);
    }
}
