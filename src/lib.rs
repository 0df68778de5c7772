#![doc = "The `talent_directory` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, storage layer, authentication, admin"]
#![doc = "moderation, routing configuration and error handling of the talent marketplace"]
#![doc = "API, plus a typed client for it. The binary (`main.rs`) builds an `AppState`"]
#![doc = "and mounts `app::configure` on an actix-web server."]

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod messaging;
pub mod models;
pub mod moderation;
pub mod routes;
pub mod search;
pub mod store;
pub mod upload;

pub use crate::app::AppState;
pub use crate::error::AppError;
