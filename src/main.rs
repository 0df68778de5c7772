use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

use talent_directory::{
    app::{self, AppState},
    auth::TokenKeys,
    config::Config,
    store::{MemoryStore, PgStore, Store},
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

async fn open_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    let Some(database_url) = &config.database_url else {
        log::warn!("DATABASE_URL is not set; using the in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;
    log::info!("Connected to database");

    Ok(Arc::new(PgStore::new(pool)))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    let store = open_store(&config).await?;

    if let Some(admin) = &config.admin {
        app::bootstrap_admin(store.as_ref(), admin)
            .await
            .map_err(|e| startup_error("Failed to create admin account", e))?;
    }

    let keys = TokenKeys::new(&config.jwt_secret, config.jwt_expiration_hours);
    let state = web::Data::new(AppState::new(store, keys));
    let frontend_url = config.frontend_url.clone();

    log::info!("Starting talent directory server at {}", config.server_url());
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(app::configure)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
