use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod auth;
mod config;
mod controllers;
mod db;
mod error;
mod models;
mod services;
#[cfg(test)]
mod testing;

use auth::TokenCodec;
use config::Config;
use db::Database;
use services::{AccountService, NoteService};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub accounts: AccountService,
    pub notes: NoteService,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let tokens = Arc::new(TokenCodec::new(&config.access_token_secret));
        Self {
            accounts: AccountService::new(Arc::clone(&db), Arc::clone(&tokens), config),
            notes: NoteService::new(db),
            tokens,
        }
    }
}

fn to_io_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Notekeep v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        to_io_error(e)
    })?;

    config::initialize_data_dir(&config.database_url)?;
    log::info!("Opening database at {}", config.database_url);
    let db = Database::open(&config.database_url, config.database_pool_size).map_err(to_io_error)?;

    let state = web::Data::new(AppState::new(Arc::new(db), &config));

    log::info!(
        "Starting server on {}:{}",
        config.bind_address,
        config.port
    );

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
