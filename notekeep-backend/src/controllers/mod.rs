pub mod auth;
pub mod health;
pub mod notes;

use actix_web::web;

use crate::error::{json_error_handler, query_error_handler};

/// Register every route plus the extractor configs that render bad input as
/// the JSON error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .configure(health::config_routes)
        .configure(auth::config)
        .configure(notes::config);
}
