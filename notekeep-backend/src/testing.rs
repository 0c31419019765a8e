//! Shared fixtures for handler tests.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{test, web};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

use crate::AppState;
use crate::config::Config;
use crate::db::Database;

/// Fresh state over an empty in-memory store.
pub fn app_state() -> web::Data<AppState> {
    let db = Database::open_in_memory().expect("in-memory database");
    web::Data::new(AppState::new(Arc::new(db), &Config::for_tests()))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Send a request and decode the body as JSON. An empty body decodes to `Null`.
pub async fn call_json<S, R, B, E>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = E>,
    E: Debug,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).expect("JSON body"))
}

/// Build the full application around `state` (or a fresh one).
macro_rules! test_app {
    () => {
        $crate::testing::test_app!($crate::testing::app_state())
    };
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure($crate::controllers::configure),
        )
        .await
    };
}

pub(crate) use test_app;
