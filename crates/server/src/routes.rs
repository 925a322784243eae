use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::account::AccountService;

use crate::request_log::log_requests;

pub mod user;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health check plus the user RPCs.
///
/// `request_timeout` bounds every call; when it fires the handler future,
/// including any in-flight query, is dropped.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let rpc = Router::new()
        .route("/user.UserService/GetUserProducts", post(user::get_user_products))
        .route("/user.UserService/GetUserPreference", post(user::get_user_preference))
        .route("/user.UserService/UpdateUserPreference", post(user::update_user_preference))
        .route("/user.UserService/RemoveUserPreference", post(user::remove_user_preference))
        .route("/user.UserService/AddUserProduct", post(user::add_user_product))
        .route("/user.UserService/RemoveUserProduct", post(user::remove_user_product))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(rpc)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(log_requests))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
