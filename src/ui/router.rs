//! Selector UI router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Every response carries `Cache-Control: no-store` so the browser always
//! re-renders from current state.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use super::handlers;
use crate::core_state::CoreState;
use crate::predictor::PredictorApi;

/// Build the selector UI router.
pub fn selector_router<P: PredictorApi>(core: Arc<CoreState<P>>) -> Router {
    Router::new()
        .route("/", get(handlers::page::<P>))
        .route("/dropdown", get(handlers::dropdown::<P>))
        .route("/symptoms/toggle", post(handlers::toggle::<P>))
        .route("/symptoms/remove", post(handlers::remove::<P>))
        .route("/search/confirm", post(handlers::confirm_search::<P>))
        .route("/predict", post(handlers::predict::<P>))
        .route("/panel/dismiss", post(handlers::dismiss_panel::<P>))
        .route("/vocabulary/reload", post(handlers::reload_vocabulary::<P>))
        .route("/health", get(handlers::health))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(core)
}
