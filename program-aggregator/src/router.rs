use std::{future::ready, sync::Arc};

use axum::{http::StatusCode, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::api::endpoints::programs;
use crate::dispatch::Dispatcher;
use crate::http_metrics::{setup_metrics_recorder, track_metrics};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub secret: String,
}

async fn index() -> &'static str {
    "program-aggregator"
}

pub fn router(dispatcher: Arc<Dispatcher>, secret: String, enable_metrics: bool) -> Router {
    let state = AppState { dispatcher, secret };

    let status_router = Router::new()
        .route("/", get(index))
        .route("/_readiness", get(|| ready(StatusCode::OK)))
        .route("/_liveness", get(|| ready(StatusCode::OK)));

    let programs_router = Router::new()
        .route("/api/v1/programs", get(programs))
        .route("/api/v1/programs/", get(programs));

    let router = Router::new()
        .merge(status_router)
        .merge(programs_router)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state);

    // The recorder is global, so only install it when serving for real
    if enable_metrics {
        let recorder_handle = setup_metrics_recorder();
        router.route("/metrics", get(move || ready(recorder_handle.render())))
    } else {
        router
    }
}
