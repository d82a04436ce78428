use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    Json,
};
use metrics::counter;

use crate::{
    api::{
        auth::{authorize, find_secret},
        errors::ApiError,
        types::ProgramsQueryParams,
    },
    metrics_consts::UNAUTHORIZED_REQUESTS_TOTAL,
    router::AppState,
    types::Envelope,
};

/// `GET /api/v1/programs`. Source failures are part of a 200 envelope; only a bad
/// secret or malformed paging turns into an error status.
pub async fn programs(
    state: State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Envelope>, ApiError> {
    let params = ProgramsQueryParams::from_query(query.as_deref());

    if let Err(e) = authorize(&state.secret, find_secret(&headers, &params)) {
        counter!(UNAUTHORIZED_REQUESTS_TOTAL).increment(1);
        return Err(e);
    }

    let page = params.page_request()?;
    let country = params.country();

    tracing::debug!(
        ?country,
        page = page.page,
        per_page = page.per_page,
        "listing programs"
    );
    let envelope = state.dispatcher.programs(&country, page).await;

    Ok(Json(envelope))
}
