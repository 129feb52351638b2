use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::models::{PricingConfig, ReplacePricingRequest};
use crate::services::pricing;
use crate::state::AppState;

use super::{check_auth, json_body};

// GET /api/pricing
pub async fn get_pricing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PricingConfig>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let config = {
        let db = state.conn()?;
        pricing::get_config(&db)?
    };
    Ok(Json(config))
}

// PUT /api/pricing
pub async fn replace_pricing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<ReplacePricingRequest>, JsonRejection>,
) -> Result<Json<PricingConfig>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let req = json_body(body)?;

    let config = {
        let db = state.conn()?;
        pricing::replace_config(&db, &req)?
    };
    Ok(Json(config))
}
