use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::resolver::PriceQuote;
use crate::services::schedule::{self, DaySchedule};
use crate::state::AppState;

use super::{check_auth, query_params, required_date};

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

// GET /api/schedule?date=YYYY-MM-DD
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<DaySchedule>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let query = query_params(query)?;
    let date = required_date(query.date.as_deref())?;

    let day = {
        let db = state.conn()?;
        schedule::list_slots_for_date(&db, date, state.today())?
    };
    Ok(Json(day))
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub date: Option<String>,
    pub slot: Option<String>,
}

// GET /api/quote?date=YYYY-MM-DD&slot=...
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> Result<Json<PriceQuote>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let query = query_params(query)?;
    let date = required_date(query.date.as_deref())?;
    let slot = query
        .slot
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("missing ?slot=".to_string()))?;

    let quote = {
        let db = state.conn()?;
        schedule::quote(&db, date, &slot)?
    };
    Ok(Json(quote))
}
