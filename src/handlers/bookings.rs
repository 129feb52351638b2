use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{BookRequest, Booking, BookingPatch};
use crate::services::{ledger, schedule};
use crate::state::AppState;

use super::{admin_identity, check_auth, json_body, query_params, required_date};

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub date: Option<String>,
}

// GET /api/bookings?date=YYYY-MM-DD
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let query = query_params(query)?;
    let date = required_date(query.date.as_deref())?;

    let bookings = {
        let db = state.conn()?;
        ledger::list_for_date(&db, date)?
    };
    Ok(Json(bookings))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<BookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let req = json_body(body)?;
    let admin = admin_identity(&headers);

    let booking = {
        let mut db = state.conn()?;
        let new = schedule::prepare_booking(&db, &req)?;
        ledger::book(&mut db, new, &admin, state.today())?
    };
    Ok((StatusCode::CREATED, Json(booking)))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let admin = admin_identity(&headers);

    let booking = {
        let mut db = state.conn()?;
        ledger::cancel(&mut db, &id, &admin, state.today())?
    };
    Ok(Json(booking))
}

// PATCH /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<BookingPatch>, JsonRejection>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let patch = json_body(body)?;

    let booking = {
        let mut db = state.conn()?;
        ledger::update(&mut db, &id, &patch)?
    };
    Ok(Json(booking))
}
