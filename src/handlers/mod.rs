pub mod bookings;
pub mod dashboard;
pub mod discounts;
pub mod health;
pub mod pricing;
pub mod schedule;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::day::parse_civil_date;

/// Header carrying the acting admin's identity, set by the session layer.
pub const ADMIN_HEADER: &str = "x-admin-id";

const DEFAULT_ADMIN: &str = "admin";

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn admin_identity(headers: &HeaderMap) -> String {
    headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_ADMIN)
        .to_string()
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(v)| v)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

fn required_date(value: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = value.ok_or_else(|| AppError::Validation("missing ?date=YYYY-MM-DD".to_string()))?;
    parse_civil_date(raw).ok_or_else(|| AppError::Validation(format!("invalid date: {raw}")))
}
