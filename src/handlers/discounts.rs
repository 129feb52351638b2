use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::errors::AppError;
use crate::models::{CreateDiscountRequest, Discount};
use crate::services::discounts;
use crate::state::AppState;

use super::{check_auth, json_body};

// GET /api/discounts
pub async fn list_discounts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Discount>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let all = {
        let db = state.conn()?;
        discounts::list(&db)?
    };
    Ok(Json(all))
}

// POST /api/discounts
pub async fn create_discount(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CreateDiscountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Discount>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let req = json_body(body)?;

    let discount = {
        let db = state.conn()?;
        discounts::create(&db, &req, state.today())?
    };
    Ok((StatusCode::CREATED, Json(discount)))
}

// DELETE /api/discounts/:id
pub async fn delete_discount(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.conn()?;
        discounts::delete(&db, &id)?;
    }
    Ok(Json(serde_json::json!({"ok": true})))
}
