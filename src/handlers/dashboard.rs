use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::models::Dashboard;
use crate::services::dashboard;
use crate::state::AppState;

use super::check_auth;

// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Dashboard>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let summary = {
        let db = state.conn()?;
        dashboard::dashboard(&db, state.today())?
    };
    Ok(Json(summary))
}
