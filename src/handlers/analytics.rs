use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::correlation::CorrelationId;
use crate::error::AppResult;
use crate::models::{
    Message, MonthlyGenerateRequest, MonthlySummary, MonthlyWritten, WeeklySummary, WeeklyWritten,
};
use crate::services::upstream::RequestContext;
use crate::services::{monthly, weekly};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub month: String,
}

fn request_context(auth: AuthUser, correlation: CorrelationId) -> RequestContext {
    RequestContext {
        auth_token: Some(auth.token),
        correlation_id: Some(correlation.0),
    }
}

pub async fn get_monthly(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<MonthParams>,
    auth: AuthUser,
) -> AppResult<Json<MonthlySummary>> {
    auth.require_user(&user_id)?;
    Ok(Json(monthly::get(&state.db, &user_id, &params.month)?))
}

pub async fn generate_monthly(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(correlation): Extension<CorrelationId>,
    auth: AuthUser,
    Json(payload): Json<MonthlyGenerateRequest>,
) -> AppResult<(StatusCode, Json<MonthlyWritten>)> {
    auth.require_user(&user_id)?;
    let ctx = request_context(auth, correlation);
    let written =
        monthly::generate(&state.db, &state.upstream, &user_id, &payload.month, &ctx).await?;
    Ok((StatusCode::CREATED, Json(written)))
}

pub async fn recompute_monthly(
    State(state): State<AppState>,
    Path((user_id, month)): Path<(String, String)>,
    Extension(correlation): Extension<CorrelationId>,
    auth: AuthUser,
) -> AppResult<Json<MonthlyWritten>> {
    auth.require_user(&user_id)?;
    let ctx = request_context(auth, correlation);
    let written = monthly::generate(&state.db, &state.upstream, &user_id, &month, &ctx).await?;
    Ok(Json(written))
}

pub async fn delete_monthly(
    State(state): State<AppState>,
    Path((user_id, month)): Path<(String, String)>,
    auth: AuthUser,
) -> AppResult<Json<Message>> {
    auth.require_user(&user_id)?;
    Ok(Json(monthly::delete(&state.db, &user_id, &month)?))
}

pub async fn get_weekly_last7(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    auth: AuthUser,
) -> AppResult<Json<WeeklySummary>> {
    auth.require_user(&user_id)?;
    Ok(Json(weekly::get_last7days(&state.db, &user_id)?))
}

pub async fn generate_weekly_last7(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(correlation): Extension<CorrelationId>,
    auth: AuthUser,
) -> AppResult<(StatusCode, Json<WeeklyWritten>)> {
    auth.require_user(&user_id)?;
    let ctx = request_context(auth, correlation);
    let written = weekly::generate_last7days(&state.db, &state.upstream, &user_id, &ctx).await?;
    Ok((StatusCode::CREATED, Json(written)))
}

pub async fn recompute_weekly_last7(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(correlation): Extension<CorrelationId>,
    auth: AuthUser,
) -> AppResult<Json<WeeklyWritten>> {
    auth.require_user(&user_id)?;
    let ctx = request_context(auth, correlation);
    let written = weekly::generate_last7days(&state.db, &state.upstream, &user_id, &ctx).await?;
    Ok(Json(written))
}

pub async fn delete_weekly_last7(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    auth: AuthUser,
) -> AppResult<Json<Message>> {
    auth.require_user(&user_id)?;
    Ok(Json(weekly::delete_last7days(&state.db, &user_id)?))
}
