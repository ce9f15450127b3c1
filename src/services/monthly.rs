use chrono::Local;
use tracing::info;

use crate::date_utils::MonthPeriod;
use crate::db::queries::monthly;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Message, MonthlySummary, MonthlyWritten};
use crate::services::analytics::spending_by_category;
use crate::services::upstream::{RequestContext, UpstreamClient};

const NOT_FOUND: &str = "Monthly analytics not found";

/// Fetches budgets and categories for the user, computes the month's spend per
/// category and stores it, replacing any earlier result for the same month.
pub async fn generate(
    db: &DbPool,
    upstream: &UpstreamClient,
    user_id: &str,
    month: &str,
    ctx: &RequestContext,
) -> AppResult<MonthlyWritten> {
    let period = MonthPeriod::parse(month)?;

    let budgets = upstream.fetch_budgets(user_id, &period, ctx).await?;
    let categories = upstream.fetch_categories(user_id, ctx).await?;
    let rows = spending_by_category(&categories, &budgets, &period);

    let conn = db.get()?;
    let outcome = monthly::upsert_monthly(
        &conn,
        user_id,
        &period.to_string(),
        &rows,
        Local::now().naive_local(),
    )?;

    let message = if outcome.created {
        "Monthly analytics generated"
    } else {
        "Monthly analytics updated"
    };
    info!(
        correlation_id = %ctx.correlation_id.as_deref().unwrap_or_default(),
        monthly_id = %outcome.id,
        user_id = %user_id,
        month = %period,
        rows = rows.len(),
        "{}",
        message
    );

    Ok(MonthlyWritten {
        message: message.to_string(),
        monthly_id: outcome.id,
    })
}

pub fn get(db: &DbPool, user_id: &str, month: &str) -> AppResult<MonthlySummary> {
    let period = MonthPeriod::parse(month)?;
    let conn = db.get()?;
    monthly::find_monthly(&conn, user_id, &period.to_string())?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

pub fn delete(db: &DbPool, user_id: &str, month: &str) -> AppResult<Message> {
    let period = MonthPeriod::parse(month)?;
    let conn = db.get()?;
    if !monthly::delete_monthly(&conn, user_id, &period.to_string())? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    info!(user_id = %user_id, month = %period, "Monthly analytics deleted");
    Ok(Message::new("Monthly analytics deleted"))
}
