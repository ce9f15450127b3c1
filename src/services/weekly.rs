use chrono::Local;
use tracing::info;

use crate::date_utils::TrailingWeek;
use crate::db::queries::weekly;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Message, WeeklySummary, WeeklyWritten};
use crate::services::analytics::spending_by_day;
use crate::services::upstream::{RequestContext, UpstreamClient};

const NOT_FOUND: &str = "Weekly analytics not found";

/// Computes spend per day for the seven days ending today and stores it as
/// the user's `last7days` summary.
pub async fn generate_last7days(
    db: &DbPool,
    upstream: &UpstreamClient,
    user_id: &str,
    ctx: &RequestContext,
) -> AppResult<WeeklyWritten> {
    let week = TrailingWeek::current();

    let categories = upstream.fetch_categories(user_id, ctx).await?;
    let days = spending_by_day(&categories, &week);

    let conn = db.get()?;
    let outcome = weekly::upsert_weekly(&conn, user_id, &days, Local::now().naive_local())?;

    let message = if outcome.created {
        "Weekly analytics generated"
    } else {
        "Weekly analytics updated"
    };
    info!(
        correlation_id = %ctx.correlation_id.as_deref().unwrap_or_default(),
        weekly_id = %outcome.id,
        user_id = %user_id,
        first_day = %week.first_day(),
        last_day = %week.last_day(),
        "{}",
        message
    );

    Ok(WeeklyWritten {
        message: message.to_string(),
        weekly_id: outcome.id,
    })
}

pub fn get_last7days(db: &DbPool, user_id: &str) -> AppResult<WeeklySummary> {
    let conn = db.get()?;
    weekly::find_weekly(&conn, user_id)?.ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

pub fn delete_last7days(db: &DbPool, user_id: &str) -> AppResult<Message> {
    let conn = db.get()?;
    if !weekly::delete_weekly(&conn, user_id)? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    info!(user_id = %user_id, "Weekly analytics deleted");
    Ok(Message::new("Weekly analytics deleted"))
}
