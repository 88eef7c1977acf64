//! Analytics API Handlers

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use shared::permission::Section;

use crate::analytics::{AnalyticsReport, Metric, build_report};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::utils::time::{date_of_millis, now_millis};
use crate::utils::{AppError, AppResult};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Allowed lookback windows (days)
const ALLOWED_PERIODS: &[u32] = &[1, 7, 30, 90];

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_period")]
    pub period: u32,
    #[serde(default)]
    pub metric: Metric,
}

fn default_period() -> u32 {
    7
}

/// GET /api/analytics?period={1|7|30|90}&metric={all|revenue|orders|items|hours|growth}
///
/// 每次请求对窗口内订单从头聚合；growth 额外取等长的前一窗口。
pub async fn get_analytics(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AnalyticsReport>> {
    user.require_section(Section::Analytics)?;

    if !ALLOWED_PERIODS.contains(&query.period) {
        return Err(AppError::validation(format!(
            "period must be one of {:?}",
            ALLOWED_PERIODS
        )));
    }

    let end = now_millis();
    let start = end - query.period as i64 * MILLIS_PER_DAY;

    let repo = OrderRepository::new(state.db.clone());
    let current = repo.find_in_window(start, end).await?;

    // 前一等长窗口只在需要时取
    let previous = if matches!(query.metric, Metric::All | Metric::Growth) {
        repo.find_in_window(start - query.period as i64 * MILLIS_PER_DAY, start)
            .await?
    } else {
        Vec::new()
    };

    tracing::debug!(
        period = query.period,
        current = current.len(),
        previous = previous.len(),
        "Computing analytics"
    );

    Ok(Json(build_report(
        query.metric,
        query.period,
        date_of_millis(start),
        &current,
        &previous,
    )))
}
