use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;

use crate::error::{AppError, ErrorBody};
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardQuery};
use crate::services::leaderboard_service::LeaderboardService;

#[utoipa::path(
    get,
    path = "/leaderboards",
    tag = "leaderboards",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked entries for the theme and period", body = [LeaderboardEntry]),
        (status = 400, description = "Missing theme or unknown period", body = ErrorBody)
    )
)]
pub async fn get_leaderboard(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = leaderboard_service
        .get_leaderboard(&query, Utc::now())
        .await?;
    Ok(Json(entries))
}

pub fn leaderboard_routes(leaderboard_service: Arc<LeaderboardService>) -> Router {
    Router::new()
        .route("/leaderboards", get(get_leaderboard))
        .with_state(leaderboard_service)
}
