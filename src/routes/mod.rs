use axum::{http::header::CONTENT_TYPE, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    db::Databases,
    services::{
        achievement_service::AchievementService, leaderboard_service::LeaderboardService,
        player_service::PlayerService, question_service::QuestionService,
    },
};

pub mod achievements;
pub mod leaderboards;
pub mod players;
pub mod questions;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health check OK")
    )
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn init_routes(dbs: &Databases, config: &Config) -> Router {
    let player_service = Arc::new(PlayerService::new(&dbs.users));
    let leaderboard_service = Arc::new(LeaderboardService::new(&dbs.users));
    let question_service = Arc::new(QuestionService::new(&dbs.questions));
    let achievement_service = Arc::new(AchievementService::new(&dbs.achievements));

    // Only the frontend's origin may call the API from a browser. List mode
    // omits the allow-origin header for any other caller.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([config.cors_origin.clone()]))
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .merge(players::player_routes(player_service, achievement_service.clone()))
        .merge(questions::question_routes(question_service))
        .merge(achievements::achievement_routes(achievement_service))
        .merge(leaderboards::leaderboard_routes(leaderboard_service))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
