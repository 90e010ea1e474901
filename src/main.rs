use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, db::Databases, routes::init_routes};

mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;
mod utils;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health_check,
        routes::players::list_players,
        routes::players::create_player,
        routes::players::get_player,
        routes::players::update_player,
        routes::players::delete_player,
        routes::players::submit_score,
        routes::players::list_player_achievements,
        routes::players::award_achievement,
        routes::questions::list_questions,
        routes::questions::create_question,
        routes::questions::list_categories,
        routes::questions::random_questions,
        routes::questions::get_question,
        routes::questions::replace_question,
        routes::questions::delete_question,
        routes::questions::check_answer,
        routes::achievements::list_achievements,
        routes::achievements::create_achievement,
        routes::achievements::get_achievement,
        routes::achievements::delete_achievement,
        routes::leaderboards::get_leaderboard,
    ),
    components(
        schemas(
            error::ErrorBody,
            models::player::CreatePlayerRequest,
            models::player::UpdatePlayerRequest,
            models::player::SubmitScoreRequest,
            models::player::PlayerResponse,
            models::player::ScoreRecordResponse,
            models::player::UnlockedAchievementResponse,
            models::player::SubmitScoreResponse,
            models::player::PlayerAchievementResponse,
            models::question::Difficulty,
            models::question::QuestionRequest,
            models::question::QuestionResponse,
            models::question::CheckAnswerRequest,
            models::question::CheckAnswerResponse,
            models::achievement::UnlockCondition,
            models::achievement::CreateAchievementRequest,
            models::achievement::AchievementResponse,
            models::leaderboard::Period,
            models::leaderboard::UserInfo,
            models::leaderboard::LeaderboardEntry,
        )
    ),
    tags(
        (name = "players", description = "Players, their scores and achievements"),
        (name = "questions", description = "Quiz questions"),
        (name = "achievements", description = "Achievement definitions"),
        (name = "leaderboards", description = "Ranked scores per theme and period")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let client = db::connect(&config.mongo_uri).await?;
    tracing::info!(
        "Connected to MongoDB (databases: {}, {}, {})",
        config.users_db,
        config.questions_db,
        config.achievements_db
    );

    let dbs = Databases::new(&client, &config);

    let app = init_routes(&dbs, &config).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("API docs: http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
