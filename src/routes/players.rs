use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, ErrorBody};
use crate::models::achievement::AchievementResponse;
use crate::models::player::{
    CreatePlayerRequest, PlayerAchievementResponse, PlayerResponse, SubmitScoreRequest,
    SubmitScoreResponse, UnlockedAchievementResponse, UpdatePlayerRequest,
};
use crate::services::{achievement_service::AchievementService, player_service::PlayerService};
use crate::utils::parse_object_id;

type PlayerState = (Arc<PlayerService>, Arc<AchievementService>);

#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses(
        (status = 200, description = "All players, sorted by username", body = [PlayerResponse])
    )
)]
pub async fn list_players(
    State((player_service, _achievement_service)): State<PlayerState>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    let players = player_service.list_players().await?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player created", body = PlayerResponse),
        (status = 400, description = "Empty username", body = ErrorBody),
        (status = 409, description = "Username already in use", body = ErrorBody)
    )
)]
pub async fn create_player(
    State((player_service, _achievement_service)): State<PlayerState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    let player = player_service.create_player(req).await?;
    Ok((StatusCode::CREATED, Json(player.into())))
}

#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Player found", body = PlayerResponse),
        (status = 400, description = "Invalid player ID", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    )
)]
pub async fn get_player(
    State((player_service, _achievement_service)): State<PlayerState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerResponse>, AppError> {
    let id = parse_object_id(&id, "player")?;
    Ok(Json(player_service.get_player(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    request_body = UpdatePlayerRequest,
    responses(
        (status = 200, description = "Player updated", body = PlayerResponse),
        (status = 400, description = "Invalid ID or empty username", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody),
        (status = 409, description = "Username already in use", body = ErrorBody)
    )
)]
pub async fn update_player(
    State((player_service, _achievement_service)): State<PlayerState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    let id = parse_object_id(&id, "player")?;
    Ok(Json(player_service.update_player(id, req).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 400, description = "Invalid player ID", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    )
)]
pub async fn delete_player(
    State((player_service, _achievement_service)): State<PlayerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_object_id(&id, "player")?;
    player_service.delete_player(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/players/{id}/scores",
    tag = "players",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    request_body = SubmitScoreRequest,
    responses(
        (status = 201, description = "Score recorded", body = SubmitScoreResponse),
        (status = 400, description = "Invalid ID, empty theme or negative score", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    )
)]
pub async fn submit_score(
    State((player_service, achievement_service)): State<PlayerState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<(StatusCode, Json<SubmitScoreResponse>), AppError> {
    let id = parse_object_id(&id, "player")?;

    let (record, unlocked) = player_service
        .submit_score(&achievement_service, id, req)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitScoreResponse {
            score: record.into(),
            unlocked_achievements: unlocked.into_iter().map(Into::into).collect(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/players/{id}/achievements",
    tag = "players",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Achievements the player has unlocked", body = [PlayerAchievementResponse]),
        (status = 400, description = "Invalid player ID", body = ErrorBody),
        (status = 404, description = "Player not found", body = ErrorBody)
    )
)]
pub async fn list_player_achievements(
    State((player_service, achievement_service)): State<PlayerState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlayerAchievementResponse>>, AppError> {
    let id = parse_object_id(&id, "player")?;
    let player = player_service.get_player(id).await?;

    let resolved = achievement_service.player_achievements(&player).await?;
    Ok(Json(
        resolved
            .into_iter()
            .map(|(achievement, unlocked)| PlayerAchievementResponse {
                achievement: AchievementResponse::from(achievement),
                unlocked_at: unlocked.unlocked_at.to_chrono(),
            })
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/players/{id}/achievements/{achievement_id}",
    tag = "players",
    params(
        ("id" = String, Path, description = "Player ID"),
        ("achievement_id" = String, Path, description = "Achievement ID")
    ),
    responses(
        (status = 201, description = "Achievement awarded", body = UnlockedAchievementResponse),
        (status = 400, description = "Invalid player or achievement ID", body = ErrorBody),
        (status = 404, description = "Player or achievement not found", body = ErrorBody),
        (status = 409, description = "Achievement already unlocked", body = ErrorBody)
    )
)]
pub async fn award_achievement(
    State((player_service, achievement_service)): State<PlayerState>,
    Path((id, achievement_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<UnlockedAchievementResponse>), AppError> {
    let id = parse_object_id(&id, "player")?;
    let achievement_id = parse_object_id(&achievement_id, "achievement")?;

    achievement_service.get_achievement(achievement_id).await?;
    let unlocked = player_service.award_achievement(id, achievement_id).await?;

    tracing::info!("Awarded achievement {} to player {}", achievement_id, id);
    Ok((StatusCode::CREATED, Json(unlocked.into())))
}

pub fn player_routes(
    player_service: Arc<PlayerService>,
    achievement_service: Arc<AchievementService>,
) -> Router {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route(
            "/players/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
        .route("/players/{id}/scores", post(submit_score))
        .route("/players/{id}/achievements", get(list_player_achievements))
        .route(
            "/players/{id}/achievements/{achievement_id}",
            post(award_achievement),
        )
        .with_state((player_service, achievement_service))
}
