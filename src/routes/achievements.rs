use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, ErrorBody};
use crate::models::achievement::{AchievementResponse, CreateAchievementRequest};
use crate::services::achievement_service::AchievementService;
use crate::utils::parse_object_id;

#[utoipa::path(
    get,
    path = "/achievements",
    tag = "achievements",
    responses(
        (status = 200, description = "All achievements, sorted by name", body = [AchievementResponse])
    )
)]
pub async fn list_achievements(
    State(achievement_service): State<Arc<AchievementService>>,
) -> Result<Json<Vec<AchievementResponse>>, AppError> {
    let achievements = achievement_service.list_achievements().await?;
    Ok(Json(achievements.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/achievements",
    tag = "achievements",
    request_body = CreateAchievementRequest,
    responses(
        (status = 201, description = "Achievement created", body = AchievementResponse),
        (status = 400, description = "Invalid achievement", body = ErrorBody)
    )
)]
pub async fn create_achievement(
    State(achievement_service): State<Arc<AchievementService>>,
    Json(req): Json<CreateAchievementRequest>,
) -> Result<(StatusCode, Json<AchievementResponse>), AppError> {
    let achievement = achievement_service.create_achievement(req).await?;
    Ok((StatusCode::CREATED, Json(achievement.into())))
}

#[utoipa::path(
    get,
    path = "/achievements/{id}",
    tag = "achievements",
    params(
        ("id" = String, Path, description = "Achievement ID")
    ),
    responses(
        (status = 200, description = "Achievement found", body = AchievementResponse),
        (status = 400, description = "Invalid achievement ID", body = ErrorBody),
        (status = 404, description = "Achievement not found", body = ErrorBody)
    )
)]
pub async fn get_achievement(
    State(achievement_service): State<Arc<AchievementService>>,
    Path(id): Path<String>,
) -> Result<Json<AchievementResponse>, AppError> {
    let id = parse_object_id(&id, "achievement")?;
    Ok(Json(achievement_service.get_achievement(id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/achievements/{id}",
    tag = "achievements",
    params(
        ("id" = String, Path, description = "Achievement ID")
    ),
    responses(
        (status = 204, description = "Achievement deleted"),
        (status = 400, description = "Invalid achievement ID", body = ErrorBody),
        (status = 404, description = "Achievement not found", body = ErrorBody)
    )
)]
pub async fn delete_achievement(
    State(achievement_service): State<Arc<AchievementService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_object_id(&id, "achievement")?;
    achievement_service.delete_achievement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn achievement_routes(achievement_service: Arc<AchievementService>) -> Router {
    Router::new()
        .route("/achievements", get(list_achievements).post(create_achievement))
        .route(
            "/achievements/{id}",
            get(get_achievement).delete(delete_achievement),
        )
        .with_state(achievement_service)
}
