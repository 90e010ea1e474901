use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, ErrorBody};
use crate::models::question::{
    CheckAnswerRequest, CheckAnswerResponse, QuestionFilter, QuestionRequest, QuestionResponse,
    RandomQuestionsQuery,
};
use crate::services::question_service::{sample_size, QuestionService};
use crate::utils::parse_object_id;

#[utoipa::path(
    get,
    path = "/questions",
    tag = "questions",
    params(QuestionFilter),
    responses(
        (status = 200, description = "Questions matching the filter", body = [QuestionResponse])
    )
)]
pub async fn list_questions(
    State(question_service): State<Arc<QuestionService>>,
    Query(filter): Query<QuestionFilter>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let questions = question_service
        .list_questions(filter.category.as_deref(), filter.difficulty)
        .await?;
    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/questions",
    tag = "questions",
    request_body = QuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Invalid question", body = ErrorBody)
    )
)]
pub async fn create_question(
    State(question_service): State<Arc<QuestionService>>,
    Json(req): Json<QuestionRequest>,
) -> Result<(StatusCode, Json<QuestionResponse>), AppError> {
    let question = question_service.create_question(req).await?;
    Ok((StatusCode::CREATED, Json(question.into())))
}

#[utoipa::path(
    get,
    path = "/questions/categories",
    tag = "questions",
    responses(
        (status = 200, description = "Distinct question categories", body = [String])
    )
)]
pub async fn list_categories(
    State(question_service): State<Arc<QuestionService>>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(question_service.list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/questions/random",
    tag = "questions",
    params(RandomQuestionsQuery),
    responses(
        (status = 200, description = "Randomly drawn questions", body = [QuestionResponse]),
        (status = 400, description = "count out of range", body = ErrorBody)
    )
)]
pub async fn random_questions(
    State(question_service): State<Arc<QuestionService>>,
    Query(query): Query<RandomQuestionsQuery>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let count = sample_size(query.count)?;
    let questions = question_service
        .random_questions(query.category.as_deref(), query.difficulty, count)
        .await?;
    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/questions/{id}",
    tag = "questions",
    params(
        ("id" = String, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question found", body = QuestionResponse),
        (status = 400, description = "Invalid question ID", body = ErrorBody),
        (status = 404, description = "Question not found", body = ErrorBody)
    )
)]
pub async fn get_question(
    State(question_service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
) -> Result<Json<QuestionResponse>, AppError> {
    let id = parse_object_id(&id, "question")?;
    Ok(Json(question_service.get_question(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/questions/{id}",
    tag = "questions",
    params(
        ("id" = String, Path, description = "Question ID")
    ),
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Question replaced", body = QuestionResponse),
        (status = 400, description = "Invalid ID or question", body = ErrorBody),
        (status = 404, description = "Question not found", body = ErrorBody)
    )
)]
pub async fn replace_question(
    State(question_service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let id = parse_object_id(&id, "question")?;
    Ok(Json(question_service.replace_question(id, req).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "questions",
    params(
        ("id" = String, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 400, description = "Invalid question ID", body = ErrorBody),
        (status = 404, description = "Question not found", body = ErrorBody)
    )
)]
pub async fn delete_question(
    State(question_service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_object_id(&id, "question")?;
    question_service.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/questions/{id}/check",
    tag = "questions",
    params(
        ("id" = String, Path, description = "Question ID")
    ),
    request_body = CheckAnswerRequest,
    responses(
        (status = 200, description = "Whether the answer is correct", body = CheckAnswerResponse),
        (status = 400, description = "Invalid question ID", body = ErrorBody),
        (status = 404, description = "Question not found", body = ErrorBody)
    )
)]
pub async fn check_answer(
    State(question_service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
    Json(req): Json<CheckAnswerRequest>,
) -> Result<Json<CheckAnswerResponse>, AppError> {
    let id = parse_object_id(&id, "question")?;
    let (correct, correct_answer) = question_service.check_answer(id, &req.answer).await?;
    Ok(Json(CheckAnswerResponse {
        correct,
        correct_answer,
    }))
}

pub fn question_routes(question_service: Arc<QuestionService>) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/categories", get(list_categories))
        .route("/questions/random", get(random_questions))
        .route(
            "/questions/{id}",
            get(get_question).put(replace_question).delete(delete_question),
        )
        .route("/questions/{id}/check", post(check_answer))
        .with_state(question_service)
}
