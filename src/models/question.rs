use std::collections::HashSet;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::utils::require_non_empty;

/// DB model (internal, used for Mongo)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Question {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub category: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The value stored in the `difficulty` field, for building filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer.trim() == answer.trim()
    }
}

/// Request DTO for both create and full replace.
#[derive(Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub category: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

/// Response DTO (server → client)
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Option<String>,
    pub category: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RandomQuestionsQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Number of questions to draw, 1..=50. Defaults to 10.
    pub count: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckAnswerRequest {
    pub answer: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerResponse {
    pub correct: bool,
    pub correct_answer: String,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        QuestionResponse {
            id: q.id.map(|oid| oid.to_hex()),
            category: q.category,
            question: q.question,
            options: q.options,
            correct_answer: q.correct_answer,
            difficulty: q.difficulty,
        }
    }
}

impl TryFrom<QuestionRequest> for Question {
    type Error = AppError;

    fn try_from(req: QuestionRequest) -> Result<Self, Self::Error> {
        let category = require_non_empty(&req.category, "category")?;
        let question = require_non_empty(&req.question, "question")?;

        let options: Vec<String> = req.options.iter().map(|o| o.trim().to_string()).collect();
        if options.len() < 2 {
            return Err(AppError::BadRequest(
                "A question needs at least two options".to_string(),
            ));
        }
        if options.iter().any(|o| o.is_empty()) {
            return Err(AppError::BadRequest("Options must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        if !options.iter().all(|o| seen.insert(o.as_str())) {
            return Err(AppError::BadRequest("Options must be distinct".to_string()));
        }

        let correct_answer = req.correct_answer.trim().to_string();
        if !options.contains(&correct_answer) {
            return Err(AppError::BadRequest(
                "correctAnswer must be one of the options".to_string(),
            ));
        }

        Ok(Question {
            id: None,
            category,
            question,
            options,
            correct_answer,
            difficulty: req.difficulty,
        })
    }
}
