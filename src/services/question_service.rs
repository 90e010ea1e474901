use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database};

use crate::db::QUESTIONS_COLLECTION;
use crate::error::AppError;
use crate::models::question::{Difficulty, Question, QuestionRequest};

pub const DEFAULT_RANDOM_COUNT: i64 = 10;
pub const MAX_RANDOM_COUNT: i64 = 50;

pub struct QuestionService {
    collection: Collection<Question>,
}

fn question_filter(category: Option<&str>, difficulty: Option<Difficulty>) -> Document {
    let mut filter = Document::new();
    if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
        filter.insert("category", category);
    }
    if let Some(difficulty) = difficulty {
        filter.insert("difficulty", difficulty.as_str());
    }
    filter
}

/// Checks the requested sample size before anything is sent to the server.
pub fn sample_size(count: Option<i64>) -> Result<i64, AppError> {
    let count = count.unwrap_or(DEFAULT_RANDOM_COUNT);
    if !(1..=MAX_RANDOM_COUNT).contains(&count) {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {}",
            MAX_RANDOM_COUNT
        )));
    }
    Ok(count)
}

impl QuestionService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(QUESTIONS_COLLECTION),
        }
    }

    pub async fn create_question(&self, req: QuestionRequest) -> Result<Question, AppError> {
        let mut question = Question::try_from(req)?;

        let insert_result = self.collection.insert_one(&question).await?;
        question.id = insert_result.inserted_id.as_object_id();
        Ok(question)
    }

    pub async fn get_question(&self, id: ObjectId) -> Result<Question, AppError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))
    }

    pub async fn list_questions(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<Question>, AppError> {
        let cursor = self
            .collection
            .find(question_filter(category, difficulty))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn replace_question(
        &self,
        id: ObjectId,
        req: QuestionRequest,
    ) -> Result<Question, AppError> {
        let mut question = Question::try_from(req)?;
        question.id = Some(id);

        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &question)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Question not found".to_string()));
        }
        Ok(question)
    }

    pub async fn delete_question(&self, id: ObjectId) -> Result<(), AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    /// Distinct categories that have at least one question, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, AppError> {
        let values = self.collection.distinct("category", doc! {}).await?;

        let mut categories: Vec<String> = values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    /// Draws up to `count` random questions. Fewer come back when the
    /// filter matches fewer documents.
    pub async fn random_questions(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
        count: i64,
    ) -> Result<Vec<Question>, AppError> {
        let mut cursor = self
            .collection
            .aggregate(vec![
                doc! { "$match": question_filter(category, difficulty) },
                doc! { "$sample": { "size": count } },
            ])
            .await?;

        let mut questions = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            let q: Question = bson::from_document(doc)?;
            questions.push(q);
        }
        Ok(questions)
    }

    pub async fn check_answer(&self, id: ObjectId, answer: &str) -> Result<(bool, String), AppError> {
        let question = self.get_question(id).await?;
        Ok((question.is_correct(answer), question.correct_answer))
    }
}
