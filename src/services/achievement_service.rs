use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::db::ACHIEVEMENTS_COLLECTION;
use crate::error::AppError;
use crate::models::{
    achievement::{Achievement, CreateAchievementRequest},
    player::{Player, UnlockedAchievement},
};

pub struct AchievementService {
    collection: Collection<Achievement>,
}

impl AchievementService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ACHIEVEMENTS_COLLECTION),
        }
    }

    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_achievement(&self, id: ObjectId) -> Result<Achievement, AppError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("Achievement not found".to_string()))
    }

    pub async fn create_achievement(
        &self,
        req: CreateAchievementRequest,
    ) -> Result<Achievement, AppError> {
        let mut achievement = req.into_achievement(Utc::now())?;

        let insert_result = self.collection.insert_one(&achievement).await?;
        achievement.id = insert_result.inserted_id.as_object_id();

        tracing::debug!("Created achievement {} ({:?})", achievement.name, achievement.id);
        Ok(achievement)
    }

    /// Players keep their references to a deleted achievement; they are
    /// skipped when resolved.
    pub async fn delete_achievement(&self, id: ObjectId) -> Result<(), AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Achievement not found".to_string()));
        }
        Ok(())
    }

    /// Resolves the player's unlocked achievements, oldest unlock first.
    pub async fn player_achievements(
        &self,
        player: &Player,
    ) -> Result<Vec<(Achievement, UnlockedAchievement)>, AppError> {
        if player.achievements.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<ObjectId> = player.achievements.iter().map(|a| a.achievement_id).collect();
        let definitions: Vec<Achievement> = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;

        let mut resolved: Vec<(Achievement, UnlockedAchievement)> = player
            .achievements
            .iter()
            .filter_map(|unlocked| {
                definitions
                    .iter()
                    .find(|d| d.id == Some(unlocked.achievement_id))
                    .map(|d| (d.clone(), unlocked.clone()))
            })
            .collect();
        resolved.sort_by_key(|(_, unlocked)| unlocked.unlocked_at.timestamp_millis());
        Ok(resolved)
    }
}
