use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{options::ReturnDocument, Collection, Database};

use crate::db::USERS_COLLECTION;
use crate::error::AppError;
use crate::models::{
    achievement::Achievement,
    player::{CreatePlayerRequest, Player, ScoreRecord, SubmitScoreRequest, UnlockedAchievement, UpdatePlayerRequest},
};
use crate::services::achievement_service::AchievementService;
use crate::utils::require_non_empty;

pub struct PlayerService {
    collection: Collection<Player>,
}

/// Empty or whitespace-only avatars are stored as absent.
fn normalize_avatar(avatar: Option<String>) -> Option<String> {
    avatar
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

impl PlayerService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "username": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_player(&self, id: ObjectId) -> Result<Player, AppError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))
    }

    pub async fn create_player(&self, req: CreatePlayerRequest) -> Result<Player, AppError> {
        let username = require_non_empty(&req.username, "username")?;
        self.ensure_username_available(&username, None).await?;

        let mut player = Player {
            id: None,
            username,
            avatar: normalize_avatar(req.avatar),
            scores: vec![],
            achievements: vec![],
            created_at: bson::DateTime::now(),
        };

        let insert_result = self.collection.insert_one(&player).await?;
        player.id = insert_result.inserted_id.as_object_id();

        tracing::debug!("Created player {} ({:?})", player.username, player.id);
        Ok(player)
    }

    pub async fn update_player(
        &self,
        id: ObjectId,
        req: UpdatePlayerRequest,
    ) -> Result<Player, AppError> {
        let mut set = Document::new();

        if let Some(username) = req.username {
            let username = require_non_empty(&username, "username")?;
            self.get_player(id).await?;
            self.ensure_username_available(&username, Some(id)).await?;
            set.insert("username", username);
        }
        if req.avatar.is_some() {
            set.insert("avatar", normalize_avatar(req.avatar));
        }

        if set.is_empty() {
            return self.get_player(id).await;
        }

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))
    }

    pub async fn delete_player(&self, id: ObjectId) -> Result<(), AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Player not found".to_string()));
        }
        tracing::debug!("Deleted player {}", id);
        Ok(())
    }

    /// Records a finished quiz, then unlocks every achievement the updated
    /// history now satisfies. Returns the stored record and the achievements
    /// unlocked by it.
    pub async fn submit_score(
        &self,
        achievement_service: &AchievementService,
        id: ObjectId,
        req: SubmitScoreRequest,
    ) -> Result<(ScoreRecord, Vec<Achievement>), AppError> {
        let theme = require_non_empty(&req.theme, "theme")?;
        if req.score < 0 {
            return Err(AppError::BadRequest("score must not be negative".to_string()));
        }

        let record = ScoreRecord {
            theme,
            score: req.score,
            achieved_at: bson::DateTime::now(),
        };

        let player = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$push": { "scores": bson::to_bson(&record)? } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

        let candidates: Vec<Achievement> = achievement_service
            .list_achievements()
            .await?
            .into_iter()
            .filter(|a| match a.id {
                Some(aid) => !player.has_unlocked(aid) && a.condition.is_met(&player.scores),
                None => false,
            })
            .collect();

        let mut unlocked = Vec::with_capacity(candidates.len());
        for achievement in candidates {
            let Some(achievement_id) = achievement.id else { continue };
            if self
                .push_unlock(id, achievement_id, record.achieved_at)
                .await?
            {
                unlocked.push(achievement);
            }
        }

        tracing::debug!(
            "Player {} scored {} in {}, unlocked {} achievement(s)",
            id,
            record.score,
            record.theme,
            unlocked.len()
        );
        Ok((record, unlocked))
    }

    /// Appends one unlock unless the player already holds that achievement.
    /// Returns whether the player document changed.
    async fn push_unlock(
        &self,
        id: ObjectId,
        achievement_id: ObjectId,
        at: bson::DateTime,
    ) -> Result<bool, AppError> {
        let entry = UnlockedAchievement {
            achievement_id,
            unlocked_at: at,
        };

        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "achievements.achievement_id": { "$ne": achievement_id } },
                doc! { "$push": { "achievements": bson::to_bson(&entry)? } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    /// Grants an achievement by hand. Fails with `Conflict` if the player
    /// already holds it.
    pub async fn award_achievement(
        &self,
        id: ObjectId,
        achievement_id: ObjectId,
    ) -> Result<UnlockedAchievement, AppError> {
        let unlocked_at = bson::DateTime::now();

        if !self.push_unlock(id, achievement_id, unlocked_at).await? {
            // Either the player is missing (NotFound) or already has it.
            self.get_player(id).await?;
            return Err(AppError::Conflict("Achievement already unlocked".to_string()));
        }
        Ok(UnlockedAchievement {
            achievement_id,
            unlocked_at,
        })
    }

    async fn ensure_username_available(
        &self,
        username: &str,
        except: Option<ObjectId>,
    ) -> Result<(), AppError> {
        let mut filter = doc! { "username": username };
        if let Some(id) = except {
            filter.insert("_id", doc! { "$ne": id });
        }

        if self.collection.find_one(filter).await?.is_some() {
            return Err(AppError::Conflict("Username already in use".to_string()));
        }
        Ok(())
    }
}
