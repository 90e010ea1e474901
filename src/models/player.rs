use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::achievement::AchievementResponse;

/// DB model for the `Users` collection.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Player {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
    #[serde(default)]
    pub achievements: Vec<UnlockedAchievement>,
    pub created_at: bson::DateTime,
}

impl Player {
    pub fn has_unlocked(&self, achievement_id: ObjectId) -> bool {
        self.achievements
            .iter()
            .any(|a| a.achievement_id == achievement_id)
    }
}

/// One finished quiz: the theme played and the score reached.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreRecord {
    pub theme: String,
    pub score: i64,
    pub achieved_at: bson::DateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UnlockedAchievement {
    pub achievement_id: ObjectId,
    pub unlocked_at: bson::DateTime,
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePlayerRequest {
    pub username: String,
    pub avatar: Option<String>,
}

/// Fields left out are kept as they are.
#[derive(Deserialize, ToSchema)]
pub struct UpdatePlayerRequest {
    pub username: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitScoreRequest {
    pub theme: String,
    pub score: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecordResponse {
    pub theme: String,
    pub score: i64,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievementResponse {
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: Option<String>,
    pub username: String,
    pub avatar: Option<String>,
    pub scores: Vec<ScoreRecordResponse>,
    pub achievements: Vec<UnlockedAchievementResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    pub score: ScoreRecordResponse,
    pub unlocked_achievements: Vec<AchievementResponse>,
}

/// An achievement a player holds, resolved against the `Achievements` collection.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAchievementResponse {
    pub achievement: AchievementResponse,
    pub unlocked_at: DateTime<Utc>,
}

impl From<ScoreRecord> for ScoreRecordResponse {
    fn from(s: ScoreRecord) -> Self {
        ScoreRecordResponse {
            theme: s.theme,
            score: s.score,
            achieved_at: s.achieved_at.to_chrono(),
        }
    }
}

impl From<UnlockedAchievement> for UnlockedAchievementResponse {
    fn from(a: UnlockedAchievement) -> Self {
        UnlockedAchievementResponse {
            achievement_id: a.achievement_id.to_hex(),
            unlocked_at: a.unlocked_at.to_chrono(),
        }
    }
}

impl From<Player> for PlayerResponse {
    fn from(p: Player) -> Self {
        PlayerResponse {
            id: p.id.map(|oid| oid.to_hex()),
            username: p.username,
            avatar: p.avatar,
            scores: p.scores.into_iter().map(Into::into).collect(),
            achievements: p.achievements.into_iter().map(Into::into).collect(),
            created_at: p.created_at.to_chrono(),
        }
    }
}
