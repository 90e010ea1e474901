use std::collections::HashSet;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::models::player::ScoreRecord;
use crate::utils::require_non_empty;

/// DB model for the `Achievements` collection.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Achievement {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub condition: UnlockCondition,
    pub created_at: bson::DateTime,
}

/// What a player's score history must contain for the achievement to unlock.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UnlockCondition {
    /// At least `count` recorded scores.
    QuizzesCompleted { count: u32 },
    /// A single score of at least `score`, in `theme` if one is given.
    ScoreAtLeast {
        score: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        theme: Option<String>,
    },
    /// Scores recorded in at least `count` distinct themes.
    ThemesPlayed { count: u32 },
}

impl UnlockCondition {
    pub fn is_met(&self, scores: &[ScoreRecord]) -> bool {
        match self {
            UnlockCondition::QuizzesCompleted { count } => scores.len() >= *count as usize,
            UnlockCondition::ScoreAtLeast { score, theme } => scores.iter().any(|s| {
                s.score >= *score && theme.as_deref().map_or(true, |t| s.theme == t)
            }),
            UnlockCondition::ThemesPlayed { count } => {
                let themes: HashSet<&str> = scores.iter().map(|s| s.theme.as_str()).collect();
                themes.len() >= *count as usize
            }
        }
    }

    fn validate(self) -> Result<Self, AppError> {
        match self {
            UnlockCondition::QuizzesCompleted { count: 0 }
            | UnlockCondition::ThemesPlayed { count: 0 } => Err(AppError::BadRequest(
                "Condition count must be at least 1".to_string(),
            )),
            UnlockCondition::ScoreAtLeast { score, .. } if score < 0 => Err(
                AppError::BadRequest("Condition score must not be negative".to_string()),
            ),
            UnlockCondition::ScoreAtLeast {
                score,
                theme: Some(theme),
            } => Ok(UnlockCondition::ScoreAtLeast {
                score,
                theme: Some(require_non_empty(&theme, "theme")?),
            }),
            other => Ok(other),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateAchievementRequest {
    pub name: String,
    pub description: String,
    pub condition: UnlockCondition,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AchievementResponse {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub condition: UnlockCondition,
    pub created_at: DateTime<Utc>,
}

impl CreateAchievementRequest {
    pub fn into_achievement(self, now: DateTime<Utc>) -> Result<Achievement, AppError> {
        Ok(Achievement {
            id: None,
            name: require_non_empty(&self.name, "name")?,
            description: self.description.trim().to_string(),
            condition: self.condition.validate()?,
            created_at: bson::DateTime::from_chrono(now),
        })
    }
}

impl From<Achievement> for AchievementResponse {
    fn from(a: Achievement) -> Self {
        AchievementResponse {
            id: a.id.map(|oid| oid.to_hex()),
            name: a.name,
            description: a.description,
            condition: a.condition,
            created_at: a.created_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(theme: &str, score: i64) -> ScoreRecord {
        ScoreRecord {
            theme: theme.to_string(),
            score,
            achieved_at: bson::DateTime::from_millis(0),
        }
    }

    #[test]
    fn quizzes_completed_counts_every_record() {
        let cond = UnlockCondition::QuizzesCompleted { count: 3 };
        assert!(!cond.is_met(&[score("Science", 1), score("Science", 2)]));
        assert!(cond.is_met(&[score("Science", 1), score("Science", 2), score("History", 0)]));
    }

    #[test]
    fn score_at_least_respects_theme() {
        let any_theme = UnlockCondition::ScoreAtLeast { score: 80, theme: None };
        let science = UnlockCondition::ScoreAtLeast {
            score: 80,
            theme: Some("Science".to_string()),
        };
        let history = [score("History", 95), score("Science", 70)];

        assert!(any_theme.is_met(&history));
        assert!(!science.is_met(&history));
        assert!(science.is_met(&[score("Science", 80)]));
    }

    #[test]
    fn themes_played_counts_distinct_themes() {
        let cond = UnlockCondition::ThemesPlayed { count: 2 };
        assert!(!cond.is_met(&[score("Science", 1), score("Science", 5)]));
        assert!(cond.is_met(&[score("Science", 1), score("Art", 5)]));
    }

    #[test]
    fn empty_history_meets_nothing() {
        assert!(!UnlockCondition::QuizzesCompleted { count: 1 }.is_met(&[]));
        assert!(!UnlockCondition::ScoreAtLeast { score: 0, theme: None }.is_met(&[]));
    }

    #[test]
    fn condition_json_is_tagged() {
        let json = serde_json::json!({ "type": "scoreAtLeast", "score": 50 });
        let cond: UnlockCondition = serde_json::from_value(json).unwrap();
        assert_eq!(cond, UnlockCondition::ScoreAtLeast { score: 50, theme: None });

        let json = serde_json::to_value(UnlockCondition::ThemesPlayed { count: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "themesPlayed", "count": 4 }));
    }

    #[test]
    fn create_request_is_validated() {
        let now = Utc::now();
        let valid = CreateAchievementRequest {
            name: " First steps ".to_string(),
            description: "Finish a quiz".to_string(),
            condition: UnlockCondition::QuizzesCompleted { count: 1 },
        };
        assert_eq!(valid.into_achievement(now).unwrap().name, "First steps");

        let zero = CreateAchievementRequest {
            name: "Nothing".to_string(),
            description: String::new(),
            condition: UnlockCondition::ThemesPlayed { count: 0 },
        };
        assert!(zero.into_achievement(now).is_err());

        let unnamed = CreateAchievementRequest {
            name: "".to_string(),
            description: String::new(),
            condition: UnlockCondition::QuizzesCompleted { count: 1 },
        };
        assert!(unnamed.into_achievement(now).is_err());

        let negative = CreateAchievementRequest {
            name: "Negative".to_string(),
            description: String::new(),
            condition: UnlockCondition::ScoreAtLeast { score: -1, theme: None },
        };
        assert!(negative.into_achievement(now).is_err());
    }

    #[test]
    fn response_keeps_creation_time() {
        use chrono::TimeZone;

        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
        let achievement = CreateAchievementRequest {
            name: "Early bird".to_string(),
            description: String::new(),
            condition: UnlockCondition::QuizzesCompleted { count: 1 },
        }
        .into_achievement(now)
        .unwrap();

        assert_eq!(achievement.created_at.timestamp_millis(), now.timestamp_millis());
        assert_eq!(AchievementResponse::from(achievement).created_at, now);
    }
}
