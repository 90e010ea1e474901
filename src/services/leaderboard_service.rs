use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database};

use crate::db::USERS_COLLECTION;
use crate::error::AppError;
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardQuery, UserInfo};
use crate::models::player::{Player, ScoreRecord};
use crate::utils::require_non_empty;

/// Leaderboards are read-only views over the player documents; nothing is
/// persisted.
pub struct LeaderboardService {
    collection: Collection<Player>,
}

impl LeaderboardService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    pub async fn get_leaderboard(
        &self,
        query: &LeaderboardQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let theme = require_non_empty(&query.theme, "theme")?;
        let since = query.period.window_start(now);

        let players: Vec<Player> = self
            .collection
            .find(candidate_filter(&theme, since))
            .await?
            .try_collect()
            .await?;

        Ok(rank_players(&players, &theme, since, query.effective_limit()))
    }
}

/// Narrows the scan to players with at least one qualifying score.
fn candidate_filter(theme: &str, since: Option<DateTime<Utc>>) -> Document {
    let mut elem = doc! { "theme": theme };
    if let Some(since) = since {
        elem.insert("achieved_at", doc! { "$gte": bson::DateTime::from_chrono(since) });
    }
    doc! { "scores": { "$elemMatch": elem } }
}

/// Each player's best score in `theme` since `since`, ranked highest first.
///
/// Ties on score go to whoever reached it first, then by username. Equal
/// scores share a placement and the next one skips ahead (1, 2, 2, 4).
pub fn rank_players(
    players: &[Player],
    theme: &str,
    since: Option<DateTime<Utc>>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let since_ms = since.map(|s| s.timestamp_millis());
    let counts = |s: &&ScoreRecord| {
        s.theme == theme && since_ms.map_or(true, |ms| s.achieved_at.timestamp_millis() >= ms)
    };

    let mut best: Vec<(&Player, &ScoreRecord)> = players
        .iter()
        .filter_map(|p| {
            p.scores
                .iter()
                .filter(|s| counts(s))
                .max_by(|a, b| {
                    a.score.cmp(&b.score).then_with(|| {
                        b.achieved_at
                            .timestamp_millis()
                            .cmp(&a.achieved_at.timestamp_millis())
                    })
                })
                .map(|s| (p, s))
        })
        .collect();

    best.sort_by(|(pa, sa), (pb, sb)| {
        sb.score
            .cmp(&sa.score)
            .then_with(|| {
                sa.achieved_at
                    .timestamp_millis()
                    .cmp(&sb.achieved_at.timestamp_millis())
            })
            .then_with(|| pa.username.cmp(&pb.username))
    });
    best.truncate(limit);

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(best.len());
    for (index, (player, score)) in best.into_iter().enumerate() {
        let placement = match entries.last() {
            Some(prev) if prev.top_score == score.score => prev.placement,
            _ => index as u32 + 1,
        };
        entries.push(LeaderboardEntry {
            placement,
            user_info: UserInfo {
                id: player.id.map(|oid| oid.to_hex()).unwrap_or_default(),
                username: player.username.clone(),
            },
            top_score: score.score,
        });
    }
    entries
}
