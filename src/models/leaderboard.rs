use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Time window a leaderboard covers. Windows are calendar-aligned in UTC.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    #[default]
    AllTime,
    Daily,
    Monthly,
}

impl Period {
    /// Earliest instant a score may have been achieved at to count, or `None`
    /// for no lower bound.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let first = match self {
            Period::AllTime => return None,
            Period::Daily => today,
            Period::Monthly => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?,
        };
        first.and_hms_opt(0, 0, 0).map(|t| t.and_utc())
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Quiz theme, matched exactly.
    pub theme: String,
    #[serde(default)]
    #[param(inline)]
    pub period: Period,
    /// Maximum number of entries. Defaults to 10, capped at 100.
    pub limit: Option<usize>,
}

impl LeaderboardQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
}

/// Shape the frontend's leaderboard table renders.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub placement: u32,
    pub user_info: UserInfo,
    pub top_score: i64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn windows_are_calendar_aligned() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 17, 45, 12).unwrap();

        assert_eq!(Period::AllTime.window_start(now), None);
        assert_eq!(
            Period::Daily.window_start(now),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap())
        );
        assert_eq!(
            Period::Monthly.window_start(now),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn period_uses_frontend_spelling() {
        let p: Period = serde_json::from_str("\"allTime\"").unwrap();
        assert_eq!(p, Period::AllTime);
        let p: Period = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(p, Period::Monthly);
        assert!(serde_json::from_str::<Period>("\"weekly\"").is_err());
    }

    #[test]
    fn limit_defaults_and_caps() {
        let query = |limit| LeaderboardQuery {
            theme: "Science".to_string(),
            period: Period::AllTime,
            limit,
        };
        assert_eq!(query(None).effective_limit(), DEFAULT_LIMIT);
        assert_eq!(query(Some(3)).effective_limit(), 3);
        assert_eq!(query(Some(5000)).effective_limit(), MAX_LIMIT);
    }

    #[test]
    fn entry_serializes_as_frontend_expects() {
        let entry = LeaderboardEntry {
            placement: 1,
            user_info: UserInfo {
                id: "abc".to_string(),
                username: "alice".to_string(),
            },
            top_score: 90,
        };
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["placement"], 1);
        assert_eq!(json["userInfo"]["username"], "alice");
        assert_eq!(json["topScore"], 90);
    }
}
