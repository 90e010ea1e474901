pub mod achievement_service;
pub mod leaderboard_service;
pub mod player_service;
pub mod question_service;
