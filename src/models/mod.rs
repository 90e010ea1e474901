pub mod achievement;
pub mod leaderboard;
pub mod player;
pub mod question;
