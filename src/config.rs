use anyhow::{Context, Result};
use axum::http::HeaderValue;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub users_db: String,
    pub questions_db: String,
    pub achievements_db: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: HeaderValue,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment. Unset and blank variables both fall
    /// back to their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = var_or("PORT", "8000")
            .parse::<u16>()
            .context("PORT must be a valid u16")?;

        let cors_origin = HeaderValue::from_str(&var_or("CORS_ORIGIN", "http://localhost:5173"))
            .context("CORS_ORIGIN must be a valid header value")?;

        Ok(Config {
            mongo_uri: var_or("MONGO_URI", "mongodb://localhost:27017"),
            users_db: var_or("MONGO_DB_NAME_USERS", "users"),
            questions_db: var_or("MONGO_DB_NAME_QUESTIONS", "questions"),
            achievements_db: var_or("MONGO_DB_NAME_ACHIEVEMENTS", "achievements"),
            host: var_or("HOST", "0.0.0.0"),
            port,
            cors_origin,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Config;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_local_development_setup() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.users_db, "users");
        assert_eq!(config.questions_db, "questions");
        assert_eq!(config.achievements_db, "achievements");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://db:27017"),
            ("MONGO_DB_NAME_USERS", "players_prod"),
            ("PORT", "9100"),
            ("CORS_ORIGIN", "https://quiz.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.users_db, "players_prod");
        assert_eq!(config.questions_db, "questions");
        assert_eq!(config.port, 9100);
        assert_eq!(config.cors_origin, "https://quiz.example.com");
    }

    #[test]
    fn blank_variables_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("MONGO_URI", "  "),
            ("MONGO_DB_NAME_USERS", ""),
            ("MONGO_DB_NAME_ACHIEVEMENTS", " "),
            ("PORT", ""),
            ("CORS_ORIGIN", ""),
        ]))
        .unwrap();

        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.users_db, "users");
        assert_eq!(config.achievements_db, "achievements");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origin, "http://localhost:5173");
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn invalid_cors_origin_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("CORS_ORIGIN", "http://bad\norigin")])).is_err());
    }
}
