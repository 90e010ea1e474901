use anyhow::{Context, Result};
use bson::doc;
use mongodb::{Client, Database};

use crate::config::Config;

pub const USERS_COLLECTION: &str = "Users";
pub const QUESTIONS_COLLECTION: &str = "Questions";
pub const ACHIEVEMENTS_COLLECTION: &str = "Achievements";

/// The three databases the server works against, all sharing one client.
#[derive(Clone)]
pub struct Databases {
    pub users: Database,
    pub questions: Database,
    pub achievements: Database,
}

impl Databases {
    pub fn new(client: &Client, config: &Config) -> Self {
        Self {
            users: client.database(&config.users_db),
            questions: client.database(&config.questions_db),
            achievements: client.database(&config.achievements_db),
        }
    }
}

/// Opens the client and pings the deployment. The driver connects lazily, so
/// without the ping a bad URI would only surface on the first request.
pub async fn connect(uri: &str) -> Result<Client> {
    let client = Client::with_uri_str(uri)
        .await
        .context("Invalid MongoDB connection string")?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .context("Failed to connect to MongoDB")?;

    Ok(client)
}
