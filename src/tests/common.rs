use axum::{
    body::{to_bytes, Body},
    http::{self, Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use mongodb::Client;
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    config::Config,
    db::{self, Databases},
    routes,
    services::{
        achievement_service::AchievementService, player_service::PlayerService,
        question_service::QuestionService,
    },
};

pub struct TestServices {
    pub player_service: PlayerService,
    pub achievement_service: AchievementService,
    pub question_service: QuestionService,
}

pub struct TestContext {
    pub app: Router,
    pub dbs: Databases,
    pub services: TestServices,
}

/// Router over a client that never reaches a server. Only usable for
/// requests that are rejected before any database round trip.
pub async fn offline_app() -> Router {
    let config = Config::from_lookup(|_| None).unwrap();
    let client = Client::with_uri_str(&config.mongo_uri).await.unwrap();
    routes::init_routes(&Databases::new(&client, &config), &config)
}

/// Connects to `MONGO_TEST_URI` with freshly named databases. Returns `None`
/// (and the calling test passes trivially) when the variable is unset.
pub async fn setup() -> Option<TestContext> {
    dotenv::dotenv().ok();

    let Ok(uri) = std::env::var("MONGO_TEST_URI") else {
        eprintln!("MONGO_TEST_URI not set, skipping database test");
        return None;
    };

    let suffix = ObjectId::new().to_hex();
    let config = Config::from_lookup(|key| match key {
        "MONGO_URI" => Some(uri.clone()),
        "MONGO_DB_NAME_USERS" => Some(format!("test_users_{}", suffix)),
        "MONGO_DB_NAME_QUESTIONS" => Some(format!("test_questions_{}", suffix)),
        "MONGO_DB_NAME_ACHIEVEMENTS" => Some(format!("test_achievements_{}", suffix)),
        _ => None,
    })
    .unwrap();

    let client = db::connect(&config.mongo_uri)
        .await
        .expect("MONGO_TEST_URI must point at a reachable MongoDB");
    let dbs = Databases::new(&client, &config);

    let services = TestServices {
        player_service: PlayerService::new(&dbs.users),
        achievement_service: AchievementService::new(&dbs.achievements),
        question_service: QuestionService::new(&dbs.questions),
    };
    let app = routes::init_routes(&dbs, &config);

    Some(TestContext { app, dbs, services })
}

impl TestContext {
    pub async fn teardown(self) {
        for db in [&self.dbs.users, &self.dbs.questions, &self.dbs.achievements] {
            if let Err(e) = db.drop().await {
                eprintln!("Failed to drop {}: {}", db.name(), e);
            }
        }
    }
}

/// Sends one request through the router and returns the status and the
/// JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, method: http::Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, http::Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, http::Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, http::Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, http::Method::DELETE, uri, None).await
}
