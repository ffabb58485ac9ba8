// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared fixtures: an in-process fake Strava and a scripted operator.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use strava_etl::config::Config;
use strava_etl::error::AuthError;
use strava_etl::models::Credential;
use strava_etl::services::{AuthReason, CodePrompt};
use strava_etl::store::TokenStore;

/// One call to the activities endpoint.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ActivityRequest {
    pub bearer: Option<String>,
    pub after: Option<i64>,
    pub page: u32,
    pub per_page: Option<u32>,
}

/// Fake Strava API. Pages are served in order; past the end, an empty page.
#[derive(Default)]
pub struct FakeStrava {
    pages: Mutex<Vec<Vec<Value>>>,
    token_status: AtomicU16,
    activities_status: AtomicU16,
    issued: AtomicU32,
    pub token_requests: Mutex<Vec<HashMap<String, String>>>,
    pub activity_requests: Mutex<Vec<ActivityRequest>>,
}

#[allow(dead_code)]
impl FakeStrava {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_pages(pages: Vec<Vec<Value>>) -> Arc<Self> {
        let fake = Self::new();
        *fake.pages.lock().unwrap() = pages;
        fake
    }

    /// Make the token endpoint answer with this HTTP status.
    pub fn fail_token_endpoint(&self, status: u16) {
        self.token_status.store(status, Ordering::SeqCst);
    }

    /// Make the activities endpoint answer with this HTTP status.
    pub fn fail_activities(&self, status: u16) {
        self.activities_status.store(status, Ordering::SeqCst);
    }

    pub fn token_grants(&self) -> Vec<String> {
        self.token_requests
            .lock()
            .unwrap()
            .iter()
            .map(|form| form.get("grant_type").cloned().unwrap_or_default())
            .collect()
    }

    pub fn activity_calls(&self) -> Vec<ActivityRequest> {
        self.activity_requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port; returns the base URL.
    pub async fn spawn(self: &Arc<Self>) -> String {
        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/api/v3/athlete/activities", get(activities))
            .with_state(Arc::clone(self));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

fn error_status(code: u16) -> Option<StatusCode> {
    (code != 0).then(|| StatusCode::from_u16(code).unwrap())
}

async fn token(
    State(fake): State<Arc<FakeStrava>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    fake.token_requests.lock().unwrap().push(form);

    if let Some(status) = error_status(fake.token_status.load(Ordering::SeqCst)) {
        return (status, Json(json!({"message": "Bad Request"}))).into_response();
    }

    let n = fake.issued.fetch_add(1, Ordering::SeqCst) + 1;
    let expires_at = chrono::Utc::now().timestamp() + 6 * 3600;
    Json(json!({
        "token_type": "Bearer",
        "access_token": format!("access-{}", n),
        "refresh_token": format!("refresh-{}", n),
        "expires_at": expires_at,
        "expires_in": 21600,
        "athlete": {"id": 1, "firstname": "Test"}
    }))
    .into_response()
}

async fn activities(
    State(fake): State<Arc<FakeStrava>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    fake.activity_requests.lock().unwrap().push(ActivityRequest {
        bearer: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string),
        after: query.get("after").and_then(|v| v.parse().ok()),
        page,
        per_page: query.get("per_page").and_then(|v| v.parse().ok()),
    });

    if let Some(status) = error_status(fake.activities_status.load(Ordering::SeqCst)) {
        return (status, Json(json!({"message": "error"}))).into_response();
    }

    let pages = fake.pages.lock().unwrap();
    let body = pages
        .get(page.saturating_sub(1) as usize)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(body)).into_response()
}

/// An activity as the list endpoint returns it.
#[allow(dead_code)]
pub fn strava_activity(id: u64, kind: &str, polyline: Option<&str>) -> Value {
    json!({
        "resource_state": 2,
        "id": id,
        "name": format!("Activity {}", id),
        "type": kind,
        "sport_type": kind,
        "start_date": "2026-01-26T16:00:00Z",
        "start_date_local": "2026-01-26T08:00:00Z",
        "distance": 15000.0,
        "moving_time": 3600,
        "elapsed_time": 4000,
        "total_elevation_gain": 210.3,
        "commute": id % 2 == 0,
        "trainer": polyline.is_none(),
        "map": {"id": format!("a{}", id), "summary_polyline": polyline.unwrap_or(""), "resource_state": 2}
    })
}

/// Config rooted in `dir`, talking to the fake at `base_url`.
#[allow(dead_code)]
pub fn test_config(dir: &Path, base_url: &str) -> Config {
    Config {
        api_base_url: format!("{}/api/v3", base_url),
        oauth_base_url: format!("{}/oauth", base_url),
        http_timeout_secs: 5,
        output_dir: dir.join("data"),
        token_file: dir.join("config/strava_tokens.json"),
        ..Config::default()
    }
}

/// Store a credential expiring `expires_in` seconds from now.
#[allow(dead_code)]
pub fn store_credential(config: &Config, expires_in: i64) -> Credential {
    let credential = Credential {
        access_token: "stored-access".to_string(),
        refresh_token: "stored-refresh".to_string(),
        expires_at: chrono::Utc::now().timestamp() + expires_in,
    };
    TokenStore::new(&config.token_file).save(&credential).unwrap();
    credential
}

/// Operator stand-in: answers prompts from a script, records each request.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    pub requests: Mutex<Vec<(String, AuthReason)>>,
}

#[allow(dead_code)]
impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn reasons(&self) -> Vec<AuthReason> {
        self.requests.lock().unwrap().iter().map(|(_, r)| *r).collect()
    }
}

impl CodePrompt for ScriptedPrompt {
    fn request_code(
        &self,
        authorization_url: &str,
        reason: AuthReason,
    ) -> Result<Option<String>, AuthError> {
        self.requests
            .lock()
            .unwrap()
            .push((authorization_url.to_string(), reason));
        Ok(self.answers.lock().unwrap().pop_front().flatten())
    }
}
