use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use common::DefectStatus;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

/// A defect as returned by the server. Photo blobs are omitted; the watcher
/// never needs them.
#[derive(Debug, Clone, Deserialize)]
pub struct Defect {
    pub id: i32,
    pub name: String,
    pub defect_type: String,
    pub floor: String,
    pub axis_location: String,
    pub status: DefectStatus,
    pub notification_due_at: Option<DateTime<Utc>>,
    pub created_by_username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Thin blocking HTTP client for the Punchlist API.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: Client::new(),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let res = self
            .http
            .post(format!("{}/api/v1/auth/login", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .context("Failed to reach server")?;

        if !res.status().is_success() {
            bail!("Login failed: {}", error_message(res));
        }
        Ok(res.json()?)
    }

    pub fn pending_notifications(&self) -> Result<Vec<Defect>> {
        let res = self
            .authed(reqwest::Method::GET, "/api/v1/defects/notifications/pending")?
            .send()
            .context("Failed to reach server")?;

        if !res.status().is_success() {
            bail!("Failed to fetch pending reminders: {}", error_message(res));
        }
        Ok(res.json()?)
    }

    /// Acknowledge a reminder. Returns false when the defect was already
    /// gone, which the polling loop treats as harmless.
    pub fn acknowledge(&self, id: i32) -> Result<bool> {
        let res = self
            .authed(
                reqwest::Method::PATCH,
                &format!("/api/v1/defects/{id}/mark-notified"),
            )?
            .send()
            .context("Failed to reach server")?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !res.status().is_success() {
            bail!("Failed to acknowledge reminder {id}: {}", error_message(res));
        }
        Ok(true)
    }

    fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::blocking::RequestBuilder> {
        let token = self.token.as_deref().context(
            "No token. Run `punchlist login` or set PUNCHLIST_TOKEN",
        )?;
        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {token}")))
    }
}

fn error_message(res: reqwest::blocking::Response) -> String {
    let status = res.status();
    match res.json::<ErrorBody>() {
        Ok(body) => format!("{} ({})", body.message, body.code),
        Err(_) => format!("HTTP {status}"),
    }
}
