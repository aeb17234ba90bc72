//! HTTP implementation of the backend traits for a Supabase project.
//!
//! Auth goes through the GoTrue endpoints under `/auth/v1`, data through
//! PostgREST under `/rest/v1`. The signed-in session is kept in memory and,
//! when a session file is configured, persisted as JSON so that later runs
//! start signed in.

use crate::backend::{AuthService, TaskStore};
use crate::error::CoreError;
use crate::models::{
    NewTaskData, Session, SignUpResponse, TaskId, TaskRecord, UpdateTaskData, User,
};
use crate::session::{AuthEvent, SessionHub, Subscription};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, StatusCode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const TASK_COLUMNS: &str = "id,samay,karya,notes,tags(name)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub session_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            session_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JSON file holding the last signed-in session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file means no session.
    pub fn load(&self) -> Result<Option<Session>, CoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct CreateTaskArgs<'a> {
    task_karya: &'a str,
    task_notes: &'a str,
    task_samay: &'a str,
    task_tags: &'a [String],
}

impl<'a> From<&'a NewTaskData> for CreateTaskArgs<'a> {
    fn from(data: &'a NewTaskData) -> Self {
        Self {
            task_karya: &data.name,
            task_notes: &data.notes,
            task_samay: &data.time,
            task_tags: &data.tags,
        }
    }
}

#[derive(Serialize)]
struct UpdateTaskArgs<'a> {
    task_id_to_update: TaskId,
    new_samay: &'a str,
    new_karya: &'a str,
    new_notes: &'a str,
    new_tags: &'a [String],
}

impl<'a> From<&'a UpdateTaskData> for UpdateTaskArgs<'a> {
    fn from(data: &'a UpdateTaskData) -> Self {
        Self {
            task_id_to_update: data.id,
            new_samay: &data.time,
            new_karya: &data.name,
            new_notes: &data.notes,
            new_tags: &data.tags,
        }
    }
}

/// Picks the human-readable message out of a GoTrue or PostgREST error body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}

/// Interprets a signup response, which is a session when the project
/// confirms emails automatically and a bare user otherwise.
fn parse_sign_up(value: serde_json::Value) -> Result<SignUpResponse, CoreError> {
    if value.get("access_token").is_some() {
        let session: Session = serde_json::from_value(value)?;
        let session = session.stamped(Utc::now());
        return Ok(SignUpResponse {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }
    if value.get("id").is_some() {
        let user: User = serde_json::from_value(value)?;
        return Ok(SignUpResponse {
            user: Some(user),
            session: None,
        });
    }
    let user = match value.get("user") {
        Some(user) if !user.is_null() => Some(serde_json::from_value(user.clone())?),
        _ => None,
    };
    Ok(SignUpResponse {
        user,
        session: None,
    })
}

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session_file: Option<SessionFile>,
    hub: SessionHub,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            session_file: config.session_file.map(SessionFile::new),
            hub: SessionHub::new(),
        })
    }

    pub fn hub(&self) -> &SessionHub {
        &self.hub
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Sends the request and turns a non-success status into the backend's message.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, CoreError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(%status, error = %message, "backend request failed");
        Err(CoreError::Backend(message))
    }

    /// Bearer token for data requests: the session's, or the anon key.
    async fn data_token(&self) -> Result<String, CoreError> {
        Ok(self
            .get_session()
            .await?
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.anon_key.clone()))
    }

    fn store_session(&self, event: AuthEvent, session: Session) -> Result<(), CoreError> {
        if let Some(file) = &self.session_file {
            file.save(&session)?;
        }
        self.hub.publish(event, Some(session));
        Ok(())
    }

    fn drop_session(&self) -> Result<(), CoreError> {
        if let Some(file) = &self.session_file {
            file.clear()?;
        }
        self.hub.publish(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn token_grant<T: Serialize + ?Sized>(
        &self,
        grant_type: &str,
        body: &T,
    ) -> Result<Session, CoreError> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .json(body);
        let response = self.send(self.authorized(request, &self.anon_key)).await?;
        let session: Session = response.json().await?;
        Ok(session.stamped(Utc::now()))
    }

    /// Session from memory, else from the session file.
    fn stored_session(&self) -> Result<Option<Session>, CoreError> {
        if let Some(session) = self.hub.current() {
            return Ok(Some(session));
        }
        let Some(file) = &self.session_file else {
            return Ok(None);
        };
        let loaded = file.load()?;
        if let Some(session) = &loaded {
            debug!(path = %file.path().display(), "restored session from file");
            self.hub.restore(session.clone());
        }
        Ok(loaded)
    }
}

#[async_trait]
impl AuthService for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, CoreError> {
        let session = self
            .token_grant("password", &PasswordGrant { email, password })
            .await?;
        info!(user = %session.user.id, "signed in with password");
        self.store_session(AuthEvent::SignedIn, session.clone())?;
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpResponse, CoreError> {
        let body = SignUpBody {
            email,
            password,
            data: SignUpMetadata { username },
        };
        let request = self.http.post(self.auth_url("signup")).json(&body);
        let response = self.send(self.authorized(request, &self.anon_key)).await?;
        let parsed = parse_sign_up(response.json().await?)?;
        if let Some(session) = &parsed.session {
            self.store_session(AuthEvent::SignedIn, session.clone())?;
        }
        Ok(parsed)
    }

    async fn get_session(&self) -> Result<Option<Session>, CoreError> {
        let Some(session) = self.stored_session()? else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now()) {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            debug!("session expired without refresh token");
            self.drop_session()?;
            return Ok(None);
        };
        match self
            .token_grant("refresh_token", &RefreshGrant { refresh_token: &refresh_token })
            .await
        {
            Ok(fresh) => {
                debug!("refreshed session");
                self.store_session(AuthEvent::TokenRefreshed, fresh.clone())?;
                Ok(Some(fresh))
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                self.drop_session()?;
                Err(err)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        if let Some(session) = self.stored_session()? {
            let request = self.http.post(self.auth_url("logout"));
            // The local session goes away even if the server call fails.
            if let Err(err) = self
                .send(self.authorized(request, &session.access_token))
                .await
            {
                warn!(error = %err, "server-side sign-out failed");
            }
        }
        self.drop_session()?;
        info!("signed out");
        Ok(())
    }

    fn on_auth_state_change(&self) -> Subscription {
        self.hub.subscribe()
    }
}

#[async_trait]
impl TaskStore for SupabaseClient {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, CoreError> {
        let token = self.data_token().await?;
        let request = self
            .http
            .get(self.rest_url("tasks"))
            .query(&[("select", TASK_COLUMNS), ("order", "created_at.asc")])
            .header(header::ACCEPT, "application/json");
        let response = self.send(self.authorized(request, &token)).await?;
        Ok(response.json().await?)
    }

    async fn create_task_with_tags(&self, data: NewTaskData) -> Result<(), CoreError> {
        let token = self.data_token().await?;
        let request = self
            .http
            .post(self.rest_url("rpc/create_task_with_tags"))
            .json(&CreateTaskArgs::from(&data));
        self.send(self.authorized(request, &token)).await?;
        Ok(())
    }

    async fn update_task_with_tags(&self, data: UpdateTaskData) -> Result<(), CoreError> {
        let token = self.data_token().await?;
        let request = self
            .http
            .post(self.rest_url("rpc/update_task_with_tags"))
            .json(&UpdateTaskArgs::from(&data));
        self.send(self.authorized(request, &token)).await?;
        Ok(())
    }
}
