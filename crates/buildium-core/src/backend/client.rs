//! Authenticated HTTP client for the backend edge functions

use super::environment::EnvironmentProfile;
use super::types::{
    GetProjectRequest, GetTutorialRequest, LoginRequest, LoginResponse, Project, Tutorial,
};
use crate::error::{require, Error, Result};
use crate::session::{CredentialStore, SessionConfig};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Header carrying the session token on authenticated calls
pub const SESSION_TOKEN_HEADER: &str = "x-buildium-token";

const FUNCTIONS_PATH: [&str; 2] = ["functions", "v1"];

/// Backend client bound to one environment and one session
pub struct BackendClient {
    profile: EnvironmentProfile,
    session: SessionConfig,
    store: CredentialStore,
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the environment recorded in the session
    pub fn new(session: SessionConfig, store: CredentialStore) -> Self {
        let profile = EnvironmentProfile::for_environment(session.environment);
        Self::with_profile(profile, session, store)
    }

    /// Create a client against an explicit profile
    pub fn with_profile(
        profile: EnvironmentProfile,
        session: SessionConfig,
        store: CredentialStore,
    ) -> Self {
        Self {
            profile,
            session,
            store,
            http: reqwest::Client::builder()
                .user_agent(concat!("buildium/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn profile(&self) -> &EnvironmentProfile {
        &self.profile
    }

    /// Local check that a session token is present; the backend is not contacted
    pub fn verify_auth_token(&self) -> Result<()> {
        if !self.session.is_logged_in() {
            return Err(Error::not_logged_in());
        }
        Ok(())
    }

    /// Exchange credentials for a session token and persist it
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        require("email", email)?;
        require("password", password)?;

        let body = LoginRequest { email, password };
        let response: LoginResponse = self.call("login", &body, false).await?;
        if response.token.is_empty() {
            return Err(Error::Protocol(
                "login response contained an empty token".to_string(),
            ));
        }

        let mut updated = self.session.clone();
        updated.auth_token = response.token;
        self.store.save(&updated)?;
        self.session = updated;

        tracing::info!(environment = %self.profile.environment, "logged in");
        Ok(())
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        require("project id", project_id)?;
        let body = GetProjectRequest { project_id };
        self.call("get-project", &body, true).await
    }

    pub async fn get_tutorial(&self, tutorial_id: &str) -> Result<Tutorial> {
        require("tutorial id", tutorial_id)?;
        let body = GetTutorialRequest { tutorial_id };
        self.call("get-tutorial", &body, true).await
    }

    /// Build `<base>/functions/v1/<function>`, preserving query parameters
    fn function_url(base: &Url, function: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Protocol(format!("backend URL cannot have path segments: {}", base))
            })?
            .pop_if_empty()
            .extend(FUNCTIONS_PATH)
            .push(function);
        Ok(url)
    }

    /// POST a JSON body to an edge function and decode a 200 response
    async fn call<B, T>(&self, function: &str, body: &B, authenticated: bool) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let base = self
            .profile
            .base_url
            .as_ref()
            .ok_or_else(Error::not_logged_in)?;
        if authenticated {
            self.verify_auth_token()?;
        }

        let url = Self::function_url(base, function)?;
        tracing::debug!(%url, "calling backend");

        let mut request = self.http.post(url).json(body);
        if let Some(key) = &self.profile.api_key {
            request = request.bearer_auth(key);
        }
        if authenticated {
            request = request.header(SESSION_TOKEN_HEADER, &self.session.auth_token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            tracing::debug!(%status, function, "backend call rejected");
            return Err(Error::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Protocol(format!("{} response: {}", function, e)))
    }
}
