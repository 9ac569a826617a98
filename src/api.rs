use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::json;

use crate::error::AppError;
use crate::models::{
    ActionResponse, ImagesResponse, LoginResponse, RepositoriesResponse,
};

/// Role claim returned by the login endpoint. Anything that is not an admin
/// is treated as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    /// The backend is not consistent about casing ("admin" vs "ADMIN").
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Viewer
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Explicit session context, passed to the client instead of being read from
/// ambient storage.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            token: None,
            role: Role::Viewer,
        }
    }

    pub fn with_token(token: String, role: Role) -> Self {
        Self {
            token: Some(token),
            role,
        }
    }
}

/// The backend collaborators the tag manager depends on.
pub trait Backend {
    async fn fetch_images(&self) -> Result<ImagesResponse>;
    async fn fetch_repositories(&self) -> Result<RepositoriesResponse>;
    async fn delete_tag(&self, image: &str, tag: &str) -> Result<ActionResponse>;
}

/// HTTP client for the dashboard API (the Nexus proxy endpoints plus login).
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
    verbose: bool,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session, verbose: bool) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            session,
            verbose,
        }
    }

    /// POST /auth/login: exchange credentials for a bearer token and role.
    pub async fn login(
        base_url: &str,
        username: &str,
        password: &str,
        verbose: bool,
    ) -> Result<Session> {
        let base_url = base_url.trim_end_matches('/');
        let url = format!("{}/auth/login", base_url);
        if verbose {
            eprintln!("[DEBUG] POST {}", url);
        }

        let resp = Client::new()
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .context("Failed to reach the login endpoint")?;

        let login: LoginResponse = resp
            .json()
            .await
            .context("Failed to parse login response")?;

        if !login.success {
            let message = login
                .message
                .unwrap_or_else(|| "invalid credentials".to_string());
            return Err(AppError::Login(message).into());
        }

        let data = login
            .data
            .ok_or_else(|| AppError::Login("login response carried no token".to_string()))?;

        Ok(Session::with_token(data.token, Role::parse(&data.role)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the session's bearer token attached.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        if self.verbose {
            eprintln!("[DEBUG] {} {}", method, self.url(path));
        }
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = &self.session.token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }
}

impl Backend for ApiClient {
    /// GET /nexus/images
    async fn fetch_images(&self) -> Result<ImagesResponse> {
        let resp = self
            .request(Method::GET, "/nexus/images")
            .send()
            .await
            .context("Failed to fetch images")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET /nexus/images returned status {}", status);
        }

        resp.json().await.context("Failed to parse images JSON")
    }

    /// GET /nexus/repositories
    async fn fetch_repositories(&self) -> Result<RepositoriesResponse> {
        let resp = self
            .request(Method::GET, "/nexus/repositories")
            .send()
            .await
            .context("Failed to fetch repositories")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET /nexus/repositories returned status {}", status);
        }

        resp.json()
            .await
            .context("Failed to parse repositories JSON")
    }

    /// DELETE /nexus/images/<image>/tags/<tag>. One call per tag, there is
    /// no batch endpoint.
    async fn delete_tag(&self, image: &str, tag: &str) -> Result<ActionResponse> {
        let path = format!("/nexus/images/{}/tags/{}", image, tag);
        let resp = self
            .request(Method::DELETE, &path)
            .send()
            .await
            .with_context(|| format!("Failed to delete {}:{}", image, tag))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("DELETE {} returned status {}", path, status);
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse delete response for {}:{}", image, tag))
    }
}
