use serde::Deserialize;

/// GET /nexus/images response
#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<ImageRepo>,
}

/// One image repository with its tag list, as returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRepo {
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// GET /nexus/repositories response
#[derive(Debug, Deserialize)]
pub struct RepositoriesResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<String>,
}

/// DELETE /nexus/images/<image>/tags/<tag> response
#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /auth/login response
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub role: String,
}

/// Result of one bulk delete run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub deleted: usize,
    pub failed: usize,
}
