use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;
use std::path::Path;

use crate::error::PublishError;
use crate::http::{HttpClient, USER_AGENT};

use super::types::{NewVersion, Project, ProjectVersion, VersionType};

pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";

const MODPACK_MIME: &str = "application/x-modrinth-modpack+zip";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModrinthApi: Send + Sync {
    async fn get_project(&self, project_id: &str) -> Result<Project, PublishError>;
    async fn update_description(
        &self,
        project_id: &str,
        description: &str,
    ) -> Result<(), PublishError>;
    async fn list_versions(&self, project_id: &str) -> Result<Vec<ProjectVersion>, PublishError>;
    async fn set_version_type(
        &self,
        version_id: &str,
        version_type: VersionType,
    ) -> Result<(), PublishError>;
    async fn create_version(
        &self,
        version: &NewVersion,
        file_path: &Path,
    ) -> Result<(), PublishError>;
}

pub struct Modrinth {
    http: HttpClient,
    api_url: String,
}

impl Modrinth {
    /// Builds a client with the token installed as a default header.
    pub fn new(token: &str, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // Modrinth expects the bare token, no scheme prefix.
        let mut auth_value = HeaderValue::from_str(token)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http: HttpClient::new(client),
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

#[async_trait]
impl ModrinthApi for Modrinth {
    #[tracing::instrument(skip(self))]
    async fn get_project(&self, project_id: &str) -> Result<Project, PublishError> {
        let url = format!("{}/project/{}", self.api_url, project_id);
        debug!("Fetching project from {}...", url);
        self.http.expect_json(self.http.inner().get(&url)).await
    }

    #[tracing::instrument(skip(self, description))]
    async fn update_description(
        &self,
        project_id: &str,
        description: &str,
    ) -> Result<(), PublishError> {
        let url = format!("{}/project/{}", self.api_url, project_id);
        debug!("Patching project description at {}...", url);
        let request = self
            .http
            .inner()
            .patch(&url)
            .json(&json!({ "description": description }));
        self.http.expect_success(request).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_versions(&self, project_id: &str) -> Result<Vec<ProjectVersion>, PublishError> {
        let url = format!("{}/project/{}/version", self.api_url, project_id);
        debug!("Listing versions from {}...", url);
        self.http.expect_json(self.http.inner().get(&url)).await
    }

    #[tracing::instrument(skip(self))]
    async fn set_version_type(
        &self,
        version_id: &str,
        version_type: VersionType,
    ) -> Result<(), PublishError> {
        let url = format!("{}/version/{}", self.api_url, version_id);
        debug!("Setting version {} to {}...", version_id, version_type);
        let request = self
            .http
            .inner()
            .patch(&url)
            .json(&json!({ "version_type": version_type }));
        self.http.expect_success(request).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, version))]
    async fn create_version(
        &self,
        version: &NewVersion,
        file_path: &Path,
    ) -> Result<(), PublishError> {
        if !file_path.exists() {
            return Err(PublishError::FileNotFound(file_path.to_path_buf()));
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "modpack.mrpack".to_string());

        // Read into memory so no handle outlives this call.
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|_| PublishError::FileNotFound(file_path.to_path_buf()))?;

        let form = Form::new()
            .text("data", json!(version).to_string())
            .part(
                "file",
                Part::bytes(bytes).file_name(file_name).mime_str(MODPACK_MIME)?,
            );

        let url = format!("{}/version", self.api_url);
        debug!("Uploading version {} to {}...", version.version_number, url);
        let request = self.http.inner().post(&url).multipart(form);
        self.http.expect_success(request).await?;
        Ok(())
    }
}
