use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::path::Path;

use crate::error::PublishError;
use crate::http::{HttpClient, USER_AGENT};

use super::types::{ApiError, GitRef, NewRelease, Release, RepoId};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Result of a release-creation attempt.
///
/// A 422 whose structured errors say the tag is already taken is not a
/// failure; the caller recovers by fetching the existing release.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateReleaseOutcome {
    Created(Release),
    TagExists,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn update_repo_description(
        &self,
        repo: &RepoId,
        description: &str,
    ) -> Result<(), PublishError>;
    async fn tag_exists(&self, repo: &RepoId, tag: &str) -> Result<bool, PublishError>;
    async fn list_tags(&self, repo: &RepoId) -> Result<Vec<String>, PublishError>;
    async fn create_release(
        &self,
        repo: &RepoId,
        release: &NewRelease,
    ) -> Result<CreateReleaseOutcome, PublishError>;
    async fn get_release_by_tag(&self, repo: &RepoId, tag: &str)
        -> Result<Release, PublishError>;
    async fn upload_asset(&self, upload_url: &str, file_path: &Path) -> Result<(), PublishError>;
}

pub struct GitHub {
    http: HttpClient,
    api_url: String,
}

impl GitHub {
    /// Builds a client with bearer auth and the v3 Accept header installed
    /// as defaults.
    pub fn new(token: &str, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

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
impl GitHubApi for GitHub {
    #[tracing::instrument(skip(self, description))]
    async fn update_repo_description(
        &self,
        repo: &RepoId,
        description: &str,
    ) -> Result<(), PublishError> {
        let url = format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.repo);
        debug!("Patching repository description at {}...", url);
        let request = self
            .http
            .inner()
            .patch(&url)
            .json(&serde_json::json!({ "description": description }));
        self.http.expect_success(request).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn tag_exists(&self, repo: &RepoId, tag: &str) -> Result<bool, PublishError> {
        let url = format!(
            "{}/repos/{}/{}/git/refs/tags/{}",
            self.api_url, repo.owner, repo.repo, tag
        );
        debug!("Probing for tag at {}...", url);
        let response = self.http.send(self.http.inner().get(&url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(HttpClient::remote_error(response).await),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_tags(&self, repo: &RepoId) -> Result<Vec<String>, PublishError> {
        let url = format!(
            "{}/repos/{}/{}/git/refs/tags",
            self.api_url, repo.owner, repo.repo
        );
        debug!("Fetching tag refs from {}...", url);
        let response = self.http.send(self.http.inner().get(&url)).await?;
        // A repository with no tags at all answers 404 here.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let response = HttpClient::check_status(response).await?;
        let refs = response
            .json::<Vec<GitRef>>()
            .await
            .map_err(PublishError::from)?;
        Ok(refs.iter().map(|r| r.tag_name().to_string()).collect())
    }

    #[tracing::instrument(skip(self, release))]
    async fn create_release(
        &self,
        repo: &RepoId,
        release: &NewRelease,
    ) -> Result<CreateReleaseOutcome, PublishError> {
        let url = format!(
            "{}/repos/{}/{}/releases",
            self.api_url, repo.owner, repo.repo
        );
        debug!("Creating release {} at {}...", release.tag_name, url);
        let request = self.http.inner().post(&url).json(release);
        let response = self.http.send(request).await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let status = response.status();
            let body = response.text().await.map_err(PublishError::from)?;
            let api_error: ApiError = serde_json::from_str(&body).unwrap_or_default();
            if api_error.is_tag_collision() {
                debug!("Tag {} already has a release", release.tag_name);
                return Ok(CreateReleaseOutcome::TagExists);
            }
            return Err(PublishError::Remote { status, body });
        }

        let response = HttpClient::check_status(response).await?;
        let created = response
            .json::<Release>()
            .await
            .map_err(PublishError::from)?;
        Ok(CreateReleaseOutcome::Created(created))
    }

    #[tracing::instrument(skip(self))]
    async fn get_release_by_tag(
        &self,
        repo: &RepoId,
        tag: &str,
    ) -> Result<Release, PublishError> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url, repo.owner, repo.repo, tag
        );
        debug!("Fetching release by tag from {}...", url);
        self.http.expect_json(self.http.inner().get(&url)).await
    }

    #[tracing::instrument(skip(self))]
    async fn upload_asset(&self, upload_url: &str, file_path: &Path) -> Result<(), PublishError> {
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

        let url = format!("{}?name={}", upload_url, file_name);
        debug!("Uploading '{}' to {}...", file_name, url);
        let request = self
            .http
            .inner()
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        self.http.expect_success(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn client(api_url: &str) -> GitHub {
        GitHub::new("test-token", Some(api_url.to_string())).unwrap()
    }

    fn repo() -> RepoId {
        RepoId {
            owner: "test-owner".to_string(),
            repo: "test-repo".to_string(),
        }
    }

    fn new_release(tag: &str) -> NewRelease {
        NewRelease {
            tag_name: tag.to_string(),
            name: format!("Pack {}", tag),
            body: "- changes".to_string(),
            draft: false,
            prerelease: false,
        }
    }

    #[tokio::test]
    async fn test_update_repo_description() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PATCH", "/repos/test-owner/test-repo")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({ "description": "New description" }),
            ))
            .with_status(200)
            .create_async()
            .await;

        client(&server.url())
            .update_repo_description(&repo(), "New description")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_tag_exists_not_found_means_free() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/git/refs/tags/v1.0.0")
            .with_status(404)
            .create_async()
            .await;

        let exists = client(&server.url())
            .tag_exists(&repo(), "v1.0.0")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_tag_exists_found() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/git/refs/tags/v1.0.0")
            .with_status(200)
            .with_body(r#"{"ref": "refs/tags/v1.0.0"}"#)
            .create_async()
            .await;

        let exists = client(&server.url())
            .tag_exists(&repo(), "v1.0.0")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(exists);
    }

    #[tokio::test]
    async fn test_tag_exists_other_status_is_hard_failure() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/git/refs/tags/v1.0.0")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client(&server.url())
            .tag_exists(&repo(), "v1.0.0")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, PublishError::Remote { .. }));
        assert_eq!(err.response_body(), Some("boom"));
    }

    #[tokio::test]
    async fn test_list_tags() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/git/refs/tags")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"ref": "refs/tags/v3.4.2"},
                    {"ref": "refs/tags/v3.4.2-1"}
                ]"#,
            )
            .create_async()
            .await;

        let tags = client(&server.url()).list_tags(&repo()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(tags, vec!["v3.4.2".to_string(), "v3.4.2-1".to_string()]);
    }

    #[tokio::test]
    async fn test_list_tags_not_found_means_no_tags() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/git/refs/tags")
            .with_status(404)
            .create_async()
            .await;

        let tags = client(&server.url()).list_tags(&repo()).await.unwrap();

        mock.assert_async().await;
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_release_created() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/repos/test-owner/test-repo/releases")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "tag_name": "v1.0.0",
                "draft": false,
                "prerelease": false
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{
                    "tag_name": "v1.0.0",
                    "upload_url": "{}/upload{{?name,label}}",
                    "html_url": "https://github.com/test-owner/test-repo/releases/tag/v1.0.0"
                }}"#,
                url
            ))
            .create_async()
            .await;

        let outcome = client(&url)
            .create_release(&repo(), &new_release("v1.0.0"))
            .await
            .unwrap();

        mock.assert_async().await;
        match outcome {
            CreateReleaseOutcome::Created(release) => {
                assert_eq!(release.tag_name, "v1.0.0");
                assert_eq!(release.upload_target(), format!("{}/upload", url));
            }
            other => panic!("Expected Created, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_release_tag_collision() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/repos/test-owner/test-repo/releases")
            .with_status(422)
            .with_body(
                r#"{
                    "message": "Validation Failed",
                    "errors": [
                        {"resource": "Release", "code": "already_exists", "field": "tag_name"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let outcome = client(&server.url())
            .create_release(&repo(), &new_release("v1.0.0"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outcome, CreateReleaseOutcome::TagExists);
    }

    #[tokio::test]
    async fn test_create_release_other_422_is_failure() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/repos/test-owner/test-repo/releases")
            .with_status(422)
            .with_body(
                r#"{
                    "message": "Validation Failed",
                    "errors": [
                        {"resource": "Release", "code": "invalid", "field": "target_commitish"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let err = client(&server.url())
            .create_release(&repo(), &new_release("v1.0.0"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, PublishError::Remote { .. }));
        assert!(err.response_body().unwrap().contains("target_commitish"));
    }

    #[tokio::test]
    async fn test_get_release_by_tag() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/tags/v1.0.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "tag_name": "v1.0.0",
                    "upload_url": "https://uploads.example.com/assets{?name,label}",
                    "html_url": null
                }"#,
            )
            .create_async()
            .await;

        let release = client(&server.url())
            .get_release_by_tag(&repo(), "v1.0.0")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.tag_name, "v1.0.0");
    }

    #[tokio::test]
    async fn test_upload_asset_posts_bytes() {
        let mut server = mockito::Server::new_async().await;

        let mut artifact = NamedTempFile::with_suffix(".mrpack").unwrap();
        artifact.write_all(b"zip bytes").unwrap();
        let file_name = artifact
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        let mock = server
            .mock("POST", format!("/upload?name={}", file_name).as_str())
            .match_header("content-type", "application/octet-stream")
            .match_body("zip bytes")
            .with_status(201)
            .create_async()
            .await;

        client(&server.url())
            .upload_asset(&format!("{}/upload", server.url()), artifact.path())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_asset_missing_file_makes_no_call() {
        let mut server = mockito::Server::new_async().await;

        let mock = server.mock("POST", "/upload").expect(0).create_async().await;

        let result = client(&server.url())
            .upload_asset(
                &format!("{}/upload", server.url()),
                Path::new("/nonexistent/pack.mrpack"),
            )
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(PublishError::FileNotFound(_))));
    }
}
