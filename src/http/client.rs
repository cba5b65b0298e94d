//! HTTP client wrapper with typed error handling.
//!
//! `reqwest::Response::error_for_status` drops the response body, but the
//! publish stages need it for diagnostics, so non-2xx responses are read
//! in full and carried inside [`PublishError::Remote`].

use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::PublishError;

/// HTTP client shared by the platform clients.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Sends a request, mapping transport failures to
    /// [`PublishError::Network`]. Status handling is left to the caller.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, PublishError> {
        request.send().await.map_err(PublishError::from)
    }

    /// Sends a request and requires a 2xx response. The body of any other
    /// status is captured into [`PublishError::Remote`].
    pub async fn expect_success(&self, request: RequestBuilder) -> Result<Response, PublishError> {
        let response = self.send(request).await?;
        Self::check_status(response).await
    }

    /// Sends a request, requires a 2xx response and deserializes the JSON body.
    pub async fn expect_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, PublishError> {
        let response = self.expect_success(request).await?;
        response.json::<T>().await.map_err(PublishError::from)
    }

    /// Passes 2xx responses through; anything else becomes a Remote error
    /// with its body attached.
    pub async fn check_status(response: Response) -> Result<Response, PublishError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::remote_error(response).await)
    }

    /// Consumes a response into a Remote error, reading the body for
    /// diagnostics.
    pub async fn remote_error(response: Response) -> PublishError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!("Remote API returned {}: {}", status, body);
        PublishError::Remote { status, body }
    }
}
