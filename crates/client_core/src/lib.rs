use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use shared::{
    domain::DataUri,
    protocol::{AddBackgroundRequest, ImageResponse, IMAGE_FIELD},
};
use tracing::{debug, warn};

pub mod error;
pub mod types;

pub use error::{ApiCallError, UNKNOWN_ERROR};
pub use types::{Endpoint, ImageFile};

/// The two remote operations the studio depends on.
#[async_trait]
pub trait BackgroundApi: Send + Sync {
    /// Upload a raw image and receive its background-removed cutout.
    async fn remove_background(&self, file: ImageFile) -> Result<DataUri, ApiCallError>;

    /// Composite a cutout onto a solid color or an image.
    async fn add_background(&self, request: AddBackgroundRequest)
        -> Result<DataUri, ApiCallError>;
}

#[derive(Clone)]
pub struct HttpBackgroundApi {
    http: Client,
    server_url: String,
}

impl HttpBackgroundApi {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    /// Without a timeout a stalled request never completes.
    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, server_url))
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.server_url, endpoint.route())
    }
}

#[async_trait]
impl BackgroundApi for HttpBackgroundApi {
    async fn remove_background(&self, file: ImageFile) -> Result<DataUri, ApiCallError> {
        let endpoint = Endpoint::RemoveBackground;
        debug!(%endpoint, filename = %file.name, size_bytes = file.bytes.len(), "uploading image");

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime_type)
            .map_err(|source| ApiCallError::Transport { endpoint, source })?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        let response = self.http.post(self.url(endpoint)).multipart(form).send().await;
        read_image_response(endpoint, response).await
    }

    async fn add_background(
        &self,
        request: AddBackgroundRequest,
    ) -> Result<DataUri, ApiCallError> {
        let endpoint = Endpoint::AddBackground;
        debug!(
            %endpoint,
            color = request.background_color.as_deref().unwrap_or_default(),
            has_image = request.background_image.is_some(),
            "requesting composite"
        );

        let response = self.http.post(self.url(endpoint)).json(&request).send().await;
        read_image_response(endpoint, response).await
    }
}

/// Non-2xx statuses are reported without reading the body.
async fn read_image_response(
    endpoint: Endpoint,
    response: Result<Response, reqwest::Error>,
) -> Result<DataUri, ApiCallError> {
    let response = response.map_err(|source| {
        warn!(%endpoint, error = %source, "request failed");
        ApiCallError::Transport { endpoint, source }
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!(%endpoint, status = status.as_u16(), "non-success status");
        return Err(ApiCallError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| ApiCallError::Transport { endpoint, source })?;
    let payload: ImageResponse =
        serde_json::from_slice(&body).map_err(|e| ApiCallError::Decode {
            endpoint,
            message: e.to_string(),
        })?;

    match payload {
        ImageResponse {
            success: true,
            image: Some(image),
            ..
        } => Ok(image),
        ImageResponse { error, .. } => {
            warn!(%endpoint, error = error.as_deref().unwrap_or_default(), "backend reported failure");
            Err(ApiCallError::Rejected {
                endpoint,
                message: error,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
