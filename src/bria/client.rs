// Bria API client
// Author: kelexine (https://github.com/kelexine)

use super::{ApiToken, API_TOKEN_HEADER, PROMPT_ENHANCER_PATH, REMOVE_BACKGROUND_PATH, TEXT_TO_IMAGE_PATH};
use crate::config::BriaConfig;
use crate::error::{ProxyError, Result};
use crate::metrics;
use crate::models::bria::{EnhancePromptRequest, TextToImageRequest};
use crate::models::{BackgroundRemovalOptions, RemovalOutcome, UploadedImage};
use crate::utils::logging::{redact, truncate};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Client for the Bria image API.
///
/// Every method performs exactly one outbound request. Nothing is retried;
/// failures are mapped onto `ProxyError` and handed back to the caller.
pub struct BriaClient {
    http_client: Client,
    config: BriaConfig,
    api_token: ApiToken,
}

impl BriaClient {
    /// Create a client from configuration.
    ///
    /// Fails with `ProxyError::Config` when the API token is missing, so a
    /// misconfigured server never starts.
    pub fn new(config: &BriaConfig) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        // The token lives only in the zeroizing wrapper from here on
        let mut config = config.clone();
        let api_token = ApiToken::new(std::mem::take(&mut config.api_token));

        debug!("Created Bria HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config,
            api_token,
        })
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Get the text-to-image model version
    pub fn model_version(&self) -> &str {
        &self.config.model_version
    }

    /// Call `POST /prompt_enhancer` and return the parsed response body.
    pub async fn enhance_prompt(&self, prompt: &str) -> Result<Value> {
        let url = self.endpoint(PROMPT_ENHANCER_PATH);
        debug!("Calling prompt enhancer ({} chars)", prompt.chars().count());

        self.send_json(
            "prompt_enhancer",
            &url,
            &EnhancePromptRequest { prompt },
            self.config.prompt_timeout_ms,
        )
        .await
    }

    /// Call `POST /text-to-image/base/{model_version}` and return the parsed
    /// response body.
    pub async fn text_to_image(&self, prompt: &str) -> Result<Value> {
        let url = self.endpoint(&format!("{}/{}", TEXT_TO_IMAGE_PATH, self.config.model_version));
        debug!("Calling text-to-image model {}", self.config.model_version);

        self.send_json(
            "text_to_image",
            &url,
            &TextToImageRequest::new(prompt),
            self.config.generation_timeout_ms,
        )
        .await
    }

    /// Call `POST /background/remove` with the image as a multipart upload.
    ///
    /// A non-2xx answer is returned as `RemovalOutcome::Rejected` with the
    /// raw body; only transport problems surface as errors.
    pub async fn remove_background(
        &self,
        image: UploadedImage,
        options: BackgroundRemovalOptions,
    ) -> Result<RemovalOutcome> {
        const OPERATION: &str = "remove_background";

        let url = self.endpoint(REMOVE_BACKGROUND_PATH);
        let timeout_ms = self.config.removal_timeout_ms;

        debug!(
            "Calling background removal for {} ({} bytes, {})",
            image.file_name,
            image.data.len(),
            image.content_type
        );

        let part = Part::bytes(image.data.to_vec())
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|_| {
                ProxyError::InvalidRequest(format!("Invalid content type: {}", image.content_type))
            })?;

        let form = options
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| form.text(name, value));

        let request = self.http_client.post(&url).multipart(form);
        let started = Instant::now();
        let response = self.send(OPERATION, request, timeout_ms, started).await?;

        let status = response.status();
        let body = self.read_body(OPERATION, response, timeout_ms, started).await?;

        if !status.is_success() {
            error!(
                "Bria background removal error: HTTP {} - Response body: {}",
                status,
                truncate(&redact(&body, self.api_token.expose()), 1000)
            );
            return Ok(RemovalOutcome::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = Self::parse_body(&body)?;
        info!("Background removal completed in {:?}", started.elapsed());
        Ok(RemovalOutcome::Completed(parsed))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body and return the parsed JSON response, mapping every
    /// non-2xx status onto the error taxonomy.
    async fn send_json<T: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        url: &str,
        body: &T,
        timeout_ms: u64,
    ) -> Result<Value> {
        let request = self.http_client.post(url).json(body);
        let started = Instant::now();
        let response = self.send(operation, request, timeout_ms, started).await?;

        let status = response.status();
        let text = self.read_body(operation, response, timeout_ms, started).await?;

        if !status.is_success() {
            error!(
                "Bria API error on {}: HTTP {} - Response body: {}",
                operation,
                status,
                truncate(&redact(&text, self.api_token.expose()), 1000)
            );
            return Err(Self::status_error(status));
        }

        debug!(
            "Raw Bria response (first 500 chars): {}",
            truncate(&text, 500)
        );

        Self::parse_body(&text)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        timeout_ms: u64,
        started: Instant,
    ) -> Result<Response> {
        let result = request
            .header(API_TOKEN_HEADER, self.api_token.expose())
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await;

        match result {
            Ok(response) => {
                metrics::record_upstream_call(
                    operation,
                    response.status().as_str(),
                    started.elapsed().as_secs_f64(),
                );
                Ok(response)
            }
            Err(e) => Err(Self::transport_error(operation, e, timeout_ms, started)),
        }
    }

    async fn read_body(
        &self,
        operation: &'static str,
        response: Response,
        timeout_ms: u64,
        started: Instant,
    ) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| Self::transport_error(operation, e, timeout_ms, started))
    }

    fn transport_error(
        operation: &'static str,
        err: reqwest::Error,
        timeout_ms: u64,
        started: Instant,
    ) -> ProxyError {
        let outcome = if err.is_timeout() { "timeout" } else { "transport_error" };
        metrics::record_upstream_call(operation, outcome, started.elapsed().as_secs_f64());

        if err.is_timeout() {
            error!("Bria API {} timed out after {} ms", operation, timeout_ms);
            ProxyError::Timeout(timeout_ms)
        } else {
            error!("Bria API {} request failed: {}", operation, err);
            ProxyError::Http(err)
        }
    }

    fn status_error(status: StatusCode) -> ProxyError {
        match status {
            StatusCode::UNAUTHORIZED => ProxyError::InvalidCredentials,
            StatusCode::TOO_MANY_REQUESTS => ProxyError::TooManyRequests,
            _ => ProxyError::UpstreamStatus {
                status: status.as_u16(),
            },
        }
    }

    fn parse_body(text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| {
            error!("Failed to parse Bria response: {}", e);
            ProxyError::BriaApi(format!("Response parsing error: {}", e))
        })
    }
}
