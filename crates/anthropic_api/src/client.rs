use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::AnthropicApiConfig;
use crate::error::{parse_error_message, AnthropicApiError};
use crate::headers::build_headers;
use crate::payload::{MessagesRequest, MessagesResponse};
use crate::url::normalize_messages_url;

/// Non-streaming Messages API client.
///
/// One request, one response: the caller gets the reply or a single error.
/// Retry and backoff are deliberately absent from this transport.
#[derive(Debug)]
pub struct AnthropicApiClient {
    http: Client,
    config: AnthropicApiConfig,
}

impl AnthropicApiClient {
    pub fn new(config: AnthropicApiConfig) -> Result<Self, AnthropicApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AnthropicApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AnthropicApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_messages_url(&self.config.base_url)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, AnthropicApiError> {
        let headers = build_headers(&self.config)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    AnthropicApiError::InvalidHeader(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    AnthropicApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &MessagesRequest,
    ) -> Result<reqwest::RequestBuilder, AnthropicApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .post(self.normalized_endpoint())
            .headers(headers)
            .json(request))
    }

    /// Sends one Messages request and parses the reply.
    ///
    /// Non-success statuses become [`AnthropicApiError::Status`] with the
    /// service's own error message when the body carries one.
    pub async fn create_message(
        &self,
        request: &MessagesRequest,
    ) -> Result<MessagesResponse, AnthropicApiError> {
        let response = self.build_request(request)?.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(AnthropicApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(AnthropicApiError::from)
    }
}
