//! Remote tool forwarded over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use thinking_protocols::{Tool, ToolContext, ToolDefinition, ToolError};

/// Settings for an [`HttpTool`].
#[derive(Debug, Clone)]
pub struct HttpToolOptions {
    /// Endpoint the parameters are POSTed to.
    pub url: String,
    pub description: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
}

impl HttpToolOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            timeout_secs: default_timeout(),
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// A tool whose work is done by a remote service.
///
/// The parameters object is sent as the JSON body of a POST request. A 2xx
/// response body is returned as the tool result (parsed as JSON when
/// possible, otherwise as a string); any other status is a failure.
pub struct HttpTool {
    definition: ToolDefinition,
    client: Client,
    url: url::Url,
    headers: HashMap<String, String>,
    timeout_secs: u64,
}

impl HttpTool {
    pub fn new(name: impl Into<String>, options: HttpToolOptions) -> Result<Self, ToolError> {
        let name = name.into();
        let url = url::Url::parse(&options.url)
            .map_err(|e| ToolError::InvalidParameters(format!("Invalid URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ToolError::InvalidParameters(format!(
                "Unsupported URL scheme: {}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(concat!("unified-thinking/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to create HTTP client: {}", e)))?;

        let description = options
            .description
            .unwrap_or_else(|| format!("Remote tool at {}", url));
        let definition = ToolDefinition::new(name.clone(), name, description)
            .with_parameters_schema(serde_json::json!({ "type": "object" }))
            .with_metadata("url", serde_json::Value::String(url.to_string()));

        Ok(Self {
            definition,
            client,
            url,
            headers: options.headers,
            timeout_secs: options.timeout_secs,
        })
    }

    async fn send(&self, params: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, ToolError> {
        let mut request = self
            .client
            .post(self.url.clone())
            .header("x-correlation-id", &ctx.correlation_id)
            .json(&params);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ToolError::Timeout(self.timeout_secs)
            } else {
                ToolError::ExecutionFailed(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            warn!(tool = %self.definition.id, status = status.as_u16(), "Remote tool returned error status");
            return Err(ToolError::ExecutionFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

#[async_trait]
impl Tool for HttpTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        debug!(tool = %self.definition.id, url = %self.url, "Forwarding tool call");
        let cancellation = ctx.cancellation.clone();
        tokio::select! {
            result = self.send(params, &ctx) => result,
            _ = cancellation.cancelled() => Err(ToolError::Cancelled),
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
