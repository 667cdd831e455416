//! LLM provider adapters
//!
//! Each adapter implements [`LlmGateway`] for one vendor API; the
//! [`RoutingGateway`] picks an adapter per model.

pub mod anthropic;
pub mod openai;
pub mod routing;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use routing::RoutingGateway;

use marshall_application::ports::llm_gateway::{GatewayError, LlmGateway};
use marshall_domain::ProviderKind;

/// A gateway bound to a single vendor API
pub trait ProviderAdapter: LlmGateway {
    fn kind(&self) -> ProviderKind;
}

/// Map a transport failure to a gateway error.
pub(crate) fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Read a response body, turning non-success statuses into errors.
pub(crate) async fn read_body(
    provider: &str,
    response: reqwest::Response,
) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        tracing::error!("{} API error: {} - {}", provider, status, body);
        return Err(GatewayError::RequestFailed(format!(
            "{} API returned {}: {}",
            provider, status, body
        )));
    }
    Ok(body)
}
