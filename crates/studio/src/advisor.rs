//! HTTP client for the advisor service

use shared::{AdvisorRequest, AdvisorResponse};

/// Errors talking to the advisor service
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Advisor request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Advisor returned HTTP {0}")]
    Status(u16),
}

/// Posts project questions to `{endpoint}/api/chat`
#[derive(Debug, Clone)]
pub struct AdvisorClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AdvisorClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.trim_end_matches('/'))
    }

    pub async fn ask(&self, request: &AdvisorRequest) -> Result<AdvisorResponse, AdvisorError> {
        let response = self.http.post(self.chat_url()).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "advisor request rejected");
            return Err(AdvisorError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        assert_eq!(
            AdvisorClient::new("http://localhost:3001/").chat_url(),
            "http://localhost:3001/api/chat"
        );
        assert_eq!(
            AdvisorClient::new("https://advisor.example").chat_url(),
            "https://advisor.example/api/chat"
        );
    }
}
