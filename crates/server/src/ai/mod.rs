use shared::{AdvisorRequest, AdvisorResponse, ProjectSnapshot};

use crate::AppState;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

const SYSTEM_PROMPT: &str = r#"
You are a real-estate feasibility advisor. The user is massing a building on a
land parcel and asks about the project below.

The project snapshot is JSON with:
- metrics: gfa and nsa (m²), revenue, totalCost, grossProfit (in the project
  currency), margin (% of revenue), far (GFA / land area), occupancy (% of land
  covered), isFarValid and isOccupancyValid (zoning compliance)
- land: area, cost, sellPrice and buildCost (per m²), maxFar, maxOccupancy (%),
  efficiency (NSA / GFA)
- blocks: podium and tower volumes with usage, height (m, 3 m per floor) and
  baseArea (m²)

Answer from these numbers only; do not recompute them differently. When a zoning
cap is exceeded, say by how much and suggest concrete block changes. Keep answers
short and use the project currency.
"#;

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("ANTHROPIC_API_KEY not set")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model returned HTTP {0}")]
    Upstream(u16),

    #[error("could not encode project snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model reply had no text")]
    EmptyReply,
}

/// Project context appended to the system prompt
pub fn project_context(snapshot: &ProjectSnapshot) -> Result<String, AdvisorError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    Ok(format!(
        "{SYSTEM_PROMPT}\nCurrency: {}\n\nCurrent project:\n{json}\n",
        snapshot.currency
    ))
}

/// Concatenated text blocks of a messages API reply
pub fn reply_text(body: &serde_json::Value) -> Option<String> {
    let text: Vec<&str> = body["content"]
        .as_array()?
        .iter()
        .filter_map(|block| block["text"].as_str())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text.join("\n"))
    }
}

pub async fn process_chat(
    state: &AppState,
    request: &AdvisorRequest,
) -> Result<AdvisorResponse, AdvisorError> {
    let api_key = state.ai_api_key.as_ref().ok_or(AdvisorError::MissingApiKey)?;
    let system = project_context(&request.snapshot)?;

    let response = state
        .http
        .post(MESSAGES_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "model": state.model,
            "max_tokens": 1024,
            "system": system,
            "messages": [
                { "role": "user", "content": request.message }
            ]
        }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AdvisorError::Upstream(status.as_u16()));
    }

    let body: serde_json::Value = response.json().await?;
    let text = reply_text(&body).ok_or(AdvisorError::EmptyReply)?;
    Ok(AdvisorResponse { text })
}
