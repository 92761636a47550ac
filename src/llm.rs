use serde_json::json;
use thiserror::Error;

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// The base URL is configurable so tests can point the client at a local
/// mock server. The call is a single synchronous round trip with no retry
/// and no timeout.
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("llm response did not contain choices[0].message.content")]
    MissingContent,
}

impl LlmClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0
            }))
            .send()
            .await
            .and_then(|response| response.error_for_status())?;

        let body = response.json::<serde_json::Value>().await?;
        match body["choices"][0]["message"]["content"].as_str() {
            Some(content) => Ok(content.to_string()),
            None => Err(LlmError::MissingContent),
        }
    }
}

/// Narrows free-form model output down to a JSON array candidate.
///
/// Takes everything from the first `[` to the last `]` when such a span
/// exists. Otherwise trims the text and strips at most one leading and
/// trailing backtick plus a literal `json` fence marker. Never fails; the
/// caller's strict parse decides whether the result is usable.
pub fn extract_json_array(raw: &str) -> String {
    if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) {
        if start < end {
            return raw[start..=end].to_string();
        }
    }

    let s = raw.trim();
    let s = s.strip_prefix('`').unwrap_or(s);
    let s = s.strip_suffix('`').unwrap_or(s);
    let s = s.strip_prefix("json").unwrap_or(s);
    let s = s.strip_suffix("json").unwrap_or(s);
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::extract_json_array;

    #[test]
    fn extracts_array_wrapped_in_prose() {
        let raw = "Sure, here are your questions:\n[{\"question\":\"Q?\"}]\nEnjoy!";
        assert_eq!(extract_json_array(raw), "[{\"question\":\"Q?\"}]");
    }

    #[test]
    fn extracts_array_from_code_fence() {
        let raw = "```json\n[1, 2, 3]\n```";
        assert_eq!(extract_json_array(raw), "[1, 2, 3]");
    }

    #[test]
    fn span_is_greedy_across_multiple_brackets() {
        assert_eq!(extract_json_array("a [1] b [2] c"), "[1] b [2]");
    }

    #[test]
    fn fallback_strips_backticks_and_json_marker() {
        assert_eq!(extract_json_array("`json hello`"), "hello");
    }

    #[test]
    fn fallback_returns_trimmed_text_without_brackets() {
        assert_eq!(extract_json_array("  no array here  "), "no array here");
    }
}
