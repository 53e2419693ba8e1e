//! JSON extraction from model output
//!
//! Even with a response schema, models occasionally wrap the JSON object in a
//! markdown fence or add a sentence around it. The parser tries progressively
//! looser extraction strategies before giving up.

use serde::de::DeserializeOwned;

use crate::domain::LlmError;

/// Utilities for extracting and parsing JSON from LLM responses.
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a JSON value from an LLM response.
    ///
    /// Candidates are tried in order:
    /// 1) the full trimmed content,
    /// 2) a ```json fenced block,
    /// 3) any fenced block,
    /// 4) the first complete JSON object/array embedded in the text.
    pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, LlmError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(LlmError::InvalidResponse("Empty LLM response".to_string()));
        }

        let mut last_error = None;
        for candidate in Self::candidates(trimmed) {
            match serde_json::from_str::<T>(&candidate) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => last_error = Some(e),
            }
        }

        Err(LlmError::InvalidResponse(match last_error {
            Some(e) => format!("Failed to extract valid JSON from LLM response: {}", e),
            None => "Failed to extract valid JSON from LLM response".to_string(),
        }))
    }

    fn candidates(content: &str) -> Vec<String> {
        let mut candidates = vec![content.to_string()];
        candidates.extend(Self::extract_fenced_json(content));
        candidates.extend(Self::extract_any_fenced_code(content));
        candidates.extend(Self::extract_first_json_value(content));
        candidates.dedup();
        candidates
    }

    /// Extract a ```json fenced code block.
    pub fn extract_fenced_json(content: &str) -> Option<String> {
        Self::extract_fenced_block(content, Some("json"))
    }

    /// Extract any fenced code block.
    pub fn extract_any_fenced_code(content: &str) -> Option<String> {
        Self::extract_fenced_block(content, None)
    }

    /// Extract the first complete JSON object or array from free text.
    pub fn extract_first_json_value(content: &str) -> Option<String> {
        content
            .char_indices()
            .filter(|(_, ch)| *ch == '{' || *ch == '[')
            .find_map(|(idx, _)| {
                let candidate = &content[idx..];
                let mut values =
                    serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
                match values.next() {
                    Some(Ok(_)) => {
                        let end = values.byte_offset();
                        (end > 0).then(|| candidate[..end].to_string())
                    }
                    _ => None,
                }
            })
    }

    fn extract_fenced_block(content: &str, language: Option<&str>) -> Option<String> {
        const FENCE: &str = "```";
        let mut rest = content;

        while let Some(start) = rest.find(FENCE) {
            let after_open = &rest[start + FENCE.len()..];
            let line_end = after_open.find('\n')?;
            let tag = after_open[..line_end].trim();
            let body = &after_open[line_end + 1..];
            let close = body.find(FENCE)?;

            let matches = language.is_none_or(|lang| tag.eq_ignore_ascii_case(lang));
            if matches {
                return Some(body[..close].trim().to_string());
            }

            rest = &body[close + FENCE.len()..];
        }

        None
    }
}
