use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalysisError;

/// Pulls the verdict object out of a NewsHunter or MarketAnalyst reply.
///
/// Analysts are asked for bare JSON but often answer with
/// `{"direction": "Bullish", ...}` inside a ```json fence, or after a line of
/// commentary such as `Gold outlook:`. The first object that parses wins.
pub fn extract_json(text: &str) -> Result<String, AnalysisError> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    if let Some(json_str) = extract_from_markdown_block(trimmed) {
        if serde_json::from_str::<Value>(&json_str).is_ok() {
            return Ok(json_str);
        }
    }

    if let Some(json_str) = extract_first_object(trimmed) {
        if serde_json::from_str::<Value>(&json_str).is_ok() {
            return Ok(json_str);
        }
    }

    Err(AnalysisError::Parse(format!(
        "No valid JSON object found in response (length={})",
        text.len()
    )))
}

/// Body of the first fenced block, with or without a `json` tag.
fn extract_from_markdown_block(text: &str) -> Option<String> {
    let start_markers = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for marker in &start_markers {
        if let Some(start) = text.find(marker) {
            let json_start = start + marker.len();
            if let Some(end) = text[json_start..].find("```") {
                return Some(text[json_start..json_start + end].trim().to_string());
            }
        }
    }

    None
}

/// First balanced `{ ... }` in analyst prose, ignoring braces inside
/// rationale strings.
fn extract_first_object(text: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Some(text[s..=i].to_string());
                    }
                }
            }
            _ => {}
        }
    }

    None
}

/// Raw MarketAnalyst answer, before citations are resolved.
#[derive(Deserialize, Debug)]
pub struct RawVerdict {
    #[serde(alias = "gold_direction", alias = "trend")]
    pub direction: String,
    #[serde(default)]
    pub silver_direction: Option<String>,
    #[serde(alias = "reasoning", alias = "reason")]
    pub rationale: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default, alias = "citations", alias = "sources")]
    pub cited: Vec<Value>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl RawVerdict {
    /// Citation numbers as given, skipping anything that is not a positive integer.
    pub fn cited_numbers(&self) -> Vec<usize> {
        self.cited
            .iter()
            .filter_map(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().trim_start_matches('[').trim_end_matches(']').parse().ok(),
                _ => None,
            })
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .collect()
    }

    /// Confidence normalized to 0.0..=1.0; percentages are scaled down.
    pub fn normalized_confidence(&self) -> Option<f64> {
        let c = self.confidence?;
        if !c.is_finite() || c < 0.0 {
            return None;
        }
        let c = if c > 1.0 { c / 100.0 } else { c };
        Some(c.min(1.0))
    }
}

pub fn parse_verdict(raw: &str) -> Result<RawVerdict, AnalysisError> {
    let json_str = extract_json(raw)?;
    serde_json::from_str(&json_str)
        .map_err(|e| AnalysisError::Parse(format!("Failed to parse verdict: {e}\nJSON: {json_str}")))
}

#[derive(Deserialize, Debug, Default)]
struct RawHighlights {
    #[serde(default)]
    highlights: Vec<String>,
}

/// NewsHunter highlights. Only the verdict is load-bearing, so a malformed
/// answer here is reported as an error for the caller to log.
pub fn parse_highlights(raw: &str) -> Result<Vec<String>, AnalysisError> {
    let json_str = extract_json(raw)?;
    let parsed: RawHighlights = serde_json::from_str(&json_str)
        .map_err(|e| AnalysisError::Parse(format!("Failed to parse highlights: {e}")))?;
    Ok(parsed
        .highlights
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect())
}
