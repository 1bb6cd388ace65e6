//! Lenient parsing of classifier model output.
//!
//! Models asked for JSON still wrap it in prose or code fences often
//! enough that strict parsing would throw away good verdicts. This module
//! is the single place that leniency lives: raw model text in, structured
//! verdict out, and anything unusable becomes the conservative clean
//! verdict rather than an error.

use serde::Deserialize;

use crate::ports::ScamVerdict;

/// Raw verdict shape the model is asked to produce. Every field is
/// optional so partial output still yields something usable.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    is_scam: Option<bool>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Parses raw model output into a verdict.
///
/// Handles markdown code fences, leading prose before the JSON object,
/// and missing fields. Unparseable input yields `ScamVerdict::clean()`.
pub fn parse_verdict(raw: &str) -> ScamVerdict {
    let candidate = extract_json_object(raw).unwrap_or_else(|| raw.trim().to_string());

    match serde_json::from_str::<RawVerdict>(&candidate) {
        Ok(parsed) => ScamVerdict::new(
            parsed.is_scam.unwrap_or(false),
            parsed.confidence.unwrap_or(0.0),
        ),
        Err(_) => ScamVerdict::clean(),
    }
}

/// Finds the first balanced JSON object in the text, looking inside
/// markdown code fences first.
fn extract_json_object(s: &str) -> Option<String> {
    let trimmed = s.trim();

    if let Some(inner) = extract_from_code_block(trimmed) {
        if let Some(json) = extract_balanced_object(&inner) {
            return Some(json);
        }
    }

    extract_balanced_object(trimmed)
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let inner_start = start + pattern.len();
            if let Some(end) = s[inner_start..].find("```") {
                return Some(s[inner_start..inner_start + end].trim().to_string());
            }
        }
    }
    None
}

fn extract_balanced_object(s: &str) -> Option<String> {
    let start = s.find('{')?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(s[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
