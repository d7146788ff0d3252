//! Response Normalizer: coerces raw provider text into a strict `OptimizedResumePayload`.
//!
//! Never fails. Unparseable output degrades to the simple-optimize path (the input
//! profile passed through unchanged); partially valid output is merged field by
//! field with the input profile so no field is ever missing.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::resume::{OptimizedResumePayload, ResumeProfile};

/// Suggestions every fallback result carries, in this order.
pub const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "Quantify your achievements with concrete metrics (percentages, revenue, time saved).",
    "Align your experience with keywords from the target role's job description.",
    "Use consistent tense and start each bullet with a strong action verb.",
];

/// Added to the fallback suggestions when the profile lists no projects.
pub const ADD_PROJECT_SUGGESTION: &str =
    "Add at least one project to showcase hands-on, applied skills.";

/// Where the normalized payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrigin {
    /// Parsed from provider output (possibly with gaps filled from the input).
    Provider,
    /// Provider output was unusable; the input profile was passed through.
    SimpleOptimize,
}

#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    pub payload: OptimizedResumePayload,
    pub suggestions: Vec<String>,
    pub origin: ResponseOrigin,
}

// ────────────────────────────────────────────────────────────────────────────
// Deterministic fallbacks
// ────────────────────────────────────────────────────────────────────────────

/// Fixed guidance derived from the profile alone. Same input, same output.
pub fn fallback_suggestions(profile: &ResumeProfile) -> Vec<String> {
    let mut suggestions: Vec<String> = FALLBACK_SUGGESTIONS
        .iter()
        .map(|s| s.to_string())
        .collect();
    if profile.projects.is_empty() {
        suggestions.push(ADD_PROJECT_SUGGESTION.to_string());
    }
    suggestions
}

/// Passes the profile through unchanged, lifting the personal summary to the top level.
pub fn simple_optimize(profile: &ResumeProfile) -> OptimizedResumePayload {
    OptimizedResumePayload {
        personal_info: profile.personal_info.clone(),
        summary: profile_summary(profile),
        work_experience: profile.work_experience.clone(),
        education: profile.education.clone(),
        certifications: profile.certifications.clone(),
        projects: profile.projects.clone(),
        languages: profile.languages.clone(),
    }
}

fn profile_summary(profile: &ResumeProfile) -> String {
    profile.personal_info.summary.clone().unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes raw provider text against the input profile.
pub fn normalize(raw: &str, fallback: &ResumeProfile) -> NormalizedResponse {
    let Some(mut object) = parse_object(raw) else {
        warn!(
            "Provider response is not a JSON object ({} chars), using simple optimize",
            raw.len()
        );
        return NormalizedResponse {
            payload: simple_optimize(fallback),
            suggestions: fallback_suggestions(fallback),
            origin: ResponseOrigin::SimpleOptimize,
        };
    };

    let suggestions = object
        .remove("suggestions")
        .and_then(extract_suggestions)
        .unwrap_or_else(|| fallback_suggestions(fallback));

    let mut payload = OptimizedResumePayload {
        personal_info: field_or(&object, "personal_info", || fallback.personal_info.clone()),
        summary: object
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| profile_summary(fallback)),
        work_experience: field_or(&object, "work_experience", || {
            fallback.work_experience.clone()
        }),
        education: field_or(&object, "education", || fallback.education.clone()),
        certifications: field_or(&object, "certifications", || {
            fallback.certifications.clone()
        }),
        projects: field_or(&object, "projects", || fallback.projects.clone()),
        languages: field_or(&object, "languages", || fallback.languages.clone()),
    };

    // The image never goes to the model, so it never comes back.
    if payload.personal_info.profile_image_data_url.is_none() {
        payload.personal_info.profile_image_data_url =
            fallback.personal_info.profile_image_data_url.clone();
    }

    NormalizedResponse {
        payload,
        suggestions,
        origin: ResponseOrigin::Provider,
    }
}

/// Reads `key` as `T`, or falls back when it is absent, null, or the wrong shape.
fn field_or<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    fallback: impl FnOnce() -> T,
) -> T {
    let Some(value) = object.get(key).filter(|v| !v.is_null()) else {
        debug!("Provider response missing '{key}', keeping input value");
        return fallback();
    };
    match T::deserialize(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Provider response has invalid '{key}' ({e}), keeping input value");
            fallback()
        }
    }
}

/// Non-blank string entries of a `suggestions` array; `None` when there are none.
fn extract_suggestions(value: Value) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    let suggestions: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect();
    if suggestions.is_empty() {
        None
    } else {
        Some(suggestions)
    }
}

/// Parses provider text as a JSON object, tolerating code fences and
/// prose around the object.
fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<Value>(text).ok().or_else(|| {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<Value>(&text[start..=end]).ok()
    })?;

    match parsed {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
