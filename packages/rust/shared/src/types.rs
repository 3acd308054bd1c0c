//! Core domain types for the conversion pipeline.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ModelName
// ---------------------------------------------------------------------------

/// An opaque model identifier recognized by the local inference service.
///
/// Not validated beyond non-emptiness at the CLI surface; the service itself
/// decides whether the name resolves to an installed model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(pub String);

impl ModelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// ConversionRequest / ConversionResult
// ---------------------------------------------------------------------------

/// One user-initiated conversion: a target URL and the model to run it with.
/// Created per action, immutable, discarded after completion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Target page URL, passed to the content proxy as-is.
    pub url: String,
    /// Model that performs the HTML-to-Markdown conversion.
    pub model: ModelName,
}

/// The output of a successful conversion.
///
/// Only produced when both the proxy fetch and the inference call succeeded;
/// written at most once to the artifact store, never mutated.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Markdown reply from the model, verbatim.
    pub markdown_content: String,
    /// Local time the conversion completed; drives the artifact filename.
    pub timestamp: DateTime<Local>,
    /// The URL the content was fetched from.
    pub source_url: String,
}

/// Generate the artifact filename for a conversion completed at `at`.
///
/// Second-granularity timestamps mean two conversions within the same second
/// collide; the second write silently overwrites the first.
pub fn artifact_filename(at: DateTime<Local>) -> String {
    format!("converted_{}.md", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn model_name_display() {
        let name = ModelName::new("mistral:latest");
        assert_eq!(name.to_string(), "mistral:latest");
        assert_eq!(name.as_str(), "mistral:latest");
    }

    #[test]
    fn artifact_filename_format() {
        let at = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(artifact_filename(at), "converted_20250314_092653.md");
    }

    #[test]
    fn artifact_filename_collides_within_second() {
        let at = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(artifact_filename(at), artifact_filename(at));
    }
}
