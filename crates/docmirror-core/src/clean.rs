//! Boilerplate removal for rendered documentation pages.

use crate::config::CleaningConfig;

/// Strips site chrome from rendered markdown using literal text markers.
///
/// Steps, in order:
///
/// 1. every occurrence of the copy-page artifact is removed
/// 2. text up to and including the first skip marker is dropped
/// 3. text from the first feedback marker onward is dropped
///
/// The result is trimmed. Missing markers leave the text untouched.
#[derive(Debug, Clone, Default)]
pub struct ContentCleaner {
    markers: CleaningConfig,
}

impl ContentCleaner {
    /// Create a cleaner from configured markers.
    #[must_use]
    pub const fn new(markers: CleaningConfig) -> Self {
        Self { markers }
    }

    /// Clean rendered markdown.
    #[must_use]
    pub fn clean(&self, markdown: &str) -> String {
        let CleaningConfig {
            copy_page_artifact,
            skip_marker,
            feedback_marker,
        } = &self.markers;

        let mut text = if copy_page_artifact.is_empty() {
            markdown.to_string()
        } else {
            markdown.replace(copy_page_artifact.as_str(), "")
        };

        if !skip_marker.is_empty() {
            if let Some((_, after)) = text.split_once(skip_marker.as_str()) {
                text = after.to_string();
            }
        }

        if !feedback_marker.is_empty() {
            if let Some((before, _)) = text.split_once(feedback_marker.as_str()) {
                text = before.to_string();
            }
        }

        text.trim().to_string()
    }
}
