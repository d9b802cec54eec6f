//! Human-readable game log lines.
//!
//! These are the moderator's record of what happened, not diagnostics.
//! Diagnostics go through `tracing`.

use serde::{Deserialize, Serialize};

/// Who may see a log line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Safe to announce at the table.
    Public,
    /// Grimoire-only.
    #[default]
    Storyteller,
}

/// One line of the game log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub visibility: Visibility,
    pub text: String,
}

impl LogEntry {
    #[must_use]
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Public,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn private(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Storyteller,
            text: text.into(),
        }
    }

    /// A storyteller-only line flagged as a warning.
    #[must_use]
    pub fn warning(text: impl std::fmt::Display) -> Self {
        Self::private(format!("WARNING: {text}"))
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
