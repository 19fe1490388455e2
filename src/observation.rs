//! Observation wrappers.
//!
//! The engine asks a language model to summarize the dialogue for each player;
//! an [`Observation`] holds the text placed before and after the dialogue in
//! that request. No engine logic lives here.

use serde::{Deserialize, Serialize};

/// Summary request prefix
pub const SUMMARY_PREFIX: &str = "You are an assistant designed to summarize conversational \
dialogue. Please take note of the most important events in the conversation. Especially take \
note if the final message includes a question. Provide your summary in 100 words or less. \
Please summarize the following dialogue.";

/// Summary request postfix
pub const SUMMARY_POSTFIX: &str = "\n\nSummary:\n";

/// Per-player text wrapped around a model-generated summary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Text before the dialogue
    pub prefix: String,
    /// Text after the dialogue
    pub postfix: String,
}

impl Observation {
    /// Create an observation
    pub fn new(prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            postfix: postfix.into(),
        }
    }

    /// The summary observation
    pub fn summary() -> Self {
        Self::new(SUMMARY_PREFIX, SUMMARY_POSTFIX)
    }

    /// One summary observation per player
    pub fn summary_for(num_players: usize) -> Vec<Self> {
        (0..num_players).map(|_| Self::summary()).collect()
    }

    /// Wrap a dialogue into the summary request text
    pub fn wrap(&self, dialogue: &str) -> String {
        format!("{}\n\n{}{}", self.prefix, dialogue, self.postfix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_for_players() {
        let observations = Observation::summary_for(2);
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0], observations[1]);
        assert_eq!(observations[0].postfix, SUMMARY_POSTFIX);
    }

    #[test]
    fn test_wrap() {
        let obs = Observation::new("Summarize:", "\nSummary:");
        assert_eq!(obs.wrap("A: hi"), "Summarize:\n\nA: hi\nSummary:");
    }
}
