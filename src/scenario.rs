//! Scenarios: literal values for one playthrough.
//!
//! Every scenario carries a [`BaseScenario`] (the opening message and the two
//! participants) plus game-specific fields addressed by substitution key.
//! Scenarios are frozen value types: fields are private, equality and hashing
//! are structural, and validation against a header happens when a
//! configuration is assembled.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Fields shared by every scenario
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseScenario {
    msg: String,
    sender: String,
    receiver: String,
}

impl BaseScenario {
    /// Create a base scenario
    pub fn new(msg: impl Into<String>, sender: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            sender: sender.into(),
            receiver: receiver.into(),
        }
    }

    /// Opening message prose
    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// Display name of the player sending the opening message
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Display name of the player receiving the opening message
    pub fn receiver(&self) -> &str {
        &self.receiver
    }
}

/// A game-specific scenario
pub trait Scenario: Debug + Clone + PartialEq + Eq + Hash + Send + Sync {
    /// Shared fields
    fn base(&self) -> &BaseScenario;

    /// Game-specific field by substitution key
    fn field(&self, key: &str) -> Option<&str>;

    /// Substitution keys this scenario type supplies, in declaration order
    fn field_keys(&self) -> &'static [&'static str];

    /// (key, value) pairs for every game-specific field
    fn fields(&self) -> Vec<(&'static str, &str)> {
        self.field_keys()
            .iter()
            .filter_map(|key| self.field(key).map(|value| (*key, value)))
            .collect()
    }
}
