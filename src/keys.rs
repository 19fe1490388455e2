//! Substitution-key catalog.
//!
//! A catalog declares, per game variant, which template slots are filled by
//! whom:
//!
//! | Kind      | Filled by                          | Example            |
//! |-----------|------------------------------------|--------------------|
//! | `Action`  | the acting player, every turn      | `tone`             |
//! | `Info`    | private facts held by each player  | `ransom_demand`    |
//! | `Context` | the scenario, fixed for an episode | `negotiation_tone` |
//!
//! Keys are unique across the whole catalog and their order is significant:
//! it fixes the order in which private information is revealed.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Who supplies a substitution key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Chosen by the acting player at decision time
    Action,
    /// Privately known to a player
    Info,
    /// Supplied by the scenario
    Context,
}

/// Ordered, disjoint substitution keys for one game variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCatalog {
    action_keys: Vec<String>,
    info_keys: Vec<String>,
    context_keys: Vec<String>,
}

impl KeyCatalog {
    /// Build a catalog, rejecting duplicate or overlapping keys.
    ///
    /// # Example
    ///
    /// ```
    /// use chatgame::keys::{KeyCatalog, SlotKind};
    ///
    /// let catalog = KeyCatalog::new(
    ///     &["tone"],
    ///     &["ransom_demand", "data_importance"],
    ///     &["negotiation_tone"],
    /// ).unwrap();
    ///
    /// assert_eq!(catalog.kind_of("tone"), Some(SlotKind::Action));
    /// assert_eq!(catalog.len(), 4);
    /// ```
    pub fn new<S: AsRef<str>>(action_keys: &[S], info_keys: &[S], context_keys: &[S]) -> Result<Self> {
        let catalog = Self {
            action_keys: action_keys.iter().map(|k| k.as_ref().to_string()).collect(),
            info_keys: info_keys.iter().map(|k| k.as_ref().to_string()).collect(),
            context_keys: context_keys.iter().map(|k| k.as_ref().to_string()).collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.len());
        for key in self.all_keys() {
            if key.is_empty() {
                return Err(GameError::Template("empty substitution key".to_string()));
            }
            if seen.contains(&key) {
                return Err(GameError::Template(format!(
                    "substitution key declared twice: {key}"
                )));
            }
            seen.push(key);
        }
        Ok(())
    }

    /// Keys the acting player fills each turn
    pub fn action_keys(&self) -> &[String] {
        &self.action_keys
    }

    /// Keys for privately held facts
    pub fn info_keys(&self) -> &[String] {
        &self.info_keys
    }

    /// Keys supplied by the scenario
    pub fn context_keys(&self) -> &[String] {
        &self.context_keys
    }

    /// All keys: actions, then info, then context
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        self.action_keys
            .iter()
            .chain(&self.info_keys)
            .chain(&self.context_keys)
            .map(String::as_str)
    }

    /// Classify a key
    pub fn kind_of(&self, key: &str) -> Option<SlotKind> {
        if self.action_keys.iter().any(|k| k == key) {
            Some(SlotKind::Action)
        } else if self.info_keys.iter().any(|k| k == key) {
            Some(SlotKind::Info)
        } else if self.context_keys.iter().any(|k| k == key) {
            Some(SlotKind::Context)
        } else {
            None
        }
    }

    /// Whether the catalog declares a key
    pub fn contains(&self, key: &str) -> bool {
        self.kind_of(key).is_some()
    }

    /// Total number of keys
    pub fn len(&self) -> usize {
        self.action_keys.len() + self.info_keys.len() + self.context_keys.len()
    }

    /// Whether the catalog declares no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let catalog = KeyCatalog::new(&["tone"], &["b", "a"], &["ctx"]).unwrap();
        let keys: Vec<&str> = catalog.all_keys().collect();
        assert_eq!(keys, vec!["tone", "b", "a", "ctx"]);
    }

    #[test]
    fn test_kind_of() {
        let catalog = KeyCatalog::new(&["tone"], &["ransom_demand"], &["negotiation_tone"]).unwrap();
        assert_eq!(catalog.kind_of("tone"), Some(SlotKind::Action));
        assert_eq!(catalog.kind_of("ransom_demand"), Some(SlotKind::Info));
        assert_eq!(catalog.kind_of("negotiation_tone"), Some(SlotKind::Context));
        assert_eq!(catalog.kind_of("missing"), None);
    }

    #[test]
    fn test_duplicate_within_sequence() {
        let empty: [&str; 0] = [];
        assert!(KeyCatalog::new(&["tone", "tone"], &empty, &empty).is_err());
    }

    #[test]
    fn test_overlapping_sequences() {
        let empty: [&str; 0] = [];
        let result = KeyCatalog::new(&["tone"], &["tone"], &empty);
        assert!(matches!(result, Err(GameError::Template(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let empty: [&str; 0] = [];
        assert!(KeyCatalog::new(&[""], &empty, &empty).is_err());
    }
}
