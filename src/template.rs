//! Named-slot text templates.
//!
//! Templates use `{name}` slots, where `name` is an ASCII identifier.
//! `{{` and `}}` produce literal braces. Templates are parsed once, when they
//! are built, so a typo'd slot surfaces as an error at construction time
//! instead of as silently unsubstituted text.
//!
//! Rendering is strict: every slot needs a value and every value needs a slot.
//! Substituted values are inserted verbatim and never re-parsed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{GameError, Result};

/// Values keyed by slot name.
///
/// Ordering is by key so error reporting and serialization are stable;
/// rendering order always follows the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotValues(BTreeMap<String, String>);

impl SlotValues {
    /// Create an empty value map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, returning the map (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Get a value by slot name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a slot has a value
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Slot names in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// (slot, value) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another map into this one (other takes precedence)
    pub fn extend(&mut self, other: SlotValues) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SlotValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    slots: Vec<String>,
}

impl Template {
    /// Parse a template
    ///
    /// # Example
    ///
    /// ```
    /// use chatgame::template::{SlotValues, Template};
    ///
    /// let tpl = Template::parse("from: {sender}\nto: {receiver}\n").unwrap();
    /// assert_eq!(tpl.slots(), ["sender", "receiver"]);
    ///
    /// let values = SlotValues::new().with("sender", "Attacker").with("receiver", "Defender");
    /// assert_eq!(tpl.render(&values).unwrap(), "from: Attacker\nto: Defender\n");
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut slots: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|(_, n)| *n) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(GameError::Template(format!(
                            "unterminated slot at byte {pos}"
                        )));
                    }
                    if !is_identifier(&name) {
                        return Err(GameError::Template(format!(
                            "invalid slot name {name:?} at byte {pos}"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    if !slots.contains(&name) {
                        slots.push(name.clone());
                    }
                    segments.push(Segment::Slot(name));
                }
                '}' => {
                    return Err(GameError::Template(format!(
                        "unmatched '}}' at byte {pos}"
                    )));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            slots,
        })
    }

    /// The original template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Slot names in order of first appearance
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Whether the template declares a slot
    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s == name)
    }

    /// Render against a value map.
    ///
    /// Fails with [`GameError::MissingSlot`] for the first declared slot
    /// without a value, then with [`GameError::UnknownSlot`] for the first
    /// value without a slot.
    pub fn render(&self, values: &SlotValues) -> Result<String> {
        if let Some(missing) = self.slots.iter().find(|s| !values.contains(s)) {
            return Err(GameError::MissingSlot(missing.clone()));
        }
        if let Some(unknown) = values.keys().find(|k| !self.has_slot(k)) {
            return Err(GameError::UnknownSlot(unknown.to_string()));
        }

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => out.push_str(values.get(name).unwrap_or_default()),
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slots_in_order() {
        let tpl = Template::parse("{b} then {a} then {b}").unwrap();
        assert_eq!(tpl.slots(), ["b", "a"]);
        assert!(tpl.has_slot("a"));
        assert!(!tpl.has_slot("c"));
    }

    #[test]
    fn test_render() {
        let tpl = Template::parse("Use a {tone} tone.").unwrap();
        let values = SlotValues::new().with("tone", "firm");
        assert_eq!(tpl.render(&values).unwrap(), "Use a firm tone.");
    }

    #[test]
    fn test_escaped_braces() {
        let tpl = Template::parse("{{literal}} {x}").unwrap();
        assert_eq!(tpl.slots(), ["x"]);
        let values = SlotValues::new().with("x", "1");
        assert_eq!(tpl.render(&values).unwrap(), "{literal} 1");
    }

    #[test]
    fn test_values_not_reparsed() {
        let tpl = Template::parse("{x}").unwrap();
        let values = SlotValues::new().with("x", "{y}");
        assert_eq!(tpl.render(&values).unwrap(), "{y}");
    }

    #[test]
    fn test_missing_slot() {
        let tpl = Template::parse("{a} {b}").unwrap();
        let values = SlotValues::new().with("a", "1");
        assert!(matches!(tpl.render(&values), Err(GameError::MissingSlot(s)) if s == "b"));
    }

    #[test]
    fn test_unknown_slot() {
        let tpl = Template::parse("{a}").unwrap();
        let values = SlotValues::new().with("a", "1").with("z", "2");
        assert!(matches!(tpl.render(&values), Err(GameError::UnknownSlot(s)) if s == "z"));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(Template::parse("{open").is_err());
        assert!(Template::parse("close}").is_err());
        assert!(Template::parse("{1abc}").is_err());
        assert!(Template::parse("{}").is_err());
        assert!(Template::parse("{with space}").is_err());
    }

    #[test]
    fn test_no_slots() {
        let tpl = Template::parse("plain text").unwrap();
        assert!(tpl.slots().is_empty());
        assert_eq!(tpl.render(&SlotValues::new()).unwrap(), "plain text");
    }
}
