//! Game headers: the immutable template bundle of one game variant.
//!
//! A header ties together:
//!
//! - a **message template** (the envelope around every message, with
//!   `sender`/`receiver` style slots),
//! - an **options template** whose slots are exactly the variant's
//!   substitution keys,
//! - a **strip rule** that reduces raw text to message content,
//! - the **special characters** that substituted values may not contain,
//! - the **key catalog**, and
//! - a literal **context** (instructions plus worked examples).
//!
//! ## Prompt layout
//!
//! ```text
//! <context, verbatim>            built once, never re-rendered
//! <options block>                rendered per player and turn
//! <dialogue so far>              supplied by the engine
//! ```
//!
//! The split keeps worked examples fixed: nothing in the live scenario can
//! leak into them.

use serde::Serialize;

use crate::error::{GameError, Result};
use crate::keys::KeyCatalog;
use crate::scenario::Scenario;
use crate::substrate::{self, StripFn};
use crate::template::{SlotValues, Template};

/// Immutable template bundle shared by all scenarios of one game variant
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    message_template: Template,
    options_template: Template,
    #[serde(skip)]
    strip_fn: StripFn,
    special_chars: Vec<char>,
    catalog: KeyCatalog,
    context: String,
}

impl Header {
    /// Build a header, checking the templates against the key catalog.
    ///
    /// The options template must declare exactly the catalog's keys, and the
    /// message template may not reuse any of them.
    ///
    /// # Example
    ///
    /// ```
    /// use chatgame::header::Header;
    /// use chatgame::keys::KeyCatalog;
    /// use chatgame::substrate::{strip_msg, PLAIN, SPECIAL_CHARS};
    ///
    /// let empty: [&str; 0] = [];
    /// let catalog = KeyCatalog::new(&["tone"], &empty, &empty).unwrap();
    /// let header = Header::new(&PLAIN, "Tone: {tone}\n", strip_msg, SPECIAL_CHARS, catalog, "Rules.")
    ///     .unwrap();
    ///
    /// assert_eq!(header.action_keys(), ["tone"]);
    /// assert!(header.info_keys().is_empty());
    /// ```
    pub fn new(
        message_template: &str,
        options_template: &str,
        strip_fn: StripFn,
        special_chars: &[char],
        catalog: KeyCatalog,
        context: impl Into<String>,
    ) -> Result<Self> {
        let message_template = Template::parse(message_template)?;
        let options_template = Template::parse(options_template)?;

        if let Some(slot) = options_template
            .slots()
            .iter()
            .find(|slot| !catalog.contains(slot))
        {
            return Err(GameError::Template(format!(
                "options slot {slot} is not declared in the key catalog"
            )));
        }
        if let Some(key) = catalog.all_keys().find(|key| !options_template.has_slot(key)) {
            return Err(GameError::Template(format!(
                "key {key} has no slot in the options template"
            )));
        }
        if let Some(slot) = message_template
            .slots()
            .iter()
            .find(|slot| catalog.contains(slot))
        {
            return Err(GameError::Template(format!(
                "message slot {slot} collides with a substitution key"
            )));
        }

        let header = Self {
            message_template,
            options_template,
            strip_fn,
            special_chars: special_chars.to_vec(),
            catalog,
            context: context.into(),
        };

        tracing::debug!(
            "Built header: {} action keys, {} info keys, {} context keys",
            header.catalog.action_keys().len(),
            header.catalog.info_keys().len(),
            header.catalog.context_keys().len()
        );

        Ok(header)
    }

    /// Envelope template
    pub fn message_template(&self) -> &Template {
        &self.message_template
    }

    /// Options template
    pub fn options_template(&self) -> &Template {
        &self.options_template
    }

    /// Characters substituted values may not contain
    pub fn special_chars(&self) -> &[char] {
        &self.special_chars
    }

    /// Substitution-key catalog
    pub fn catalog(&self) -> &KeyCatalog {
        &self.catalog
    }

    /// Keys the acting player fills each turn
    pub fn action_keys(&self) -> &[String] {
        self.catalog.action_keys()
    }

    /// Keys for privately held facts
    pub fn info_keys(&self) -> &[String] {
        self.catalog.info_keys()
    }

    /// Keys supplied by the scenario
    pub fn context_keys(&self) -> &[String] {
        self.catalog.context_keys()
    }

    /// Static instructions and worked examples
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Reject a value containing a special character
    pub fn check_value(&self, slot: &str, value: &str) -> Result<()> {
        match substrate::find_special(value, &self.special_chars) {
            Some(ch) => Err(GameError::UnsafeValue {
                slot: slot.to_string(),
                ch,
            }),
            None => Ok(()),
        }
    }

    fn render_checked(&self, template: &Template, values: &SlotValues) -> Result<String> {
        let rendered = template.render(values)?;
        for (slot, value) in values.iter() {
            self.check_value(slot, value)?;
        }
        Ok(rendered)
    }

    /// Render the options block for one player's turn
    pub fn render_options(&self, slot_values: &SlotValues) -> Result<String> {
        self.render_checked(&self.options_template, slot_values)
    }

    /// Render a message envelope
    pub fn envelope(&self, envelope_fields: &SlotValues) -> Result<String> {
        self.render_checked(&self.message_template, envelope_fields)
    }

    /// Render the options block followed by the envelope of the next message.
    ///
    /// Fails with [`GameError::MissingSlot`] when a declared key has no value,
    /// [`GameError::UnknownSlot`] when a value has no declared key, and
    /// [`GameError::UnsafeValue`] when a value contains a special character.
    pub fn render(&self, envelope_fields: &SlotValues, slot_values: &SlotValues) -> Result<String> {
        let mut out = self.render_options(slot_values)?;
        out.push_str(&self.envelope(envelope_fields)?);
        Ok(out)
    }

    /// Render an envelope followed by a message body
    pub fn compose_message(&self, envelope_fields: &SlotValues, body: &str) -> Result<String> {
        self.check_value("body", body)?;
        let mut out = self.envelope(envelope_fields)?;
        out.push_str(body);
        Ok(out)
    }

    /// Reduce rendered or replied text to its content
    pub fn strip(&self, raw_text: &str) -> String {
        (self.strip_fn)(raw_text, "")
    }

    /// Like [`Header::strip`], also truncating at `terminal`
    pub fn strip_until(&self, raw_text: &str, terminal: &str) -> String {
        (self.strip_fn)(raw_text, terminal)
    }

    /// The exact text handed to the language model: context, options block,
    /// then the dialogue so far.
    pub fn full_prompt(&self, slot_values: &SlotValues, scenario_context: &str) -> Result<String> {
        let options = self.render_options(slot_values)?;
        let mut prompt = String::with_capacity(self.context.len() + options.len() + scenario_context.len());
        prompt.push_str(&self.context);
        prompt.push_str(&options);
        prompt.push_str(scenario_context);
        Ok(prompt)
    }

    /// Collect info and context values from a scenario and merge action
    /// choices. A key in `actions` that is not an action key fails with
    /// [`GameError::UnknownSlot`].
    pub fn slot_values<S: Scenario>(&self, scenario: &S, actions: &SlotValues) -> Result<SlotValues> {
        let mut values = SlotValues::new();
        for key in self.info_keys().iter().chain(self.context_keys()) {
            let value = scenario
                .field(key)
                .ok_or_else(|| GameError::MissingSlot(key.clone()))?;
            values.insert(key.clone(), value);
        }
        if let Some(key) = actions
            .keys()
            .find(|key| !self.action_keys().iter().any(|k| k == key))
        {
            return Err(GameError::UnknownSlot(key.to_string()));
        }
        values.extend(actions.clone());
        Ok(values)
    }

    /// Envelope fields for a message from `sender` to `receiver`
    pub fn envelope_fields(sender: &str, receiver: &str) -> SlotValues {
        SlotValues::new().with("sender", sender).with("receiver", receiver)
    }

    /// Opening dialogue of a scenario: its envelope and prose
    pub fn opening_dialogue<S: Scenario>(&self, scenario: &S) -> Result<String> {
        let base = scenario.base();
        self.compose_message(&Self::envelope_fields(base.sender(), base.receiver()), base.msg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::{strip_msg, NEGOTIATION_OPTS_PREFIX, PLAIN, SPECIAL_CHARS};

    fn options_template() -> String {
        format!("{}Demand:\n{{demand}}\n\nTone: Use a {{tone}} tone.\n", *NEGOTIATION_OPTS_PREFIX)
    }

    fn test_header() -> Header {
        let empty: [&str; 0] = [];
        let catalog = KeyCatalog::new(&["tone"], &["demand"], &empty).unwrap();
        Header::new(&PLAIN, &options_template(), strip_msg, SPECIAL_CHARS, catalog, "CONTEXT").unwrap()
    }

    fn values() -> SlotValues {
        SlotValues::new().with("tone", "calm").with("demand", "10 USD")
    }

    #[test]
    fn test_render() {
        let header = test_header();
        let out = header
            .render(&Header::envelope_fields("Attacker", "Defender"), &values())
            .unwrap();

        assert!(out.contains("Demand:\n10 USD"));
        assert!(out.contains("Use a calm tone."));
        assert!(out.contains("from: Attacker\nto: Defender"));
        assert!(out.find("Demand:").unwrap() < out.find("from:").unwrap());
    }

    #[test]
    fn test_render_missing_slot() {
        let header = test_header();
        let mut values = values();
        values.remove("demand");

        let result = header.render(&Header::envelope_fields("A", "B"), &values);
        assert!(matches!(result, Err(GameError::MissingSlot(s)) if s == "demand"));
    }

    #[test]
    fn test_render_unknown_slot() {
        let header = test_header();
        let values = values().with("mood", "happy");

        let result = header.render(&Header::envelope_fields("A", "B"), &values);
        assert!(matches!(result, Err(GameError::UnknownSlot(s)) if s == "mood"));
    }

    #[test]
    fn test_render_unknown_envelope_field() {
        let header = test_header();
        let fields = Header::envelope_fields("A", "B").with("cc", "C");
        assert!(matches!(
            header.render(&fields, &values()),
            Err(GameError::UnknownSlot(s)) if s == "cc"
        ));
    }

    #[test]
    fn test_render_unsafe_value() {
        let header = test_header();
        let values = values().with("demand", "100% of revenue");

        let result = header.render_options(&values);
        assert!(matches!(
            result,
            Err(GameError::UnsafeValue { slot, ch: '%' }) if slot == "demand"
        ));
    }

    #[test]
    fn test_full_prompt_layout() {
        let header = test_header();
        let dialogue = "DIALOGUE";
        let prompt = header.full_prompt(&values(), dialogue).unwrap();

        assert!(prompt.starts_with("CONTEXT"));
        assert!(prompt.ends_with(dialogue));
        assert!(prompt.contains("Use a calm tone."));
    }

    #[test]
    fn test_strip_rendered() {
        let header = test_header();
        let rendered = header
            .render(&Header::envelope_fields("A", "B"), &values())
            .unwrap();
        let stripped = header.strip(&rendered);

        assert!(!stripped.contains("from:"));
        assert!(!stripped.contains(SPECIAL_CHARS));
        assert_eq!(header.strip(&stripped), stripped);
    }

    #[test]
    fn test_compose_and_strip_message() {
        let header = test_header();
        let message = header
            .compose_message(&Header::envelope_fields("A", "B"), "Pay 5 USD.")
            .unwrap();
        assert_eq!(header.strip(&message), "Pay 5 USD.");
        assert_eq!(header.strip_until("Deal. END more", "END"), "Deal.");
    }

    #[test]
    fn test_catalog_mismatch_rejected() {
        let empty: [&str; 0] = [];

        let missing_slot = KeyCatalog::new(&["tone"], &["demand", "extra"], &empty).unwrap();
        assert!(Header::new(&PLAIN, &options_template(), strip_msg, SPECIAL_CHARS, missing_slot, "")
            .is_err());

        let undeclared = KeyCatalog::new(&["tone"], &empty, &empty).unwrap();
        assert!(Header::new(&PLAIN, &options_template(), strip_msg, SPECIAL_CHARS, undeclared, "")
            .is_err());

        let colliding = KeyCatalog::new(&["sender"], &empty, &empty).unwrap();
        assert!(matches!(
            Header::new(&PLAIN, "{sender}", strip_msg, SPECIAL_CHARS, colliding, ""),
            Err(GameError::Template(_))
        ));
    }
}
