//! Property tests for header rendering and stripping.
//!
//! Values are drawn from text that never contains the reserved `%` and `#`
//! characters, so every rendered prompt must strip back to its body.

use chatgame::games::ransomware;
use chatgame::{GameError, Header, SlotValues};
use proptest::prelude::*;

fn header() -> Header {
    ransomware::header(chatgame::text::DEFAULT_WIDTH).unwrap()
}

fn slot_values(demand: &str, importance: &str, context_tone: &str, tone: &str) -> SlotValues {
    SlotValues::new()
        .with("ransom_demand", demand)
        .with("data_importance", importance)
        .with("negotiation_tone", context_tone)
        .with("tone", tone)
}

fn safe_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.]{1,40}"
}

fn safe_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}"
}

proptest! {
    /// Rendering the same inputs twice is byte-identical
    #[test]
    fn render_is_deterministic(
        demand in safe_text(),
        importance in safe_text(),
        tone in "[a-z]{3,12}",
        sender in safe_name(),
        receiver in safe_name(),
    ) {
        let header = header();
        let fields = Header::envelope_fields(&sender, &receiver);
        let values = slot_values(&demand, &importance, "firm", &tone);

        let first = header.render(&fields, &values).unwrap();
        let second = header.render(&fields, &values).unwrap();
        prop_assert_eq!(first, second);
    }

    /// A rendered options block and envelope strip to nothing
    #[test]
    fn strip_removes_boilerplate(
        demand in safe_text(),
        importance in safe_text(),
        sender in safe_name(),
        receiver in safe_name(),
    ) {
        let header = header();
        let rendered = header
            .render(
                &Header::envelope_fields(&sender, &receiver),
                &slot_values(&demand, &importance, "firm", "any"),
            )
            .unwrap();

        let stripped = header.strip(&rendered);
        prop_assert!(!stripped.contains('#'));
        prop_assert!(!stripped.contains('%'));
        prop_assert!(!stripped.contains("Negotiation:"));
    }

    /// Stripping is idempotent on arbitrary text
    #[test]
    fn strip_is_idempotent(raw in ".{0,200}") {
        let header = header();
        let once = header.strip(&raw);
        prop_assert_eq!(header.strip(&once), once);
    }

    /// A composed message strips back to its trimmed body
    #[test]
    fn compose_then_strip(body in safe_text(), sender in safe_name(), receiver in safe_name()) {
        let header = header();
        let message = header
            .compose_message(&Header::envelope_fields(&sender, &receiver), &body)
            .unwrap();
        prop_assert_eq!(header.strip(&message), body.trim());
    }

    /// Each substituted value appears in the options block once per slot
    #[test]
    fn values_appear_per_slot(
        demand in "[A-Z]{12}",
        importance in "[a-z]{12}",
        context_tone in "n[0-9]{10}",
        tone in "t[0-9]{10}",
    ) {
        let header = header();
        let options = header
            .render_options(&slot_values(&demand, &importance, &context_tone, &tone))
            .unwrap();

        for value in [&demand, &importance, &context_tone, &tone] {
            prop_assert_eq!(options.matches(value.as_str()).count(), 1);
        }
    }

    /// Values containing a reserved character are rejected
    #[test]
    fn unsafe_values_rejected(prefix in safe_text(), ch in prop_oneof![Just('%'), Just('#')]) {
        let header = header();
        let demand = format!("{prefix}{ch}");
        let result = header.render_options(&slot_values(&demand, "low", "firm", "any"));

        let rejected = matches!(result, Err(GameError::UnsafeValue { .. }));
        prop_assert!(rejected);
    }
}

/// A declared key without a value is reported by name
#[test]
fn missing_slot_reported() {
    let header = header();
    let mut values = slot_values("1 USD", "low", "firm", "any");
    values.remove("data_importance");

    match header.render_options(&values) {
        Err(GameError::MissingSlot(key)) => assert_eq!(key, "data_importance"),
        other => panic!("expected MissingSlot, got {other:?}"),
    }
}

/// A value for an undeclared key is reported by name
#[test]
fn unknown_slot_reported() {
    let header = header();
    let values = slot_values("1 USD", "low", "firm", "any").with("volume", "loud");

    match header.render_options(&values) {
        Err(GameError::UnknownSlot(key)) => assert_eq!(key, "volume"),
        other => panic!("expected UnknownSlot, got {other:?}"),
    }
}
