//! Line wrapping for prompt text.
//!
//! Each input line becomes one block: the line is wrapped at a fixed column
//! width and the wrapped rows are joined with `\n`. Callers join blocks with
//! blank lines to form paragraphs.

use serde_json::Value;

use crate::error::{GameError, Result};

/// Default wrap width in columns
pub const DEFAULT_WIDTH: usize = 70;

/// Wrap each line into a newline-joined block.
///
/// # Example
///
/// ```
/// use chatgame::text::wrap;
///
/// let blocks = wrap(&["Hello Defender,", "You have 48 hours."], 70);
/// assert_eq!(blocks, vec!["Hello Defender,", "You have 48 hours."]);
/// ```
pub fn wrap<S: AsRef<str>>(lines: &[S], width: usize) -> Vec<String> {
    lines
        .iter()
        .map(|line| textwrap::fill(line.as_ref(), width.max(1)))
        .collect()
}

/// Wrap loosely typed lines, rejecting anything that is not a string.
pub fn wrap_values(values: &[Value], width: usize) -> Result<Vec<String>> {
    let lines = values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(s) => Ok(s.as_str()),
            other => Err(GameError::InvalidInputKind {
                index,
                found: value_kind(other).to_string(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(wrap(&lines, width))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_lines_unchanged() {
        let blocks = wrap(&["Regards,", "Attacker"], DEFAULT_WIDTH);
        assert_eq!(blocks, vec!["Regards,", "Attacker"]);
    }

    #[test]
    fn test_long_line_wrapped() {
        let line = "We have encrypted your sensitive data. To regain access, you must pay 500,000 USD.";
        let blocks = wrap(&[line], DEFAULT_WIDTH);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains('\n'));
        assert!(blocks[0].lines().all(|row| row.chars().count() <= DEFAULT_WIDTH));
        assert_eq!(blocks[0].replace('\n', " "), line);
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        assert!(wrap(&lines, DEFAULT_WIDTH).is_empty());
    }

    #[test]
    fn test_wrap_values_strings() {
        let values = vec![json!("Hello Attacker,"), json!("Defender")];
        let blocks = wrap_values(&values, DEFAULT_WIDTH).unwrap();
        assert_eq!(blocks, vec!["Hello Attacker,", "Defender"]);
    }

    #[test]
    fn test_wrap_values_rejects_non_string() {
        let values = vec![json!("ok"), json!(42)];
        let err = wrap_values(&values, DEFAULT_WIDTH).unwrap_err();

        match err {
            GameError::InvalidInputKind { index, found } => {
                assert_eq!(index, 1);
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
