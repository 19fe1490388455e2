//! Negotiation message substrate.
//!
//! Defines the plain-text framing shared by every negotiation variant:
//!
//! ```text
//!
//! ############################
//! Negotiation:
//! from: {sender}
//! to: {receiver}
//! ############################
//!
//! <message body>
//! ```
//!
//! Options blocks (private information and per-turn instructions) are opened
//! by a line of `%` characters. Neither special character may appear in
//! substituted values, which is what lets [`strip_msg`] cut replies at the
//! first marker it finds.

use lazy_static::lazy_static;
use regex::Regex;

/// Marks the start of an options block
pub const CHAR_OPT: char = '%';

/// Marks message envelope boundaries
pub const CHAR_MSG: char = '#';

/// Length of a marker line
pub const BLOCK_LEN: usize = 28;

/// Characters reserved by the message format
pub const SPECIAL_CHARS: &[char] = &[CHAR_OPT, CHAR_MSG];

lazy_static! {
    /// Options block marker line
    pub static ref BLOCK_OPT: String = CHAR_OPT.to_string().repeat(BLOCK_LEN);

    /// Message envelope marker line
    pub static ref BLOCK_MSG: String = CHAR_MSG.to_string().repeat(BLOCK_LEN);

    /// Message envelope template with `sender` and `receiver` slots
    pub static ref PLAIN: String = format!(
        "\n\n{block}\nNegotiation:\nfrom: {{sender}}\nto: {{receiver}}\n{block}\n\n",
        block = *BLOCK_MSG
    );

    /// Prefix opening every options block
    pub static ref NEGOTIATION_OPTS_PREFIX: String = format!("\n\n{}\n\n", *BLOCK_OPT);

    /// Matches one complete rendered envelope
    static ref ENVELOPE_REGEX: Option<Regex> = Regex::new(&format!(
        r"{block}\nNegotiation:\nfrom: [^\n]*\nto: [^\n]*\n{block}",
        block = regex::escape(&BLOCK_MSG)
    ))
    .ok();
}

/// Signature of a message-stripping rule: `(raw_text, terminal_str) -> content`
pub type StripFn = fn(&str, &str) -> String;

/// Reduce a rendered or replied message to its content.
///
/// Keeps the body of the last complete envelope (or the whole text when there
/// is none), cuts at the first envelope or options marker that follows, cuts
/// at `terminal_str` when it is non-empty, and trims surrounding whitespace.
/// The result contains no marker, so applying it twice changes nothing.
///
/// # Example
///
/// ```
/// use chatgame::substrate::{strip_msg, PLAIN};
///
/// let header = PLAIN.replace("{sender}", "Attacker").replace("{receiver}", "Defender");
/// let reply = format!("{header}Pay 200,000 USD.{header}Hello again");
///
/// assert_eq!(strip_msg("Pay 200,000 USD.\n", ""), "Pay 200,000 USD.");
/// assert_eq!(strip_msg(&reply, ""), "Hello again");
/// ```
pub fn strip_msg(text: &str, terminal_str: &str) -> String {
    let last_envelope = ENVELOPE_REGEX
        .as_ref()
        .and_then(|re| re.find_iter(text).last());
    let body = match last_envelope {
        Some(envelope) => &text[envelope.end()..],
        None => text,
    };

    let mut end = body.len();
    for marker in [BLOCK_MSG.as_str(), BLOCK_OPT.as_str(), terminal_str] {
        if marker.is_empty() {
            continue;
        }
        if let Some(pos) = body[..end].find(marker) {
            end = pos;
        }
    }

    body[..end].trim().to_string()
}

/// First reserved character found in `value`, if any
pub fn find_special(value: &str, special_chars: &[char]) -> Option<char> {
    value.chars().find(|c| special_chars.contains(c))
}
