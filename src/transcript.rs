//! Example transcripts.
//!
//! Worked examples shown to the model are constant data: each e-mail is a
//! sender, a receiver and a list of raw lines. They are rendered once, through
//! the variant's envelope template, when its header is built.

use crate::error::Result;
use crate::template::{SlotValues, Template};
use crate::text;

/// One e-mail of an example dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleEmail {
    /// Sender display name
    pub sender: &'static str,
    /// Receiver display name
    pub receiver: &'static str,
    /// Raw body lines, wrapped on render
    pub lines: &'static [&'static str],
}

/// Render one e-mail: envelope followed by wrapped lines separated by blank lines
pub fn render_email(envelope: &Template, email: &ExampleEmail, width: usize) -> Result<String> {
    let fields = SlotValues::new()
        .with("sender", email.sender)
        .with("receiver", email.receiver);
    let mut out = envelope.render(&fields)?;
    out.push_str(&text::wrap(email.lines, width).join("\n\n"));
    Ok(out)
}

/// Render a dialogue and trim the newlines around it
pub fn render_dialogue(envelope: &Template, emails: &[ExampleEmail], width: usize) -> Result<String> {
    let mut out = String::new();
    for email in emails {
        out.push_str(&render_email(envelope, email, width)?);
    }
    Ok(out.trim_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::{BLOCK_MSG, PLAIN};

    const EMAILS: &[ExampleEmail] = &[
        ExampleEmail {
            sender: "Attacker",
            receiver: "Defender",
            lines: &["Hello Defender,", "Pay up.", "Attacker"],
        },
        ExampleEmail {
            sender: "Defender",
            receiver: "Attacker",
            lines: &["No.", "Defender"],
        },
    ];

    #[test]
    fn test_render_email() {
        let envelope = Template::parse(&PLAIN).unwrap();
        let email = render_email(&envelope, &EMAILS[0], text::DEFAULT_WIDTH).unwrap();

        assert!(email.contains("from: Attacker\nto: Defender\n"));
        assert!(email.ends_with("Hello Defender,\n\nPay up.\n\nAttacker"));
    }

    #[test]
    fn test_render_dialogue_trimmed() {
        let envelope = Template::parse(&PLAIN).unwrap();
        let dialogue = render_dialogue(&envelope, EMAILS, text::DEFAULT_WIDTH).unwrap();

        assert!(dialogue.starts_with(BLOCK_MSG.as_str()));
        assert!(dialogue.ends_with("Defender"));
        assert_eq!(dialogue.matches("Negotiation:").count(), 2);
    }
}
