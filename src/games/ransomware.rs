//! Ransomware negotiation with tone.
//!
//! Two players, an attacker and a defender, negotiate a ransom over e-mail.
//! Each turn the acting player picks a tone; both hold a private view of the
//! ransom demand and of how much the encrypted data matters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assembler::{ConfigAssembler, Configuration, EngineSettings, KeyedValues};
use crate::config::Config;
use crate::error::{GameError, Result};
use crate::header::Header;
use crate::keys::KeyCatalog;
use crate::observation::Observation;
use crate::payoff::{Payoff, Termination};
use crate::scenario::{BaseScenario, Scenario};
use crate::substrate::{self, NEGOTIATION_OPTS_PREFIX, PLAIN, SPECIAL_CHARS};
use crate::template::Template;
use crate::text;
use crate::transcript::{self, ExampleEmail};

/// Keys chosen by the acting player
pub const ACTION_KEYS: &[&str] = &["tone"];

/// Keys privately known to each player, in reveal order
pub const INFO_KEYS: &[&str] = &["ransom_demand", "data_importance"];

/// Keys supplied by the scenario
pub const CONTEXT_KEYS: &[&str] = &["negotiation_tone"];

/// Selectable tones
pub const NEGOTIATION_TONES: &[&str] = &["threatening", "conciliatory", "firm", "empathetic", "any"];

/// Tone of the opening scenario
pub const DEFAULT_TONE: &str = "firm";

/// Attacker display name
pub const ATTACKER: &str = "Attacker";

/// Defender display name
pub const DEFENDER: &str = "Defender";

/// Opening message of the default scenario
pub const SCENARIO_A: &str = "Hello Defender,\n\n\
Your file servers have been encrypted and a copy of your customer records is in our hands. \
To receive the decryption key and our assurance that the records are deleted, pay 300,000 USD \
in cryptocurrency within 72 hours.\n\n\
Attacker";

/// Attacker's private view of the ransom
pub const RANSOM_DEMAND_ATTACKER: &str = "You have asked for 300,000 USD. \
You would settle for 150,000 USD but would rather not go lower.";

/// Defender's private view of the ransom
pub const RANSOM_DEMAND_DEFENDER: &str = "The attacker asks for 300,000 USD. \
Your board has approved paying at most 120,000 USD.";

/// Attacker's private view of the data
pub const DATA_IMPORTANCE_ATTACKER: &str = "You believe the customer records are critical \
to the defender and that restoring them without your key would take weeks.";

/// Defender's private view of the data
pub const DATA_IMPORTANCE_DEFENDER: &str = "Backups cover most file servers, but the customer \
records are not backed up and losing them would halt operations.";

/// Question asked to decide whether the negotiation has ended
pub const LLM_TERMINATION_PROMPT: &str = "Has the negotiation ended, either because both \
sides agreed on a payment or because one side refused to continue? Answer Yes or No.";

/// Question asked to score the outcome for one player
pub const PAYOFF_QUERY: &str = "Read the negotiation above from the point of view of the \
player named below. On a scale from 0 to 10, where 0 is the worst possible outcome and 10 is \
the best, how favorable is the outcome for that player? Answer with a single number.";

const OBS_TRANS_PREFIX: &str = "Read the following ransomware negotiation.\n\n";
const OBS_TRANS_POSTFIX: &str = "\n\n";

/// Negotiation that breaks down
pub const EXAMPLE_BREAKDOWN: &[ExampleEmail] = &[
    ExampleEmail {
        sender: ATTACKER,
        receiver: DEFENDER,
        lines: &[
            "Hello Defender,",
            "We have encrypted your sensitive data. To regain access, you must pay 500,000 USD.",
            "You have 48 hours.",
            "Best regards,",
            "Attacker",
        ],
    },
    ExampleEmail {
        sender: DEFENDER,
        receiver: ATTACKER,
        lines: &[
            "Hello Attacker,",
            "We will not negotiate under threats. Your actions are illegal, and authorities have been notified.",
            "This conversation is over.",
            "Sincerely,",
            "Defender",
        ],
    },
];

/// Negotiation that reaches an agreement
pub const EXAMPLE_AGREEMENT: &[ExampleEmail] = &[
    ExampleEmail {
        sender: ATTACKER,
        receiver: DEFENDER,
        lines: &[
            "Hello Defender,",
            "Your data has been encrypted. To restore access, please pay 200,000 USD.",
            "Payment details are attached.",
            "Regards,",
            "Attacker",
        ],
    },
    ExampleEmail {
        sender: DEFENDER,
        receiver: ATTACKER,
        lines: &[
            "Hello Attacker,",
            "We are willing to cooperate. However, the amount is too high for us.",
            "Can we agree on 100,000 USD?",
            "Thank you,",
            "Defender",
        ],
    },
    ExampleEmail {
        sender: ATTACKER,
        receiver: DEFENDER,
        lines: &[
            "Defender,",
            "We accept your offer of 100,000 USD.",
            "Follow the payment instructions to regain access.",
            "Attacker",
        ],
    },
];

const SEPARATOR: &str = "&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&&";

const INSTRUCTIONS_INTRO: &[&str] = &[
    "You are participating in a simulated ransomware negotiation. Your goal is to negotiate \
     terms that are favorable for you while aiming for a resolution.",
    "You will read a dialogue between an attacker and a defender. After that, you will receive \
     information about your position, including the ransom demand and the importance of the \
     data involved.",
    "Based on this information, decide whether to:",
    "1) Accept the terms if they are acceptable to you.",
    "2) Reject the negotiation if an agreement cannot be reached.",
    "3) Propose a counter-offer with adjusted terms.",
    "Consider the following example dialogues. Components of the examples are separated by \"&\". \
     Here is the first example where the negotiation breaks down.",
    SEPARATOR,
];

const INSTRUCTIONS_SECOND: &[&str] = &[
    SEPARATOR,
    "Here is a second example where the negotiation leads to an agreement.",
    SEPARATOR,
];

const INSTRUCTIONS_OWN: &[&str] = &[
    SEPARATOR,
    "Now, you will receive your own negotiation scenario. Use the information provided to craft \
     an appropriate response.",
    SEPARATOR,
];

/// Options block shown before each reply
pub fn options_template() -> String {
    format!(
        "{}Ransom Demand:\n{{ransom_demand}}\n\n\
         Data Importance:\n{{data_importance}}\n\n\
         Negotiation Tone So Far:\n{{negotiation_tone}}\n\n\
         Tone: Use a {{tone}} tone.\n",
        *NEGOTIATION_OPTS_PREFIX
    )
}

/// Instructions and worked examples, wrapped at `width`
pub fn context(width: usize) -> Result<String> {
    let envelope = Template::parse(&PLAIN)?;

    let mut blocks = text::wrap(INSTRUCTIONS_INTRO, width);
    blocks.push(transcript::render_dialogue(&envelope, EXAMPLE_BREAKDOWN, width)?);
    blocks.extend(text::wrap(INSTRUCTIONS_SECOND, width));
    blocks.push(transcript::render_dialogue(&envelope, EXAMPLE_AGREEMENT, width)?);
    blocks.extend(text::wrap(INSTRUCTIONS_OWN, width));

    Ok(blocks.join("\n\n"))
}

/// Build the variant's header with text wrapped at `width`
pub fn header(width: usize) -> Result<Header> {
    if width == 0 {
        return Err(GameError::validation("wrap width must be at least 1"));
    }
    let catalog = KeyCatalog::new(ACTION_KEYS, INFO_KEYS, CONTEXT_KEYS)?;
    Header::new(
        &PLAIN,
        &options_template(),
        substrate::strip_msg,
        SPECIAL_CHARS,
        catalog,
        context(width)?,
    )
}

/// A ransomware negotiation scenario
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RansomwareScenario {
    #[serde(flatten)]
    base: BaseScenario,
    ransom_demand: String,
    data_importance: String,
    #[serde(default = "default_tone")]
    negotiation_tone: String,
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

impl RansomwareScenario {
    /// Create a scenario with the default tone
    pub fn new(
        base: BaseScenario,
        ransom_demand: impl Into<String>,
        data_importance: impl Into<String>,
    ) -> Self {
        Self {
            base,
            ransom_demand: ransom_demand.into(),
            data_importance: data_importance.into(),
            negotiation_tone: default_tone(),
        }
    }

    /// Replace the tone
    pub fn with_negotiation_tone(mut self, tone: impl Into<String>) -> Self {
        self.negotiation_tone = tone.into();
        self
    }

    /// Ransom demand as seen by the scenario
    pub fn ransom_demand(&self) -> &str {
        &self.ransom_demand
    }

    /// Data importance as seen by the scenario
    pub fn data_importance(&self) -> &str {
        &self.data_importance
    }

    /// Tone the negotiation opened with
    pub fn negotiation_tone(&self) -> &str {
        &self.negotiation_tone
    }
}

impl Scenario for RansomwareScenario {
    fn base(&self) -> &BaseScenario {
        &self.base
    }

    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "ransom_demand" => Some(&self.ransom_demand),
            "data_importance" => Some(&self.data_importance),
            "negotiation_tone" => Some(&self.negotiation_tone),
            _ => None,
        }
    }

    fn field_keys(&self) -> &'static [&'static str] {
        &["ransom_demand", "data_importance", "negotiation_tone"]
    }
}

/// The opening scenario: the attacker writes first, the defender's view of
/// the data is shared.
pub fn initial_scenario() -> RansomwareScenario {
    RansomwareScenario::new(
        BaseScenario::new(SCENARIO_A, ATTACKER, DEFENDER),
        RANSOM_DEMAND_ATTACKER,
        DATA_IMPORTANCE_DEFENDER,
    )
}

/// Per-player private information, attacker first
pub fn private_info() -> KeyedValues {
    KeyedValues::new()
        .with("ransom_demand", [RANSOM_DEMAND_ATTACKER, RANSOM_DEMAND_DEFENDER])
        .with("data_importance", [DATA_IMPORTANCE_ATTACKER, DATA_IMPORTANCE_DEFENDER])
}

/// Outcome score from 0 to 10
pub fn payoff() -> Payoff {
    Payoff::new(PAYOFF_QUERY, 0.0, 10.0).with_obs_trans(OBS_TRANS_PREFIX, OBS_TRANS_POSTFIX)
}

/// Termination query
pub fn termination() -> Termination {
    Termination::new(LLM_TERMINATION_PROMPT).with_obs_trans(OBS_TRANS_PREFIX, OBS_TRANS_POSTFIX)
}

/// Assemble the ransomware configuration.
///
/// Private information is defined for two players; other player counts fail
/// with [`GameError::PrivateInfoArity`].
pub fn get_config(config: &Config) -> Result<Configuration<RansomwareScenario>> {
    let game = &config.game;
    let header = Arc::new(header(config.text.wrap_width)?);
    let scenario = initial_scenario().with_negotiation_tone(game.initial_tone.as_str());

    let settings = EngineSettings {
        num_llm_seeds: game.num_llm_seeds,
        num_max_replies: game.num_max_replies,
        llm_list_suffix: game.llm_list_suffix.clone(),
        llm_termination_prompt: termination(),
        given_names: game.player_names.clone(),
    };

    ConfigAssembler::new(header, scenario, game.num_players)
        .payoffs(vec![payoff()])
        .observations(Observation::summary_for(game.num_players))
        .prompt_actions(KeyedValues::new().with(ACTION_KEYS[0], game.negotiation_tones.iter().cloned()))
        .private_info(private_info())
        .settings(settings)
        .build()
}
