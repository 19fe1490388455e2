//! Configuration assembly.
//!
//! Combines a header, a scenario, payoffs, observations, per-player action
//! choices and private information into one validated [`Configuration`]
//! consumed by the game engine.
//!
//! # Validation
//!
//! | Rule                                                | Error               |
//! |-----------------------------------------------------|---------------------|
//! | at least one payoff                                 | `EmptyPayoffSet`    |
//! | at least one player                                 | `ConfigValidation`  |
//! | one observation per player                          | `ConfigValidation`  |
//! | action keys match the header's, values distinct     | `ConfigValidation`  |
//! | one private value per player for every info key     | `PrivateInfoArity`  |
//! | private keys are header info keys                   | `ConfigValidation`  |
//! | scenario supplies every info and context key        | `ConfigValidation`  |
//! | every literal is free of special characters         | `ConfigValidation`  |
//! | one display name per player                         | `ConfigValidation`  |
//! | action count fits in `usize`                        | `ConfigValidation`  |
//!
//! Per-turn action choices are checked again in [`Configuration::slot_values`]:
//! a key that is not an action key fails with `UnknownSlot`, and a value
//! outside `given_prompt_actions` fails with `ConfigValidation`.
//!
//! # Action count
//!
//! `num_distinct_actions` is the number of players times the product of the
//! cardinalities of every action key. Only the single-key case has been
//! exercised against the engine; more keys are accepted with a warning.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{GameError, Result};
use crate::header::Header;
use crate::observation::Observation;
use crate::payoff::{utility_range, Payoff, Termination};
use crate::scenario::Scenario;
use crate::template::SlotValues;

/// Ordered mapping from substitution key to candidate values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedValues {
    entries: Vec<(String, Vec<String>)>,
}

impl KeyedValues {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values for a key, returning the mapping (builder style)
    pub fn with<S: Into<String>>(mut self, key: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        self.insert(key, values);
        self
    }

    /// Insert or replace the values of a key, keeping its position
    pub fn insert<S: Into<String>>(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = S>) {
        let key = key.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Values of a key
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// (key, values) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for KeyedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Engine settings that are not derived from the inputs
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Number of sampling seeds the engine draws per prompt
    pub num_llm_seeds: usize,
    /// Maximum replies per player
    pub num_max_replies: usize,
    /// Suffix appended when the engine asks for a list of candidate replies
    pub llm_list_suffix: String,
    /// Query deciding whether the dialogue has ended
    pub llm_termination_prompt: Termination,
    /// Player display names (defaults to the scenario's participants)
    pub given_names: Option<Vec<String>>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            num_llm_seeds: 2,
            num_max_replies: 1,
            llm_list_suffix: "Response: ".to_string(),
            llm_termination_prompt: Termination::default(),
            given_names: None,
        }
    }
}

/// Numeric game parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameParams {
    /// Number of distinct engine actions
    pub num_distinct_actions: usize,
    /// Number of sampling seeds per prompt
    pub num_llm_seeds: usize,
    /// Number of players
    pub num_players: usize,
    /// Lowest utility across payoffs
    pub min_utility: f64,
    /// Highest utility across payoffs
    pub max_utility: f64,
    /// Maximum replies per player
    pub num_max_replies: usize,
}

/// Game content handed to the engine
#[derive(Debug, Clone, Serialize)]
pub struct GameSpec<S> {
    /// One observation per player
    pub observations: Vec<Observation>,
    /// Shared header
    pub header: Arc<Header>,
    /// Payoffs
    pub payoffs: Vec<Payoff>,
    /// Selectable values per action key
    pub given_prompt_actions: KeyedValues,
    /// Number of private values per info key
    pub num_private_info: Vec<usize>,
    /// Player display names
    pub given_names: Vec<String>,
    /// Private values per info key, indexed by player
    pub given_private_info: KeyedValues,
    /// Scenario of the first episode
    pub initial_scenario: S,
    /// Suffix for list-of-replies prompts
    pub llm_list_suffix: String,
    /// Termination query
    pub llm_termination_prompt: Termination,
}

impl<S> GameSpec<S> {
    /// Private slot values of one player
    pub fn private_info_for(&self, player: usize) -> Option<SlotValues> {
        self.given_private_info
            .iter()
            .map(|(key, values)| values.get(player).map(|v| (key, v.as_str())))
            .collect()
    }
}

/// The assembled, read-only game configuration
#[derive(Debug, Clone, Serialize)]
pub struct Configuration<S> {
    /// Numeric parameters
    pub params: GameParams,
    /// Game content
    pub game: GameSpec<S>,
}

impl<S: Scenario> Configuration<S> {
    /// Slot values for a player: scenario context, the player's private
    /// information, then the chosen actions.
    pub fn slot_values(&self, player: usize, actions: &SlotValues) -> Result<SlotValues> {
        let out_of_range = || {
            GameError::validation(format!(
                "player {player} out of range for {} players",
                self.params.num_players
            ))
        };
        if player >= self.params.num_players {
            return Err(out_of_range());
        }
        let private = self.game.private_info_for(player).ok_or_else(out_of_range)?;
        let mut values = self
            .game
            .header
            .slot_values(&self.game.initial_scenario, actions)?;
        for (key, value) in actions.iter() {
            let allowed = self.game.given_prompt_actions.get(key).unwrap_or_default();
            if !allowed.iter().any(|v| v == value) {
                return Err(GameError::validation(format!(
                    "{value:?} is not a selectable value for action key {key}"
                )));
            }
        }
        values.extend(private);
        Ok(values)
    }

    /// Serialize the configuration as JSON
    pub fn to_json(&self, pretty: bool) -> Result<String>
    where
        S: Serialize,
    {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Prompt for a player about to answer the opening message
    pub fn prompt_for(&self, player: usize, actions: &SlotValues) -> Result<String> {
        let header = &self.game.header;
        let values = self.slot_values(player, actions)?;
        let names = &self.game.given_names;
        let receiver = &names[(player + 1) % names.len()];

        let mut dialogue = header.opening_dialogue(&self.game.initial_scenario)?;
        dialogue.push_str(&header.envelope(&Header::envelope_fields(&names[player], receiver))?);

        header.full_prompt(&values, &dialogue)
    }
}

/// Builder for [`Configuration`]
pub struct ConfigAssembler<S> {
    header: Arc<Header>,
    scenario: S,
    num_players: usize,
    payoffs: Vec<Payoff>,
    observations: Vec<Observation>,
    prompt_actions: KeyedValues,
    private_info: KeyedValues,
    settings: EngineSettings,
}

impl<S: Scenario> ConfigAssembler<S> {
    /// Start assembling a configuration
    pub fn new(header: Arc<Header>, scenario: S, num_players: usize) -> Self {
        Self {
            header,
            scenario,
            num_players,
            payoffs: Vec::new(),
            observations: Vec::new(),
            prompt_actions: KeyedValues::new(),
            private_info: KeyedValues::new(),
            settings: EngineSettings::default(),
        }
    }

    /// Set the payoffs
    pub fn payoffs(mut self, payoffs: Vec<Payoff>) -> Self {
        self.payoffs = payoffs;
        self
    }

    /// Set the per-player observations
    pub fn observations(mut self, observations: Vec<Observation>) -> Self {
        self.observations = observations;
        self
    }

    /// Set the selectable values per action key
    pub fn prompt_actions(mut self, prompt_actions: KeyedValues) -> Self {
        self.prompt_actions = prompt_actions;
        self
    }

    /// Set the private values per info key
    pub fn private_info(mut self, private_info: KeyedValues) -> Self {
        self.private_info = private_info;
        self
    }

    /// Set the engine settings
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Validate everything and build the configuration
    pub fn build(self) -> Result<Configuration<S>> {
        let (min_utility, max_utility) =
            utility_range(&self.payoffs).ok_or(GameError::EmptyPayoffSet)?;

        if self.num_players == 0 {
            return Err(GameError::validation("num_players must be at least 1"));
        }
        if self.observations.len() != self.num_players {
            return Err(GameError::validation(format!(
                "expected {} observations (one per player), found {}",
                self.num_players,
                self.observations.len()
            )));
        }

        self.validate_prompt_actions()?;
        let num_distinct_actions = distinct_action_count(
            self.num_players,
            self.header
                .action_keys()
                .iter()
                .map(|key| self.prompt_actions.get(key).map_or(0, <[String]>::len)),
        )?;
        self.validate_private_info()?;
        self.validate_scenario()?;
        let given_names = self.resolve_names()?;

        if self.header.action_keys().len() > 1 {
            tracing::warn!(
                "{} action keys: num_distinct_actions uses the product of their cardinalities",
                self.header.action_keys().len()
            );
        }

        let num_private_info = self
            .header
            .info_keys()
            .iter()
            .map(|key| self.private_info.get(key).map_or(0, <[String]>::len))
            .collect();

        let params = GameParams {
            num_distinct_actions,
            num_llm_seeds: self.settings.num_llm_seeds,
            num_players: self.num_players,
            min_utility,
            max_utility,
            num_max_replies: self.settings.num_max_replies,
        };

        tracing::debug!(
            "Assembled configuration: {} players, {} distinct actions, utility [{}, {}]",
            params.num_players,
            params.num_distinct_actions,
            params.min_utility,
            params.max_utility
        );

        Ok(Configuration {
            params,
            game: GameSpec {
                observations: self.observations,
                header: self.header,
                payoffs: self.payoffs,
                given_prompt_actions: self.prompt_actions,
                num_private_info,
                given_names,
                given_private_info: self.private_info,
                initial_scenario: self.scenario,
                llm_list_suffix: self.settings.llm_list_suffix,
                llm_termination_prompt: self.settings.llm_termination_prompt,
            },
        })
    }

    fn check_literal(&self, what: &str, value: &str) -> Result<()> {
        self.header.check_value(what, value).map_err(|_| {
            GameError::validation(format!(
                "{what} value {value:?} contains a reserved character"
            ))
        })
    }

    fn validate_prompt_actions(&self) -> Result<()> {
        if let Some(key) = self
            .prompt_actions
            .keys()
            .find(|key| !self.header.action_keys().iter().any(|k| k == key))
        {
            return Err(GameError::validation(format!(
                "prompt action key {key} is not a header action key"
            )));
        }

        for key in self.header.action_keys() {
            let values = self.prompt_actions.get(key).unwrap_or_default();
            if values.is_empty() {
                return Err(GameError::validation(format!(
                    "action key {key} has no selectable values"
                )));
            }
            for (i, value) in values.iter().enumerate() {
                self.check_literal(key, value)?;
                if values[..i].contains(value) {
                    return Err(GameError::validation(format!(
                        "action key {key} lists {value:?} twice"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_private_info(&self) -> Result<()> {
        if let Some(key) = self
            .private_info
            .keys()
            .find(|key| !self.header.info_keys().iter().any(|k| k == key))
        {
            return Err(GameError::validation(format!(
                "private info key {key} is not a header info key"
            )));
        }

        for key in self.header.info_keys() {
            let values = self.private_info.get(key).unwrap_or_default();
            if values.len() != self.num_players {
                return Err(GameError::PrivateInfoArity {
                    key: key.clone(),
                    expected: self.num_players,
                    found: values.len(),
                });
            }
            for value in values {
                self.check_literal(key, value)?;
            }
        }
        Ok(())
    }

    fn validate_scenario(&self) -> Result<()> {
        for key in self.header.info_keys().iter().chain(self.header.context_keys()) {
            let value = self.scenario.field(key).ok_or_else(|| {
                GameError::validation(format!("scenario does not supply {key}"))
            })?;
            self.check_literal(key, value)?;
        }

        let base = self.scenario.base();
        self.check_literal("scenario sender", base.sender())?;
        self.check_literal("scenario receiver", base.receiver())?;
        self.check_literal("scenario message", base.msg())
    }

    fn resolve_names(&self) -> Result<Vec<String>> {
        let names = match &self.settings.given_names {
            Some(names) => names.clone(),
            None if self.num_players <= 2 => {
                let base = self.scenario.base();
                [base.sender(), base.receiver()]
                    .iter()
                    .take(self.num_players)
                    .map(|name| name.to_string())
                    .collect()
            }
            None => {
                return Err(GameError::validation(format!(
                    "given names are required for {} players",
                    self.num_players
                )))
            }
        };

        if names.len() != self.num_players {
            return Err(GameError::validation(format!(
                "expected {} player names, found {}",
                self.num_players,
                names.len()
            )));
        }
        for name in &names {
            self.check_literal("player name", name)?;
        }
        Ok(names)
    }
}

/// Players times the product of the action-key cardinalities,
/// `ConfigValidation` when it does not fit in `usize`
pub fn distinct_action_count(
    num_players: usize,
    cardinalities: impl IntoIterator<Item = usize>,
) -> Result<usize> {
    cardinalities
        .into_iter()
        .try_fold(num_players, usize::checked_mul)
        .ok_or_else(|| GameError::validation("number of distinct actions overflows usize"))
}

/// Assemble a configuration with default engine settings.
///
/// # Example
///
/// ```
/// use chatgame::assembler::{build_config, KeyedValues};
/// use chatgame::games::ransomware;
/// use chatgame::observation::Observation;
/// use chatgame::text::DEFAULT_WIDTH;
///
/// let header = std::sync::Arc::new(ransomware::header(DEFAULT_WIDTH).unwrap());
/// let config = build_config(
///     header,
///     ransomware::initial_scenario(),
///     vec![ransomware::payoff()],
///     Observation::summary_for(2),
///     KeyedValues::new().with("tone", ransomware::NEGOTIATION_TONES.iter().copied()),
///     ransomware::private_info(),
///     2,
/// )
/// .unwrap();
///
/// assert_eq!(config.params.num_distinct_actions, 10);
/// ```
pub fn build_config<S: Scenario>(
    header: Arc<Header>,
    scenario: S,
    payoffs: Vec<Payoff>,
    observations: Vec<Observation>,
    prompt_actions: KeyedValues,
    private_info: KeyedValues,
    num_players: usize,
) -> Result<Configuration<S>> {
    ConfigAssembler::new(header, scenario, num_players)
        .payoffs(payoffs)
        .observations(observations)
        .prompt_actions(prompt_actions)
        .private_info(private_info)
        .build()
}
