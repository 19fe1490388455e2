//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for the `chatgame` binary)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::text::DEFAULT_WIDTH;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Game configuration
    #[serde(default)]
    pub game: GameSettings,

    /// Text layout configuration
    #[serde(default)]
    pub text: TextSettings,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Game settings
        if let Some(val) = env_parse("CHATGAME_NUM_PLAYERS") {
            config.game.num_players = val;
        }
        if let Some(val) = env_parse("CHATGAME_NUM_LLM_SEEDS") {
            config.game.num_llm_seeds = val;
        }
        if let Some(val) = env_parse("CHATGAME_NUM_MAX_REPLIES") {
            config.game.num_max_replies = val;
        }

        // Text settings
        if let Some(val) = env_parse("CHATGAME_WRAP_WIDTH") {
            config.text.wrap_width = val;
        }

        config
    }

    /// Merge with another config (other takes precedence where it differs
    /// from the defaults).
    ///
    /// A field of `other` that equals its default is indistinguishable from
    /// an unset one, so it cannot reset a non-default value in `self`.
    /// `player_names` is the exception: any `Some` in `other` wins.
    pub fn merge(self, other: Self) -> Self {
        let defaults = Self::default();
        Self {
            game: GameSettings {
                num_players: pick(self.game.num_players, other.game.num_players, defaults.game.num_players),
                negotiation_tones: pick(
                    self.game.negotiation_tones,
                    other.game.negotiation_tones,
                    defaults.game.negotiation_tones,
                ),
                num_llm_seeds: pick(self.game.num_llm_seeds, other.game.num_llm_seeds, defaults.game.num_llm_seeds),
                num_max_replies: pick(
                    self.game.num_max_replies,
                    other.game.num_max_replies,
                    defaults.game.num_max_replies,
                ),
                llm_list_suffix: pick(
                    self.game.llm_list_suffix,
                    other.game.llm_list_suffix,
                    defaults.game.llm_list_suffix,
                ),
                initial_tone: pick(self.game.initial_tone, other.game.initial_tone, defaults.game.initial_tone),
                player_names: other.game.player_names.or(self.game.player_names),
            },
            text: TextSettings {
                wrap_width: pick(self.text.wrap_width, other.text.wrap_width, defaults.text.wrap_width),
            },
        }
    }

    /// Default config file location (`~/.config/chatgame/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("chatgame").join("config.toml"))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

fn pick<T: PartialEq>(base: T, other: T, default: T) -> T {
    if other != default {
        other
    } else {
        base
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Number of players
    pub num_players: usize,

    /// Selectable negotiation tones
    pub negotiation_tones: Vec<String>,

    /// Sampling seeds per prompt
    pub num_llm_seeds: usize,

    /// Maximum replies per player
    pub num_max_replies: usize,

    /// Suffix for list-of-replies prompts
    pub llm_list_suffix: String,

    /// Tone of the opening scenario
    pub initial_tone: String,

    /// Player display names (required beyond two players)
    pub player_names: Option<Vec<String>>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            num_players: 2,
            negotiation_tones: ["threatening", "conciliatory", "firm", "empathetic", "any"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            num_llm_seeds: 2,
            num_max_replies: 1,
            llm_list_suffix: "Response: ".to_string(),
            initial_tone: "firm".to_string(),
            player_names: None,
        }
    }
}

/// Text layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Column at which instructions and example e-mails are wrapped
    pub wrap_width: usize,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::error::GameError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.game.num_players, 2);
        assert_eq!(config.game.negotiation_tones.len(), 5);
        assert_eq!(config.game.initial_tone, "firm");
        assert_eq!(config.text.wrap_width, 70);
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [game]
            num_llm_seeds = 4
            negotiation_tones = ["firm", "any"]

            [text]
            wrap_width = 60
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.game.num_llm_seeds, 4);
        assert_eq!(config.game.negotiation_tones, vec!["firm", "any"]);
        assert_eq!(config.game.num_players, 2);
        assert_eq!(config.text.wrap_width, 60);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nnum_max_replies = 3").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.game.num_max_replies, 3);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = Config::from_file("/nonexistent/chatgame.toml");
        assert!(matches!(result, Err(GameError::Io(_))));
    }

    #[test]
    fn test_config_from_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nnum_players = \"two\"").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_merge_prefers_non_default() {
        let mut base = Config::default();
        base.game.num_llm_seeds = 5;
        base.text.wrap_width = 50;

        let mut other = Config::default();
        other.text.wrap_width = 80;

        let merged = base.merge(other);
        assert_eq!(merged.game.num_llm_seeds, 5);
        assert_eq!(merged.text.wrap_width, 80);
    }

    #[test]
    fn test_merge_cannot_reset_to_default() {
        let mut base = Config::default();
        base.game.num_llm_seeds = 5;

        let mut other = Config::default();
        other.game.num_llm_seeds = 2;
        other.game.player_names = Some(vec!["A".into(), "B".into()]);

        let merged = base.merge(other);
        assert_eq!(merged.game.num_llm_seeds, 5);
        assert_eq!(merged.game.player_names, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_default_path() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("chatgame/config.toml"));
        }
    }
}
