//! # Chat Game Core - Negotiation Game Configuration
//!
//! Building blocks for language-model chat games: the text protocol players
//! speak (the [`Header`]), the literal facts of one playthrough (a
//! [`Scenario`]), and the validated parameters a game engine consumes (a
//! [`Configuration`]). The shipped variant is a two-player ransomware
//! negotiation where each turn the acting player chooses a tone.
//!
//! ## Prompt Layout
//!
//! Every prompt handed to a model is plain UTF-8, assembled in a fixed order:
//!
//! ```text
//! <context: instructions and worked examples>
//!
//! %%%%%%%%%%%%%%%%%%%%%%%%%%%%          <- options block
//!
//! Ransom Demand:
//! <private value>
//! ...
//! Tone: Use a <action> tone.
//!
//! ############################          <- message envelope
//! Negotiation:
//! from: <sender>
//! to: <receiver>
//! ############################
//!
//! <message body>
//! ```
//!
//! Values substituted into either block may not contain `%` or `#`, so
//! [`Header::strip`] can always reduce a reply to its body.
//!
//! ## Substitution Keys
//!
//! | Kind    | Filled by                      | Ransomware keys                    |
//! |---------|--------------------------------|------------------------------------|
//! | Action  | the acting player, every turn  | `tone`                             |
//! | Info    | private per-player facts       | `ransom_demand`, `data_importance` |
//! | Context | the scenario                   | `negotiation_tone`                 |
//!
//! ## Quick Start
//!
//! ```rust
//! use chatgame::games::ransomware;
//! use chatgame::{Config, SlotValues};
//!
//! let config = ransomware::get_config(&Config::default()).unwrap();
//! assert_eq!(config.params.num_distinct_actions, 10);
//!
//! let prompt = config
//!     .prompt_for(1, &SlotValues::new().with("tone", "firm"))
//!     .unwrap();
//! assert!(prompt.contains("Use a firm tone."));
//! ```
//!
//! ## Modules
//!
//! - [`template`]: Named-slot templates and slot values
//! - [`keys`]: Substitution-key catalog
//! - [`substrate`]: Negotiation text protocol (block markers, envelope, stripping)
//! - [`header`]: Prompt rendering and reply canonicalization
//! - [`scenario`]: Scenario value types
//! - [`assembler`]: Validated configuration assembly
//! - [`games`]: Game variants
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod assembler;
pub mod config;
pub mod error;
pub mod games;
pub mod header;
pub mod keys;
pub mod observation;
pub mod payoff;
pub mod scenario;
pub mod substrate;
pub mod template;
pub mod text;
pub mod transcript;

// Re-exports for convenience
pub use assembler::{build_config, ConfigAssembler, Configuration, EngineSettings, GameParams, GameSpec, KeyedValues};
pub use config::Config;
pub use error::{GameError, Result};
pub use games::RansomwareScenario;
pub use header::Header;
pub use keys::{KeyCatalog, SlotKind};
pub use observation::Observation;
pub use payoff::{Payoff, Termination};
pub use scenario::{BaseScenario, Scenario};
pub use template::{SlotValues, Template};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
