//! Chat game CLI binary.
//!
//! Inspect the ransomware negotiation game without running an engine.
//!
//! # Commands
//!
//! - `prompt` - Render the prompt a player sees before replying
//! - `config` - Dump the assembled configuration as JSON
//! - `strip` - Reduce a model reply to its message body
//! - `wrap` - Wrap a JSON array of lines
//! - `tones` - List the selectable tones

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use chatgame::{
    games::ransomware,
    text::{self, DEFAULT_WIDTH},
    Config, SlotValues, VERSION,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "chatgame")]
#[command(version = VERSION)]
#[command(about = "Ransomware negotiation chat game - prompts and configuration", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/chatgame/config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the prompt a player sees before answering the opening message
    Prompt {
        /// Player index (0 = attacker, 1 = defender)
        #[arg(short, long, default_value = "1")]
        player: usize,

        /// Tone chosen for the reply
        #[arg(short, long, default_value = "firm")]
        tone: String,
    },

    /// Dump the assembled configuration as JSON
    Config {
        /// Output as pretty-printed JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Strip envelopes and options blocks from a model reply
    Strip {
        /// Reply text (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Also truncate at this string
        #[arg(long)]
        until: Option<String>,
    },

    /// Wrap a JSON array of lines, one paragraph per line
    Wrap {
        /// JSON array input (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Wrap width (default: from config)
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// List the selectable tones
    Tones,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Prompt { player, tone } => cmd_prompt(&config, player, &tone),
        Commands::Config { pretty } => cmd_config(&config, pretty),
        Commands::Strip { input, file, until } => cmd_strip(&config, input, file, until),
        Commands::Wrap { input, file, width } => cmd_wrap(&config, input, file, width),
        Commands::Tones => cmd_tones(&config),
    }
}

/// Defaults, then the config file, then `CHATGAME_*` environment variables
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let file_config = match path {
        Some(path) => Config::from_file(path)?,
        None => match Config::default_path().filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Config::from_file(path)?
            },
            None => Config::default(),
        },
    };

    Ok(file_config.merge(Config::from_env()))
}

fn cmd_prompt(config: &Config, player: usize, tone: &str) -> anyhow::Result<()> {
    if !config.game.negotiation_tones.iter().any(|t| t == tone) {
        anyhow::bail!(
            "Unknown tone: {tone}. Use one of: {}",
            config.game.negotiation_tones.join(", ")
        );
    }

    let game = ransomware::get_config(config)?;
    let prompt = game.prompt_for(player, &SlotValues::new().with("tone", tone))?;
    print!("{prompt}");
    Ok(())
}

fn cmd_config(config: &Config, pretty: bool) -> anyhow::Result<()> {
    let game = ransomware::get_config(config)?;
    println!("{}", game.to_json(pretty)?);
    Ok(())
}

fn cmd_strip(
    config: &Config,
    input: Option<String>,
    file: Option<PathBuf>,
    until: Option<String>,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    let header = ransomware::header(config.text.wrap_width)?;

    let stripped = match until {
        Some(terminal) => header.strip_until(&content, &terminal),
        None => header.strip(&content),
    };
    println!("{stripped}");
    Ok(())
}

fn cmd_wrap(
    config: &Config,
    input: Option<String>,
    file: Option<PathBuf>,
    width: Option<usize>,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    let values: Vec<Value> = serde_json::from_str(&content)?;

    let width = width.unwrap_or(if config.text.wrap_width > 0 {
        config.text.wrap_width
    } else {
        DEFAULT_WIDTH
    });
    let blocks = text::wrap_values(&values, width)?;
    println!("{}", blocks.join("\n\n"));
    Ok(())
}

fn cmd_tones(config: &Config) -> anyhow::Result<()> {
    for tone in &config.game.negotiation_tones {
        let marker = if *tone == config.game.initial_tone {
            " (initial)"
        } else {
            ""
        };
        println!("{tone}{marker}");
    }
    Ok(())
}

// Helper functions

fn read_input(input: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(path) = file {
        Ok(std::fs::read_to_string(path)?)
    } else if let Some(s) = input {
        if s == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            Ok(s)
        }
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}
