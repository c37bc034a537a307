//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - top-level arguments and global logging flags
//! - [`Command`] - the `convert` and `send` subcommands
//! - [`OutputFormat`] - table format flag, convertible into [`crate::format::OutputFormat`]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{
    CompletionConfig, DEFAULT_CLAUDE_MODEL, DEFAULT_GPT_MODEL, DEFAULT_PAUSE_SECS,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TIMEOUT_SECS, ProviderConfig, SendConfig, TranscriptConfig,
};
use crate::core::RoleMap;
use crate::error::Result;

/// Turn chat transcript exports into role/content context tables
/// and ask Claude and GPT for a follow-up message.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatctx")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatctx convert ./exports
    chatctx convert ./exports -o ./tables --assistant \"Corretor Bot\"
    chatctx send --folder ./tables --dry-run
    chatctx send --folder ./tables --model claude-3-5-haiku-latest --pause-secs 5")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter (e.g. "debug", "chatctx=trace"); defaults to RUST_LOG, then "info"
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Disable colored log output (a non-empty NO_COLOR does the same)
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse every .txt transcript in a directory into messages and context tables
    Convert(ConvertArgs),

    /// Send every .csv context table in a folder to Claude and GPT
    Send(SendArgs),
}

/// Arguments of `chatctx convert`.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Directory holding the .txt transcripts
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Directory for the output tables (default: the input directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Table format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Sender to map to the assistant role (repeatable; replaces the default)
    #[arg(long, value_name = "NAME")]
    pub assistant: Vec<String>,

    /// JSON file with {"assistants": [...]} to map to the assistant role
    #[arg(long, value_name = "FILE")]
    pub roles: Option<PathBuf>,

    /// Drop messages without a sender
    #[arg(long)]
    pub skip_system: bool,
}

impl ConvertArgs {
    /// Directory the tables are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.clone())
    }

    /// Builds the role table: `--roles` file, then `--assistant` names,
    /// else the built-in default.
    pub fn role_map(&self) -> Result<RoleMap> {
        let mut roles = match &self.roles {
            Some(path) => RoleMap::from_json_file(path)?,
            None if self.assistant.is_empty() => return Ok(RoleMap::default()),
            None => RoleMap::empty(),
        };
        for name in &self.assistant {
            roles = roles.with_assistant(name.clone());
        }
        Ok(roles)
    }

    /// Builds the parser settings.
    pub fn transcript_config(&self) -> TranscriptConfig {
        TranscriptConfig::new().with_skip_system_messages(self.skip_system)
    }
}

/// Arguments of `chatctx send`.
#[derive(clap::Args, Debug, Clone)]
pub struct SendArgs {
    /// Folder holding the context .csv tables
    #[arg(long, default_value = ".")]
    pub folder: PathBuf,

    /// System prompt
    #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system: String,

    /// Claude model
    #[arg(long, default_value = DEFAULT_CLAUDE_MODEL)]
    pub model: String,

    /// GPT model
    #[arg(long, default_value = DEFAULT_GPT_MODEL)]
    pub gpt_model: String,

    /// Max tokens for the reply
    #[arg(long, default_value_t = 2048)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.0)]
    pub temperature: f64,

    /// Only build and print the payloads, do not call the APIs
    #[arg(long)]
    pub dry_run: bool,

    /// Seconds to wait between files
    #[arg(long, default_value_t = DEFAULT_PAUSE_SECS)]
    pub pause_secs: u64,

    /// Folder for the combined answer files
    #[arg(long, default_value = "ai_answers")]
    pub answers_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Environment variable holding the Anthropic key
    #[arg(long, default_value = "ANTHROPIC_API_KEY")]
    pub claude_key_env: String,

    /// Environment variable holding the OpenAI key
    #[arg(long, default_value = "OPENAI_API_KEY")]
    pub openai_key_env: String,
}

impl SendArgs {
    /// Shared completion settings.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig::new()
            .with_system(self.system.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(Some(self.temperature))
    }

    /// Claude connection settings.
    pub fn claude_config(&self) -> ProviderConfig {
        ProviderConfig::claude()
            .with_model(self.model.clone())
            .with_api_key_env(self.claude_key_env.clone())
            .with_timeout_secs(self.timeout_secs)
    }

    /// GPT connection settings.
    pub fn openai_config(&self) -> ProviderConfig {
        ProviderConfig::openai()
            .with_model(self.gpt_model.clone())
            .with_api_key_env(self.openai_key_env.clone())
            .with_timeout_secs(self.timeout_secs)
    }

    /// Batch settings.
    pub fn send_config(&self) -> SendConfig {
        SendConfig::new()
            .with_answers_dir(self.answers_dir.clone())
            .with_pause_secs(self.pause_secs)
            .with_dry_run(self.dry_run)
    }
}

/// Table format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-delimited tables (default; what `send` reads)
    #[default]
    Csv,

    /// Pretty JSON arrays
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}
