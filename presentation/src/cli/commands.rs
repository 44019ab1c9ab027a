//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every stage: answers, de-anonymized rankings, consensus, synthesis
    Full,
    /// Only the chairman's answer
    Synthesis,
    /// The complete result bundle as JSON
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Synthesis => council_domain::OutputFormat::Synthesis,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - answer, rank each other, synthesize")]
#[command(long_about = r#"
LLM Council sends your question to a panel of language models over OpenRouter.

The process has three stages:
1. Responses: every panel member answers independently, in parallel
2. Rankings:  every member ranks all answers, anonymized as Response A, B, ...
3. Synthesis: a chairman model writes one final answer

Configuration files are loaded from (in priority order):
1. LLM_COUNCIL_<SECTION>__<KEY>            Environment variables
2. --config <path>                         Explicit config file
3. ./council.toml                          Project-level config
4. ~/.config/llm-council/config.toml       Global config

The API key is read from OPENROUTER_API_KEY unless configured otherwise.

Example:
  llm-council "What's the best way to handle errors in Rust?"
  llm-council -m openai/gpt-5.1 -m x-ai/grok-4 -o full "Compare async runtimes"
  llm-council --chat
"#)]
pub struct Cli {
    /// The question to ask the council (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Resume a saved conversation in chat mode
    #[arg(long, value_name = "ID")]
    pub resume: Option<String>,

    /// List saved conversations and exit
    #[arg(long)]
    pub list: bool,

    /// Panel members, in label order (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Model that synthesizes the final answer
    #[arg(long, value_name = "MODEL")]
    pub chairman: Option<String>,

    /// Output format [default: synthesis]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Chat mode is implied by `--resume`
    pub fn is_chat(&self) -> bool {
        self.chat || self.resume.is_some()
    }
}
