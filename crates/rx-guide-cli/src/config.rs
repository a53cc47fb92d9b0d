//! Command-line and environment configuration.
//!
//! Every network setting can come from a flag, the environment or a `.env` file.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rx_guide_core::Language;
use rx_guide_llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use rx_guide_llm::GeminiConfig;

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "rx_guide=info,rx_guide_llm=info";

#[derive(Parser, Debug)]
#[command(name = "rx-guide")]
#[command(version)]
#[command(about = "Read a prescription photo and explain it in plain language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a prescription image (PNG or JPEG)
    Analyze {
        /// Prescription photo
        image: PathBuf,

        /// Write the Markdown guide here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output language (name, native label or ISO code)
        #[arg(short, long, env = "RX_GUIDE_LANGUAGE", default_value = "English")]
        language: Language,

        /// Also produce MP3 voice guidance
        #[arg(long, env = "RX_GUIDE_VOICE")]
        voice: bool,

        /// Directory for MP3 files
        #[arg(long, env = "RX_GUIDE_AUDIO_DIR", default_value = "rx-guide-audio")]
        audio_dir: PathBuf,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Suggest alarm times for dosing instructions
    Times {
        /// Free-text instructions, e.g. "twice daily after food"
        instructions: String,

        /// Number of alarms to plan (1-4); defaults to the suggestion count
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Check medicine names against the built-in interaction table
    Interactions {
        /// Medicine names as written on the prescription
        #[arg(required = true)]
        names: Vec<String>,

        /// Print the check as JSON instead of the Markdown report
        #[arg(long)]
        json: bool,
    },

    /// List supported output languages
    Languages,
}

#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model id
    #[arg(long, env = "RX_GUIDE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API base URL
    #[arg(long, env = "RX_GUIDE_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Request timeout in seconds, also used for speech requests
    #[arg(long, env = "RX_GUIDE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ModelArgs {
    pub fn gemini_config(&self) -> anyhow::Result<GeminiConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY is not set (use --api-key, the environment or a .env file)")?;
        Ok(GeminiConfig {
            api_key,
            model: self.model.clone(),
            base_url: self.api_base.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "rx-guide", "analyze", "rx.jpg", "--language", "hi", "--api-key", "k", "--voice",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { language, voice, model, .. } => {
                assert_eq!(language, Language::Hindi);
                assert!(voice);
                let config = model.gemini_config().unwrap();
                assert_eq!(config.api_key, "k");
                assert_eq!(config.model, DEFAULT_MODEL);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_or_blank_key() {
        let args = ModelArgs {
            api_key: Some("  ".to_string()),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 5,
        };
        assert!(args.gemini_config().is_err());
    }

    #[test]
    fn test_rejects_unknown_language() {
        let parsed = Cli::try_parse_from(["rx-guide", "analyze", "rx.jpg", "--language", "Klingon"]);
        assert!(parsed.is_err());
    }
}
