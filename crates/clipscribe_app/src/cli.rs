use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clipscribe_core::FailurePolicy;
use clipscribe_engine::{
    BatchSettings, Credential, GeminiSettings, DEFAULT_API_BASE, DEFAULT_MODEL,
    DEFAULT_TRACKER_FILE,
};

/// Turn lists of video URLs into Markdown documents, resuming where the last run stopped.
#[derive(Debug, Parser)]
#[command(name = "clipscribe", version, about)]
pub struct Cli {
    /// JSON files holding an array of URLs, or directories containing them.
    /// Falls back to CLIPSCRIBE_SOURCES, then the current directory.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// API key. Repeat the flag or comma-separate keys; they are tried in order.
    #[arg(
        short = 'k',
        long = "api-key",
        env = "GEMINI_API_KEYS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub api_keys: Vec<String>,

    /// Seconds to wait after each request before the next one.
    #[arg(long, env = "CLIPSCRIBE_PACING_SECS", default_value_t = 5)]
    pub pacing_secs: u64,

    /// What to do with inputs whose generation failed: `retry` or `mark-attempted`.
    #[arg(long, env = "CLIPSCRIBE_FAILURE_POLICY", default_value = "retry")]
    pub failure_policy: FailurePolicy,

    /// Record of already processed URLs.
    #[arg(long, env = "CLIPSCRIBE_TRACKER", default_value = DEFAULT_TRACKER_FILE)]
    pub tracker: PathBuf,

    /// Write every document here instead of next to its source file.
    #[arg(long, env = "CLIPSCRIBE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// File whose contents replace the built-in recipe prompt.
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// HTTP(S) proxy for all API traffic.
    #[arg(long, env = "PROXY_URL")]
    pub proxy: Option<String>,

    #[arg(long, default_value_t = 300)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "CLIPSCRIBE_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Only log to the terminal.
    #[arg(long)]
    pub no_log_file: bool,

    #[arg(long, env = "CLIPSCRIBE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn credentials(&self) -> Vec<Credential> {
        self.api_keys
            .iter()
            .map(|key| Credential::new(key.trim()))
            .collect()
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            pacing: Duration::from_secs(self.pacing_secs),
            failure_policy: self.failure_policy,
            output_dir: self.output_dir.clone(),
        }
    }

    pub fn gemini_settings(&self) -> anyhow::Result<GeminiSettings> {
        let mut settings = GeminiSettings {
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            proxy: self.proxy.clone().filter(|p| !p.trim().is_empty()),
            ..GeminiSettings::default()
        };
        if let Some(path) = &self.prompt_file {
            settings.prompt = fs::read_to_string(path)
                .with_context(|| format!("failed to read prompt file {}", path.display()))?;
        }
        Ok(settings)
    }
}
