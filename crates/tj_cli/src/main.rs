use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tj_core::{DataGateway, Theme, UserIdentity};
use tj_inference::codec::DEFAULT_TEMPERATURE;
use tj_inference::{InferenceConfig, DEFAULT_BASE_URL};
use tj_storage::{InMemoryGateway, PostgrestConfig, PostgrestGateway, Session};
use tracing::info;

mod commands;
mod logging;

const OFFLINE_USER: &str = "offline-user";

#[derive(Debug, Clone, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// Accepts `45`, `30s`, `2m` or `1m30s`. A bare number is seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut rest = s.trim();
        if rest.is_empty() {
            return Err("Duration must include a number".to_string());
        }

        let mut total_seconds = 0u64;
        while !rest.is_empty() {
            let split = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let (digits, tail) = rest.split_at(split);
            let value = digits
                .parse::<u64>()
                .map_err(|_| format!("Invalid number in duration: {}", s))?;
            let mut units = tail.chars();
            let scale = match units.next() {
                None | Some('s') => 1,
                Some('m') => 60,
                Some('h') => 3600,
                Some(c) => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = total_seconds.saturating_add(value.saturating_mul(scale));
            rest = units.as_str();
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse, save and analyse news items", long_about = None)]
pub struct Cli {
    /// Base URL of the PostgREST data store
    #[arg(long, env = "TJ_GATEWAY_URL")]
    gateway_url: Option<String>,
    #[arg(long, env = "TJ_GATEWAY_KEY", hide_env_values = true)]
    gateway_key: Option<String>,
    #[arg(long, env = "TJ_INFERENCE_URL", default_value = DEFAULT_BASE_URL)]
    inference_url: String,
    #[arg(long, env = "TJ_INFERENCE_KEY", hide_env_values = true)]
    inference_key: Option<String>,
    #[arg(long, default_value = "grok", help = "Annotator to use. Available models: grok (default), dummy")]
    model: String,
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,
    /// Per-request timeout (e.g. 30s, 1m)
    #[arg(long, default_value = "30s")]
    timeout: HumanDuration,
    /// Opaque user ID handed over by the sign-in flow
    #[arg(long, env = "TJ_USER")]
    user: Option<String>,
    /// Use built-in demo items and the dummy annotator
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List feed items
    Feed {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Start again from the first page
        #[arg(long)]
        refresh: bool,
    },
    /// List the feed categories
    Categories,
    /// List saved items
    Saved,
    /// Save the feed item at INDEX (1-based)
    Save {
        index: usize,
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove the saved item at INDEX (1-based)
    Unsave { index: usize },
    /// Run bias, summary and trajectory analysis on the feed item at INDEX
    Analyze {
        index: usize,
        #[arg(long)]
        category: Option<String>,
        /// Trace the trajectory across every loaded item from the same source
        #[arg(long)]
        story: bool,
    },
    /// Rank the other feed items by relatedness to the item at INDEX
    Related {
        index: usize,
        #[arg(long)]
        category: Option<String>,
    },
    /// Show or update preferences
    Prefs {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        text_size: Option<f64>,
        #[arg(long)]
        notifications: Option<bool>,
        /// Replace the selected categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}

impl Cli {
    fn gateway(&self) -> anyhow::Result<Arc<dyn DataGateway>> {
        if self.offline {
            return Ok(Arc::new(InMemoryGateway::with_demo_items()));
        }
        let url = self
            .gateway_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--gateway-url (or TJ_GATEWAY_URL) is required unless --offline is set"))?;
        let config = PostgrestConfig::new(url, self.gateway_key.clone())?.with_timeout(self.timeout.0);
        Ok(Arc::new(PostgrestGateway::new(config)?))
    }

    fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            base_url: self.inference_url.clone(),
            api_key: self.inference_key.clone(),
            model: if self.offline { "dummy".to_string() } else { self.model.clone() },
            temperature: self.temperature,
            timeout: self.timeout.0,
        }
    }

    fn user(&self) -> Option<String> {
        self.user
            .clone()
            .or_else(|| self.offline.then(|| OFFLINE_USER.to_string()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let gateway = cli.gateway()?;
    info!("💾 Data gateway ready ({})", if cli.offline { "memory" } else { "postgrest" });

    let session = Session::new(gateway);
    if let Some(user) = cli.user() {
        session.sign_in(UserIdentity::new(user)).await?;
    }

    commands::run(cli.command.clone(), &session, &cli.inference_config()).await
}
