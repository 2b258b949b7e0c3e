use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Confirm, Input, Password};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::error::FeedError;
use crate::output::{parse_output_style, OutputStyle};

/// flairfeed - newest subreddit posts by flair, ranked by score
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Reddit app client id
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Reddit app client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// User-Agent sent with every request, e.g. "linux:flairfeed:v0.1.0 (by /u/you)"
    #[arg(long, env = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// JSON list of {subreddit, search_query} pairs
    #[arg(
        short = 'q',
        long,
        env = "QUERIES_FILE",
        default_value = "assets/subreddit_queries.json"
    )]
    pub queries_file: String,

    /// Token cache file
    #[arg(long = "token-cache", env = "TOKEN_CACHE_FILE", default_value = "token_cache.json")]
    pub token_cache_file: String,

    /// Access token endpoint
    #[arg(
        long,
        env = "AUTH_URL",
        default_value = "https://www.reddit.com/api/v1/access_token"
    )]
    pub auth_url: String,

    /// OAuth API host
    #[arg(long, env = "API_BASE_URL", default_value = "https://oauth.reddit.com")]
    pub api_base_url: String,

    /// Prefix for printed permalinks
    #[arg(long, env = "LINK_BASE_URL", default_value = "https://www.reddit.com")]
    pub link_base_url: String,

    /// Keep flair matches that are not videos
    #[arg(long, env = "INCLUDE_NON_MEDIA")]
    pub include_non_media: bool,

    /// Output style (hyperlink, plain)
    #[arg(long = "output", env = "OUTPUT_STYLE", default_value = "hyperlink")]
    pub output_style: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub http_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Clone)]
pub struct Config {
    // Reddit app credentials
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,

    // Files
    pub queries_file: PathBuf,
    pub token_cache_file: PathBuf,

    // Endpoints
    pub auth_url: String,
    pub api_base_url: String,
    pub link_base_url: String,

    // Filtering and output
    pub include_non_media: bool,
    pub output_style: OutputStyle,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("queries_file", &self.queries_file)
            .field("token_cache_file", &self.token_cache_file)
            .field("auth_url", &self.auth_url)
            .field("api_base_url", &self.api_base_url)
            .field("link_base_url", &self.link_base_url)
            .field("include_non_media", &self.include_non_media)
            .field("output_style", &self.output_style)
            .field("http_connect_timeout", &self.http_connect_timeout)
            .field("http_request_timeout", &self.http_request_timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self, FeedError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_args(CliArgs::parse())
    }

    /// Build config from parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self, FeedError> {
        let required = |value: Option<String>, name: &str, flag: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    FeedError::ConfigLoad(format!(
                        "{} is required (use {} or set {} env var)",
                        name, flag, name
                    ))
                })
        };

        Ok(Config {
            client_id: required(args.client_id, "CLIENT_ID", "--client-id")?,
            client_secret: required(args.client_secret, "CLIENT_SECRET", "--client-secret")?,
            user_agent: required(args.user_agent, "USER_AGENT", "--user-agent")?,

            queries_file: expand_tilde(&args.queries_file),
            token_cache_file: expand_tilde(&args.token_cache_file),

            auth_url: args.auth_url,
            api_base_url: args.api_base_url,
            link_base_url: args.link_base_url,

            include_non_media: args.include_non_media,
            output_style: parse_output_style(&args.output_style),

            http_connect_timeout: std::env::var("HTTP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            http_request_timeout: args.http_timeout,

            log_level: args.log_level,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), FeedError> {
        if !self.queries_file.exists() {
            return Err(FeedError::ConfigLoad(format!(
                "QUERIES_FILE does not exist: {}",
                self.queries_file.display()
            )));
        }

        if self.http_request_timeout == 0 {
            return Err(FeedError::ConfigLoad(
                "HTTP_REQUEST_TIMEOUT must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("AUTH_URL", &self.auth_url),
            ("API_BASE_URL", &self.api_base_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(FeedError::ConfigLoad(format!(
                    "{} must be an http(s) URL: {}",
                    name, url
                )));
            }
        }

        Ok(())
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}


// === Interactive Setup ===

/// Check if interactive setup is needed (no .env file and missing required values)
pub fn needs_interactive_setup() -> bool {
    let env_file_exists = std::path::Path::new(".env").exists();

    let has_client_id = std::env::var("CLIENT_ID").is_ok();
    let has_client_secret = std::env::var("CLIENT_SECRET").is_ok();
    let has_user_agent = std::env::var("USER_AGENT").is_ok();

    !env_file_exists && (!has_client_id || !has_client_secret || !has_user_agent)
}

/// Configuration collected from interactive setup
#[derive(Clone)]
pub struct InteractiveConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Run interactive setup to collect the Reddit app credentials
pub fn run_interactive_setup() -> Result<InteractiveConfig> {
    println!();
    println!("No configuration found. Let's set up your Reddit app credentials.");
    println!("Create a \"script\" app at https://www.reddit.com/prefs/apps to get them.");
    println!();

    let client_id: String = Input::new()
        .with_prompt("Client id (CLIENT_ID)")
        .interact_text()
        .context("Failed to read CLIENT_ID")?;

    let client_secret: String = Password::new()
        .with_prompt("Client secret (CLIENT_SECRET)")
        .interact()
        .context("Failed to read CLIENT_SECRET")?;

    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        anyhow::bail!("CLIENT_ID and CLIENT_SECRET cannot be empty");
    }

    let user_agent: String = Input::new()
        .with_prompt("User-Agent (USER_AGENT)")
        .default(format!("flairfeed/{}", env!("CARGO_PKG_VERSION")))
        .interact_text()
        .context("Failed to read USER_AGENT")?;

    let config = InteractiveConfig {
        client_id: client_id.trim().to_string(),
        client_secret: client_secret.trim().to_string(),
        user_agent: user_agent.trim().to_string(),
    };

    println!();
    let save_to_env = Confirm::new()
        .with_prompt("Save configuration to .env file?")
        .default(true)
        .interact()
        .context("Failed to read save confirmation")?;

    if save_to_env {
        save_env_file(&config)?;
        println!("Configuration saved to .env file");
    }
    println!();

    Ok(config)
}

/// Save configuration to .env file
fn save_env_file(config: &InteractiveConfig) -> Result<()> {
    let env_content = format!(
        r#"# flairfeed configuration
# Generated by interactive setup

CLIENT_ID={}
CLIENT_SECRET={}
USER_AGENT="{}"

# Query list and token cache
QUERIES_FILE=assets/subreddit_queries.json
TOKEN_CACHE_FILE=token_cache.json

# Logging (trace, debug, info, warn, error)
LOG_LEVEL=info
"#,
        config.client_id, config.client_secret, config.user_agent,
    );

    let mut file = std::fs::File::create(".env").context("Failed to create .env file")?;
    file.write_all(env_content.as_bytes())
        .context("Failed to write .env file")?;

    Ok(())
}
