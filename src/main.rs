use anyhow::Result;
use std::io::Write;

use flairfeed::auth::{ClientCredentials, CredentialManager, FileCredentialStore};
use flairfeed::config;
use flairfeed::executor::QueryExecutor;
use flairfeed::http_client::ApiClient;
use flairfeed::output;
use flairfeed::queries;
use flairfeed::runner;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Check if interactive setup is needed (no .env and missing required values)
    if config::needs_interactive_setup() {
        let interactive_config = config::run_interactive_setup()?;

        // Set environment variables from interactive config so Config::load() can use them
        std::env::set_var("CLIENT_ID", &interactive_config.client_id);
        std::env::set_var("CLIENT_SECRET", &interactive_config.client_secret);
        std::env::set_var("USER_AGENT", &interactive_config.user_agent);
    }

    // Load configuration first (for log level)
    let config = config::Config::load()?;

    // Initialize logging with a configured level; stdout is reserved for results
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!("Configuration: {:?}", config);
    config.validate()?;

    let queries = queries::load_queries(&config.queries_file)?;

    let api = ApiClient::new(
        &config.user_agent,
        config.http_connect_timeout,
        config.http_request_timeout,
    )?;

    let credential_manager = CredentialManager::new(
        Box::new(FileCredentialStore::new(config.token_cache_file.clone())),
        api.clone(),
        ClientCredentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_url: config.auth_url.clone(),
        },
    );

    let credential = match credential_manager.acquire_credential().await {
        Ok(credential) => {
            tracing::info!(
                "Authentication successful (token: {}...)",
                credential.token_preview()
            );
            credential
        }
        Err(e) => {
            tracing::error!("Authentication failed: {}", e);
            tracing::error!("Check CLIENT_ID, CLIENT_SECRET and USER_AGENT");
            return Err(e.into());
        }
    };

    let executor = QueryExecutor::new(api, config.api_base_url.clone(), config.include_non_media);
    let summary = runner::run_queries(&executor, &credential.token, &queries).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for post in &summary.posts {
        writeln!(
            out,
            "{}",
            output::render_line(post, config.output_style, &config.link_base_url)
        )?;
    }
    out.flush()?;

    if summary.failed_queries > 0 {
        tracing::warn!(
            "{} of {} queries failed; their results are missing",
            summary.failed_queries,
            queries.len()
        );
    }
    tracing::info!("Printed {} posts", summary.posts.len());

    Ok(())
}
