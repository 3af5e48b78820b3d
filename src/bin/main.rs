use anyhow::Result;
use clap::{Parser, Subcommand};
use oauth_authenticator::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, OAuthConfig, RequestAuthenticator, TokenClient,
};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oauth-authenticator")]
#[command(about = "Resolve request identity through an OAuth token service")]
struct Cli {
    /// Base URL of the OAuth token service
    #[arg(long, global = true, env = "OAUTH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    oauth_url: String,
    /// Timeout for a single token lookup, in milliseconds
    #[arg(long, global = true, env = "OAUTH_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve an HTTP API that resolves identity on every request
    Serve {
        /// Bind address, e.g. 0.0.0.0:8080
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
    },
    /// Look up the access token for a user id and print it
    Lookup {
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("oauth_authenticator=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let config = OAuthConfig::parse(&cli.oauth_url, cli.timeout_ms)?;

    match cli.command {
        Commands::Serve { bind } => {
            info!(
                "Using OAuth service at {} (timeout {}ms)",
                config.base_url, config.timeout_ms
            );

            let authenticator = Arc::new(RequestAuthenticator::new(config)?);
            let app = oauth_authenticator::api::create_router(authenticator);

            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("Listening on http://{}", bind);

            axum::serve(listener, app).await?;
        }
        Commands::Lookup { user_id } => {
            let client = TokenClient::new(&config)?;
            let url = client.access_token_url(user_id.trim())?;
            info!("Looking up access token at {}", url);

            match client.get_access_token(user_id.trim()).await {
                Ok(token) => println!("{}", serde_json::to_string_pretty(&token)?),
                Err(err) => {
                    println!("{}", serde_json::to_string_pretty(&err)?);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
