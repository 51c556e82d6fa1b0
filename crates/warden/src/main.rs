//! Warden - credential issuance and session verification service

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use warden_api::{AppState, CookieSettings, cors_layer, create_router};
use warden_auth::{CredentialManager, SessionManager};
use warden_core::AccountService;
use warden_db::Database;

/// Warden - account registration, login and session verification
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "WARDEN_CONFIG", default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "WARDEN_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "WARDEN_PORT")]
    port: Option<u16>,

    /// Session signing secret
    #[arg(long, env = "WARDEN_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// SQLite database file
    #[arg(long, env = "WARDEN_DATABASE_PATH")]
    database_path: Option<String>,

    /// Frontend origin allowed to make credentialed requests
    #[arg(long, env = "WARDEN_CORS_ORIGIN")]
    cors_origin: Option<String>,
}

impl Args {
    /// Apply command line and environment overrides on top of the file
    fn apply(self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(secret) = self.jwt_secret {
            config.auth.jwt_secret = secret;
        }
        if let Some(path) = self.database_path {
            config.database.path = path;
        }
        if let Some(origin) = self.cors_origin {
            config.cors.allowed_origin = Some(origin);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before clap reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting Warden v{}", env!("CARGO_PKG_VERSION"));

    // Signing key and hash parameters are checked once, before anything binds
    let sessions = Arc::new(
        SessionManager::new(&config.auth.jwt_secret).context("Invalid session signing key")?,
    );
    let credentials =
        CredentialManager::new(config.password).context("Invalid password hashing parameters")?;

    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create database directory {:?}", parent))?;
    }
    let db = Database::new(&config.database_url()).await?;

    let accounts = Arc::new(AccountService::new(Arc::new(db), credentials, sessions)?);

    let state = AppState::new(
        accounts,
        CookieSettings {
            secure: config.cookie.secure,
        },
    );

    let mut app = create_router(state).layer(TraceLayer::new_for_http());

    if let Some(origin) = &config.cors.allowed_origin {
        let value = HeaderValue::from_str(origin)
            .with_context(|| format!("Invalid CORS origin: {}", origin))?;
        app = app.layer(cors_layer(value));
        info!("CORS enabled for {}", origin);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
