use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use axum_server::tls_rustls::RustlsConfig;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::set_header::SetResponseHeaderLayer;

use anyhow::{anyhow, bail};

use media_gateway::{DubOutcome, DubRequest, ServerConfig, routes, state::AppState};

/// Media Gateway - speech transcription and video dubbing server
#[derive(Parser, Debug)]
#[command(name = "media-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve,

    /// Print the provider's language catalog
    Languages {
        /// Print the source catalog instead of the target catalog
        #[arg(long)]
        source: bool,
    },

    /// Dub one video and print the outcome
    Dub {
        #[arg(long = "video-url")]
        video_url: String,

        #[arg(long = "target-language")]
        target_language: String,

        #[arg(long = "source-language")]
        source_language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Must be installed before any TLS connection is attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let config = if let Some(config_path) = cli.config {
        println!("Loading configuration from {}", config_path.display());
        ServerConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    let app_state = AppState::new(config).map_err(|e| anyhow!(e.to_string()))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(app_state).await,
        Commands::Languages { source } => print_languages(&app_state, source).await,
        Commands::Dub {
            video_url,
            target_language,
            source_language,
        } => {
            let request = DubRequest::from_url(video_url, target_language);
            let request = match source_language {
                Some(source) => request.with_source_language(source),
                None => request,
            };
            dub_once(&app_state, request).await
        }
    }
}

async fn print_languages(app_state: &AppState, source: bool) -> anyhow::Result<()> {
    let provider = app_state.dubbing.provider();
    let catalog = if source {
        provider.source_languages().await
    } else {
        provider.target_languages().await
    }
    .map_err(|e| anyhow!(e.to_string()))?;

    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

/// Ctrl-C cancels the running job; a failed outcome returns an error.
async fn dub_once(app_state: &AppState, request: DubRequest) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling dub");
            on_interrupt.cancel();
        }
    });

    let outcome = app_state.dubbing.run(request, &cancel).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    outcome_status(&outcome)
}

fn outcome_status(outcome: &DubOutcome) -> anyhow::Result<()> {
    if !outcome.success {
        bail!(
            "{}",
            outcome.error_message.as_deref().unwrap_or("Dubbing failed")
        );
    }
    Ok(())
}

async fn serve(app_state: Arc<AppState>) -> anyhow::Result<()> {
    let config = &app_state.config;
    let address = config.address();
    let tls_config = config.tls.clone();
    let rate_limit_rps = config.rate_limit_requests_per_second;
    let rate_limit_burst = config.rate_limit_burst_size;
    let governor_layer = if config.is_rate_limited() {
        let governor_config = GovernorConfigBuilder::default()
            .per_second(rate_limit_rps as u64)
            .burst_size(rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow!("Failed to build rate limiter config"))?;
        Some(GovernorLayer::new(governor_config))
    } else {
        println!("Rate limiting disabled (rate >= 100000/s)");
        None
    };
    println!("Starting server on {address}");

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    let app = routes::create_app(app_state.clone())
        .layer(tower::util::option_layer(governor_layer))
        .layer(security_headers);

    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address '{}': {}", address, e))?;

    if let Some(tls) = tls_config {
        let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to load TLS certificates from {} and {}: {}",
                    tls.cert_path.display(),
                    tls.key_path.display(),
                    e
                )
            })?;

        println!("Server listening on https://{} (TLS enabled)", socket_addr);

        axum_server::bind_rustls(socket_addr, rustls_config)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|e| anyhow!("TLS server error: {}", e))?;
    } else {
        println!("Server listening on http://{}", socket_addr);

        let listener = TcpListener::bind(&socket_addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
    }

    Ok(())
}
