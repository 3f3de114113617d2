use anyhow::Context;
use clap::Parser;
use umbrella_check::config::toml_config::TomlConfig;
use umbrella_check::core::CheckSettings;
use umbrella_check::domain::ports::ConfigProvider;
use umbrella_check::server::{create_app, AppState};
use umbrella_check::utils::{logger, validation::Validate};
use umbrella_check::{HttpFetcher, SystemClock, UmbrellaService};

#[derive(Parser)]
#[command(name = "umbrella-server")]
#[command(about = "Serves the umbrella verdict over HTTP")]
struct Args {
    /// Path to TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };

    // 初始化日誌
    logger::init_server_logger(args.json_logs || config.monitoring.json_logs);

    // 覆蓋順序: 檔案 < PORT 環境變數 < --port
    config.apply_env_overrides();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(monitor) = args.monitor {
        config.monitoring.enabled = monitor;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }

    tracing::info!(
        "✅ Configuration loaded: area {} ({}) from {}",
        config.area_code(),
        config.location_label(),
        config.feed_url()
    );
    tracing::info!(
        "⚖️ Decision mode: {} (threshold {:?})",
        config.decision_mode(),
        config.default_threshold()
    );

    let fetcher = HttpFetcher::new(config.timeout_seconds())?;
    let service = UmbrellaService::new_with_monitoring(
        fetcher,
        SystemClock,
        CheckSettings::from_config(&config),
        config.monitoring_enabled(),
    );
    let app = create_app(AppState::new(service));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("🚀 Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
