use clap::Parser;
use umbrella_check::core::CheckSettings;
use umbrella_check::domain::model::UmbrellaVerdict;
use umbrella_check::utils::error::ErrorSeverity;
use umbrella_check::utils::{logger, validation::Validate};
use umbrella_check::{CliConfig, HttpFetcher, SystemClock, UmbrellaService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting umbrella-check CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 Request monitoring enabled");
    }

    let fetcher = match HttpFetcher::new(config.timeout_seconds) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("❌ Failed to build HTTP client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    let settings = CheckSettings::from_config(&config);
    let service = UmbrellaService::new_with_monitoring(fetcher, SystemClock, settings, config.monitor);

    // 門檻已併入設定，這裡不再覆寫
    match service.check(None).await {
        Ok(verdict) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                print_summary(&verdict);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Umbrella check failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_summary(verdict: &UmbrellaVerdict) {
    let headline = if verdict.need_umbrella {
        "☔ Take an umbrella!"
    } else {
        "☀️ No umbrella needed"
    };

    println!("{} ({})", headline, verdict.location);
    match verdict.sum_product {
        Some(score) => println!(
            "   expected rain {:.1}mm across {} periods (threshold {})",
            score,
            verdict.periods.len(),
            verdict.threshold
        ),
        None => println!(
            "   {}% chance · {:.1}mm (threshold {}%)",
            verdict.precipitation_chance_percent,
            verdict.precipitation_volume_max_mm,
            verdict.threshold
        ),
    }
    println!("   {}°C – {}°C", verdict.min_temp, verdict.max_temp);
    if let Some(date) = verdict.forecast_date {
        println!("   forecast for {}", date);
    }
}
