use anyhow::Context;
use clap::Parser;
use news_digest_bot::{
    health, BotTransport, DailySchedule, DigestFetcher, DigestRenderer, Dispatcher, FetchConfig,
    GoogleNewsSource, Poller, PreferenceStore, Scheduler, SessionStore, TelegramClient,
    TelegramConfig,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "news-digest-bot", about = "Telegram bot that delivers a daily news digest")]
struct Args {
    /// Bot API token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: String,

    #[arg(long, env = "TELEGRAM_API_URL", default_value = "https://api.telegram.org")]
    telegram_api_url: String,

    /// Port of the liveness endpoint
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Daily delivery time as `M H * * *`
    #[arg(long, env = "DIGEST_CRON", default_value = "0 9 * * *")]
    cron: String,

    #[arg(long, env = "DIGEST_TIMEZONE", default_value = "Europe/London")]
    timezone: String,

    #[arg(long, env = "NEWS_BASE_URL", default_value = "https://news.google.com")]
    news_base_url: String,

    #[arg(long, env = "NEWS_LANGUAGE", default_value = "en-US")]
    news_language: String,

    #[arg(long, env = "NEWS_REGION", default_value = "US")]
    news_region: String,

    #[arg(long, env = "FETCH_TIMEOUT_SECONDS", default_value_t = 15)]
    fetch_timeout_seconds: u64,

    #[arg(long, env = "POLL_TIMEOUT_SECONDS", default_value_t = 30)]
    poll_timeout_seconds: u64,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Starting news digest bot");

    let schedule = DailySchedule::from_cron(&args.cron, &args.timezone)
        .context("invalid digest schedule")?;

    let fetch_config = FetchConfig {
        timeout_seconds: args.fetch_timeout_seconds,
        base_url: args.news_base_url,
        language: args.news_language,
        region: args.news_region,
        ..FetchConfig::default()
    };
    let source = GoogleNewsSource::new(fetch_config).context("failed to build feed client")?;

    let telegram_config = TelegramConfig {
        api_url: args.telegram_api_url,
        poll_timeout_seconds: args.poll_timeout_seconds,
        ..TelegramConfig::new(args.token)
    };
    let telegram = Arc::new(TelegramClient::new(telegram_config).context("failed to build Telegram client")?);
    let me = telegram.get_me().await.context("could not reach the Telegram Bot API")?;
    info!("Connected as @{}", me.username.as_deref().unwrap_or("unknown"));

    let transport: Arc<dyn BotTransport> = telegram.clone();
    let dispatcher = Arc::new(Dispatcher::new(
        PreferenceStore::new(),
        SessionStore::new(),
        DigestFetcher::new(Arc::new(source)),
        DigestRenderer::new(&schedule),
        transport,
    ));

    info!("Daily digest scheduled at {}", schedule.label());
    let mut scheduler = tokio::spawn(Scheduler::new(schedule, dispatcher.clone()).run());
    let mut liveness = tokio::spawn(health::serve(args.port));
    let poller = Poller::new(telegram, dispatcher).run_until(shutdown_signal());

    let outcome: anyhow::Result<()> = tokio::select! {
        _ = poller => Ok(()),
        result = &mut liveness => match result {
            Ok(Ok(())) => Err(anyhow::anyhow!("liveness endpoint exited")),
            Ok(Err(e)) => Err(e).context("liveness endpoint failed"),
            Err(e) => Err(e).context("liveness endpoint task failed"),
        },
        result = &mut scheduler => match result {
            Ok(()) => Err(anyhow::anyhow!("scheduler exited")),
            Err(e) => Err(e).context("scheduler task failed"),
        },
    };

    scheduler.abort();
    liveness.abort();
    outcome?;

    info!("News digest bot stopped");
    Ok(())
}
