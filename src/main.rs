//! # Contest Announcer Bot Main Entry Point
//!
//! Initializes logging, loads configuration, wires the contest fetcher,
//! filter, alarm scheduler and announcer, and runs the Telegram bot next to a
//! small health server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tokio_cron_scheduler::JobScheduler;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contest_announcer_bot::bot::handlers::{BotContext, BotHandler};
use contest_announcer_bot::config::Config;
use contest_announcer_bot::services::alarm::AlarmScheduler;
use contest_announcer_bot::services::announcer::{AnnounceSchedule, Announcer, AnnouncerService};
use contest_announcer_bot::services::clist::{ClistClient, ClistSettings};
use contest_announcer_bot::services::filter::ContestFilter;
use contest_announcer_bot::services::health::HealthService;
use contest_announcer_bot::services::publisher::{ChannelPublisher, TelegramPublisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so DEBUG can pick the default level
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let default_filter = if config.debug {
        "contest_announcer_bot=debug,tower_http=debug"
    } else {
        "contest_announcer_bot=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Contest Announcer Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Channel: {:?}, Admins: {}, HTTP Port: {}, Debug: {}",
        config.channel,
        config.admins.len(),
        config.http_port,
        config.debug
    );

    let bot = Bot::new(&config.telegram_bot_token);
    let publisher: Arc<dyn ChannelPublisher> =
        Arc::new(TelegramPublisher::new(bot.clone(), config.channel.clone()));

    let clist = ClistClient::new(ClistSettings {
        api_url: config.clist_api_url.clone(),
        api_key: config.clist_api_key.clone(),
        timeout: std::time::Duration::from_secs(config.clist_timeout_secs),
        fetch_window: chrono::Duration::days(config.fetch_window_days),
        long_contest_resource: config.long_contest_resource.clone(),
    })?;

    // One scheduler drives the daily job, the startup job and every alarm
    let scheduler = JobScheduler::new().await?;
    let alarms = AlarmScheduler::new(
        scheduler.clone(),
        publisher.clone(),
        config.alarm_exempt_resources.clone(),
    );
    let announcer = Announcer::new(clist, ContestFilter::default(), alarms.clone(), publisher);

    info!("Initializing announcer service...");
    let mut announcer_service = AnnouncerService::new(
        announcer.clone(),
        scheduler,
        AnnounceSchedule {
            daily_at: config.daily_announce_time,
            startup_delay: std::time::Duration::from_secs(config.startup_delay_secs),
            announce_on_startup: config.debug,
        },
    );
    if let Err(e) = announcer_service.start().await {
        tracing::error!("Failed to start announcer service: {}", e);
        return Err(e);
    }

    let channel_name = match &config.channel {
        Recipient::ChannelUsername(name) => name.clone(),
        Recipient::Id(id) => id.0.to_string(),
    };
    let handler = BotHandler::new(BotContext {
        announcer,
        admins: Arc::new(config.admins.clone()),
        channel_name,
    });

    let health_service = HealthService::new(alarms);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .error_handler(LoggingErrorHandler::with_custom_text("Error Handler Called"))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = announcer_service.stop().await {
        tracing::warn!("Error stopping announcer service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
