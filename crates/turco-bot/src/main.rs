//! Ipod Turco
//!
//! Discord bot that answers mentions and DMs through Gemini in the voice of a
//! sarcastic Recife local, keeping a short rolling history per user and
//! channel.

mod avatar;
mod commands;
mod config;
mod errors;
mod handlers;
mod health;
mod history;
mod outbound;
mod persona;
mod responder;
mod router;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use llm_gemini::GeminiClient;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::avatar::{AvatarSync, SerenityProfile};
use crate::config::{Config, SystemEnv};
use crate::handlers::{BotState, Handler};
use crate::health::AppState;
use crate::history::{HistoryStore, InMemoryHistory};
use crate::responder::Responder;

/// Ipod Turco CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/turco-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_TOKEN")]
    discord_token: Option<String>,

    /// Gemini API key (overrides config file)
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real env vars still apply.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turco_bot=debug,llm_gemini=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ipod Turco");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env(&SystemEnv)?
    };

    if let Some(token) = args.discord_token {
        config.discord.bot_token = token;
    }
    if let Some(key) = args.gemini_api_key {
        config.gemini.api_key = key;
    }
    config.validate()?;

    info!(
        model = %config.gemini.model,
        max_history = config.history.max_history,
        "Configuration loaded"
    );

    let gemini = GeminiClient::new(config.gemini.clone()).context("Failed to build Gemini client")?;
    let history: Arc<dyn HistoryStore> =
        Arc::new(InMemoryHistory::with_max_history(config.history.max_history));
    let responder = Responder::new(Arc::new(gemini), history.clone());
    let health_state = AppState::new(history);
    let health_port = args.health_port;

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord.bot_token, intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let avatar_sync = match config.discord.avatar_source_user_id {
        0 => {
            info!("Avatar sync disabled");
            None
        }
        source => Some(AvatarSync::new(
            Arc::new(SerenityProfile::new(client.http.clone())),
            reqwest::Client::new(),
            source,
        )),
    };

    let state = Arc::new(BotState::new(
        responder,
        config.discord.command_prefix.clone(),
        config.discord.presence.clone(),
        health_state.clone(),
        avatar_sync,
    ));

    {
        let mut data = client.data.write().await;
        data.insert::<BotState>(state);
    }

    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Ipod Turco stopped");
    Ok(())
}
