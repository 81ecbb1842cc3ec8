//! Serenity event handler implementation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serenity::async_trait;
use serenity::gateway::ActivityData;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use turco_types::Origin;

use crate::avatar::AvatarSync;
use crate::commands;
use crate::errors;
use crate::health::AppState;
use crate::outbound;
use crate::responder::Responder;
use crate::router::{self, Inbound, Route};

/// Everything the handler shares across events.
pub struct BotState {
    pub responder: Responder,
    pub command_prefix: String,
    pub presence: String,
    pub health: AppState,
    /// Taken by the first `ready`; later reconnects find it empty.
    avatar_sync: Mutex<Option<AvatarSync>>,
    bot_user_id: AtomicU64,
}

impl BotState {
    pub fn new(
        responder: Responder,
        command_prefix: String,
        presence: String,
        health: AppState,
        avatar_sync: Option<AvatarSync>,
    ) -> Self {
        Self {
            responder,
            command_prefix,
            presence,
            health,
            avatar_sync: Mutex::new(avatar_sync),
            bot_user_id: AtomicU64::new(0),
        }
    }

    /// Bot account id, `0` until the gateway is ready.
    pub fn bot_user_id(&self) -> u64 {
        self.bot_user_id.load(Ordering::Acquire)
    }

    fn set_bot_user_id(&self, id: u64) {
        self.bot_user_id.store(id, Ordering::Release);
    }

    /// Hand out the avatar task once per process.
    async fn take_avatar_sync(&self) -> Option<AvatarSync> {
        self.avatar_sync.lock().await.take()
    }
}

impl TypeMapKey for BotState {
    type Value = Arc<BotState>;
}

/// Direct messages have no guild; everything else is keyed by channel.
fn origin_of(msg: &Message) -> Origin {
    match msg.guild_id {
        None => Origin::Direct,
        Some(_) => Origin::Channel(msg.channel_id.get()),
    }
}

pub struct Handler;

impl Handler {
    async fn state(ctx: &Context) -> Option<Arc<BotState>> {
        let data = ctx.data.read().await;
        data.get::<BotState>().cloned()
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator.map_or(0, |d| d.get())
        );

        let Some(state) = Self::state(&ctx).await else {
            error!("BotState not found in context data");
            return;
        };

        state.set_bot_user_id(ready.user.id.get());
        state.health.set_bot_username(ready.user.name.clone()).await;
        ctx.set_activity(Some(ActivityData::listening(state.presence.as_str())));

        if let Some(sync) = state.take_avatar_sync().await {
            info!("Starting periodic avatar sync");
            tokio::spawn(sync.run());
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let Some(state) = Self::state(&ctx).await else {
            error!("BotState not found in context data");
            return;
        };

        let bot_id = state.bot_user_id();
        if bot_id == 0 {
            debug!("Message received before ready, ignoring");
            return;
        }

        let origin = origin_of(&msg);
        let inbound = Inbound {
            author_id: msg.author.id.get(),
            origin,
            content: &msg.content,
            mentions_bot: msg.mentions.iter().any(|u| u.id.get() == bot_id),
        };

        match router::route(&inbound, bot_id) {
            Route::Ignore => return,
            Route::CommandsOnly => {}
            Route::Respond { key, text } => {
                debug!(session = %key, "Generating reply");

                let typing = msg.channel_id.start_typing(&ctx.http);
                let reply = state.responder.respond(&key, &text).await;
                typing.stop();

                if let Err(e) = outbound::send_reply(&ctx.http, &msg, &reply).await {
                    errors::log_error("Failed to deliver reply", &e);
                }
            }
        }

        if let Err(e) = commands::dispatch(
            &ctx.http,
            &msg,
            origin,
            &state.command_prefix,
            &state.responder,
        )
        .await
        {
            errors::log_error("Failed to run command", &e);
        }
    }
}
