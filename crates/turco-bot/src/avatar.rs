//! Periodic avatar sync
//!
//! Every 12 hours the bot copies the avatar of a fixed source account onto its
//! own profile. The first run happens as soon as the task starts. Failures are
//! logged and left for the next tick.

#[path = "avatar_tests.rs"]
mod avatar_tests;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::builder::{CreateAttachment, EditProfile};
use serenity::http::Http;
use serenity::model::id::UserId;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::errors;

pub const SYNC_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// Account whose avatar is mirrored unless configured otherwise.
pub const DEFAULT_AVATAR_SOURCE_USER_ID: u64 = 666724912257564722;

#[derive(Debug, Error)]
pub enum AvatarSyncError {
    #[error("Discord API error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Avatar download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Avatar download returned HTTP {0}")]
    Status(u16),
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Updated { source: String },
    NoCustomAvatar { source: String },
}

/// CDN URL of a user's avatar rendered as PNG, matching the type the
/// upload declares. Animated avatars come back as their first frame.
pub fn png_avatar_url(user_id: u64, hash: &str) -> String {
    format!("https://cdn.discordapp.com/avatars/{user_id}/{hash}.png?size=1024")
}

/// Public profile data of the source account.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// The Discord calls the sync needs.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_profile(&self, user_id: u64) -> serenity::Result<SourceProfile>;
    async fn set_own_avatar(&self, image: Vec<u8>) -> serenity::Result<()>;
}

/// `ProfileApi` over serenity's HTTP client.
pub struct SerenityProfile {
    http: Arc<Http>,
}

impl SerenityProfile {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProfileApi for SerenityProfile {
    async fn fetch_profile(&self, user_id: u64) -> serenity::Result<SourceProfile> {
        let user = self.http.get_user(UserId::new(user_id)).await?;
        Ok(SourceProfile {
            avatar_url: user
                .avatar
                .as_ref()
                .map(|hash| png_avatar_url(user.id.get(), &hash.to_string())),
            name: user.name,
        })
    }

    async fn set_own_avatar(&self, image: Vec<u8>) -> serenity::Result<()> {
        let attachment = CreateAttachment::bytes(image, "avatar.png");
        let mut me = self.http.get_current_user().await?;
        me.edit(&*self.http, EditProfile::new().avatar(&attachment))
            .await
    }
}

pub struct AvatarSync {
    profile: Arc<dyn ProfileApi>,
    downloader: reqwest::Client,
    source_user_id: u64,
    interval: Duration,
}

impl AvatarSync {
    pub fn new(profile: Arc<dyn ProfileApi>, downloader: reqwest::Client, source_user_id: u64) -> Self {
        Self {
            profile,
            downloader,
            source_user_id,
            interval: SYNC_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Copy the source avatar once.
    pub async fn run_once(&self) -> Result<SyncOutcome, AvatarSyncError> {
        let source = self.profile.fetch_profile(self.source_user_id).await?;

        let Some(url) = source.avatar_url else {
            return Ok(SyncOutcome::NoCustomAvatar {
                source: source.name,
            });
        };

        let resp = self.downloader.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AvatarSyncError::Status(status.as_u16()));
        }
        let image = resp.bytes().await?;

        self.profile.set_own_avatar(image.to_vec()).await?;
        Ok(SyncOutcome::Updated {
            source: source.name,
        })
    }

    /// Run forever: once immediately, then every `interval`.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.sync_and_log().await;
        }
    }

    async fn sync_and_log(&self) {
        match self.run_once().await {
            Ok(SyncOutcome::Updated { source }) => {
                info!("Avatar synced from {}", source);
            }
            Ok(SyncOutcome::NoCustomAvatar { source }) => {
                warn!("User {} has no custom avatar, skipping sync", source);
            }
            Err(AvatarSyncError::Discord(e)) => {
                errors::log_error("Avatar sync", &e);
            }
            Err(e) => {
                warn!("Avatar sync failed: {}", e);
            }
        }
    }
}
