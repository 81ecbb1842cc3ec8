//! Session key generation for bot conversations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an inbound message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "channel_id")]
pub enum Origin {
    /// Private conversation with the bot.
    Direct,
    /// Shared guild channel, identified by its channel id.
    Channel(u64),
}

/// Stable identifier of one conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate the session key for a message.
///
/// - Direct messages: `dm:{author_id}`
/// - Guild channels: `channel:{channel_id}:{author_id}`
///
/// Each author gets a private thread per channel, so two people talking to the
/// bot in the same channel never share history.
pub fn session_key(origin: Origin, author_id: u64) -> SessionKey {
    match origin {
        Origin::Direct => SessionKey(format!("dm:{}", author_id)),
        Origin::Channel(channel_id) => {
            SessionKey(format!("channel:{}:{}", channel_id, author_id))
        }
    }
}
