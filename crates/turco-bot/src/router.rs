//! Per-message routing decisions
//!
//! Pure functions over a platform-neutral view of the inbound message, so the
//! decision logic can be tested without a gateway connection.

use turco_types::{session_key, Origin, SessionKey};

use crate::persona::DEFAULT_GREETING;

/// What the router needs to know about an inbound message.
#[derive(Debug, Clone)]
pub struct Inbound<'a> {
    pub author_id: u64,
    pub origin: Origin,
    pub content: &'a str,
    /// Whether the bot account is in the message's mention list.
    pub mentions_bot: bool,
}

/// Outcome of routing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The bot's own message; do nothing at all.
    Ignore,
    /// Not addressed to the bot; only prefix commands may apply.
    CommandsOnly,
    /// Generate a reply, deliver it, then run prefix commands.
    Respond { key: SessionKey, text: String },
}

pub fn route(msg: &Inbound<'_>, bot_id: u64) -> Route {
    if msg.author_id == bot_id {
        return Route::Ignore;
    }

    let is_dm = msg.origin == Origin::Direct;
    if !is_dm && !msg.mentions_bot {
        return Route::CommandsOnly;
    }

    Route::Respond {
        key: session_key(msg.origin, msg.author_id),
        text: normalize(msg.content, bot_id, msg.mentions_bot),
    }
}

/// Strip the bot's mention markup (only when it was mentioned) and fall back
/// to the default greeting when nothing is left.
pub fn normalize(content: &str, bot_id: u64, mentioned: bool) -> String {
    let text = if mentioned {
        strip_mentions(content, bot_id)
    } else {
        content.trim().to_string()
    };

    if text.is_empty() {
        DEFAULT_GREETING.to_string()
    } else {
        text
    }
}

/// Remove `<@ID>` and `<@!ID>` for the given user id and trim the result.
pub fn strip_mentions(content: &str, user_id: u64) -> String {
    content
        .replace(&format!("<@{}>", user_id), "")
        .replace(&format!("<@!{}>", user_id), "")
        .trim()
        .to_string()
}
