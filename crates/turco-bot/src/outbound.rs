//! Reply delivery
//!
//! Discord rejects messages over 2000 characters, so long replies are cut into
//! fixed-size pieces and sent in order.

use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::channel::Message;
use tracing::debug;

/// Hard per-message limit enforced by Discord.
pub const MESSAGE_LIMIT: usize = 2000;

/// Size of each piece when a reply has to be split.
pub const CHUNK_SIZE: usize = 1990;

/// Split `text` into pieces of at most [`CHUNK_SIZE`] characters when it is
/// longer than [`MESSAGE_LIMIT`]. Cuts are by character count, not words.
pub fn split_reply(text: &str) -> Vec<String> {
    if text.chars().count() <= MESSAGE_LIMIT {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Send `text` as one or more replies to `original`, preserving order.
/// Stops at the first failed send.
pub async fn send_reply(http: &Http, original: &Message, text: &str) -> serenity::Result<()> {
    let chunks = split_reply(text);
    let total = chunks.len();

    for (i, chunk) in chunks.into_iter().enumerate() {
        let builder = CreateMessage::new()
            .content(chunk)
            .reference_message((original.channel_id, original.id));
        original.channel_id.send_message(http, builder).await?;
        debug!(
            "Sent reply chunk {}/{} to channel {}",
            i + 1,
            total,
            original.channel_id
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reply_is_single_message() {
        assert_eq!(split_reply("oi"), vec!["oi".to_string()]);
    }

    #[test]
    fn test_reply_at_limit_is_not_split() {
        let text = "a".repeat(MESSAGE_LIMIT);
        let chunks = split_reply(&text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), MESSAGE_LIMIT);
    }

    #[test]
    fn test_reply_just_over_limit_splits_at_1990() {
        let text = "a".repeat(MESSAGE_LIMIT + 1);
        let sizes: Vec<usize> = split_reply(&text).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![1990, 11]);
    }

    #[test]
    fn test_4200_chars_split_into_three_ordered_chunks() {
        let text: String = (0..4200).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split_reply(&text);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(sizes, vec![1990, 1990, 220]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let text = "💅".repeat(2100);
        let chunks = split_reply(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1990);
        assert_eq!(chunks[1].chars().count(), 110);
    }

    #[test]
    fn test_empty_reply_stays_single() {
        assert_eq!(split_reply(""), vec![String::new()]);
    }
}
