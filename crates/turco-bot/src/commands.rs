//! Prefix commands (`!limpar`, `!sobre`)

use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::Colour;
use tracing::info;
use turco_types::{session_key, Origin, SessionKey};

use crate::persona::{ABOUT, CLEAR_ACK};
use crate::responder::Responder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `limpar`: forget the invoker's history in this conversation.
    Clear,
    /// `sobre`: show the about card.
    About,
}

/// Parse a prefix command. The prefix must start the message and the command
/// name must follow it directly; anything after the name is ignored.
pub fn parse(content: &str, prefix: &str) -> Option<Command> {
    let rest = content.strip_prefix(prefix)?;
    match rest.split(char::is_whitespace).next()? {
        "limpar" => Some(Command::Clear),
        "sobre" => Some(Command::About),
        _ => None,
    }
}

/// Clear the history of the invoker's session and return the key cleared.
pub async fn clear_session(responder: &Responder, origin: Origin, author_id: u64) -> SessionKey {
    let key = session_key(origin, author_id);
    responder.clear(&key).await;
    key
}

pub fn about_embed() -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(ABOUT.title)
        .description(ABOUT.description)
        .colour(Colour::new(ABOUT.colour))
        .footer(CreateEmbedFooter::new(ABOUT.footer));

    ABOUT
        .fields
        .iter()
        .fold(embed, |embed, (name, value)| embed.field(*name, *value, false))
}

/// Run the prefix command in `msg`, if there is one.
pub async fn dispatch(
    http: &Http,
    msg: &Message,
    origin: Origin,
    prefix: &str,
    responder: &Responder,
) -> serenity::Result<()> {
    let Some(command) = parse(&msg.content, prefix) else {
        return Ok(());
    };

    let reply = match command {
        Command::Clear => {
            let key = clear_session(responder, origin, msg.author.id.get()).await;
            info!(session = %key, "History cleared on request");
            CreateMessage::new().content(CLEAR_ACK)
        }
        Command::About => CreateMessage::new().embed(about_embed()),
    };

    msg.channel_id
        .send_message(http, reply.reference_message((msg.channel_id, msg.id)))
        .await?;
    Ok(())
}
