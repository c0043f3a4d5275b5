//! The Serenity crate we're using for the Discord API is designed around callbacks to handle
//! events.  However, this does not mesh well with our plugin framework here.  To resolve this,
//! this module translates the callbacks to a distinct Event enum.

use crate::{args::Args, context::Context, log_internal};
use serenity::all::{Message, Ready};

/// A Discord event
pub enum Event {
    Ready(Ready),
    Message(Message),
}

impl Event {
    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    //
    // A plugin error must not take the process down, and the user who triggered it should not
    // be left without a response.  Reply generically and keep going.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => {
                    log_internal!("Error in plugin {}: {}", plugin.name(), err);
                    if let Event::Message(msg) = &self {
                        let _ = msg
                            .reply(ctx.cache_http, "❌ An error occurred. Please try again later.")
                            .await;
                    }
                    return;
                }
            }
        }
    }

    // Check if a message should be interpreted as a special bot command.
    //
    // These are prefixed with the configured command prefix, e.g. `!stats`.  On a match,
    // returns the message along with the argument text following the command token.
    pub async fn is_bot_cmd<'e>(
        &'e self,
        ctx: &Context<'_>,
        cmd: &str,
    ) -> Option<(&'e Message, Args<'e>)> {
        let Event::Message(msg) = self else {
            return None;
        };

        let prefix = ctx.cfg.read().await.general.command_prefix.clone();
        let rest = msg.content.strip_prefix(prefix.as_str())?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        if parts.next() != Some(cmd) {
            return None;
        }

        Some((msg, Args::new(parts.next().unwrap_or(""))))
    }
}

pub enum EventHandled {
    Yes,
    No,
}
