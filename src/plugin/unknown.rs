use crate::{event::*, plugin::*};
use anyhow::Result;

/// Replies to prefixed messages no other plugin recognized.  Keep last in the plugin
/// list so every real command gets its chance first.
pub struct Unknown;

#[serenity::async_trait]
impl Plugin for Unknown {
    fn name(&self) -> &'static str {
        "unknown"
    }

    async fn usage(&self, _ctx: &Context) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };

        let prefix = ctx.cfg.read().await.general.command_prefix.clone();
        if prefix.is_empty() || !msg.content.starts_with(&prefix) {
            return Ok(EventHandled::No);
        }

        msg.reply(
            ctx.cache_http,
            format!("❌ Invalid command. Type {prefix}commands for a list of available commands."),
        )
        .await?;
        Ok(EventHandled::Yes)
    }
}
