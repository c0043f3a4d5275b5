use crate::{event::*, log_event, logging::*, plugin::*};
use anyhow::Result;

/// Prints debug information about events to stdout
pub struct Debug;

#[serenity::async_trait]
impl Plugin for Debug {
    fn name(&self) -> &'static str {
        "debug"
    }

    async fn usage(&self, _ctx: &Context) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Event::Message(msg) = event {
            log_event!(
                "{}{}{}{}{}{} {}",
                msg.guild_id.color(ctx.http).await,
                Glue {}.color(),
                msg.channel_id.color(ctx.http).await,
                Glue {}.color(),
                msg.author.color(),
                Glue {}.color(),
                msg.content,
            );
        }

        Ok(EventHandled::No)
    }
}
