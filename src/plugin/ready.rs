use crate::{event::*, log_event, logging::PrintColor, plugin::*};
use anyhow::Result;

/// Logs the identity we connected as.
pub struct Ready;

#[serenity::async_trait]
impl Plugin for Ready {
    fn name(&self) -> &'static str {
        "ready"
    }

    async fn usage(&self, _ctx: &Context) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Ready(ready) = event else {
            return Ok(EventHandled::No);
        };

        log_event!(
            "Connected to {} server(s) as {}",
            ready.guilds.len(),
            ctx.cache.current_user().color(),
        );

        Ok(EventHandled::Yes)
    }
}
