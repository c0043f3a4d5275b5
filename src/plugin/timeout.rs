use crate::{event::*, plugin::*};
use anyhow::Result;
use std::time::Duration;

/// Waits a caller-specified number of seconds, then confirms.
pub struct Timeout;

#[serenity::async_trait]
impl Plugin for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{}{} <seconds> - ⏳ set a timeout for the bot to wait before responding",
            prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, mut args)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        let seconds = match args.integer::<u64>("seconds") {
            Ok(seconds) => seconds,
            Err(err) => {
                msg.reply(ctx.cache_http, err.to_string()).await?;
                return Ok(EventHandled::Yes);
            }
        };

        let max = ctx.cfg.read().await.limits.max_countdown_seconds;
        if seconds > max {
            msg.reply(
                ctx.cache_http,
                format!("⚠️ I can wait at most {max} seconds."),
            )
            .await?;
            return Ok(EventHandled::Yes);
        }

        msg.channel_id
            .say(
                ctx.cache_http,
                format!("⏰ Waiting for {seconds} seconds before responding..."),
            )
            .await?;

        tokio::time::sleep(Duration::from_secs(seconds)).await;

        msg.channel_id
            .say(ctx.cache_http, format!("{seconds} seconds have passed! ⏱️"))
            .await?;
        Ok(EventHandled::Yes)
    }
}
