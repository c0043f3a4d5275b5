use crate::{args::ArgError, event::*, plugin::*};
use anyhow::Result;
use std::time::Duration;

/// Acknowledges immediately, waits the requested number of minutes, then delivers the
/// reminder text back to the channel.
pub struct Remindme;

#[serenity::async_trait]
impl Plugin for Remindme {
    fn name(&self) -> &'static str {
        "remindme"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{}{} <minutes> <message> - ⏰ set a reminder with a specific time and message",
            prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, mut args)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        let parsed = (|| {
            let minutes = args.integer::<u64>("minutes")?;
            let reminder = args.rest_of_line("reminder")?.to_owned();
            Ok::<_, ArgError>((minutes, reminder))
        })();
        let (minutes, reminder) = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                msg.reply(ctx.cache_http, err.to_string()).await?;
                return Ok(EventHandled::Yes);
            }
        };

        let max = ctx.cfg.read().await.limits.max_reminder_minutes;
        if minutes > max {
            msg.reply(
                ctx.cache_http,
                format!("⚠️ I can remind you at most {max} minutes ahead."),
            )
            .await?;
            return Ok(EventHandled::Yes);
        }

        msg.channel_id
            .say(
                ctx.cache_http,
                format!("Got it! I'll remind you in {minutes} minutes about: {reminder}"),
            )
            .await?;

        tokio::time::sleep(Duration::from_secs(minutes * 60)).await;

        msg.channel_id
            .say(ctx.cache_http, format!("⏰ Reminder: {reminder}"))
            .await?;
        Ok(EventHandled::Yes)
    }
}
