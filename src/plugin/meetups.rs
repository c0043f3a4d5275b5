use crate::{
    args::Args,
    event::*,
    helper::UserIdHelper,
    plugin::*,
    store::{MeetupId, StoreError},
};
use anyhow::Result;
use chrono::NaiveDateTime;
use serenity::all::{Message, UserId};

const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Meetup tracking: create with a schedule, join, list.
pub struct Meetups;

#[serenity::async_trait]
impl Plugin for Meetups {
    fn name(&self) -> &'static str {
        "meetups"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{p}create_meetup <topic> <date time> - 📅 create a new meetup (YYYY-MM-DD HH:MM)\n\
             {p}join_meetup <meetup_id> - 🤝 join an existing meetup\n\
             {p}list_meetups - 📅 list upcoming meetups",
            p = prefix
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "create_meetup").await {
            return create(ctx, msg, args).await;
        }
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "join_meetup").await {
            return join(ctx, msg, args).await;
        }
        if let Some((msg, _)) = event.is_bot_cmd(ctx, "list_meetups").await {
            return list(ctx, msg).await;
        }

        Ok(EventHandled::No)
    }
}

async fn create(ctx: &Context<'_>, msg: &Message, mut args: Args<'_>) -> Result<EventHandled> {
    let topic = match args.string("topic") {
        Ok(topic) => topic.to_owned(),
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            return Ok(EventHandled::Yes);
        }
    };

    // The schedule is the remainder of the line: a date and a time, separated by a
    // space, so it cannot be a single token.
    let date_time = match args.rest_of_line("date_time") {
        Ok(date_time) => date_time,
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            return Ok(EventHandled::Yes);
        }
    };
    let Some(scheduled_at) = parse_schedule(date_time) else {
        msg.channel_id
            .say(
                ctx.cache_http,
                "❌ Invalid date-time format. Use YYYY-MM-DD HH:MM.",
            )
            .await?;
        return Ok(EventHandled::Yes);
    };

    ctx.vstate
        .write()
        .await
        .store
        .create_meetup(msg.author.id, topic.clone(), scheduled_at);

    msg.channel_id
        .say(
            ctx.cache_http,
            format!("🎉 Meetup on '{topic}' created successfully! Scheduled for {scheduled_at}."),
        )
        .await?;
    Ok(EventHandled::Yes)
}

async fn join(ctx: &Context<'_>, msg: &Message, mut args: Args<'_>) -> Result<EventHandled> {
    let id = match args.integer::<u16>("meetup_id") {
        Ok(raw) => MeetupId::new(raw),
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            return Ok(EventHandled::Yes);
        }
    };

    let joined = {
        let mut vstate = ctx.vstate.write().await;
        vstate
            .store
            .join_meetup(id, msg.author.id)
            .map(|meetup| (meetup.topic.clone(), meetup.scheduled_at))
    };

    let reply = match joined {
        Ok((topic, scheduled_at)) => format!(
            "{} ✅ has joined the meetup '{}' scheduled for {}.",
            msg.author.name, topic, scheduled_at,
        ),
        Err(StoreError::MeetupNotFound(id)) => format!("❌ No meetup found with ID {id}."),
        Err(StoreError::AlreadyAttending) => {
            "🚫 You are already attending this meetup.".to_owned()
        }
        Err(other) => return Err(other.into()),
    };

    msg.channel_id.say(ctx.cache_http, reply).await?;
    Ok(EventHandled::Yes)
}

async fn list(ctx: &Context<'_>, msg: &Message) -> Result<EventHandled> {
    struct Line {
        id: MeetupId,
        topic: String,
        organizer: UserId,
        scheduled_at: NaiveDateTime,
    }

    let lines: Vec<Line> = {
        let vstate = ctx.vstate.read().await;
        vstate
            .store
            .meetups()
            .iter()
            .map(|meetup| Line {
                id: meetup.id,
                topic: meetup.topic.clone(),
                organizer: meetup.organizer,
                scheduled_at: meetup.scheduled_at,
            })
            .collect()
    };

    if lines.is_empty() {
        msg.channel_id
            .say(ctx.cache_http, "⚠️ No upcoming meetups at the moment.")
            .await?;
        return Ok(EventHandled::Yes);
    }

    let mut message = String::from("🔹 **Upcoming Meetups** 🔹\n");
    for line in lines {
        let organizer_name = line.organizer.display_name(ctx).await;
        message.push_str(&format!(
            "**ID**: {} - {} (Organized by {})\n**Scheduled for**: {}\n\n",
            line.id, line.topic, organizer_name, line.scheduled_at,
        ));
    }

    msg.channel_id.say(ctx.cache_http, message).await?;
    Ok(EventHandled::Yes)
}

fn parse_schedule(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), SCHEDULE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_parses_the_fixed_format() {
        let parsed = parse_schedule("2025-07-01 18:30").unwrap();
        assert_eq!(parsed.to_string(), "2025-07-01 18:30:00");
    }

    #[test]
    fn schedule_rejects_other_shapes() {
        for text in ["tomorrow", "2025-07-01", "18:30 2025-07-01", "2025/07/01 18:30"] {
            assert!(parse_schedule(text).is_none(), "{text} should not parse");
        }
    }
}
