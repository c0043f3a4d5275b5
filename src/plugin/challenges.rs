use crate::{
    args::{ArgError, Args},
    event::*,
    helper::UserIdHelper,
    plugin::*,
    store::{ChallengeId, StoreError},
};
use anyhow::Result;
use chrono::Utc;
use serenity::all::{Message, UserId};

/// Group challenge tracking: create, join, list, and progress notes.
pub struct Challenges;

#[serenity::async_trait]
impl Plugin for Challenges {
    fn name(&self) -> &'static str {
        "challenges"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{p}create_challenge <name> <description> <duration> - 🏆 create a new challenge (duration in hours)\n\
             {p}join_challenge <challenge_id> - 🤝 join an existing challenge\n\
             {p}list_challenges - 📜 list all active challenges\n\
             {p}complete_challenge <challenge_id> - 🏁 mark a challenge as completed\n\
             {p}review_challenge <challenge_id> <text> - 📝 add a review to a challenge\n\
             {p}add_milestone <challenge_id> <text> - 🚩 record a challenge milestone",
            p = prefix
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "create_challenge").await {
            return create(ctx, msg, args).await;
        }
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "join_challenge").await {
            return join(ctx, msg, args).await;
        }
        if let Some((msg, _)) = event.is_bot_cmd(ctx, "list_challenges").await {
            return list(ctx, msg).await;
        }
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "complete_challenge").await {
            return complete(ctx, msg, args).await;
        }
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "review_challenge").await {
            return note(ctx, msg, args, Note::Review).await;
        }
        if let Some((msg, args)) = event.is_bot_cmd(ctx, "add_milestone").await {
            return note(ctx, msg, args, Note::Milestone).await;
        }

        Ok(EventHandled::No)
    }
}

async fn create(ctx: &Context<'_>, msg: &Message, mut args: Args<'_>) -> Result<EventHandled> {
    let parsed = (|| {
        let name = args.string("name")?.to_owned();
        let description = args.string("description")?.to_owned();
        let duration = args.integer::<u32>("duration")?;
        Ok::<_, ArgError>((name, description, duration))
    })();
    let (name, description, duration) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            return Ok(EventHandled::Yes);
        }
    };

    let id = ctx.vstate.write().await.store.create_challenge(
        msg.author.id,
        name.clone(),
        description,
        duration,
        Utc::now(),
    );

    msg.channel_id
        .say(
            ctx.cache_http,
            format!("🎉 Challenge '{name}' created successfully! Challenge ID: {id}"),
        )
        .await?;
    Ok(EventHandled::Yes)
}

async fn join(ctx: &Context<'_>, msg: &Message, mut args: Args<'_>) -> Result<EventHandled> {
    let Some(id) = challenge_id_arg(ctx, msg, &mut args).await? else {
        return Ok(EventHandled::Yes);
    };

    let joined = {
        let mut vstate = ctx.vstate.write().await;
        vstate
            .store
            .join_challenge(id, msg.author.id)
            .map(|challenge| challenge.name.clone())
    };

    let reply = match joined {
        Ok(name) => format!("{} ✅ has joined the challenge '{}'.", msg.author.name, name),
        Err(StoreError::ChallengeNotFound(id)) => {
            format!("❌ No challenge found with ID {id}.")
        }
        Err(StoreError::AlreadyJoined) => {
            "🚫 You are already a participant in this challenge.".to_owned()
        }
        Err(other) => return Err(other.into()),
    };

    msg.channel_id.say(ctx.cache_http, reply).await?;
    Ok(EventHandled::Yes)
}

async fn list(ctx: &Context<'_>, msg: &Message) -> Result<EventHandled> {
    struct Line {
        id: ChallengeId,
        name: String,
        creator: UserId,
        description: String,
        duration_hours: u32,
        completed: bool,
        milestones: usize,
        reviews: usize,
    }

    // Copy out what the rendering needs so no lock is held across the name lookups.
    let lines: Vec<Line> = {
        let vstate = ctx.vstate.read().await;
        vstate
            .store
            .challenges()
            .iter()
            .map(|challenge| Line {
                id: challenge.id,
                name: challenge.name.clone(),
                creator: challenge.creator,
                description: challenge.description.clone(),
                duration_hours: challenge.duration_hours,
                completed: challenge.completed,
                milestones: challenge.milestones.len(),
                reviews: challenge.reviews.len(),
            })
            .collect()
    };

    if lines.is_empty() {
        msg.channel_id
            .say(ctx.cache_http, "⚠️ No active challenges at the moment.")
            .await?;
        return Ok(EventHandled::Yes);
    }

    let mut message = String::from("🔹 **Active Challenges** 🔹\n");
    for line in lines {
        let creator_name = line.creator.display_name(ctx).await;
        let status = if line.completed { " [completed]" } else { "" };
        message.push_str(&format!(
            "**ID**: {} - {}{} (Created by {})\n**Description**: {}\n**Duration**: {} hours\n",
            line.id, line.name, status, creator_name, line.description, line.duration_hours,
        ));
        if line.milestones > 0 || line.reviews > 0 {
            message.push_str(&format!(
                "**Progress**: {} milestone(s), {} review(s)\n",
                line.milestones, line.reviews,
            ));
        }
        message.push('\n');
    }

    msg.channel_id.say(ctx.cache_http, message).await?;
    Ok(EventHandled::Yes)
}

async fn complete(ctx: &Context<'_>, msg: &Message, mut args: Args<'_>) -> Result<EventHandled> {
    let Some(id) = challenge_id_arg(ctx, msg, &mut args).await? else {
        return Ok(EventHandled::Yes);
    };

    let completed = {
        let mut vstate = ctx.vstate.write().await;
        vstate
            .store
            .complete_challenge(id)
            .map(|challenge| challenge.name.clone())
    };

    let reply = match completed {
        Ok(name) => format!("🏁 Challenge '{name}' marked as completed."),
        Err(StoreError::ChallengeNotFound(id)) => {
            format!("❌ No challenge found with ID {id}.")
        }
        Err(other) => return Err(other.into()),
    };

    msg.channel_id.say(ctx.cache_http, reply).await?;
    Ok(EventHandled::Yes)
}

enum Note {
    Review,
    Milestone,
}

async fn note(
    ctx: &Context<'_>,
    msg: &Message,
    mut args: Args<'_>,
    kind: Note,
) -> Result<EventHandled> {
    let Some(id) = challenge_id_arg(ctx, msg, &mut args).await? else {
        return Ok(EventHandled::Yes);
    };
    let text = match args.rest_of_line("text") {
        Ok(text) => text.to_owned(),
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            return Ok(EventHandled::Yes);
        }
    };

    let noted = {
        let mut vstate = ctx.vstate.write().await;
        let result = match kind {
            Note::Review => vstate.store.add_review(id, text),
            Note::Milestone => vstate.store.add_milestone(id, text),
        };
        result.map(|challenge| challenge.name.clone())
    };

    let reply = match noted {
        Ok(name) => match kind {
            Note::Review => format!("📝 Review added to challenge '{name}'."),
            Note::Milestone => format!("🚩 Milestone added to challenge '{name}'."),
        },
        Err(StoreError::ChallengeNotFound(id)) => {
            format!("❌ No challenge found with ID {id}.")
        }
        Err(other) => return Err(other.into()),
    };

    msg.channel_id.say(ctx.cache_http, reply).await?;
    Ok(EventHandled::Yes)
}

/// Parse the challenge id argument, replying on failure.  `None` means the reply was
/// already sent and the command is done.
async fn challenge_id_arg(
    ctx: &Context<'_>,
    msg: &Message,
    args: &mut Args<'_>,
) -> Result<Option<ChallengeId>> {
    match args.integer::<u16>("challenge_id") {
        Ok(raw) => Ok(Some(ChallengeId::new(raw))),
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            Ok(None)
        }
    }
}
