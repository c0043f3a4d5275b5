use crate::{event::*, helper::UserIdHelper, plugin::*};
use anyhow::Result;
use chrono::Local;
use serenity::all::{
    ChannelType, EditRole, GuildId, PermissionOverwrite, PermissionOverwriteType, Permissions,
    RoleId,
};
use std::time::Duration;

const MUTE_SECONDS: u64 = 30;
const MUTE_ROLE_NAME: &str = "Muted";

/// Mutes the mentioned user for a fixed period while the bot fetches the current time,
/// then unmutes them.  The unmute runs whether or not the wait succeeded.
pub struct Timeon;

#[serenity::async_trait]
impl Plugin for Timeon {
    fn name(&self) -> &'static str {
        "timeon"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{}{} <user> - ⏰ mute a user for 30 seconds while checking the time",
            prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, mut args)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        let Some(guild_id) = msg.guild_id else {
            msg.reply(ctx.cache_http, "⚠️ This command only works in a server.")
                .await?;
            return Ok(EventHandled::Yes);
        };

        let target = match args.user_mention("user") {
            Ok(target) => target,
            Err(_) => {
                msg.reply(ctx.cache_http, "⚠️ You need to mention a user to mute.")
                    .await?;
                return Ok(EventHandled::Yes);
            }
        };

        let role_id = ensure_mute_role(ctx, guild_id).await?;

        ctx.http
            .add_member_role(guild_id, target, role_id, Some("mute timer"))
            .await?;
        let target_name = target.display_name(ctx).await;
        msg.channel_id
            .say(
                ctx.cache_http,
                format!(
                    "{target_name} 🤐, you are muted for {MUTE_SECONDS} seconds while I get the current time..."
                ),
            )
            .await?;

        // Anything that goes wrong between mute and unmute must not leave the user
        // muted, so the wait-and-report runs first and its result is checked only after
        // the role has been removed.
        let timed: Result<()> = async {
            let current_time = Local::now().format("%H:%M:%S %p").to_string();
            tokio::time::sleep(Duration::from_secs(MUTE_SECONDS)).await;
            msg.channel_id
                .say(
                    ctx.cache_http,
                    format!("⏰ The current time is: {current_time}"),
                )
                .await?;
            Ok(())
        }
        .await;

        let unmuted = ctx
            .http
            .remove_member_role(guild_id, target, role_id, Some("mute timer expired"))
            .await;

        timed?;
        unmuted?;

        msg.channel_id
            .say(
                ctx.cache_http,
                format!("{target_name} 🙊, you are no longer muted."),
            )
            .await?;
        Ok(EventHandled::Yes)
    }
}

/// Find the mute marker role, creating it on first use.  Creation also denies sending
/// for the role in every existing text channel; an existing role is reused as-is.
async fn ensure_mute_role(ctx: &Context<'_>, guild_id: GuildId) -> Result<RoleId> {
    let roles = guild_id.roles(ctx.http).await?;
    if let Some(role) = roles.values().find(|role| role.name == MUTE_ROLE_NAME) {
        return Ok(role.id);
    }

    let role = guild_id
        .create_role(ctx.cache_http, EditRole::new().name(MUTE_ROLE_NAME))
        .await?;

    let deny_send = PermissionOverwrite {
        allow: Permissions::empty(),
        deny: Permissions::SEND_MESSAGES,
        kind: PermissionOverwriteType::Role(role.id),
    };
    for channel in guild_id.channels(ctx.http).await?.values() {
        if channel.kind != ChannelType::Text {
            continue;
        }
        channel
            .create_permission(ctx.cache_http, deny_send.clone())
            .await?;
    }

    Ok(role.id)
}
