use crate::{event::*, helper::UserIdHelper, plugin::*, store::StoreError};
use anyhow::Result;
use chrono::Utc;
use rand::Rng;

const REWARD_AMOUNTS: [u64; 3] = [100, 250, 500];

/// Daily rewards, the global leaderboard, and per-user stats.
pub struct Rewards;

#[serenity::async_trait]
impl Plugin for Rewards {
    fn name(&self) -> &'static str {
        "rewards"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{p}daily_reward - 🎁 claim your daily reward\n\
             {p}leaderboard - 🏆 view the global leaderboard\n\
             {p}stats - 📊 view your personal stats for challenges and meetups",
            p = prefix
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Some((msg, _)) = event.is_bot_cmd(ctx, "daily_reward").await {
            let amount = REWARD_AMOUNTS[rand::thread_rng().gen_range(0..REWARD_AMOUNTS.len())];
            let claimed = ctx
                .vstate
                .write()
                .await
                .store
                .claim_daily(msg.author.id, amount, Utc::now());

            let reply = match claimed {
                Ok(_) => format!(
                    "🎉 Congratulations! You've claimed your daily reward of {amount} points. 🎁"
                ),
                Err(StoreError::AlreadyClaimed) => {
                    "🚫 You have already claimed your daily reward today!".to_owned()
                }
                Err(other) => return Err(other.into()),
            };

            msg.channel_id.say(ctx.cache_http, reply).await?;
            return Ok(EventHandled::Yes);
        }

        if let Some((msg, _)) = event.is_bot_cmd(ctx, "leaderboard").await {
            let board = ctx.vstate.read().await.store.leaderboard();

            let mut message = String::from("**🏅 Global Leaderboard 🏅**\n");
            for (rank, (user, score)) in board.iter().enumerate() {
                let name = user.display_name(ctx).await;
                message.push_str(&format!("{}. {} - {} points\n", rank + 1, name, score));
            }

            msg.channel_id.say(ctx.cache_http, message).await?;
            return Ok(EventHandled::Yes);
        }

        if let Some((msg, _)) = event.is_bot_cmd(ctx, "stats").await {
            let (challenges, meetups) = ctx.vstate.read().await.store.stats(msg.author.id);

            msg.channel_id
                .say(
                    ctx.cache_http,
                    format!(
                        "{}'s Stats 📊:\n🔹 Challenges Joined: {}\n🔹 Meetups Attended: {}",
                        msg.author.name, challenges, meetups,
                    ),
                )
                .await?;
            return Ok(EventHandled::Yes);
        }

        Ok(EventHandled::No)
    }
}
