pub use crate::context::Context;
pub use crate::event::{Event, EventHandled};
use anyhow::Result;

mod calculator;
mod challenges;
mod debug;
mod help;
mod ignore_bots;
mod meetups;
mod ready;
mod remindme;
mod rewards;
mod timeon;
mod timeout;
mod unknown;

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug
    fn name(&self) -> &'static str;
    /// Help message lines.  None if no help message
    async fn usage(&self, ctx: &Context) -> Option<String>;
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    /// handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    use crate::plugin::*;

    vec![
        // Core bot operations
        Box::new(debug::Debug),
        Box::new(ready::Ready),
        Box::new(ignore_bots::IgnoreBots),
        // Routes pending dialogue replies, so it must run before the command plugins.
        Box::new(calculator::Calculator),
        Box::new(help::Help),
        // Timed actions
        Box::new(timeon::Timeon),
        Box::new(timeout::Timeout),
        Box::new(remindme::Remindme),
        // Community tracking
        Box::new(challenges::Challenges),
        Box::new(meetups::Meetups),
        Box::new(rewards::Rewards),
        // Unknown-command fallback, used if no other plugin handles the message.
        // Keep last.
        Box::new(unknown::Unknown),
    ]
}
