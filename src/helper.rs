//! Miscellaneous convenience methods

use crate::context::Context;

/// Shown whenever the identity lookup cannot resolve a user.
pub const UNKNOWN_USER: &str = "Unknown User";

#[serenity::async_trait]
pub trait UserIdHelper {
    async fn display_name(&self, ctx: &Context) -> String;
}

#[serenity::async_trait]
impl UserIdHelper for serenity::all::UserId {
    /// Resolve a user id to a display name, falling back to a placeholder when the user
    /// cannot be fetched (left the server, deleted account, network hiccup).
    async fn display_name(&self, ctx: &Context) -> String {
        match self.to_user(ctx.cache_http).await {
            Ok(user) => user.name,
            Err(_) => UNKNOWN_USER.to_owned(),
        }
    }
}
