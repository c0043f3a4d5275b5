//! Multi-step dialogues with a single user in a single channel.
//!
//! A command that needs follow-up input registers itself here, keyed by
//! (user, channel).  Incoming messages matching a pending key are routed into that
//! dialogue's channel instead of the normal command path, so one user's dialogue never
//! sees another user's messages and the same user can hold independent dialogues in
//! different channels.

use serenity::all::{ChannelId, UserId};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc;

/// One in-progress exchange is identified by who is talking and where.
pub type DialogueKey = (UserId, ChannelId);

// Replies queued per dialogue.  More than this while a step is being processed means
// the user is racing the dialogue; older replies win.
const REPLY_BUFFER: usize = 8;

#[derive(Clone)]
pub struct Dialogues {
    pending: Arc<Mutex<HashMap<DialogueKey, mpsc::Sender<String>>>>,
}

impl Dialogues {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Open a dialogue for `(user, channel)`.  Any prior dialogue under the same key is
    /// superseded: its sender is dropped, and it observes a closed channel on its next
    /// await.
    pub fn begin(&self, user: UserId, channel: ChannelId) -> DialogueHandle {
        let (tx, rx) = mpsc::channel(REPLY_BUFFER);
        // The handle holds only a weak sender: when the registry entry is replaced by a
        // superseding dialogue, the old receiver observes a closed channel.
        let weak = tx.downgrade();

        self.pending
            .lock()
            .expect("dialogue registry poisoned")
            .insert((user, channel), tx);

        DialogueHandle {
            registry: Arc::clone(&self.pending),
            key: (user, channel),
            tx: weak,
            rx,
        }
    }

    /// Route a message into the pending dialogue for `(user, channel)`, if one exists.
    /// Returns true when the message was consumed by a dialogue.
    pub fn route(&self, user: UserId, channel: ChannelId, content: &str) -> bool {
        let sender = {
            let pending = self.pending.lock().expect("dialogue registry poisoned");
            match pending.get(&(user, channel)) {
                Some(sender) => sender.clone(),
                None => return false,
            }
        };

        sender.try_send(content.to_owned()).is_ok()
    }
}

/// The receiving end of one dialogue.  Dropping the handle deregisters the dialogue,
/// so an aborted flow cannot keep swallowing the user's messages.
pub struct DialogueHandle {
    registry: Arc<Mutex<HashMap<DialogueKey, mpsc::Sender<String>>>>,
    key: DialogueKey,
    tx: mpsc::WeakSender<String>,
    rx: mpsc::Receiver<String>,
}

impl DialogueHandle {
    /// Wait for the user's next message, up to `timeout`.  None on timeout or when this
    /// dialogue has been superseded; the caller aborts the flow either way.
    pub async fn next_reply(&mut self, timeout: Duration) -> Option<String> {
        tokio::time::timeout(timeout, self.rx.recv()).await.ok()?
    }
}

impl Drop for DialogueHandle {
    fn drop(&mut self) {
        // Only deregister our own entry; a superseding dialogue may have replaced it.
        // If the weak sender no longer upgrades, the registry entry is not ours.
        let Some(ours) = self.tx.upgrade() else {
            return;
        };

        let mut pending = match self.registry.lock() {
            Ok(pending) => pending,
            Err(_) => return,
        };

        if let Some(current) = pending.get(&self.key) {
            if current.same_channel(&ours) {
                pending.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(user: u64, channel: u64) -> (UserId, ChannelId) {
        (UserId::new(user), ChannelId::new(channel))
    }

    #[tokio::test]
    async fn routes_only_to_the_matching_dialogue() {
        let dialogues = Dialogues::new();
        let (user, channel) = key(1, 10);
        let mut handle = dialogues.begin(user, channel);

        assert!(!dialogues.route(UserId::new(2), channel, "other user"));
        assert!(!dialogues.route(user, ChannelId::new(11), "other channel"));
        assert!(dialogues.route(user, channel, "42"));

        let reply = handle.next_reply(Duration::from_secs(1)).await;
        assert_eq!(reply.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn times_out_with_no_reply() {
        let dialogues = Dialogues::new();
        let (user, channel) = key(1, 10);
        let mut handle = dialogues.begin(user, channel);

        let reply = handle.next_reply(Duration::from_millis(10)).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn dropping_the_handle_deregisters() {
        let dialogues = Dialogues::new();
        let (user, channel) = key(1, 10);

        let handle = dialogues.begin(user, channel);
        drop(handle);

        assert!(!dialogues.route(user, channel, "anyone there?"));
    }

    #[tokio::test]
    async fn a_new_dialogue_supersedes_the_old_one() {
        let dialogues = Dialogues::new();
        let (user, channel) = key(1, 10);

        let mut first = dialogues.begin(user, channel);
        let mut second = dialogues.begin(user, channel);

        // The first dialogue's sender is gone; it aborts rather than hanging.
        assert_eq!(first.next_reply(Duration::from_millis(10)).await, None);

        assert!(dialogues.route(user, channel, "second wins"));
        let reply = second.next_reply(Duration::from_secs(1)).await;
        assert_eq!(reply.as_deref(), Some("second wins"));

        // Dropping the stale handle must not deregister the live dialogue.
        drop(first);
        assert!(dialogues.route(user, channel, "still live"));
    }
}
