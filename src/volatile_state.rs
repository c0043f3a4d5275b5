use crate::{dialogue::Dialogues, store::Store};

/// State which is lost across sessions.  Everything the bot tracks lives here; there is
/// no on-disk state.
pub struct VolatileState {
    pub store: Store,
    pub dialogues: Dialogues,
}

impl VolatileState {
    pub fn new() -> Self {
        Self {
            store: Store::new(),
            dialogues: Dialogues::new(),
        }
    }
}
