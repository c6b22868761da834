// ABOUTME: Action sink trait and a shared queue UI components dispatch into
// ABOUTME: The app controller drains the queue on its logical thread

use crate::action::Action;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Anything that accepts dispatched actions
pub trait ActionSink {
    fn dispatch(&self, action: Action);
}

/// Clonable FIFO of dispatched actions
///
/// Collaborators hold a clone and push into it; the owner drains it
/// and feeds each action to the controller in dispatch order.
#[derive(Clone, Default)]
pub struct ActionQueue {
    queue: Arc<Mutex<VecDeque<Action>>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued action, oldest first
    pub fn drain(&self) -> Vec<Action> {
        let mut queue = self.queue.lock();
        queue.drain(..).collect()
    }

    /// Get the number of queued actions
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl ActionSink for ActionQueue {
    fn dispatch(&self, action: Action) {
        self.queue.lock().push_back(action);
    }
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionQueue")
            .field("queued", &self.len())
            .finish()
    }
}
