//! Observable editor store.
//!
//! [`Store`] holds the current revision and runs every action through
//! [`dispatch`]. Subscribers watch a slice of the state chosen by a selector
//! and are called only when that slice changes.

use crate::action::Action;
use crate::config::EditorConfig;
use crate::dispatch::dispatch;
use crate::state::EditorState;
use std::sync::Arc;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Called with each new revision. Returns whether the listener fired.
type Notify = Box<dyn FnMut(&EditorState) -> bool + Send>;

struct Subscriber {
    id: SubscriptionId,
    notify: Notify,
}

/// Owns the live editor state and notifies subscribers of changes.
pub struct Store {
    state: Arc<EditorState>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl Store {
    pub fn new(config: Arc<EditorConfig>) -> Self {
        Self::with_state(EditorState::new(config))
    }

    pub fn with_state(state: EditorState) -> Self {
        Self {
            state: Arc::new(state),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// The current revision. Holding on to it keeps that revision alive and unchanged.
    pub fn state(&self) -> Arc<EditorState> {
        Arc::clone(&self.state)
    }

    /// Apply an action and notify subscribers whose slice changed.
    pub fn dispatch(&mut self, action: Action) -> Arc<EditorState> {
        let next = dispatch(&self.state, action);
        self.replace(next);
        self.state()
    }

    /// Replace the state with a fresh session using the same configuration.
    pub fn reset(&mut self) {
        let config = Arc::clone(&self.state.config);
        self.replace(EditorState::new(config));
    }

    /// Replace the state wholesale, e.g. with a session restored from storage.
    pub fn hydrate(&mut self, state: EditorState) {
        log::info!("Hydrating store with board '{}'", state.board.name);
        self.replace(state);
    }

    /// Watch the slice of state picked by `selector`.
    ///
    /// `listener` runs with the new slice each time it differs from the
    /// previous one. It is not called on subscription.
    pub fn subscribe<T, S, L>(&mut self, selector: S, mut listener: L) -> SubscriptionId
    where
        T: PartialEq + Send + 'static,
        S: Fn(&EditorState) -> T + Send + 'static,
        L: FnMut(&T) + Send + 'static,
    {
        let mut last = selector(&self.state);
        let notify: Notify = Box::new(move |state: &EditorState| {
            let value = selector(state);
            if value == last {
                return false;
            }
            listener(&value);
            last = value;
            true
        });

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, notify });
        id
    }

    /// Stop notifying a subscriber. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn replace(&mut self, next: EditorState) {
        self.state = Arc::new(next);
        let state = Arc::clone(&self.state);
        let mut fired = 0;
        for subscriber in &mut self.subscribers {
            if (subscriber.notify)(&state) {
                fired += 1;
            }
        }
        if fired > 0 {
            log::debug!("Notified {} of {} subscribers", fired, self.subscribers.len());
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Arc::new(EditorConfig::default()))
    }
}
