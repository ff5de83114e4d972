//! Command dispatch and history.
//!
//! The dispatcher owns the pub/sub surface for parsed commands:
//! subscribers register directly with the dispatcher instance and are
//! notified synchronously, in subscription order, for every command —
//! including `"unknown"` ones. A panicking subscriber is isolated: it is
//! logged and the remaining subscribers still run.
//!
//! History is an append-only log owned exclusively by the dispatcher.
//! Reads hand out a defensive copy; only `clear_history` empties it.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::command::VoiceCommand;

type Subscriber = Box<dyn FnMut(&VoiceCommand) + Send>;

pub struct CommandDispatcher {
    subscribers: Vec<Subscriber>,
    history: VecDeque<VoiceCommand>,
    history_cap: Option<usize>,
}

impl CommandDispatcher {
    /// Dispatcher with unbounded history.
    pub fn new() -> Self {
        Self::with_history_cap(None)
    }

    /// Dispatcher whose history keeps at most `cap` commands, dropping
    /// the oldest on overflow. `None` means unbounded.
    pub fn with_history_cap(cap: Option<usize>) -> Self {
        Self {
            subscribers: Vec::new(),
            history: VecDeque::new(),
            history_cap: cap,
        }
    }

    /// Register a subscriber. Notification order is subscription order.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&VoiceCommand) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Append `command` to history and notify every subscriber.
    ///
    /// History is appended before notification so a panicking subscriber
    /// can never leave the log missing a dispatched command.
    pub fn dispatch(&mut self, command: VoiceCommand) {
        if let Some(cap) = self.history_cap {
            while self.history.len() >= cap.max(1) {
                self.history.pop_front();
            }
            if cap > 0 {
                self.history.push_back(command.clone());
            }
        } else {
            self.history.push_back(command.clone());
        }

        debug!(
            intent = %command.intent,
            subscribers = self.subscribers.len(),
            "dispatching voice command"
        );

        for (index, subscriber) in self.subscribers.iter_mut().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber(&command)));
            if outcome.is_err() {
                warn!(
                    subscriber = index,
                    intent = %command.intent,
                    "voice command subscriber panicked; continuing with remaining subscribers"
                );
            }
        }
    }

    /// Defensive copy of the dispatch history, oldest first.
    pub fn history(&self) -> Vec<VoiceCommand> {
        self.history.iter().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn command(n: usize) -> VoiceCommand {
        VoiceCommand::unknown(&format!("utterance {n}"), 1.0)
    }

    #[test]
    fn history_records_every_dispatch_in_order() {
        let mut dispatcher = CommandDispatcher::new();
        for n in 0..5 {
            dispatcher.dispatch(command(n));
        }
        let history = dispatcher.history();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].raw_text, "utterance 0");
        assert_eq!(history[4].raw_text, "utterance 4");

        dispatcher.clear_history();
        assert_eq!(dispatcher.history_len(), 0);
    }

    #[test]
    fn history_copy_is_defensive() {
        let mut dispatcher = CommandDispatcher::new();
        dispatcher.dispatch(command(0));
        let mut copy = dispatcher.history();
        copy.clear();
        assert_eq!(dispatcher.history_len(), 1);
    }

    #[test]
    fn history_cap_drops_oldest() {
        let mut dispatcher = CommandDispatcher::with_history_cap(Some(3));
        for n in 0..5 {
            dispatcher.dispatch(command(n));
        }
        let history = dispatcher.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].raw_text, "utterance 2");
        assert_eq!(history[2].raw_text, "utterance 4");
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut dispatcher = CommandDispatcher::new();
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            dispatcher.subscribe(move |_| order.lock().push(tag));
        }
        dispatcher.dispatch(command(0));
        assert_eq!(*order.lock(), ["first", "second", "third"]);
    }

    #[test]
    fn panicking_subscriber_does_not_stop_the_rest() {
        let reached = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = CommandDispatcher::new();

        dispatcher.subscribe(|_| panic!("listener bug"));
        let reached_clone = Arc::clone(&reached);
        dispatcher.subscribe(move |_| {
            reached_clone.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.dispatch(command(0));
        dispatcher.dispatch(command(1));

        assert_eq!(reached.load(Ordering::SeqCst), 2);
        // History stays intact despite the panics.
        assert_eq!(dispatcher.history_len(), 2);
    }
}
