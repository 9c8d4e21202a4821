//! Change notification for the family graph
//!
//! The graph fires a synchronous, payload-free callback after every mutation
//! that actually changed state; observers are expected to re-read the graph
//! (and typically re-run layout) rather than diff an event. This keeps the
//! store independent of any particular UI framework.

use std::fmt;

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// A plain publish/subscribe listener list.
///
/// Listeners run in subscription order, on the caller's thread, after the
/// mutation (including stabilization) has fully completed. A listener must
/// not re-enter the graph mutably; it only observes.
#[derive(Default)]
pub struct ChangeNotifier {
    next_token: u64,
    listeners: Vec<(SubscriptionToken, Box<dyn FnMut()>)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns a token for later removal
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.listeners.push((token, Box::new(listener)));
        token
    }

    /// Remove a listener; unknown tokens are ignored
    pub fn unsubscribe(&mut self, token: SubscriptionToken) {
        self.listeners.retain(|(t, _)| *t != token);
    }

    /// Invoke every listener once, in subscription order
    pub fn emit(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let count = Rc::new(Cell::new(0));
        let mut notifier = ChangeNotifier::new();
        for _ in 0..3 {
            let count = Rc::clone(&count);
            notifier.subscribe(move || count.set(count.get() + 1));
        }
        notifier.emit();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(Cell::new(0));
        let mut notifier = ChangeNotifier::new();
        let token = {
            let count = Rc::clone(&count);
            notifier.subscribe(move || count.set(count.get() + 1))
        };
        notifier.emit();
        notifier.unsubscribe(token);
        notifier.emit();
        assert_eq!(count.get(), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_unknown_token_is_ignored() {
        let mut notifier = ChangeNotifier::new();
        let token = notifier.subscribe(|| {});
        notifier.unsubscribe(token);
        notifier.unsubscribe(token);
        assert_eq!(notifier.len(), 0);
    }
}
