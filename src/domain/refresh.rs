//! Analysis refresh signal.
//!
//! One coordinator owns a registry of observers notified whenever a new
//! analysis batch lands. Subscriptions are explicit tokens, so ownership is
//! visible and an observer can always be detached; there is no ambient
//! global signal.

/// Opaque subscription handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// Observer registry for "analysis data changed" notifications.
pub struct RefreshHub {
    next_token: u64,
    observers: Vec<(SubscriptionToken, Box<dyn FnMut()>)>,
}

impl RefreshHub {
    pub fn new() -> Self {
        Self {
            next_token: 0,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut() + 'static) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.observers.push((token, Box::new(observer)));
        token
    }

    /// Returns false if the token was already removed.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(t, _)| *t != token);
        self.observers.len() != before
    }

    /// Notify all current observers, in subscription order.
    pub fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer();
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for RefreshHub {
    fn default() -> Self {
        Self::new()
    }
}
