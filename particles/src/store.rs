//! Publish/subscribe value store.
//!
//! DESIGN
//! ======
//! Shared state the simulation reads every frame (settings, hand tracking) is
//! held in a `Store<T>` owned by the engine and passed to animations by
//! reference. Writers mutate through [`Store::update`], which bumps a version
//! counter and notifies subscribers synchronously. Readers take whatever the
//! latest value is when their frame starts; there is no cross-field
//! transaction, last write wins.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A value plus the listeners that want to hear about changes to it.
pub struct Store<T> {
    value: T,
    version: u64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self { value, version: 0, next_id: 0, listeners: Vec::new() }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Number of updates applied since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut T),
    {
        mutate(&mut self.value);
        self.notify();
    }

    /// Replace the value wholesale and notify subscribers.
    pub fn replace(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Register a listener called after every update.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        self.version += 1;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }
}

impl<T: Clone> Store<T> {
    /// Owned copy of the current value, for a once-per-frame read.
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.value.clone()
    }
}
