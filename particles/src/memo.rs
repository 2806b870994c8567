//! Change-detection guard for expensive per-frame side effects.
//!
//! Sprite rasterization, blend-mode switches and target regeneration must run
//! only when the settings that drive them actually change. Each animation
//! holds one [`ChangeGuard`] per side effect, keyed by exactly the settings
//! fields that side effect depends on, and asks it once per frame.

#[cfg(test)]
#[path = "memo_test.rs"]
mod memo_test;

/// Remembers the last key seen and reports when a new one differs.
///
/// Comparison is exact `PartialEq`, so float keys only fire on a real edit.
#[derive(Debug, Clone)]
pub struct ChangeGuard<K> {
    last: Option<K>,
}

impl<K> Default for ChangeGuard<K> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<K: PartialEq> ChangeGuard<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard that treats `key` as already applied.
    #[must_use]
    pub fn primed(key: K) -> Self {
        Self { last: Some(key) }
    }

    /// Record `key` and return `true` if it differs from the last one
    /// (always `true` on first use of an unprimed guard).
    pub fn changed(&mut self, key: K) -> bool {
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        self.last = Some(key);
        true
    }

    /// The last recorded key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.last.as_ref()
    }

    /// Forget the last key so the next call fires.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
