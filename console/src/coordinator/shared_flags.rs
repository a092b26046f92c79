// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// The two flags that the console loops and the outside world coordinate through.
///
/// - `paused` is owned by the input loop. It is `true` exactly while a line is being
///   edited, and the output loop stays off the screen while it's set.
/// - `finished` only ever goes from `false` to `true`. It is backed by a [`watch`]
///   channel so that callers can await it instead of polling.
#[derive(Debug)]
pub struct SharedFlags {
    paused: AtomicBool,
    finished: watch::Sender<bool>,
}

impl Default for SharedFlags {
    fn default() -> Self {
        Self {
            paused: AtomicBool::new(false),
            finished: watch::Sender::new(false),
        }
    }
}

impl SharedFlags {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn is_paused(&self) -> bool { self.paused.load(Ordering::Acquire) }

    pub fn set_paused(&self, paused: bool) { self.paused.store(paused, Ordering::Release); }

    #[must_use]
    pub fn is_finished(&self) -> bool { *self.finished.borrow() }

    /// Mark the console as finished. Calling this more than once is harmless.
    pub fn finish(&self) {
        self.finished.send_if_modified(|finished| {
            let changed = !*finished;
            *finished = true;
            changed
        });
    }

    /// Resolves once [`Self::finish`] has been called, immediately if it already was.
    pub async fn wait_until_finished(&self) {
        let mut receiver = self.finished.subscribe();
        // The sender lives in `self`, so this can't fail while we're borrowed.
        let _ = receiver.wait_for(|finished| *finished).await;
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;

    #[test]
    fn test_flags_start_cleared() {
        let flags = SharedFlags::new();
        assert!(!flags.is_paused());
        assert!(!flags.is_finished());
    }

    #[test]
    fn test_finished_is_monotonic() {
        let flags = SharedFlags::new();
        flags.finish();
        flags.finish();
        assert!(flags.is_finished());
    }

    #[tokio::test]
    async fn test_wait_until_finished() {
        let flags = Arc::new(SharedFlags::new());
        let flags_clone = flags.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            flags_clone.finish();
        });

        tokio::time::timeout(Duration::from_secs(1), flags.wait_until_finished())
            .await
            .unwrap();

        // Already finished resolves immediately.
        flags.wait_until_finished().await;
    }
}
