// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          sync::{Arc, MutexGuard, PoisonError}};

use crate::{OutputRecord, StdMutex};

/// Unbounded FIFO of [`OutputRecord`]s shared by every producer and the output loop.
/// Cloning is cheap and all clones share the same queue.
///
/// Records come out in exactly the order they went in, and none is ever dropped or
/// duplicated. A panic while the lock is held does not poison the queue for everyone
/// else.
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    inner: Arc<StdMutex<VecDeque<OutputRecord>>>,
}

impl MessageQueue {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, VecDeque<OutputRecord>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, record: OutputRecord) { self.lock().push_back(record); }

    /// Take everything queued right now, oldest first.
    #[must_use]
    pub fn drain_all(&self) -> Vec<OutputRecord> { self.lock().drain(..).collect() }

    #[must_use]
    pub fn pop_front(&self) -> Option<OutputRecord> { self.lock().pop_front() }

    /// Put a record taken with [`Self::pop_front`] back at the head, for when it could
    /// not be rendered.
    pub fn push_front(&self, record: OutputRecord) { self.lock().push_front(record); }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.lock().len() }
}
