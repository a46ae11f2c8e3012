//! Ordered work queue between the intake and processor loops.
//!
//! FIFO end-to-end: dequeue order equals arrival order at the intake loop.
//! Capacity is an explicit design parameter; the default is unbounded to
//! match the original protocol, but a bound plus overflow policy can be
//! configured per session.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::message::QueuedCommand;

/// What to do with a push that would exceed a bounded queue's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Refuse the new command; the intake loop drops it.
    Reject,
    /// Evict the oldest queued command to make room.
    DropOldest,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

/// Queue error types.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (capacity {0})")]
    Full(usize),
}

/// FIFO command queue shared by the relay loops.
pub struct CommandQueue {
    inner: Mutex<VecDeque<QueuedCommand>>,
    notify: Notify,
    /// 0 means unbounded.
    capacity: usize,
    policy: OverflowPolicy,
}

impl CommandQueue {
    /// Create an unbounded queue (original protocol behavior).
    pub fn unbounded() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            capacity: 0,
            policy: OverflowPolicy::Reject,
        }
    }

    /// Create a bounded queue with the given overflow policy.
    pub fn bounded(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            notify: Notify::new(),
            capacity,
            policy,
        }
    }

    /// Build a queue from configured capacity (0 = unbounded).
    pub fn with_capacity(capacity: usize, policy: OverflowPolicy) -> Self {
        if capacity == 0 {
            Self::unbounded()
        } else {
            Self::bounded(capacity, policy)
        }
    }

    /// Append a command.
    ///
    /// On a full bounded queue this applies the overflow policy; the caller
    /// never blocks waiting for room.
    pub async fn push(&self, cmd: QueuedCommand) -> Result<(), QueueError> {
        let mut inner = self.inner.lock().await;
        if self.capacity > 0 && inner.len() >= self.capacity {
            match self.policy {
                OverflowPolicy::Reject => return Err(QueueError::Full(self.capacity)),
                OverflowPolicy::DropOldest => {
                    if let Some(evicted) = inner.pop_front() {
                        tracing::warn!(
                            seq = evicted.seq,
                            capacity = self.capacity,
                            "queue full, evicting oldest command"
                        );
                    }
                }
            }
        }
        inner.push_back(cmd);
        drop(inner);
        self.notify.notify_one();
        Ok(())
    }

    /// Remove and return the oldest command, suspending while empty.
    ///
    /// Cancellation-safe: aborting the future leaves the queue untouched.
    pub async fn pop(&self) -> QueuedCommand {
        loop {
            if let Some(cmd) = self.inner.lock().await.pop_front() {
                return cmd;
            }
            self.notify.notified().await;
        }
    }

    /// Remove the oldest command without waiting.
    pub async fn try_pop(&self) -> Option<QueuedCommand> {
        self.inner.lock().await.pop_front()
    }

    /// Number of commands enqueued but not yet processed.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Check if the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::InboundCommand;
    use std::sync::Arc;
    use std::time::Duration;

    fn cmd(seq: i64) -> QueuedCommand {
        QueuedCommand {
            command: InboundCommand {
                command: Some("set_mode".to_string()),
                mode: Some("SAFE".to_string()),
                seq: Some(seq),
            },
            seq,
            enqueued_at: seq as f64,
        }
    }

    #[tokio::test]
    async fn pop_preserves_fifo_order() {
        let queue = CommandQueue::unbounded();
        for seq in 1..=5 {
            queue.push(cmd(seq)).await.unwrap();
        }
        assert_eq!(queue.len().await, 5);
        for seq in 1..=5 {
            assert_eq!(queue.pop().await.seq, seq);
        }
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn pop_waits_for_push() {
        let queue = Arc::new(CommandQueue::unbounded());
        let popper = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await.seq })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(cmd(42)).await.unwrap();
        let seq = tokio::time::timeout(Duration::from_secs(1), popper)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seq, 42);
    }

    #[tokio::test]
    async fn bounded_reject_refuses_overflow() {
        let queue = CommandQueue::bounded(2, OverflowPolicy::Reject);
        queue.push(cmd(1)).await.unwrap();
        queue.push(cmd(2)).await.unwrap();
        let err = queue.push(cmd(3)).await.unwrap_err();
        assert!(matches!(err, QueueError::Full(2)));
        assert_eq!(queue.len().await, 2);
        assert_eq!(queue.pop().await.seq, 1);
    }

    #[tokio::test]
    async fn bounded_drop_oldest_evicts_head() {
        let queue = CommandQueue::bounded(2, OverflowPolicy::DropOldest);
        queue.push(cmd(1)).await.unwrap();
        queue.push(cmd(2)).await.unwrap();
        queue.push(cmd(3)).await.unwrap();
        assert_eq!(queue.len().await, 2);
        assert_eq!(queue.pop().await.seq, 2);
        assert_eq!(queue.pop().await.seq, 3);
    }

    #[tokio::test]
    async fn zero_capacity_means_unbounded() {
        let queue = CommandQueue::with_capacity(0, OverflowPolicy::Reject);
        for seq in 0..100 {
            queue.push(cmd(seq)).await.unwrap();
        }
        assert_eq!(queue.len().await, 100);
    }
}
