//! # Action Queue
//!
//! Per-host outbound mailbox for commands bound to remote agents. The scheduler
//! only ever enqueues; agents drain their host's queue on their own schedule.

use async_trait::async_trait;
use crossbeam::queue::SegQueue;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::ExecutionCommand;

/// Outbound queue the scheduler places host commands on.
///
/// Delivery is at-least-once: a command may be enqueued again after a
/// reschedule and agents must execute repeated command ids idempotently.
#[async_trait]
pub trait ActionQueue: Send + Sync {
    async fn enqueue(&self, host_name: &str, command: ExecutionCommand) -> Result<()>;
}

/// In-process action queue with one FIFO per host
#[derive(Debug, Default)]
pub struct InMemoryActionQueue {
    host_queues: DashMap<String, Arc<SegQueue<ExecutionCommand>>>,
}

impl InMemoryActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue_for(&self, host_name: &str) -> Arc<SegQueue<ExecutionCommand>> {
        Arc::clone(self.host_queues.entry(host_name.to_string()).or_default().value())
    }

    /// Take the oldest command for a host
    pub fn dequeue(&self, host_name: &str) -> Option<ExecutionCommand> {
        self.host_queues.get(host_name)?.pop()
    }

    /// Drain every command currently queued for a host, oldest first
    pub fn dequeue_all(&self, host_name: &str) -> Vec<ExecutionCommand> {
        let Some(queue) = self.host_queues.get(host_name).map(|q| Arc::clone(q.value())) else {
            return Vec::new();
        };
        std::iter::from_fn(|| queue.pop()).collect()
    }

    pub fn size(&self, host_name: &str) -> usize {
        self.host_queues
            .get(host_name)
            .map(|queue| queue.len())
            .unwrap_or(0)
    }

    pub fn total_size(&self) -> usize {
        self.host_queues.iter().map(|entry| entry.value().len()).sum()
    }
}

#[async_trait]
impl ActionQueue for InMemoryActionQueue {
    async fn enqueue(&self, host_name: &str, command: ExecutionCommand) -> Result<()> {
        debug!(
            host = %host_name,
            command_id = %command.command_id,
            "Enqueued command for host"
        );
        self.queue_for(host_name).push(command);
        Ok(())
    }
}
