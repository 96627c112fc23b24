//! One worker task per active chat.
//!
//! Messages for a chat are queued and handled strictly in arrival order by
//! that chat's worker; chats never wait on each other.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::SendError, UnboundedSender};

struct Worker {
    tx: UnboundedSender<String>,
    last_seen: Instant,
}

impl Worker {
    // ---
    fn spawn<H, Fut>(chat_id: i64, handler: H) -> Self
    where
        H: Fn(i64, String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // ---
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                handler(chat_id, text).await;
            }
            tracing::debug!("Worker for chat {} stopped", chat_id);
        });

        Self {
            tx,
            last_seen: Instant::now(),
        }
    }
}

/// Per-chat message queues, each drained by its own task.
pub struct ChatQueues<H> {
    handler: H,
    idle: Duration,
    workers: HashMap<i64, Worker>,
}

impl<H, Fut> ChatQueues<H>
where
    H: Fn(i64, String) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    // ---
    /// `idle` is how long a chat may stay quiet before its worker is released.
    pub fn new(handler: H, idle: Duration) -> Self {
        // ---
        Self {
            handler,
            idle,
            workers: HashMap::new(),
        }
    }

    /// Queue one message for `chat_id`, starting its worker if needed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&mut self, chat_id: i64, text: String) {
        // ---
        let handler = self.handler.clone();
        let worker = self
            .workers
            .entry(chat_id)
            .or_insert_with(|| Worker::spawn(chat_id, handler.clone()));
        worker.last_seen = Instant::now();

        // A worker only stops early if its task panicked.
        if let Err(SendError(text)) = worker.tx.send(text) {
            tracing::warn!("Worker for chat {} was gone, restarting it", chat_id);
            *worker = Worker::spawn(chat_id, handler);
            if worker.tx.send(text).is_err() {
                tracing::error!("Dropped a message for chat {}", chat_id);
            }
        }
    }

    /// Release workers of chats quiet for longer than the idle period.
    ///
    /// Messages already queued are still handled before a released worker
    /// stops. Returns how many workers were released.
    pub fn release_idle(&mut self) -> usize {
        // ---
        let before = self.workers.len();
        let idle = self.idle;
        self.workers
            .retain(|_, worker| worker.last_seen.elapsed() < idle);

        before - self.workers.len()
    }

    /// Number of chats with a live worker.
    pub fn active(&self) -> usize {
        self.workers.len()
    }
}
