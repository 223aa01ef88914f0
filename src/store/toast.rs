//! Transient notifications shown in the corner of the screen

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::core::Revision;

const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
    Info,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

#[derive(Default)]
struct ToastQueue {
    next_id: u64,
    items: VecDeque<Toast>,
}

#[derive(Clone)]
pub struct Toasts {
    queue: Arc<Mutex<ToastQueue>>,
    lifetime: Duration,
    revision: Revision,
}

impl Toasts {
    pub fn new(lifetime: Duration, revision: Revision) -> Self {
        Self {
            queue: Arc::new(Mutex::new(ToastQueue::default())),
            lifetime,
            revision,
        }
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into()).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into()).await;
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into()).await;
    }

    async fn push(&self, kind: ToastKind, message: String) {
        {
            let mut queue = self.queue.lock().await;
            queue.next_id += 1;
            let id = queue.next_id;
            queue.items.push_back(Toast {
                id,
                kind,
                message,
                created_at: Instant::now(),
            });
            while queue.items.len() > MAX_VISIBLE {
                queue.items.pop_front();
            }
        }
        self.revision.bump();
    }

    /// Oldest first
    pub async fn visible(&self) -> Vec<Toast> {
        self.queue.lock().await.items.iter().cloned().collect()
    }

    pub async fn dismiss_latest(&self) {
        let removed = self.queue.lock().await.items.pop_back().is_some();
        if removed {
            self.revision.bump();
        }
    }

    /// Drop toasts older than the configured lifetime
    pub async fn expire_old(&self) {
        let removed = {
            let mut queue = self.queue.lock().await;
            let before = queue.items.len();
            let lifetime = self.lifetime;
            queue.items.retain(|t| t.created_at.elapsed() < lifetime);
            before != queue.items.len()
        };
        if removed {
            self.revision.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_is_capped() {
        let toasts = Toasts::new(Duration::from_secs(5), Revision::new());
        for i in 0..6 {
            toasts.info(format!("toast {}", i)).await;
        }
        let visible = toasts.visible().await;
        assert_eq!(visible.len(), MAX_VISIBLE);
        assert_eq!(visible[0].message, "toast 2");
        assert_eq!(visible.last().unwrap().message, "toast 5");
    }

    #[tokio::test]
    async fn test_expire_and_dismiss() {
        let toasts = Toasts::new(Duration::from_millis(20), Revision::new());
        toasts.error("first").await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        toasts.success("second").await;
        toasts.expire_old().await;

        let visible = toasts.visible().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind, ToastKind::Success);

        toasts.dismiss_latest().await;
        assert!(toasts.visible().await.is_empty());
    }
}
