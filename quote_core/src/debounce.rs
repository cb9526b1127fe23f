//! Trailing-edge debouncing on tokio.
//!
//! Calls arriving within `wait` of each other are coalesced; only the last
//! value is handed to the handler, `wait` after the last call. The handler
//! runs inside a single task, so one invocation always completes before the
//! next one starts.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces bursts of values and runs an async handler on the last one.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debouncing task on the current tokio runtime.
    pub fn spawn<F, Fut>(wait: Duration, mut handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                // Restart the quiet period on every new value
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => pending = value,
                            None => break,
                        },
                        _ = tokio::time::sleep(wait) => break,
                    }
                }
                handler(pending).await;
            }
        });

        Debouncer { tx, task }
    }

    /// Schedule `value`. Returns `false` if the debouncer has shut down.
    pub fn call(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Stop accepting values, run any pending one, and wait for the task.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            tracing::error!("Debounce task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl FnMut(u32) -> std::future::Ready<()> + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |v| {
            sink.lock().unwrap().push(v);
            std::future::ready(())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_coalesced_to_last_value() {
        let (seen, handler) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), handler);

        for v in 1..=5 {
            debouncer.call(v);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*seen.lock().unwrap(), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (seen, handler) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), handler);

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.call(2);
        debouncer.call(3);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_value() {
        let (seen, handler) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_secs(10), handler);

        debouncer.call(7);
        debouncer.close().await;

        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }
}
