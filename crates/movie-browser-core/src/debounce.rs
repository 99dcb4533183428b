use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to a delayed task; cancelling after it fired is harmless.
#[derive(Debug)]
pub struct CancelHandle {
    task: JoinHandle<()>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run `action` after `delay` on the current Tokio runtime unless cancelled first.
pub fn schedule_after<F>(delay: Duration, action: F) -> CancelHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        action.await;
    });
    CancelHandle { task }
}

/// Trailing-edge debouncer: each `schedule` cancels the previous pending action.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<CancelHandle>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(schedule_after(delay, action));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let _handle = schedule_after(Duration::from_millis(500), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handle = schedule_after(Duration::from_millis(100), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_keeps_only_last() {
        let fired = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new();

        for value in 1..=3 {
            let fired = fired.clone();
            debouncer.schedule(Duration::from_millis(500), async move {
                fired.lock().unwrap().push(value);
            });
            sleep(Duration::from_millis(100)).await;
        }
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(*fired.lock().unwrap(), vec![3]);
        assert!(!debouncer.is_pending());
    }
}
