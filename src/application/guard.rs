use crate::config::GuardConfig;
use crate::domain::ports::PageRef;
use crate::domain::surface::SurfaceId;
use crate::sync::lock;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Keeps the prediction form's submit control busy while a submission is in
/// flight, and releases it after a fixed delay whatever happens.
///
/// There is no success path: a successful submission navigates away and the
/// guard goes with the page.
pub struct SubmissionGuard {
    page: PageRef,
    config: GuardConfig,
    /// Label captured by the first submit, restored on release.
    original_label: Arc<Mutex<Option<String>>>,
    release: Mutex<Option<JoinHandle<()>>>,
    runtime: Handle,
}

impl SubmissionGuard {
    /// Returns `None` when the page has no form to guard.
    ///
    /// # Panics
    ///
    /// Panics when a form is present and this is called outside a tokio
    /// runtime. Release timers run on the runtime current at install time, so
    /// [`on_submit`](Self::on_submit) itself can be called from any thread.
    pub fn install(page: PageRef, config: GuardConfig) -> Option<Self> {
        page.lookup(SurfaceId::HostForm)?;
        Some(Self {
            page,
            config,
            original_label: Arc::new(Mutex::new(None)),
            release: Mutex::new(None),
            runtime: Handle::current(),
        })
    }

    /// Handles a submit event on the guarded form.
    pub fn on_submit(&self) {
        let Some(control) = self.page.lookup(SurfaceId::SubmitControl) else {
            tracing::debug!("form submitted without a submit control");
            return;
        };

        let restore_to = lock(&self.original_label)
            .get_or_insert_with(|| control.text())
            .clone();
        control.set_enabled(false);
        control.set_text(&self.config.busy_label);

        let deadline = Instant::now() + self.config.release_after;
        let original_label = Arc::clone(&self.original_label);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::debug!(label = %restore_to, "releasing submit control");
            control.set_enabled(true);
            control.set_text(&restore_to);
            lock(&original_label).take();
        });

        if let Some(previous) = lock(&self.release).replace(handle) {
            previous.abort();
        }
    }

    /// Whether the control is still waiting to be released.
    pub fn is_busy(&self) -> bool {
        lock(&self.original_label).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Page;
    use crate::infrastructure::in_memory::InMemoryPage;
    use std::time::Duration;

    #[test]
    fn test_no_form_installs_nothing() {
        let page = InMemoryPage::provisioned();
        page.remove(SurfaceId::HostForm);
        assert!(SubmissionGuard::install(Arc::new(page), GuardConfig::default()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_control_is_ignored() {
        let page = Arc::new(InMemoryPage::provisioned());
        page.remove(SurfaceId::SubmitControl);
        let guard = SubmissionGuard::install(page.clone(), GuardConfig::default()).unwrap();

        guard.on_submit();
        assert!(!guard.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_keeps_first_label_and_restarts_timer() {
        let page = Arc::new(InMemoryPage::provisioned());
        let guard = SubmissionGuard::install(page.clone(), GuardConfig::default()).unwrap();
        let control = page.lookup(SurfaceId::SubmitControl).unwrap();

        guard.on_submit();
        tokio::time::sleep(Duration::from_secs(10)).await;
        guard.on_submit();
        assert_eq!(control.text(), "Analyzing...");

        // The first timer would have fired at 15s; the second runs until 25s.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!control.is_enabled());
        assert!(guard.is_busy());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(control.is_enabled());
        assert_eq!(control.text(), "Predict");
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_submit_from_thread_without_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap();
        let page = Arc::new(InMemoryPage::provisioned());
        let config = GuardConfig {
            release_after: Duration::from_millis(50),
            ..GuardConfig::default()
        };
        let guard = {
            let _entered = runtime.enter();
            Arc::new(SubmissionGuard::install(page.clone(), config).unwrap())
        };
        let control = page.lookup(SurfaceId::SubmitControl).unwrap();

        let submitter = Arc::clone(&guard);
        std::thread::spawn(move || submitter.on_submit())
            .join()
            .unwrap();
        assert!(!control.is_enabled());
        assert_eq!(control.text(), "Analyzing...");

        runtime.block_on(async { tokio::time::sleep(Duration::from_millis(300)).await });
        assert!(control.is_enabled());
        assert_eq!(control.text(), "Predict");
        assert!(!guard.is_busy());
    }
}
