//! Progress-callback trait for render and batch events.
//!
//! Inject an [`Arc<dyn ConvertProgressCallback>`] via
//! [`crate::config::ConvertConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through pages and batch files.
//!
//! # Why callbacks instead of channels?
//!
//! The callback is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log record, or a GUI
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` because rasterisation runs on a blocking worker
//! thread, not on the caller's thread.

use std::sync::Arc;

/// Called by the pipeline as it renders pages and works through a batch.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events fire in a strictly serial pipeline, but the
/// rendering events originate from a blocking worker thread, hence the
/// `Send + Sync` bound.
pub trait ConvertProgressCallback: Send + Sync {
    /// Called once per conversion, before the first page is rasterised.
    fn on_render_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page has been rasterised.
    ///
    /// `page_num` is 1-indexed.
    fn on_page_rendered(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once per batch run, before the first file is processed.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called after each batch file has been attempted, successfully or not.
    ///
    /// `file_num` is 1-indexed.
    fn on_file_complete(&self, file_num: usize, total_files: usize, success: bool) {
        let _ = (file_num, total_files, success);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConvertProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConvertConfig`].
pub type ProgressCallback = Arc<dyn ConvertProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        pages: AtomicUsize,
        files: AtomicUsize,
        failures: AtomicUsize,
    }

    impl ConvertProgressCallback for TrackingCallback {
        fn on_page_rendered(&self, _page_num: usize, _total_pages: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _file_num: usize, _total_files: usize, success: bool) {
            self.files.fetch_add(1, Ordering::SeqCst);
            if !success {
                self.failures.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_render_start(5);
        cb.on_page_rendered(1, 5);
        cb.on_batch_start(2);
        cb.on_file_complete(1, 2, true);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            pages: AtomicUsize::new(0),
            files: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        };

        tracker.on_render_start(3);
        tracker.on_page_rendered(1, 3);
        tracker.on_page_rendered(2, 3);
        tracker.on_page_rendered(3, 3);
        tracker.on_file_complete(1, 2, true);
        tracker.on_file_complete(2, 2, false);

        assert_eq!(tracker.pages.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.files.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoopProgressCallback>();

        let cb: Arc<dyn ConvertProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_render_start(10);
    }
}
