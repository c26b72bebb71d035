//! Shared store plumbing: observable state, the loading guard and failure
//! recording.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;

use super::{BestEffort, StoreError, StoreResult};
use crate::api::{ApiError, ApiResult, RecoveryApi};
use crate::i18n::{Locale, Operation};

/// Transient flags every store state carries
pub trait StoreState: Clone + Default + Send + Sync + 'static {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

/// API handle, locale and published state shared by every store
pub(crate) struct StoreCore<S: StoreState> {
    pub(crate) api: Arc<dyn RecoveryApi>,
    locale: Locale,
    state: watch::Sender<S>,
    in_flight: AtomicUsize,
}

impl<S: StoreState> StoreCore<S> {
    pub(crate) fn new(api: Arc<dyn RecoveryApi>, locale: Locale) -> Self {
        // send_modify keeps working after the initial receiver is dropped
        let (state, _rx) = watch::channel(S::default());
        Self {
            api,
            locale,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    pub(crate) fn modify(&self, f: impl FnOnce(&mut S)) {
        self.state.send_modify(f);
    }

    /// Raise `loading` until the returned guard is dropped
    ///
    /// Guards nest: `loading` drops back to false only when the last
    /// outstanding guard is released. The counter is only touched under the
    /// channel's write lock.
    pub(crate) fn loading(&self) -> LoadingGuard<'_, S> {
        self.modify(|s| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            s.set_loading(true);
        });
        LoadingGuard {
            state: &self.state,
            in_flight: &self.in_flight,
        }
    }

    /// Record a failed call and wrap it for the caller
    pub(crate) fn fail(&self, operation: Operation, source: ApiError) -> StoreError {
        let message = source
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| operation.fallback(self.locale).to_string());

        error!(operation = operation.name(), "{}: {}", message, source);

        let recorded = message.clone();
        self.modify(|s| s.set_error(Some(recorded)));

        StoreError {
            operation,
            message,
            source,
        }
    }

    pub(crate) fn settle<T>(&self, operation: Operation, result: ApiResult<T>) -> StoreResult<T> {
        result.map_err(|e| self.fail(operation, e))
    }

    pub(crate) fn degrade<T>(&self, operation: Operation, result: ApiResult<T>) -> BestEffort<T> {
        match result {
            Ok(value) => BestEffort::Fetched(value),
            Err(e) => BestEffort::Degraded {
                message: self.fail(operation, e).message,
            },
        }
    }
}

/// Releases one `loading` hold when dropped
pub(crate) struct LoadingGuard<'a, S: StoreState> {
    state: &'a watch::Sender<S>,
    in_flight: &'a AtomicUsize,
}

impl<S: StoreState> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            s.set_loading(remaining > 0);
        });
    }
}
