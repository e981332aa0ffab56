//! Tokio runtime wrapper shared by the Reactor binaries.
//!
//! One [`CancellationToken`] is created per runtime. The HTTP server and the
//! live-detection loop watch it, Ctrl-C trips it, and [`ReactorRuntime::shutdown`]
//! trips it before giving outstanding tasks a grace period.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct ReactorHandle {
    inner: Handle,
    cancel: CancellationToken,
}

pub struct ReactorRuntime {
    runtime: Runtime,
    cancel: CancellationToken,
}

impl ReactorRuntime {
    /// Build a multi-threaded runtime.
    ///
    /// ```
    /// use reactor_runtime::ReactorRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = ReactorRuntime::build("doctest-runtime", Some(1))
    ///     .expect("runtime builds");
    /// let value = runtime.block_on(async { 2 + 2 });
    /// assert_eq!(value, 4);
    /// runtime.shutdown(Duration::from_millis(10));
    /// ```
    pub fn build(thread_name: &str, worker_threads: Option<usize>) -> Result<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(thread_name);

        if let Some(workers) = worker_threads {
            builder.worker_threads(workers.max(1));
        }

        let runtime = builder.build()?;
        Ok(Self {
            runtime,
            cancel: CancellationToken::new(),
        })
    }

    pub fn handle(&self) -> ReactorHandle {
        ReactorHandle {
            inner: self.runtime.handle().clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Cancel outstanding work and wait up to `graceful` for tasks to finish.
    pub fn shutdown(self, graceful: Duration) {
        self.cancel.cancel();
        self.runtime.shutdown_timeout(graceful);
    }
}

impl ReactorHandle {
    /// Spawn a future onto the shared runtime.
    ///
    /// ```
    /// use reactor_runtime::ReactorRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = ReactorRuntime::build("handle-doctest", Some(1)).unwrap();
    /// let handle = runtime.handle();
    /// let task = handle.spawn(async { 21 * 2 });
    /// let result = runtime.block_on(async move { task.await.unwrap() });
    /// assert_eq!(result, 42);
    /// runtime.shutdown(Duration::from_millis(10));
    /// ```
    pub fn spawn<F, T>(&self, fut: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.inner.spawn(fut)
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolves once shutdown has been requested.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Trip the shared token on Ctrl-C.
    ///
    /// ```
    /// use reactor_runtime::ReactorRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = ReactorRuntime::build("signal-example", Some(1)).unwrap();
    /// let handle = runtime.handle();
    /// let watcher = handle.cancel_on_ctrl_c();
    /// handle.cancellation().cancel();
    /// runtime.block_on(async move { watcher.await.unwrap() });
    /// runtime.shutdown(Duration::from_millis(10));
    /// ```
    pub fn cancel_on_ctrl_c(&self) -> JoinHandle<()> {
        let cancel = self.cancel.clone();
        self.inner.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                res = tokio::signal::ctrl_c() => {
                    match res {
                        Ok(()) => tracing::info!("runtime.ctrl_c"),
                        Err(e) => tracing::warn!(error = %e, "runtime.signal_unavailable"),
                    }
                    cancel.cancel();
                }
            }
        })
    }
}
