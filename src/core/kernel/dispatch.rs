use crate::core::errors::ExchangeError;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A topic or error handler, synchronous or asynchronous.
///
/// The handler body runs on the dispatch worker, never on the task that
/// reads the socket.
pub struct Callback<M> {
    inner: Arc<dyn Fn(M) -> BoxFuture<'static, ()> + Send + Sync>,
}

impl<M> Clone for Callback<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> std::fmt::Debug for Callback<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}

impl<M: Send + 'static> Callback<M> {
    /// Wrap a synchronous handler
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(M) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self {
            inner: Arc::new(move |message| {
                let f = Arc::clone(&f);
                async move { f(message) }.boxed()
            }),
        }
    }

    /// Wrap an asynchronous handler
    pub fn new_async<F, Fut>(f: F) -> Self
    where
        F: Fn(M) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |message| f(message).boxed()),
        }
    }

    /// Build the job for one message; nothing runs until it is polled.
    pub(crate) fn job(&self, message: M) -> BoxFuture<'static, ()> {
        (self.inner)(message)
    }
}

/// Handler for failures surfaced while dispatching.
pub type ErrorCallback = Callback<ExchangeError>;

/// Bounded FIFO of callback jobs executed by one worker task.
///
/// Ordering is preserved. A full queue is logged and then awaited, so a
/// slow callback delays decoding instead of dropping data.
pub(crate) struct CallbackQueue {
    tx: Option<mpsc::Sender<BoxFuture<'static, ()>>>,
    worker: Option<JoinHandle<()>>,
    capacity: usize,
}

impl CallbackQueue {
    pub(crate) fn spawn(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, mut rx) = mpsc::channel::<BoxFuture<'static, ()>>(capacity);
        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job.await;
            }
            debug!("Callback worker drained");
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
            capacity,
        }
    }

    pub(crate) async fn push(&self, job: BoxFuture<'static, ()>) -> Result<(), ExchangeError> {
        let tx = self.tx.as_ref().ok_or_else(Self::closed)?;
        match tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(job)) => {
                warn!(
                    capacity = self.capacity,
                    "Callback queue is full; slow callbacks are delaying frame dispatch"
                );
                tx.send(job).await.map_err(|_| Self::closed())
            }
            Err(TrySendError::Closed(_)) => Err(Self::closed()),
        }
    }

    /// Stop accepting jobs and wait until every queued callback ran.
    pub(crate) async fn shutdown(mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!("Callback worker ended abnormally: {}", e);
            }
        }
    }

    fn closed() -> ExchangeError {
        ExchangeError::ProtocolError("Callback worker stopped".to_string())
    }
}
