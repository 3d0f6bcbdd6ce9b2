/// Background save pipeline
///
/// `ImageSaver` owns a single worker thread that runs saves one at a time,
/// in submission order. Results come back either
/// - as a callback posted to a `UiHandle`, which runs on whatever thread
///   drains the matching `UiDispatcher` (the UI thread), or
/// - through a future, for event loops that already route async results
///   back to the UI (iced's `Task::perform`).
///
/// Every failure is logged and reported as `false`. Nothing propagates.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

use super::processor::{self, SaveOptions};
use crate::color::ColorTransform;
use crate::error::{Error, Result};
use crate::state::data::PhotoAsset;
use crate::state::media_store::MediaRegistrar;

type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Task queue owned by the UI thread
///
/// Callbacks posted through any `UiHandle` run here, in FIFO order, when the
/// owner calls `run_pending` or `run_next_blocking`.
pub struct UiDispatcher {
    tx: mpsc::UnboundedSender<UiTask>,
    rx: mpsc::UnboundedReceiver<UiTask>,
}

impl UiDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A cloneable handle that other threads use to post work here
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every queued task. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Block until one task arrives, then run it
    ///
    /// Must not be called from inside an async runtime.
    pub fn run_next_blocking(&mut self) {
        if let Some(task) = self.rx.blocking_recv() {
            task();
        }
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiTask>,
}

impl UiHandle {
    /// Queue `task` for the UI thread. Dropped if the dispatcher is gone.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        if self.tx.send(Box::new(task)).is_err() {
            log::debug!("UI dispatcher dropped, discarding task");
        }
    }
}

enum Completion {
    Callback {
        ui: UiHandle,
        on_complete: Box<dyn FnOnce(bool) + Send + 'static>,
    },
    Channel(oneshot::Sender<bool>),
}

impl Completion {
    fn deliver(self, result: bool) {
        match self {
            Completion::Callback { ui, on_complete } => ui.post(move || on_complete(result)),
            Completion::Channel(tx) => {
                // The receiver may have stopped waiting; nothing to report to
                let _ = tx.send(result);
            }
        }
    }
}

struct SaveJob {
    photo: PhotoAsset,
    transform: ColorTransform,
    completion: Completion,
}

/// Saves brightness-altered photos on a dedicated background thread
pub struct ImageSaver {
    jobs: mpsc::UnboundedSender<SaveJob>,
    worker: JoinHandle<()>,
}

impl ImageSaver {
    /// Start the worker thread
    pub fn new(registrar: Arc<dyn MediaRegistrar>, options: SaveOptions) -> Result<Self> {
        let (jobs, rx) = mpsc::unbounded_channel();

        let worker = thread::Builder::new()
            .name("image-saver".to_string())
            .spawn(move || run_worker(rx, registrar, options))
            .map_err(|e| {
                log::error!("Failed to start save worker: {}", e);
                Error::WorkerUnavailable
            })?;

        Ok(Self { jobs, worker })
    }

    /// Save in the background, then run `on_complete(result)` on the UI thread
    ///
    /// `on_complete` is called exactly once, with `true` only if the altered
    /// photo was fully written to a new shared-storage entry.
    pub fn save_with_callback<F>(
        &self,
        photo: &PhotoAsset,
        transform: ColorTransform,
        ui: &UiHandle,
        on_complete: F,
    ) where
        F: FnOnce(bool) + Send + 'static,
    {
        let job = SaveJob {
            photo: photo.clone(),
            transform,
            completion: Completion::Callback {
                ui: ui.clone(),
                on_complete: Box::new(on_complete),
            },
        };

        if let Err(mpsc::error::SendError(job)) = self.jobs.send(job) {
            log::error!("Save worker is gone, reporting failure for {}", job.photo.display_name());
            job.completion.deliver(false);
        }
    }

    /// Save in the background and resolve to the result
    pub fn save(
        &self,
        photo: &PhotoAsset,
        transform: ColorTransform,
    ) -> impl std::future::Future<Output = bool> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        let job = SaveJob {
            photo: photo.clone(),
            transform,
            completion: Completion::Channel(tx),
        };

        if self.jobs.send(job).is_err() {
            log::error!("Save worker is gone, reporting failure for {}", photo.display_name());
        }

        // A dropped sender (worker gone) reads as a failed save
        async move { rx.await.unwrap_or(false) }
    }

    /// Stop accepting jobs and wait for the queued ones to finish
    pub fn shutdown(self) {
        let ImageSaver { jobs, worker } = self;
        drop(jobs);
        if worker.join().is_err() {
            log::error!("Save worker panicked during shutdown");
        }
    }
}

impl std::fmt::Debug for ImageSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSaver")
            .field("worker", &self.worker.thread().name())
            .finish()
    }
}

fn run_worker(
    mut rx: mpsc::UnboundedReceiver<SaveJob>,
    registrar: Arc<dyn MediaRegistrar>,
    options: SaveOptions,
) {
    log::debug!("Save worker started");

    while let Some(job) = rx.blocking_recv() {
        let result = run_job(&job.photo, &job.transform, registrar.as_ref(), &options);
        job.completion.deliver(result);
    }

    log::debug!("Save worker stopped");
}

fn run_job(
    photo: &PhotoAsset,
    transform: &ColorTransform,
    registrar: &dyn MediaRegistrar,
    options: &SaveOptions,
) -> bool {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        processor::save_altered_photo(photo, transform, registrar, options)
    }));

    match outcome {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::error!("❌ Failed to save {}: {}", photo.display_name(), e);
            false
        }
        Err(_) => {
            log::error!("❌ Save of {} panicked", photo.display_name());
            false
        }
    }
}
