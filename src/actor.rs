//! Named worker threads.
//!
//! An [`Actor`] owns one [`Worker`] and runs it to completion on its own OS
//! thread. Workers are the expected concurrent callers of the property tree:
//! move a view into the worker and let it read and write from there.

use std::thread::{self, JoinHandle};

use crate::{Error, Result};

/// A unit of work run by an [`Actor`].
pub trait Worker: Send + 'static {
    fn run(&mut self);
}

impl<F> Worker for F
where
    F: FnMut() + Send + 'static,
{
    fn run(&mut self) {
        self()
    }
}

/// Handle to a worker and, while it runs, its thread.
pub struct Actor<W: Worker> {
    name: String,
    worker: Option<W>,
    thread: Option<JoinHandle<W>>,
}

impl<W: Worker> Actor<W> {
    pub fn new(name: impl Into<String>, worker: W) -> Self {
        Self { name: name.into(), worker: Some(worker), thread: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True from `start` until `join`, even once the worker has returned.
    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Spawn the worker on a new thread named after the actor.
    ///
    /// If the OS refuses the thread the worker is dropped with it.
    pub fn start(&mut self) -> Result<()> {
        let Some(mut worker) = self.worker.take() else {
            return Err(Error::WorkerAlreadyRunning { name: self.name.clone() });
        };
        let handle = thread::Builder::new().name(self.name.clone()).spawn(move || {
            worker.run();
            worker
        })?;
        tracing::debug!(actor = %self.name, "actor started");
        self.thread = Some(handle);
        Ok(())
    }

    /// Wait for the worker to finish.
    ///
    /// Returns `Ok(false)` when there is no thread to join. After a join the
    /// worker is back in the actor and can be inspected or started again.
    pub fn join(&mut self) -> Result<bool> {
        let Some(handle) = self.thread.take() else {
            return Ok(false);
        };
        match handle.join() {
            Ok(worker) => {
                self.worker = Some(worker);
                tracing::debug!(actor = %self.name, "actor joined");
                Ok(true)
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                tracing::warn!(actor = %self.name, %message, "actor worker panicked");
                Err(Error::WorkerPanicked { name: self.name.clone(), message })
            }
        }
    }

    /// The worker, when it is not running.
    pub fn worker(&self) -> Option<&W> {
        self.worker.as_ref()
    }

    pub fn into_worker(self) -> Option<W> {
        self.worker
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
