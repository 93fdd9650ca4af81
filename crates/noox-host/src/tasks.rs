//! Named background threads with a cooperative shutdown flag.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use thiserror::Error;

/// Errors surfaced while spawning or joining a loop thread.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The operating system refused to create the thread.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        #[source]
        source: io::Error,
    },
    /// The loop panicked.
    #[error("{name} thread panicked")]
    Panicked {
        /// Thread name.
        name: &'static str,
    },
}

/// Handle to a loop running on its own thread.
///
/// The loop receives a shared flag and is expected to return soon after the
/// flag is raised. Dropping the handle raises the flag without joining.
pub struct LoopHandle<T> {
    name: &'static str,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<T>>,
}

impl<T: Send + 'static> LoopHandle<T> {
    /// Spawns `body` on a thread called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Spawn`] if the thread cannot be created.
    pub fn spawn<F>(name: &'static str, body: F) -> Result<Self, TaskError>
    where
        F: FnOnce(&AtomicBool) -> T + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || body(&flag))
            .map_err(|source| TaskError::Spawn { name, source })?;
        Ok(Self {
            name,
            shutdown,
            handle: Some(handle),
        })
    }
}

impl<T> LoopHandle<T> {
    /// Thread name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Asks the loop to stop at its next check.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Returns true once the loop body has returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(thread::JoinHandle::is_finished)
    }

    /// Waits for the loop to return and yields its result.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Panicked`] if the loop panicked.
    pub fn join(mut self) -> Result<Option<T>, TaskError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map(Some)
                .map_err(|_| TaskError::Panicked { name: self.name }),
            None => Ok(None),
        }
    }
}

impl<T> Drop for LoopHandle<T> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl<T> std::fmt::Debug for LoopHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopHandle")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}
