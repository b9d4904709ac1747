//! Background input hook and the `EventHandler` trait.

use crate::error::{Error, Result};
use crate::event::Event;
use crate::platform;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Trait for receiving input events from the hook.
///
/// Events are observed only; they still reach other applications.
pub trait EventHandler: Send + Sync {
    /// Called on the hook thread for every input event.
    fn handle_event(&self, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle_event(&self, event: &Event) {
        self(event);
    }
}

/// A running input hook on its own thread.
///
/// Dropping the handle stops the hook.
pub struct Hook {
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<Result<()>>>,
}

impl Hook {
    /// Start listening on a background thread and return immediately.
    ///
    /// The platform hook is process-wide, so starting a second one while the
    /// first is alive fails with [`Error::AlreadyRunning`].
    pub fn spawn<H: EventHandler + 'static>(handler: H) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = std::thread::Builder::new()
            .name("input-hook".into())
            .spawn(move || {
                let result = platform::run_hook(&flag, handler);
                flag.store(false, Ordering::SeqCst);
                result
            })
            .map_err(|e| Error::ThreadError(format!("failed to spawn hook thread: {e}")))?;

        Ok(Self {
            running,
            thread_handle: Some(handle),
        })
    }

    /// Check if the hook thread has exited on its own (normally because it
    /// failed to start).
    pub fn is_finished(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Stop the hook and wait for its thread, returning the hook's own result.
    pub fn stop(mut self) -> Result<()> {
        self.stop_inner()
    }

    fn stop_inner(&mut self) -> Result<()> {
        let Some(handle) = self.thread_handle.take() else {
            return Err(Error::NotRunning);
        };

        if self.running.swap(false, Ordering::SeqCst) {
            platform::stop_hook()?;
        }

        handle
            .join()
            .map_err(|_| Error::ThreadError("hook thread panicked".into()))?
    }
}

impl Drop for Hook {
    fn drop(&mut self) {
        if self.thread_handle.is_some()
            && let Err(e) = self.stop_inner()
        {
            log::warn!("input hook did not shut down cleanly: {e}");
        }
    }
}
