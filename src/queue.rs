//! Task queue bound to the UI thread.
//!
//! Everything that changes how a table looks runs on the thread that created
//! it. Other threads, and code that wants its change to land after pending
//! layout work, post a closure through a [`UiHandle`]; the owner runs queued
//! closures in FIFO order from its event loop.

use std::fmt;
use std::thread::{self, ThreadId};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{trace, warn};

pub type Task<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Sending half of a UI queue. Cheap to clone and safe to move across threads.
pub struct UiHandle<S> {
    sender: Sender<Task<S>>,
    ui_thread: ThreadId,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            ui_thread: self.ui_thread,
        }
    }
}

impl<S> fmt::Debug for UiHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle")
            .field("ui_thread", &self.ui_thread)
            .field("queued", &self.sender.len())
            .finish()
    }
}

impl<S> UiHandle<S> {
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    /// Queue `task` to run on the UI thread. Never runs it inline.
    pub fn invoke_later(&self, task: impl FnOnce(&mut S) + Send + 'static) {
        if !self.is_ui_thread() {
            trace!("Re-posting task from {:?} onto the UI thread", thread::current().id());
        }
        // The receiver lives as long as the owning widget, a send can only
        // fail after it has been dropped and then there is nothing to update.
        if self.sender.send(Box::new(task)).is_err() {
            trace!("UI queue closed, dropping task");
        }
    }

    pub fn queued(&self) -> usize {
        self.sender.len()
    }
}

/// Receiving half, owned by the widget on the UI thread.
pub struct UiQueue<S> {
    receiver: Receiver<Task<S>>,
    ui_thread: ThreadId,
}

impl<S> fmt::Debug for UiQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiQueue")
            .field("ui_thread", &self.ui_thread)
            .field("queued", &self.receiver.len())
            .finish()
    }
}

/// Create a queue bound to the calling thread.
pub fn ui_queue<S>() -> (UiHandle<S>, UiQueue<S>) {
    let (sender, receiver) = unbounded();
    let ui_thread = thread::current().id();
    (
        UiHandle { sender, ui_thread },
        UiQueue {
            receiver,
            ui_thread,
        },
    )
}

impl<S> UiQueue<S> {
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Detached receiver so the queue can be drained while `state` (which
    /// usually owns the queue) is borrowed mutably.
    pub(crate) fn receiver(&self) -> Receiver<Task<S>> {
        self.receiver.clone()
    }
}

/// Run every queued task against `state`, including tasks queued while
/// draining. Returns the number of tasks run; off the UI thread nothing runs.
pub fn run_pending<S>(queue: &Receiver<Task<S>>, ui_thread_ok: bool, state: &mut S) -> usize {
    if !ui_thread_ok {
        warn!("Ignoring attempt to drain the UI queue from {:?}", thread::current().id());
        return 0;
    }
    let mut count = 0;
    while let Ok(task) = queue.try_recv() {
        task(state);
        count += 1;
    }
    count
}
