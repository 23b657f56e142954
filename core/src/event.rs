use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
        Arc,
    },
    thread::JoinHandle,
};

use crate::{error::PincrackResult, search::SearchReport};

/// An event to track the progress of a running search.
pub enum Event {
    /// Overall progress of the search in percent.
    Progress(f64),
    /// The nth batch was dispatched and its matches recorded.
    Batch {
        batch_number: u64,
        batch_count: u64,
        matches: u64,
    },
}

/// A handle on a search running in a background thread.
pub struct SearchHandle {
    pub(crate) handle: JoinHandle<PincrackResult<SearchReport>>,
    pub(crate) receiver: Receiver<Event>,
    pub(crate) cancel: Arc<AtomicBool>,
}

impl SearchHandle {
    /// Returns the report of the search.
    /// Blocks until the search is finished.
    pub fn join(self) -> PincrackResult<SearchReport> {
        self.handle.join().unwrap()
    }

    /// Blocks until an event is received.
    /// Returns `None` once the search is finished.
    pub fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().ok()
    }

    /// Asks the search to stop before the next batch is dispatched.
    /// The batch currently in flight still completes and is recorded.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
