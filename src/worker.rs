//! Runs API calls off the UI thread and posts the completion event back into
//! the app channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One short-lived thread per request
    Threaded,
    /// Run on the calling thread and hand the completion back directly (tests)
    Inline,
}

pub struct RequestRunner {
    client: Arc<dyn ApiClient>,
    events: Sender<AppEvent>,
    mode: RunMode,
    in_flight: Arc<AtomicUsize>,
}

impl RequestRunner {
    pub fn new(client: Arc<dyn ApiClient>, events: Sender<AppEvent>, mode: RunMode) -> Self {
        Self {
            client,
            events,
            mode,
            in_flight: Arc::default(),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Requests started but not yet completed (threaded mode).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run `job` against the client. Threaded: returns None and the completion
    /// arrives through the channel. Inline: returns the completion.
    pub fn submit<F>(&self, job: F) -> Option<AppEvent>
    where
        F: FnOnce(&dyn ApiClient) -> AppEvent + Send + 'static,
    {
        match self.mode {
            RunMode::Inline => Some(job(self.client.as_ref())),
            RunMode::Threaded => {
                let client = Arc::clone(&self.client);
                let events = self.events.clone();
                let in_flight = Arc::clone(&self.in_flight);
                in_flight.fetch_add(1, Ordering::SeqCst);
                std::thread::spawn(move || {
                    let event = job(client.as_ref());
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    // receiver gone means the app is shutting down
                    if events.send(event).is_err() {
                        log::debug!("worker.drop reason=channel_closed");
                    }
                });
                None
            }
        }
    }
}
