//! Transient "saved" status with a delayed revert to idle
//!
//! Each save bumps a generation counter and schedules one revert task on the
//! runtime. Scheduling a new revert aborts the previous task, and a task that
//! wakes anyway only reverts if its generation is still the latest.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::constants::status::{IDLE_TEXT, REVERT_DELAY_MS, SAVED_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Saved,
}

impl Status {
    pub fn text(&self) -> &'static str {
        match self {
            Status::Idle => IDLE_TEXT,
            Status::Saved => SAVED_TEXT,
        }
    }
}

/// Current status plus the generation of the save that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: Status,
    pub generation: u64,
}

pub struct StatusLine {
    runtime: Handle,
    delay: Duration,
    generation: Arc<AtomicU64>,
    tx: Arc<watch::Sender<StatusSnapshot>>,
    pending: Option<JoinHandle<()>>,
}

impl StatusLine {
    pub fn new(runtime: Handle) -> Self {
        Self::with_delay(runtime, Duration::from_millis(REVERT_DELAY_MS))
    }

    pub fn with_delay(runtime: Handle, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot {
            status: Status::Idle,
            generation: 0,
        });
        Self {
            runtime,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
            pending: None,
        }
    }

    pub fn current(&self) -> StatusSnapshot {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    /// Show the saved status and (re)schedule the revert. Returns the new generation.
    pub fn mark_saved(&mut self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = self.pending.take() {
            previous.abort();
        }

        self.tx.send_replace(StatusSnapshot {
            status: Status::Saved,
            generation,
        });

        let latest = Arc::clone(&self.generation);
        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "Status revert superseded");
                return;
            }
            tx.send_replace(StatusSnapshot {
                status: Status::Idle,
                generation,
            });
            debug!(generation, "Status reverted to idle");
        }));

        generation
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
