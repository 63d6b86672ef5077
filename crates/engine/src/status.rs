//! Surfaced status messages with a bounded auto-dismiss
//!
//! Pull-based: the entry records when it was posted and readers get
//! `None` once the TTL has passed. No timer task exists, so there is
//! nothing to cancel on teardown.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

/// One surfaced message
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub message: String,
    pub tone: StatusTone,
    posted_at: Instant,
}

/// The session's single status slot; a new post replaces the old one
#[derive(Debug)]
pub struct StatusLine {
    ttl: Duration,
    current: Mutex<Option<StatusEntry>>,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
        }
    }

    pub fn post_success(&self, message: impl Into<String>) {
        self.post(StatusTone::Success, message.into());
    }

    pub fn post_error(&self, message: impl Into<String>) {
        self.post(StatusTone::Error, message.into());
    }

    fn post(&self, tone: StatusTone, message: String) {
        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(StatusEntry {
                message,
                tone,
                posted_at: Instant::now(),
            });
        }
    }

    /// The visible message, if one is still within its display window
    pub fn current(&self) -> Option<StatusEntry> {
        let slot = self.current.lock().ok()?;
        slot.clone().filter(|e| e.posted_at.elapsed() < self.ttl)
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.current.lock() {
            *slot = None;
        }
    }
}
