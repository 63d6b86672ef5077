//! State-changing operations against the remote server
//!
//! Each coordinator performs one kind of transaction: validate locally,
//! call the gateway, then either merge the authoritative response into
//! the owning projection or leave everything untouched. At most one
//! operation is in flight per coordinator; further invocations are
//! ignored until it resolves.

mod claim;
mod pass;
mod purchase;

pub use claim::ClaimCoordinator;
pub use pass::PassCoordinator;
pub use purchase::PurchaseCoordinator;

use std::sync::atomic::{AtomicBool, Ordering};

/// Terminal result of one coordinator operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// Server confirmed; the authoritative response has been merged
    Applied { message: String },
    /// Refused locally or by the server; nothing was changed
    Rejected { message: String },
    /// Transport or parse failure; nothing was changed, safe to retry
    Failed { message: String },
    /// Another operation was already in flight on this coordinator
    Ignored,
}

impl OpOutcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            OpOutcome::Applied { message }
            | OpOutcome::Rejected { message }
            | OpOutcome::Failed { message } => Some(message),
            OpOutcome::Ignored => None,
        }
    }
}

/// Releases the coordinator's in-flight flag when the operation resolves
pub(crate) struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    /// Claim the coordinator; `None` when an operation is already running
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
