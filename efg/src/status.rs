use crate::error::{Error, Result};
use log::trace;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress and cancellation collaborator for long-running computations.
///
/// Algorithms call `get()` once per outer-loop iteration; an implementation
/// signals cancellation by returning `Err(Error::Cancelled)`.
pub trait Status {
    fn get(&self) -> Result<()>;

    fn set_progress(&self, fraction: f64, message: &str);
}

/// A status which never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStatus;

impl Status for NullStatus {
    fn get(&self) -> Result<()> {
        Ok(())
    }

    fn set_progress(&self, fraction: f64, message: &str) {
        trace!("Progress {:.3}: {}", fraction, message);
    }
}

/// A status which may be tripped from elsewhere, including another thread.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Status for CancelToken {
    fn get(&self) -> Result<()> {
        match self.is_cancelled() {
            true => Err(Error::Cancelled),
            false => Ok(()),
        }
    }

    fn set_progress(&self, fraction: f64, message: &str) {
        trace!("Progress {:.3}: {}", fraction, message);
    }
}

/// Cancels once `get()` has been answered `limit` times.
/// A limit of zero cancels on the very first poll.
#[derive(Debug)]
pub struct PollLimit {
    limit: usize,
    polls: Cell<usize>,
}

impl PollLimit {
    pub fn new(limit: usize) -> PollLimit {
        PollLimit {
            limit,
            polls: Cell::new(0),
        }
    }

    /// Number of polls answered without cancelling.
    pub fn polls(&self) -> usize {
        self.polls.get()
    }
}

impl Status for PollLimit {
    fn get(&self) -> Result<()> {
        if self.polls.get() >= self.limit {
            return Err(Error::Cancelled);
        }
        self.polls.set(self.polls.get() + 1);
        Ok(())
    }

    fn set_progress(&self, fraction: f64, message: &str) {
        trace!("Progress {:.3}: {}", fraction, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token() {
        let token = CancelToken::new();
        assert!(token.get().is_ok());
        token.cancel();
        assert_eq!(token.get(), Err(Error::Cancelled));
    }

    #[test]
    fn poll_limit() {
        let status = PollLimit::new(2);
        assert!(status.get().is_ok());
        assert!(status.get().is_ok());
        assert_eq!(status.get(), Err(Error::Cancelled));
        assert_eq!(status.polls(), 2);

        let immediate = PollLimit::new(0);
        assert_eq!(immediate.get(), Err(Error::Cancelled));
    }
}
