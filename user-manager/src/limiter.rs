use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Global limit on the number of remote calls in flight.
///
/// Shared by every operation of a user manager. A call waits for a permit
/// before it is sent; the permit is released when dropped, whether the call
/// succeeded or not.
#[derive(Debug)]
pub struct RequestLimiter {
    semaphore: Semaphore,
    max_permits: usize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RequestLimiter {
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Semaphore::new(max_concurrent),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Waits until a slot is free and takes it.
    pub async fn acquire(&self) -> Result<RequestPermit<'_>, AcquireError> {
        let permit = self.semaphore.acquire().await?;

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);

        Ok(RequestPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Fails every pending and future [`acquire`](Self::acquire).
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Highest number of concurrent calls observed so far.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

pub struct RequestPermit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for RequestPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
