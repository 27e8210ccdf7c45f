//! Counting semaphore in the classic wait/signal style, built on
//! `Mutex + Condvar` from std.

use std::sync::{Condvar, Mutex};

/// A counting semaphore whose counter may start negative.
///
/// With a negative start the semaphore doubles as a fan-in barrier:
/// initialize to `1 - k`, have `k` tasks `signal` once each, and a single
/// `wait` returns exactly when the last of them has finished. With `k == 0`
/// the counter starts at 1 and `wait` returns immediately.
pub struct Semaphore {
    count: Mutex<i64>,
    cond: Condvar,
}

impl Semaphore {
    pub fn new(initial: i64) -> Self {
        Self {
            count: Mutex::new(initial),
            cond: Condvar::new(),
        }
    }

    /// Block until the counter is positive, then decrement it.
    pub fn wait(&self) {
        let mut count = self.count.lock().unwrap();
        while *count <= 0 {
            count = self.cond.wait(count).unwrap();
        }
        *count -= 1;
    }

    /// Increment the counter and wake one waiter if it became positive.
    pub fn signal(&self) {
        let mut count = self.count.lock().unwrap();
        *count += 1;
        if *count > 0 {
            self.cond.notify_one();
        }
    }
}
