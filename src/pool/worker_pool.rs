//! Bounded pool of long-lived worker threads draining a FIFO task queue.
//!
//! Workers pull directly from a shared condition-variable-guarded queue.
//! `schedule` only ever touches the queue lock, so tasks may schedule more
//! work onto their own pool or another one without deadlocking.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    queue: VecDeque<Task>,
    in_flight: usize,
    shutdown: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    task_ready: Condvar,
    quiescent: Condvar,
}

impl PoolShared {
    /// True when no task is queued and none is running.
    fn is_quiescent(state: &PoolState) -> bool {
        state.queue.is_empty() && state.in_flight == 0
    }
}

/// A fixed set of worker threads executing scheduled tasks in FIFO order.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool with `workers` worker threads. `workers` must be
    /// positive.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "worker pool needs at least one worker");

        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                in_flight: 0,
                shutdown: false,
            }),
            task_ready: Condvar::new(),
            quiescent: Condvar::new(),
        });

        let handles = (0..workers)
            .map(|id| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("pool-worker-{id}"))
                    .spawn(move || worker_loop(&shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            shared,
            workers: handles,
        }
    }

    /// Append a task to the queue and return immediately.
    ///
    /// Never blocks on worker availability and is safe to call from any
    /// thread, including from inside a task running on this pool.
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock().unwrap();
        state.queue.push_back(Box::new(task));
        self.shared.task_ready.notify_one();
    }

    /// Block until every task scheduled before this call has fully
    /// executed. The pool may be reused afterwards.
    ///
    /// Must not be called from a task running on this pool: the caller
    /// would be waiting for itself to finish.
    pub fn wait(&self) {
        let mut state = self.shared.state.lock().unwrap();
        while !PoolShared::is_quiescent(&state) {
            state = self.shared.quiescent.wait(state).unwrap();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.wait();
        {
            let mut state = self.shared.state.lock().unwrap();
            state.shutdown = true;
        }
        self.shared.task_ready.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let task = {
            let mut state = shared.state.lock().unwrap();
            loop {
                if let Some(task) = state.queue.pop_front() {
                    state.in_flight += 1;
                    break task;
                }
                if state.shutdown {
                    return;
                }
                state = shared.task_ready.wait(state).unwrap();
            }
        };

        task();

        let mut state = shared.state.lock().unwrap();
        state.in_flight -= 1;
        if PoolShared::is_quiescent(&state) {
            shared.quiescent.notify_all();
        }
    }
}
