pub mod semaphore;
pub mod worker_pool;

pub use semaphore::Semaphore;
pub use worker_pool::WorkerPool;
