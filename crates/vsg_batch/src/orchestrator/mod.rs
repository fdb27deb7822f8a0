//! Batch execution.
//!
//! [`BatchOrchestrator`] runs configured jobs one at a time through an
//! [`ExecutionEngine`], relaying the engine's [`LogChannel`] output to a
//! [`BatchObserver`] and returning a [`BatchSummary`].
//!
//! ```ignore
//! let channel = Arc::new(LogQueue::new());
//! let orchestrator = BatchOrchestrator::from_settings(engine, channel, &settings);
//! let summary = orchestrator.run(&queue.final_jobs_cloned(), observer);
//! println!("{}", summary); // Completed: 3, Failed: 0
//! ```

mod batch;
mod channel;
mod engine;
mod errors;

pub use batch::{BatchObserver, BatchOrchestrator, BatchSummary, CancelHandle, IDLE_STATUS};
pub use channel::{LogChannel, LogQueue, LOG_QUEUE_CAPACITY};
pub use engine::{ExecutionEngine, JobResult};
pub use errors::{BatchError, BatchResult};
