//! Core types and traits for the elastic pool

pub mod error;
pub mod rejection;
pub mod task;
pub mod wrapper;

pub use error::{PoolError, Result};
pub use rejection::RejectionPolicy;
pub use task::{BoxedTask, ClosureTask, Task, TaskOutcome};
pub use wrapper::TaskWrapper;
