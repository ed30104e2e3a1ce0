//! Domain model for tasks.
//!
//! The task domain owns the status state machine and the invariants tying
//! status to timestamps, while keeping reminder scheduling and persistence
//! outside of the domain boundary.

mod error;
mod ids;
mod priority;
mod status;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{ChatId, TaskId, UserId};
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDraft};
