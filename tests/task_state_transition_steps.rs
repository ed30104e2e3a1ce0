//! Behaviour tests for task status transitions.

mod test_helpers;

#[path = "task_state_transition_steps/mod.rs"]
mod task_state_transition_steps_defs;

use rstest_bdd_macros::scenario;
use task_state_transition_steps_defs::world::{TaskTransitionWorld, world};

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Complete an active task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn complete_active_task(world: TaskTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Reactivate a completed task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reactivate_completed_task(world: TaskTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Reject completing a deleted task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_completing_deleted_task(world: TaskTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Reject an unknown status"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_unknown_status(world: TaskTransitionWorld) {
    let _ = world;
}
