//! Task polling utilities
//!
//! Helpers for collecting results of fetches spawned on the tokio runtime
//! from a synchronous, frame-driven caller.

use futures::FutureExt;
use tokio::task::JoinHandle;

/// Result of polling a task
pub enum PollResult<T> {
    /// No task to poll (task was None)
    NoTask,
    /// Task is still running
    Pending,
    /// Task completed with result (may be Ok or join error)
    Complete(Result<T, tokio::task::JoinError>),
}

/// Poll an optional task handle and return its result if finished.
///
/// The handle is taken out of `task` only once it has finished, so a
/// `Pending` result leaves the slot untouched for the next frame.
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    let Some(handle) = task.as_mut() else {
        return PollResult::NoTask;
    };

    if !handle.is_finished() {
        return PollResult::Pending;
    }

    match task.take().and_then(|handle| handle.now_or_never()) {
        Some(result) => PollResult::Complete(result),
        None => {
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}

/// Remove every finished task from `tasks` and return their results.
///
/// Tasks are tagged so the caller can tell which request a result answers.
/// Unfinished tasks stay in place, in their original order.
pub fn drain_finished<K, T>(
    tasks: &mut Vec<(K, JoinHandle<T>)>,
) -> Vec<(K, Result<T, tokio::task::JoinError>)> {
    let mut finished = Vec::new();
    let mut i = 0;

    while i < tasks.len() {
        let handle = &mut tasks[i].1;
        if !handle.is_finished() {
            i += 1;
            continue;
        }

        // Poll through the reference so an unexpectedly unready handle stays put
        match FutureExt::now_or_never(&mut *handle) {
            Some(result) => {
                let (key, _) = tasks.remove(i);
                finished.push((key, result));
            }
            None => {
                tracing::warn!("Task not ready despite is_finished()");
                i += 1;
            }
        }
    }

    finished
}
