//! Unit-of-work abstraction for the worker pool

/// A unit of work bound to one data partition and one shared model.
///
/// A task is invoked once per scheduling round by an external thread pool,
/// runs synchronously to completion on that thread, and produces no return
/// value; its only observable effect is the in-place mutation of the shared
/// model. There is no cooperative suspension, cancellation or timeout.
pub trait Task: Send {
    /// Run one pass of this task on the worker identified by `thread_id`
    fn execute(&mut self, thread_id: usize);
}
