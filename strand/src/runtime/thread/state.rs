/// Observable lifecycle state of a registered thread.
///
/// Removed threads (explicitly, by completion or by failure) are no longer
/// known to the scheduler and have no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadState {
    /// Registered but never resumed. Its arguments are still held.
    Pending,

    /// Resumed at least once and eligible for dispatch.
    Started,

    /// Skipped by dispatch until resumed. May or may not have started.
    Paused,
}
