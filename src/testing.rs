//! Observe whether evaluations hit their cache.

use std::cell::Cell;

thread_local! {
    /// The outcome of this thread's last evaluation.
    static LAST: Cell<Option<Outcome>> = const { Cell::new(None) };
}

/// How an evaluation was answered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The cached output was returned.
    Hit,
    /// The mapping function ran.
    Miss,
}

/// The outcome of this thread's last evaluation, if any.
pub fn last_outcome() -> Option<Outcome> {
    LAST.with(Cell::get)
}

/// Whether this thread's last evaluation was a cache hit.
pub fn last_was_hit() -> bool {
    last_outcome() == Some(Outcome::Hit)
}

pub(crate) fn register_hit() {
    LAST.with(|cell| cell.set(Some(Outcome::Hit)))
}

pub(crate) fn register_miss() {
    LAST.with(|cell| cell.set(Some(Outcome::Miss)))
}
