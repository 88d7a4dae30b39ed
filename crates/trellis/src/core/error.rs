use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::ViewId;

/// Result type for kernel operations.
pub type Result<T> = StdResult<T, Error>;

/// Kernel error type.
///
/// These are structural misuse and driver failures. Lookup misses such as
/// an unresolvable palette index degrade to sentinels instead, and a view
/// refusing to end a modal loop is an ordinary `false` from `valid`.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The handle does not refer to a live view.
    #[error("view not found: {0:?}")]
    ViewNotFound(ViewId),
    /// The view already belongs to a group.
    #[error("view {0:?} is already owned by a group")]
    AlreadyOwned(ViewId),
    /// The view is not a child of the group.
    #[error("view {view:?} is not a child of group {group:?}")]
    NotAChild {
        /// The group that was asked.
        group: ViewId,
        /// The view that was not found among its children.
        view: ViewId,
    },
    /// The operation requires a group.
    #[error("view {0:?} is not a group")]
    NotAGroup(ViewId),
    /// Inserting the view would make a group its own descendant.
    #[error("inserting {view:?} into {group:?} would create a cycle")]
    WouldCycle {
        /// The receiving group.
        group: ViewId,
        /// The view being inserted.
        view: ViewId,
    },
    /// The view must be removed from its owner first.
    #[error("view {0:?} is still owned by a group")]
    StillOwned(ViewId),
    /// The root view cannot be removed or destroyed.
    #[error("view {0:?} is the root view")]
    RootView(ViewId),
    /// `unlock` was called without a matching `lock`.
    #[error("unbalanced unlock on group {0:?}")]
    UnbalancedUnlock(ViewId),
    /// The view's behavior is already borrowed further up the call stack.
    #[error("view {0:?} is already executing a callback")]
    ReentrantView(ViewId),
    /// No modal view is active to receive `end_modal`.
    #[error("no modal view is active")]
    NoModalView,
    /// The operation needs a running modal loop.
    #[error("no event loop is running")]
    NotRunning,
    /// The event source has no more events and never will.
    #[error("event source closed")]
    SourceClosed,
    /// Terminal driver failure.
    #[error("backend: {0}")]
    Backend(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Backend(e.to_string())
    }
}
