use std::fmt;

use thiserror::Error;

/// Entries of the file context menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Copy,
    Delete,
    Rename,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Copy, ActionKind::Delete, ActionKind::Rename];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Copy => "Copy",
            ActionKind::Delete => "Delete",
            ActionKind::Rename => "Rename",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Copy => "copy",
            ActionKind::Delete => "delete",
            ActionKind::Rename => "rename",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{action} on {target} failed: {reason}")]
    Failed {
        action: ActionKind,
        target: String,
        reason: String,
    },

    #[error("{action} is not supported for {target}")]
    Unsupported { action: ActionKind, target: String },
}

/// Receives context-menu actions.
///
/// Called exactly once per menu click that has a target.
pub trait ActionSink {
    fn perform(&mut self, action: ActionKind, target: &str) -> Result<(), ActionError>;
}

/// Sink that only reports the action through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ActionSink for LogSink {
    fn perform(&mut self, action: ActionKind, target: &str) -> Result<(), ActionError> {
        log::info!("{} on {}", action, target);
        Ok(())
    }
}

impl<F> ActionSink for F
where
    F: FnMut(ActionKind, &str) -> Result<(), ActionError>,
{
    fn perform(&mut self, action: ActionKind, target: &str) -> Result<(), ActionError> {
        self(action, target)
    }
}
