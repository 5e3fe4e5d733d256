pub mod action;
pub mod browser;
pub mod config;
pub mod error;
pub mod expand_state;
pub mod loader;
pub mod node;
pub mod render_tree;
pub mod tree;

pub use action::{ActionError, ActionKind, ActionSink, LogSink};
pub use browser::{
    Browser, ContextMenu, HitTarget, MenuState, Notification, NotificationLevel, PointerButton,
    PointerEvent,
};
pub use error::ExplorerError;
pub use node::{Node, NodeKind, NodePath};
