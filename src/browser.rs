use std::collections::VecDeque;

use crate::action::{ActionKind, ActionSink, LogSink};
use crate::expand_state::ExpansionState;
use crate::node::{Node, NodeKind, NodePath};
use crate::render_tree::{build_render_tree, flatten_render_nodes, RenderNode, RenderRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A pointer press in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub page_x: f32,
    pub page_y: f32,
    default_prevented: bool,
}

impl PointerEvent {
    pub fn new(button: PointerButton, page_x: f32, page_y: f32) -> Self {
        Self {
            button,
            page_x,
            page_y,
            default_prevented: false,
        }
    }

    pub fn primary(page_x: f32, page_y: f32) -> Self {
        Self::new(PointerButton::Primary, page_x, page_y)
    }

    pub fn secondary(page_x: f32, page_y: f32) -> Self {
        Self::new(PointerButton::Secondary, page_x, page_y)
    }

    /// Suppress the platform's own handling (its native context menu).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What sits under the pointer, as resolved by the front end's hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// A tree row, by render path.
    Row(NodePath),
    MenuItem(ActionKind),
    /// Anywhere else inside the browser area.
    Background,
}

/// Context-menu state. Position and target go stale once hidden; only
/// `visible` decides whether the menu is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMenu {
    pub visible: bool,
    pub x: f32,
    pub y: f32,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuState<'a> {
    Closed,
    Open { x: f32, y: f32, target: Option<&'a str> },
}

impl ContextMenu {
    pub fn state(&self) -> MenuState<'_> {
        if self.visible {
            MenuState::Open {
                x: self.x,
                y: self.y,
                target: self.target.as_deref(),
            }
        } else {
            MenuState::Closed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Outcome of a menu action, for the front end to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Root of the tree view: owns selection, the context menu and every
/// folder's expansion flag. The tree itself is never modified.
pub struct Browser<S: ActionSink = LogSink> {
    root: Node,
    expansion: ExpansionState,
    selected: Option<String>,
    menu: ContextMenu,
    sink: S,
    notifications: VecDeque<Notification>,
}

impl Browser<LogSink> {
    pub fn with_log_sink(root: Node) -> Self {
        Self::new(root, LogSink)
    }
}

impl<S: ActionSink> Browser<S> {
    pub fn new(root: Node, sink: S) -> Self {
        Self {
            root,
            expansion: ExpansionState::default(),
            selected: None,
            menu: ContextMenu::default(),
            sink,
            notifications: VecDeque::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expansion.is_expanded(path)
    }

    /// Swap in a new tree. Every rendered instance is torn down, so all
    /// interaction state starts over.
    pub fn replace_root(&mut self, root: Node) {
        self.root = root;
        self.expansion.collapse_all();
        self.selected = None;
        self.menu = ContextMenu::default();
    }

    pub fn render_tree(&self) -> RenderNode {
        build_render_tree(&self.root, &self.expansion, self.selected.as_deref())
    }

    pub fn rows(&self) -> Vec<RenderRow> {
        flatten_render_nodes(&self.render_tree())
    }

    pub fn select(&mut self, name: &str) {
        if self.selected.as_deref() != Some(name) {
            self.selected = Some(name.to_string());
        }
    }

    /// Open (or move) the context menu over `name` at the event position.
    ///
    /// The native menu is suppressed before anything else happens.
    pub fn right_click(&mut self, event: &mut PointerEvent, name: &str) {
        event.prevent_default();
        self.menu = ContextMenu {
            visible: true,
            x: event.page_x,
            y: event.page_y,
            target: Some(name.to_string()),
        };
    }

    /// Toggle the folder at `path`; returns the new expansion flag.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        self.expansion.toggle(path)
    }

    pub fn dismiss_menu(&mut self) {
        self.menu.visible = false;
    }

    /// Run `action` against the menu's target and close the menu.
    /// Without a target nothing happens at all.
    pub fn invoke_action(&mut self, action: ActionKind) {
        let Some(target) = self.menu.target.clone() else {
            log::debug!("{} ignored: context menu has no target", action);
            return;
        };

        let notification = match self.sink.perform(action, &target) {
            Ok(()) => Notification {
                level: NotificationLevel::Info,
                message: format!("{} on {}", action, target),
            },
            Err(err) => {
                log::error!("{}", err);
                Notification {
                    level: NotificationLevel::Error,
                    message: err.to_string(),
                }
            }
        };
        self.notifications.push_back(notification);
        self.menu.visible = false;
    }

    /// Deliver a pointer press: first to the element under the pointer,
    /// then to the browser-wide handler that closes the menu.
    pub fn dispatch(&mut self, target: &HitTarget, event: &mut PointerEvent) {
        log::debug!("dispatch {:?} {:?}", event.button, target);

        match (target, event.button) {
            (HitTarget::Row(path), button) => self.dispatch_row(path, button, event),
            (HitTarget::MenuItem(action), PointerButton::Primary) => self.invoke_action(*action),
            (HitTarget::MenuItem(_), PointerButton::Secondary) | (HitTarget::Background, _) => {}
        }

        // Only primary presses count as clicks; a right-click never closes
        // the menu it just opened.
        if event.button == PointerButton::Primary {
            self.dismiss_menu();
        }
    }

    fn dispatch_row(&mut self, path: &NodePath, button: PointerButton, event: &mut PointerEvent) {
        let Some(node) = self.root.descendant(path) else {
            log::debug!("no node at {}", path);
            return;
        };
        let name = node.name().to_string();

        match (node.kind(), button) {
            (NodeKind::Folder, PointerButton::Primary) => {
                self.toggle(path);
            }
            (NodeKind::Folder, PointerButton::Secondary) => {}
            (NodeKind::File, PointerButton::Primary) => self.select(&name),
            (NodeKind::File, PointerButton::Secondary) => self.right_click(event, &name),
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }
}
