//! Callback registration lists owned by an editor.
//!
//! Each channel is a plain list of boxed closures invoked in registration
//! order. Status text and cursor shape are only re-emitted when they change.

use slint::SharedString;

use crate::geometry::Vector;
use crate::router::{ClickCommand, CursorHint};
use crate::view::ObjectId;

type StatusCallback = Box<dyn FnMut(&SharedString)>;
type CursorCallback = Box<dyn FnMut(CursorHint)>;
type VersionCallback = Box<dyn FnMut(u64)>;
type MessageCallback = Box<dyn FnMut(&str)>;
type CommandCallback = Box<dyn FnMut(ClickCommand, ObjectId)>;
type ScrollCallback = Box<dyn FnMut(Vector)>;

#[derive(Default)]
pub struct Notifications {
    status: Vec<StatusCallback>,
    cursor: Vec<CursorCallback>,
    version: Vec<VersionCallback>,
    message: Vec<MessageCallback>,
    command: Vec<CommandCallback>,
    scroll: Vec<ScrollCallback>,
    current_status: SharedString,
    current_cursor: CursorHint,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assistance text describing what the pointer would do.
    pub fn on_status(&mut self, callback: impl FnMut(&SharedString) + 'static) {
        self.status.push(Box::new(callback));
    }

    pub fn on_cursor(&mut self, callback: impl FnMut(CursorHint) + 'static) {
        self.cursor.push(Box::new(callback));
    }

    /// Called with the new view version after every committed edit.
    pub fn on_version(&mut self, callback: impl FnMut(u64) + 'static) {
        self.version.push(Box::new(callback));
    }

    /// User-facing failure messages.
    pub fn on_message(&mut self, callback: impl FnMut(&str) + 'static) {
        self.message.push(Box::new(callback));
    }

    /// Click commands the host should carry out (edit-in-place and friends).
    pub fn on_command(&mut self, callback: impl FnMut(ClickCommand, ObjectId) + 'static) {
        self.command.push(Box::new(callback));
    }

    /// Viewport scroll requests while dragging near an edge.
    pub fn on_scroll(&mut self, callback: impl FnMut(Vector) + 'static) {
        self.scroll.push(Box::new(callback));
    }

    pub fn current_status(&self) -> SharedString {
        self.current_status.clone()
    }

    pub fn current_cursor(&self) -> CursorHint {
        self.current_cursor
    }

    pub fn emit_status(&mut self, text: &str) {
        if self.current_status.as_str() == text {
            return;
        }
        self.current_status = SharedString::from(text);
        for callback in &mut self.status {
            callback(&self.current_status);
        }
    }

    pub fn emit_cursor(&mut self, cursor: CursorHint) {
        if self.current_cursor == cursor {
            return;
        }
        self.current_cursor = cursor;
        for callback in &mut self.cursor {
            callback(cursor);
        }
    }

    pub fn emit_version(&mut self, version: u64) {
        for callback in &mut self.version {
            callback(version);
        }
    }

    pub fn emit_message(&mut self, message: &str) {
        for callback in &mut self.message {
            callback(message);
        }
    }

    pub fn emit_command(&mut self, command: ClickCommand, object: ObjectId) {
        for callback in &mut self.command {
            callback(command, object);
        }
    }

    pub fn emit_scroll(&mut self, delta: Vector) {
        for callback in &mut self.scroll {
            callback(delta);
        }
    }
}
