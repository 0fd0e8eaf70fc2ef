//! Undo/Redo for object edits.
//!
//! Command pattern: every session mutation records a [`Command`] holding
//! enough state to reverse itself. The stack is bounded; the oldest entry
//! falls off when the bound is hit. Applying commands to a session lives
//! in [`crate::session`]; this module only owns the history.

use crate::model::{LabeledObject, ObjectShape};
use crate::palette::Rgb8;

/// An edit that can be undone and redone.
#[derive(Debug, Clone)]
pub enum Command {
    /// An object was added.
    AddObject {
        /// The object as it was added.
        object: LabeledObject,
    },
    /// An object was removed.
    RemoveObject {
        /// The object as it was at removal, for restore.
        object: LabeledObject,
    },
    /// An object's shape was replaced.
    ModifyShape {
        object_id: u32,
        old_shape: ObjectShape,
        new_shape: ObjectShape,
    },
    /// An object's overlay color was replaced.
    ModifyColor {
        object_id: u32,
        old_color: Rgb8,
        new_color: Rgb8,
    },
}

impl Command {
    /// Human-readable description, for history UIs and logs.
    pub fn description(&self) -> &'static str {
        match self {
            Command::AddObject { .. } => "Add object",
            Command::RemoveObject { .. } => "Delete object",
            Command::ModifyShape { .. } => "Move/resize object",
            Command::ModifyColor { .. } => "Change object color",
        }
    }
}

/// Bounded undo/redo history.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    max_depth: usize,
}

impl UndoStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record a new command. Clears the redo history and drops the oldest
    /// entry once the depth bound is reached.
    pub fn push(&mut self, command: Command) {
        log::debug!("recorded '{}'", command.description());
        self.redo_stack.clear();
        self.undo_stack.push(command);
        if self.max_depth > 0 && self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop the most recent command for undoing; it moves to the redo
    /// stack.
    pub fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop()?;
        log::debug!("undo '{}'", cmd.description());
        self.redo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Pop a previously undone command for redoing; it moves back to the
    /// undo stack.
    pub fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop()?;
        log::debug!("redo '{}'", cmd.description());
        self.undo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Description of the command the next undo would reverse.
    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.last().map(Command::description)
    }

    /// Description of the command the next redo would re-apply.
    pub fn redo_description(&self) -> Option<&'static str> {
        self.redo_stack.last().map(Command::description)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::ObjectShape;

    fn add_cmd(id: u32) -> Command {
        Command::AddObject {
            object: LabeledObject::new(
                id,
                "test",
                [1, 2, 3],
                ObjectShape::BBox(Rect::new(0, 0, 10, 10)),
            ),
        }
    }

    #[test]
    fn test_push_and_pop() {
        let mut stack = UndoStack::new(10);
        assert!(!stack.can_undo());

        stack.push(add_cmd(1));
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        let cmd = stack.pop_undo().unwrap();
        assert_eq!(cmd.description(), "Add object");
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        stack.pop_redo().unwrap();
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut stack = UndoStack::new(10);
        stack.push(add_cmd(1));
        stack.pop_undo();
        assert!(stack.can_redo());

        stack.push(add_cmd(2));
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_depth_bound_drops_oldest() {
        let mut stack = UndoStack::new(3);
        for id in 0..5 {
            stack.push(add_cmd(id));
        }
        assert_eq!(stack.undo_count(), 3);

        // The survivors are the three most recent.
        let Command::AddObject { object } = stack.pop_undo().unwrap() else {
            panic!("unexpected command kind");
        };
        assert_eq!(object.id, 4);
    }

    #[test]
    fn test_descriptions() {
        let mut stack = UndoStack::new(10);
        assert_eq!(stack.undo_description(), None);
        stack.push(Command::ModifyColor {
            object_id: 1,
            old_color: [0, 0, 0],
            new_color: [1, 1, 1],
        });
        assert_eq!(stack.undo_description(), Some("Change object color"));
    }
}
