// ABOUTME: Editor-facing value types shared between the core and UI collaborators

/// Editable source buffers of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Buffer {
    Js,
    Html,
}

/// Undo/redo depth reported by the active editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryDepth {
    pub undo: usize,
    pub redo: usize,
}

impl HistoryDepth {
    pub fn can_undo(&self) -> bool {
        self.undo > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo > 0
    }
}
