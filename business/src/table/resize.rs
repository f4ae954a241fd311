//! Column resize drag state machine.
//!
//! `Idle → Dragging → Idle`. While dragging, only a visual offset is exposed so
//! the rest of the table does not reflow; the width is committed into
//! [`ColumnSizing`] when the pointer is released or leaves the window.

use log::{debug, warn};
use ustr::Ustr;

use super::{ColumnDef, ColumnSizing, clamp_width};

/// An in-progress drag of one column's resize handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub column: Ustr,
    pub start_x: f32,
    pub start_width: f32,
    pub current_x: f32,
    min_size: f32,
    max_size: f32,
}

impl Drag {
    pub fn delta(&self) -> f32 {
        self.current_x - self.start_x
    }

    /// Unclamped `start_width + delta`.
    pub fn proposed_width(&self) -> f32 {
        self.start_width + self.delta()
    }

    /// The width that would be committed right now.
    pub fn clamped_width(&self) -> f32 {
        clamp_width(self.proposed_width(), self.min_size, self.max_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// One drag slot per table, so at most one column is ever being resized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    pub fn dragging_column(&self) -> Option<Ustr> {
        match self.state {
            ResizeState::Dragging(drag) => Some(drag.column),
            ResizeState::Idle => None,
        }
    }

    /// Starts a drag on `column`. Returns `false` when the column is not
    /// resizable or another drag is already running.
    pub fn pointer_down<R>(
        &mut self,
        column: &ColumnDef<R>,
        current_width: f32,
        pointer_x: f32,
    ) -> bool {
        if !column.is_resizable() {
            debug!("Resize: column {} is not resizable", column.id());
            return false;
        }
        if let ResizeState::Dragging(drag) = self.state {
            warn!(
                "Resize: ignoring pointer-down on {} while {} is being dragged",
                column.id(),
                drag.column
            );
            return false;
        }

        self.state = ResizeState::Dragging(Drag {
            column: column.id(),
            start_x: pointer_x,
            start_width: current_width,
            current_x: pointer_x,
            min_size: column.min_size(),
            max_size: column.max_size(),
        });
        true
    }

    /// Tracks the pointer and returns the visual offset of the handle, already
    /// clamped to the column's range. `None` when idle.
    pub fn pointer_move(&mut self, pointer_x: f32) -> Option<f32> {
        match &mut self.state {
            ResizeState::Dragging(drag) => {
                drag.current_x = pointer_x;
                Some(drag.clamped_width() - drag.start_width)
            }
            ResizeState::Idle => None,
        }
    }

    /// Visual offset for `column`; zero unless that column is being dragged.
    pub fn visual_offset(&self, column: Ustr) -> f32 {
        match self.state {
            ResizeState::Dragging(drag) if drag.column == column => {
                drag.clamped_width() - drag.start_width
            }
            _ => 0.0,
        }
    }

    /// Ends the drag, clamps the proposed width and writes it into `sizing`.
    pub fn pointer_up(&mut self, sizing: &mut ColumnSizing) -> Option<(Ustr, f32)> {
        let ResizeState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return None;
        };
        let width = drag.clamped_width();
        sizing.set(drag.column, width);
        debug!("Resize: committed {} = {width}", drag.column);
        Some((drag.column, width))
    }

    /// The pointer left the window without a release: commit the last known
    /// width and go back to idle.
    pub fn pointer_left(&mut self, sizing: &mut ColumnSizing) -> Option<(Ustr, f32)> {
        self.pointer_up(sizing)
    }
}
