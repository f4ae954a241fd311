//! Generic table model: column descriptors, layout state, resize drag,
//! selection and the per-frame render plan.
//!
//! Everything here is UI-toolkit agnostic. The egui renderer only reads a
//! [`RenderPlan`] and reports pointer/checkbox events back.

mod column;
mod layout;
mod plan;
mod resize;
mod selection;

pub use column::{
    Accessor, ColumnDef, ColumnKind, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_SIZE, PinSide,
    clamp_width,
};
pub use layout::{ColumnPinning, ColumnSizing, ColumnVisibility, IDENTITY_COLUMN_CANDIDATES};
pub use plan::{PlannedColumn, RenderPlan, build_plan};
pub use resize::{Drag, ResizeController, ResizeState};
pub use selection::SelectionSet;

use ustr::Ustr;

use crate::PageEnvelope;

/// A row with a stable identity, used for selection.
pub trait TableRow {
    fn row_id(&self) -> Ustr;
}

/// All mutable state of one table instance.
///
/// Each table owns its own copy; nothing here is shared between tables.
#[derive(Debug, Clone)]
pub struct TableState<R> {
    columns: Vec<ColumnDef<R>>,
    pub sizing: ColumnSizing,
    pub pinning: ColumnPinning,
    pub visibility: ColumnVisibility,
    pub resize: ResizeController,
    pub selection: SelectionSet,
}

impl<R> TableState<R> {
    /// Builds the table and computes its initial pinning once.
    pub fn new(columns: Vec<ColumnDef<R>>) -> Self {
        let pinning = ColumnPinning::initial(&columns);
        Self {
            columns,
            sizing: ColumnSizing::default(),
            pinning,
            visibility: ColumnVisibility::default(),
            resize: ResizeController::default(),
            selection: SelectionSet::default(),
        }
    }

    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    pub fn column(&self, id: Ustr) -> Option<&ColumnDef<R>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    pub fn plan<'a>(&self, rows: Option<&'a PageEnvelope<R>>) -> RenderPlan<'a, R> {
        build_plan(
            &self.columns,
            rows,
            &self.sizing,
            &self.pinning,
            &self.visibility,
        )
    }

    /// Starts a resize drag on column `id` from its current effective width.
    pub fn begin_resize(&mut self, id: Ustr, pointer_x: f32) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.id() == id) else {
            return false;
        };
        let width = self.sizing.width_of(column);
        self.resize.pointer_down(column, width, pointer_x)
    }

    pub fn end_resize(&mut self) -> Option<(Ustr, f32)> {
        self.resize.pointer_up(&mut self.sizing)
    }

    pub fn cancel_resize(&mut self) -> Option<(Ustr, f32)> {
        self.resize.pointer_left(&mut self.sizing)
    }

    pub fn toggle_column_visibility(&mut self, id: Ustr) {
        if let Some(column) = self.columns.iter().find(|c| c.id() == id) {
            self.visibility.toggle(column);
        }
    }
}
