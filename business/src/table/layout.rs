//! Mutable per-table layout state: sizing, pinning and visibility.
//!
//! These maps are owned by the table instance and threaded into
//! [`build_plan`](super::build_plan). Hiding a column never touches its sizing
//! or pinning entry, so un-hiding restores the previous layout.

use std::collections::HashMap;

use ustr::Ustr;

use super::{ColumnDef, PinSide};

/// Identity-like columns that are pinned left when a table has them.
pub const IDENTITY_COLUMN_CANDIDATES: &[&str] = &["select", "details", "full_name", "username"];

/// Column id → committed width. Empty until the first resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSizing {
    widths: HashMap<Ustr, f32>,
}

impl ColumnSizing {
    pub fn get(&self, id: Ustr) -> Option<f32> {
        self.widths.get(&id).copied()
    }

    pub fn set(&mut self, id: Ustr, width: f32) {
        self.widths.insert(id, width);
    }

    pub fn reset(&mut self, id: Ustr) {
        self.widths.remove(&id);
    }

    pub fn clear(&mut self) {
        self.widths.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Effective width of `column`: the committed width if any, otherwise the
    /// declared size, clamped into the column's range either way.
    pub fn width_of<R>(&self, column: &ColumnDef<R>) -> f32 {
        column.clamp(self.get(column.id()).unwrap_or_else(|| column.size()))
    }
}

/// Ordered column ids pinned to the left edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPinning {
    left: Vec<Ustr>,
}

impl ColumnPinning {
    /// Intersects `candidates` with the ids of `columns`, keeping candidate order.
    pub fn from_candidates<R>(candidates: &[&str], columns: &[ColumnDef<R>]) -> Self {
        let left = candidates
            .iter()
            .map(|c| Ustr::from(*c))
            .filter(|id| columns.iter().any(|column| column.id() == *id))
            .collect();
        Self { left }
    }

    /// Pinning a table starts with: identity candidates first, then any column
    /// declared [`PinSide::Left`] in declaration order.
    pub fn initial<R>(columns: &[ColumnDef<R>]) -> Self {
        let mut pinning = Self::from_candidates(IDENTITY_COLUMN_CANDIDATES, columns);
        for column in columns.iter().filter(|c| c.pin() == PinSide::Left) {
            pinning.pin_left(column.id());
        }
        pinning
    }

    pub fn left(&self) -> &[Ustr] {
        &self.left
    }

    pub fn is_pinned(&self, id: Ustr) -> bool {
        self.left.contains(&id)
    }

    /// Appends `id` to the pinned group. No-op if it is already pinned.
    pub fn pin_left(&mut self, id: Ustr) {
        if !self.left.contains(&id) {
            self.left.push(id);
        }
    }

    pub fn unpin(&mut self, id: Ustr) {
        self.left.retain(|pinned| *pinned != id);
    }
}

/// Column id → visible. Absent means "use the column default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    overrides: HashMap<Ustr, bool>,
}

impl ColumnVisibility {
    pub fn is_visible<R>(&self, column: &ColumnDef<R>) -> bool {
        self.overrides
            .get(&column.id())
            .copied()
            .unwrap_or_else(|| column.default_visible())
    }

    pub fn set(&mut self, id: Ustr, visible: bool) {
        self.overrides.insert(id, visible);
    }

    pub fn toggle<R>(&mut self, column: &ColumnDef<R>) {
        let visible = self.is_visible(column);
        self.set(column.id(), !visible);
    }
}
