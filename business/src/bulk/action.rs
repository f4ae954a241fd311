use crate::StudentRow;

/// The five student-lifecycle operations a roster dialog can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkActionKind {
    ChangeBatch,
    ExtendSession,
    ReRegister,
    Terminate,
    Delete,
}

impl BulkActionKind {
    pub const ALL: [Self; 5] = [
        Self::ChangeBatch,
        Self::ExtendSession,
        Self::ReRegister,
        Self::Terminate,
        Self::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ChangeBatch => "Change Batch",
            Self::ExtendSession => "Extend Session",
            Self::ReRegister => "Re-register",
            Self::Terminate => "Terminate",
            Self::Delete => "Delete",
        }
    }

    pub fn confirm_label(self) -> &'static str {
        match self {
            Self::ChangeBatch => "Move students",
            Self::ExtendSession => "Extend",
            Self::ReRegister => "Re-register",
            Self::Terminate => "Terminate",
            Self::Delete => "Delete permanently",
        }
    }

    /// Terminate and delete cannot be undone from the roster.
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Terminate | Self::Delete)
    }
}

/// Who a dialog acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkTarget {
    /// Opened from a row's action menu.
    Single(StudentRow),
    /// Opened from the bulk bar over the current selection.
    Bulk { label: String, rows: Vec<StudentRow> },
}

impl BulkTarget {
    pub fn rows(&self) -> &[StudentRow] {
        match self {
            Self::Single(row) => std::slice::from_ref(row),
            Self::Bulk { rows, .. } => rows,
        }
    }

    /// Heading text: the student's name, or the bulk label.
    pub fn display_label(&self) -> String {
        match self {
            Self::Single(row) if row.full_name.is_empty() => row.user_id.clone(),
            Self::Single(row) => row.full_name.clone(),
            Self::Bulk { label, .. } => label.clone(),
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, Self::Bulk { .. })
    }
}

/// What the router opens a dialog for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkActionRequest {
    pub kind: BulkActionKind,
    pub target: BulkTarget,
}

impl BulkActionRequest {
    pub fn single(kind: BulkActionKind, row: StudentRow) -> Self {
        Self {
            kind,
            target: BulkTarget::Single(row),
        }
    }

    pub fn bulk(kind: BulkActionKind, rows: Vec<StudentRow>) -> Self {
        let label = match rows.len() {
            1 => "1 student".to_string(),
            n => format!("{n} students"),
        };
        Self {
            kind,
            target: BulkTarget::Bulk { label, rows },
        }
    }
}
