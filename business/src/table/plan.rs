//! Render plan: which columns go where, and how wide they are.

use ustr::Ustr;

use super::{ColumnDef, ColumnKind, ColumnPinning, ColumnSizing, ColumnVisibility};
use crate::PageEnvelope;

/// A visible column with its resolved width.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedColumn {
    pub id: Ustr,
    /// Index into the column slice the plan was built from.
    pub index: usize,
    pub width: f32,
    pub resizable: bool,
    pub kind: ColumnKind,
}

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct RenderPlan<'a, R> {
    pub left_pinned: Vec<PlannedColumn>,
    pub center: Vec<PlannedColumn>,
    pub rows: &'a [R],
    pub page_no: usize,
    pub total_pages: usize,
}

impl<R> RenderPlan<'_, R> {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn left_width(&self) -> f32 {
        self.left_pinned.iter().map(|c| c.width).sum()
    }

    pub fn center_width(&self) -> f32 {
        self.center.iter().map(|c| c.width).sum()
    }

    pub fn columns(&self) -> impl Iterator<Item = &PlannedColumn> {
        self.left_pinned.iter().chain(self.center.iter())
    }
}

/// Partitions `columns` into the left-pinned group (pinning order) and the
/// center group (declaration order), skipping hidden columns.
///
/// `rows == None` ("no data yet") produces the same empty plan as an empty page.
pub fn build_plan<'a, R>(
    columns: &[ColumnDef<R>],
    rows: Option<&'a PageEnvelope<R>>,
    sizing: &ColumnSizing,
    pinning: &ColumnPinning,
    visibility: &ColumnVisibility,
) -> RenderPlan<'a, R> {
    let plan_column = |index: usize, column: &ColumnDef<R>| PlannedColumn {
        id: column.id(),
        index,
        width: sizing.width_of(column),
        resizable: column.is_resizable(),
        kind: column.column_kind(),
    };

    let left_pinned = pinning
        .left()
        .iter()
        .filter_map(|id| columns.iter().enumerate().find(|(_, c)| c.id() == *id))
        .filter(|(_, column)| visibility.is_visible(*column))
        .map(|(index, column)| plan_column(index, column))
        .collect();

    let center = columns
        .iter()
        .enumerate()
        .filter(|(_, column)| !pinning.is_pinned(column.id()) && visibility.is_visible(*column))
        .map(|(index, column)| plan_column(index, column))
        .collect();

    let (rows, page_no, total_pages) = match rows {
        Some(page) => (page.content.as_slice(), page.page_no, page.total_pages),
        None => (&[][..], 0, 0),
    };

    RenderPlan {
        left_pinned,
        center,
        rows,
        page_no,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
    }

    fn columns() -> Vec<ColumnDef<Row>> {
        vec![
            ColumnDef::new("email", "Email").with_size(200.0),
            ColumnDef::select("select"),
            ColumnDef::new("status", "Status"),
            ColumnDef::new("full_name", "Name").accessor(|r: &Row| r.name.to_string()),
        ]
    }

    fn ids(columns: &[PlannedColumn]) -> Vec<&str> {
        columns.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_partition_respects_pinning_and_declaration_order() {
        let cols = columns();
        let pinning = ColumnPinning::initial(&cols);
        let plan = build_plan(
            &cols,
            None,
            &ColumnSizing::default(),
            &pinning,
            &ColumnVisibility::default(),
        );
        assert_eq!(ids(&plan.left_pinned), vec!["select", "full_name"]);
        assert_eq!(ids(&plan.center), vec!["email", "status"]);
        assert_eq!(plan.left_pinned[1].index, 3);
    }

    #[test]
    fn test_missing_rows_is_empty_plan() {
        let cols = columns();
        let plan = build_plan(
            &cols,
            None,
            &ColumnSizing::default(),
            &ColumnPinning::default(),
            &ColumnVisibility::default(),
        );
        assert!(plan.is_empty());
        assert_eq!(plan.total_pages, 0);

        let empty = PageEnvelope::<Row>::empty();
        let plan = build_plan(
            &cols,
            Some(&empty),
            &ColumnSizing::default(),
            &ColumnPinning::default(),
            &ColumnVisibility::default(),
        );
        assert!(plan.is_empty());
        assert_eq!(plan.total_pages, 0);
    }

    #[test]
    fn test_hidden_column_keeps_size_and_pin() {
        let cols = columns();
        let mut sizing = ColumnSizing::default();
        let pinning = ColumnPinning::initial(&cols);
        let mut visibility = ColumnVisibility::default();
        let name = Ustr::from("full_name");

        sizing.set(name, 321.0);
        visibility.set(name, false);
        let plan = build_plan(&cols, None, &sizing, &pinning, &visibility);
        assert!(plan.columns().all(|c| c.id != name));

        visibility.set(name, true);
        let plan = build_plan(&cols, None, &sizing, &pinning, &visibility);
        let restored = plan.left_pinned.iter().find(|c| c.id == name).unwrap();
        assert_eq!(restored.width, 321.0);
    }

    #[test]
    fn test_widths_resolve_and_clamp() {
        let cols = columns();
        let mut sizing = ColumnSizing::default();
        sizing.set(Ustr::from("select"), 500.0);
        let plan = build_plan(
            &cols,
            None,
            &sizing,
            &ColumnPinning::default(),
            &ColumnVisibility::default(),
        );
        let widths: Vec<f32> = plan.center.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![200.0, 40.0, 150.0, 150.0]);
        assert_eq!(plan.center_width(), 540.0);
    }

    #[test]
    fn test_rows_and_page_info_pass_through() {
        let cols = columns();
        let page = PageEnvelope::paginate(vec![Row { name: "a" }, Row { name: "b" }], 0, 10);
        let plan = build_plan(
            &cols,
            Some(&page),
            &ColumnSizing::default(),
            &ColumnPinning::default(),
            &ColumnVisibility::default(),
        );
        assert_eq!(plan.row_count(), 2);
        assert_eq!(plan.total_pages, 1);
        assert_eq!(cols[3].cell(&plan.rows[1]), "b");
    }
}
