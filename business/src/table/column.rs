//! Column descriptors.

use std::sync::Arc;

use ustr::Ustr;

/// Default declared width, in points.
pub const DEFAULT_SIZE: f32 = 150.0;
/// Default lower bound for resizes.
pub const DEFAULT_MIN_SIZE: f32 = 20.0;
/// Default upper bound for resizes.
pub const DEFAULT_MAX_SIZE: f32 = f32::MAX;

pub type Accessor<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Which edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinSide {
    Left,
    #[default]
    None,
}

/// How a column's cells are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Row checkbox bound to the selection set.
    Select,
    /// Text produced by the column accessor.
    #[default]
    Data,
    /// Button that opens the row's detail view.
    Details,
    /// Per-row action menu.
    Actions,
}

/// Clamps `width` into `[min, max]`. NaN collapses to `min`.
pub fn clamp_width(width: f32, min: f32, max: f32) -> f32 {
    width.max(min).min(max)
}

/// Describes one column of a table over rows of type `R`.
///
/// Setters keep `min_size ≤ max_size`; [`ColumnDef::size`] always reports the
/// declared size clamped into that range.
pub struct ColumnDef<R> {
    id: Ustr,
    header: String,
    accessor: Option<Accessor<R>>,
    kind: ColumnKind,
    size: f32,
    min_size: f32,
    max_size: f32,
    resizable: bool,
    pin: PinSide,
    visible: bool,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            kind: self.kind,
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
            resizable: self.resizable,
            pin: self.pin,
            visible: self.visible,
        }
    }
}

impl<R> std::fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("has_accessor", &self.accessor.is_some())
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("resizable", &self.resizable)
            .field("pin", &self.pin)
            .field("visible", &self.visible)
            .finish()
    }
}

impl<R> ColumnDef<R> {
    pub fn new(id: &str, header: impl Into<String>) -> Self {
        Self {
            id: Ustr::from(id),
            header: header.into(),
            accessor: None,
            kind: ColumnKind::Data,
            size: DEFAULT_SIZE,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            resizable: true,
            pin: PinSide::None,
            visible: true,
        }
    }

    /// Checkbox column. Fixed width, not resizable.
    pub fn select(id: &str) -> Self {
        Self::new(id, "")
            .kind(ColumnKind::Select)
            .with_size(40.0)
            .with_min_size(40.0)
            .with_max_size(40.0)
            .resizable(false)
    }

    pub fn accessor(mut self, f: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.accessor = Some(Arc::new(f));
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size.max(0.0);
        if self.max_size < self.min_size {
            self.max_size = self.min_size;
        }
        self
    }

    pub fn with_max_size(mut self, max_size: f32) -> Self {
        self.max_size = max_size.max(self.min_size);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn pinned(mut self, pin: PinSide) -> Self {
        self.pin = pin;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn id(&self) -> Ustr {
        self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn column_kind(&self) -> ColumnKind {
        self.kind
    }

    /// Declared size, clamped into `[min_size, max_size]`.
    pub fn size(&self) -> f32 {
        self.clamp(self.size)
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn max_size(&self) -> f32 {
        self.max_size
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn pin(&self) -> PinSide {
        self.pin
    }

    /// Whether the column starts visible before any visibility override.
    pub fn default_visible(&self) -> bool {
        self.visible
    }

    pub fn clamp(&self, width: f32) -> f32 {
        clamp_width(width, self.min_size, self.max_size)
    }

    /// Cell text for `row`; empty for columns without an accessor.
    pub fn cell(&self, row: &R) -> String {
        self.accessor
            .as_ref()
            .map(|accessor| accessor(row))
            .unwrap_or_default()
    }
}
