mod activity;
mod bulk_bar;
mod bulk_dialogs;
mod error_boundary;
mod pagination_bar;
mod roster_page;
pub mod table;

pub use activity::activity_window;
pub use bulk_bar::bulk_bar;
pub use bulk_dialogs::{DialogForm, bulk_dialogs};
pub use error_boundary::{BoundaryAction, ErrorBoundary};
pub use pagination_bar::pagination_bar;
pub use roster_page::roster_page;
pub use table::{DataTable, PageEvent, TableEvent, apply_table_events};

/// Widget-only state of the roster page: text buffers and window toggles
/// that never reach the business layer until submitted.
#[derive(Debug, Default)]
pub struct RosterPageUi {
    pub search_text: String,
    pub jump_text: String,
    pub dialog_form: DialogForm,
    pub activity_open: bool,
    pub activity_slide_text: String,
    pub activity_jump_text: String,
}
