//! Previous/next/jump navigation over a zero-based page index.

use log::debug;

/// Navigation state for a paged view. Knows nothing about the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Zero-based.
    pub current_page: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    pub fn can_previous(&self) -> bool {
        self.current_page > 0
    }

    pub fn can_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    pub fn previous(&self) -> Option<usize> {
        self.can_previous().then(|| self.current_page - 1)
    }

    pub fn next(&self) -> Option<usize> {
        self.can_next().then(|| self.current_page + 1)
    }

    /// Parses 1-based user input into a zero-based page index.
    ///
    /// Non-numeric or out-of-range input yields `None`.
    pub fn parse_jump(&self, input: &str) -> Option<usize> {
        let page: usize = input.trim().parse().ok()?;
        (1..=self.total_pages).contains(&page).then(|| page - 1)
    }

    /// Calls `on_change` with the zero-based target when `input` is valid.
    /// Invalid input is ignored. Returns whether the callback fired.
    pub fn jump(&self, input: &str, on_change: impl FnOnce(usize)) -> bool {
        match self.parse_jump(input) {
            Some(page) => {
                on_change(page);
                true
            }
            None => {
                debug!("Pagination: ignoring jump input {input:?}");
                false
            }
        }
    }

    /// 1-based "Page X of Y" label.
    pub fn label(&self) -> String {
        if self.total_pages == 0 {
            "Page 0 of 0".to_string()
        } else {
            format!("Page {} of {}", self.current_page + 1, self.total_pages)
        }
    }
}
