//! Page envelope returned by every paginated endpoint.

use serde::{Deserialize, Serialize};

/// One page of a larger server-side result set.
///
/// `page_no` is zero-based. For any envelope built here,
/// `last == (page_no == total_pages - 1)` when `total_pages > 0`, and the
/// empty envelope reports `last = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    pub total_pages: usize,
    pub page_no: usize,
    pub page_size: usize,
    pub total_elements: usize,
    pub last: bool,
}

impl<T> Default for PageEnvelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> PageEnvelope<T> {
    /// The "no data yet" / "nothing found" envelope.
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            page_no: 0,
            page_size: 0,
            total_elements: 0,
            last: true,
        }
    }

    /// Slices `page_no` out of the full result set.
    ///
    /// A `page_size` of zero or a `page_no` past the end yields an envelope with
    /// empty content but the correct totals.
    pub fn paginate(all: Vec<T>, page_no: usize, page_size: usize) -> Self {
        let total_elements = all.len();
        if page_size == 0 {
            return Self {
                total_elements,
                ..Self::empty()
            };
        }

        let total_pages = total_elements.div_ceil(page_size);
        let content: Vec<T> = all
            .into_iter()
            .skip(page_no.saturating_mul(page_size))
            .take(page_size)
            .collect();

        Self {
            content,
            total_pages,
            page_no,
            page_size,
            total_elements,
            last: is_last_page(page_no, total_pages),
        }
    }

    /// Checks the envelope invariants. Server responses are not trusted to
    /// hold them.
    pub fn is_consistent(&self) -> bool {
        let size_ok = self.page_size == 0 || self.content.len() <= self.page_size;
        let last_ok =
            self.total_pages == 0 || self.last == is_last_page(self.page_no, self.total_pages);
        size_ok && last_ok
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Reshapes every row while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageEnvelope<U> {
        PageEnvelope {
            content: self.content.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            page_no: self.page_no,
            page_size: self.page_size,
            total_elements: self.total_elements,
            last: self.last,
        }
    }

    /// Like [`PageEnvelope::map`] but stops at the first failing row.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<PageEnvelope<U>, E> {
        Ok(PageEnvelope {
            content: self.content.into_iter().map(f).collect::<Result<_, _>>()?,
            total_pages: self.total_pages,
            page_no: self.page_no,
            page_size: self.page_size,
            total_elements: self.total_elements,
            last: self.last,
        })
    }
}

fn is_last_page(page_no: usize, total_pages: usize) -> bool {
    total_pages == 0 || page_no + 1 == total_pages
}
