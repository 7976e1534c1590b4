use crate::error::{EngineError, EngineResult};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Fixed-size windows over a sorted result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(count / page_size)`
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Items on 1-based page `page_number`.
    ///
    /// Page 1 of an empty result is an empty slice; any other page outside
    /// `1..=total_pages` is rejected.
    pub fn page<'s, T>(&self, sorted: &'s [T], page_number: usize) -> EngineResult<&'s [T]> {
        let total_pages = self.total_pages(sorted.len());
        if page_number == 1 && total_pages == 0 {
            return Ok(&sorted[..0]);
        }
        validate_page(page_number, total_pages)?;

        let start = (page_number - 1) * self.page_size;
        let end = (start + self.page_size).min(sorted.len());
        Ok(&sorted[start..end])
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

fn validate_page(requested: usize, total_pages: usize) -> EngineResult<()> {
    if requested == 0 || requested > total_pages {
        return Err(EngineError::PageOutOfRange {
            requested,
            total_pages,
        });
    }
    Ok(())
}

/// Current page of a result list, reset whenever the query changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    total_pages: usize,
    query_fingerprint: Option<u64>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: 1,
            total_pages: 0,
            query_fingerprint: None,
        }
    }
}

impl PageState {
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Record the latest query and result size.
    ///
    /// A different filter/sort/search fingerprint sends the user back to
    /// page 1. Returns true when that happened.
    pub fn sync(&mut self, query_fingerprint: u64, total_pages: usize) -> bool {
        self.total_pages = total_pages;
        let changed = self.query_fingerprint != Some(query_fingerprint);
        self.query_fingerprint = Some(query_fingerprint);
        if changed || self.current > total_pages.max(1) {
            self.current = 1;
        }
        changed
    }

    /// Jump to page `n`; out-of-range input is rejected and leaves the
    /// current page unchanged.
    pub fn jump_to_page(&mut self, n: usize) -> EngineResult<usize> {
        validate_page(n, self.total_pages)?;
        self.current = n;
        Ok(n)
    }

    pub fn next(&mut self) -> EngineResult<usize> {
        self.jump_to_page(self.current + 1)
    }

    pub fn previous(&mut self) -> EngineResult<usize> {
        self.jump_to_page(self.current.saturating_sub(1))
    }
}
