//! Paging helpers shared by the API families
//!
//! List endpoints return pages of at most `page_size` items; a page shorter
//! than requested marks the end of the data.

use crate::edgegrid::ApiError;
use crate::error::{ExportError, FetchPhase};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// One page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn first(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size,
        }
    }

    /// 1-based page number for APIs that page by number instead of offset
    pub fn page_number(&self) -> usize {
        self.offset / self.page_size.max(1) + 1
    }

    fn next(self) -> Self {
        Self {
            offset: self.offset + self.page_size,
            page_size: self.page_size,
        }
    }
}

/// Items that can be looked up by name
pub trait Named {
    fn name(&self) -> &str;
}

/// Items that carry a version number
pub trait Versioned {
    fn version(&self) -> i64;
}

/// Page through `list` until an item named exactly `name` shows up
///
/// The first match in server order wins. Any listing error aborts the search.
pub fn find_by_name<T, F>(
    kind: &'static str,
    name: &str,
    page_size: usize,
    mut list: F,
) -> Result<T, ExportError>
where
    T: Named,
    F: FnMut(PageRequest) -> Result<Vec<T>, ApiError>,
{
    let mut request = PageRequest::first(page_size);
    loop {
        tracing::debug!(kind, offset = request.offset, "listing page");
        let page = list(request).map_err(|e| ExportError::fetch(kind, FetchPhase::Listing, e))?;
        let page_len = page.len();

        if let Some(item) = page.into_iter().find(|item| item.name() == name) {
            return Ok(item);
        }
        if page_len < request.page_size {
            break;
        }
        request = request.next();
    }

    Err(ExportError::NotFound {
        kind,
        name: name.to_string(),
    })
}

/// Page through every item of a list endpoint
pub fn collect_all<T, F>(kind: &'static str, page_size: usize, mut list: F) -> Result<Vec<T>, ExportError>
where
    F: FnMut(PageRequest) -> Result<Vec<T>, ApiError>,
{
    let mut items = Vec::new();
    let mut request = PageRequest::first(page_size);
    loop {
        let page = list(request).map_err(|e| ExportError::fetch(kind, FetchPhase::Listing, e))?;
        let page_len = page.len();
        items.extend(page);
        if page_len < request.page_size {
            return Ok(items);
        }
        request = request.next();
    }
}

/// Find the highest version across all pages, then fetch its full body
pub fn latest_version<V, D, L, G>(
    kind: &'static str,
    page_size: usize,
    mut list: L,
    get: G,
) -> Result<D, ExportError>
where
    V: Versioned,
    L: FnMut(PageRequest) -> Result<Vec<V>, ApiError>,
    G: FnOnce(i64) -> Result<D, ApiError>,
{
    let mut latest: Option<i64> = None;
    let mut request = PageRequest::first(page_size);
    loop {
        let page =
            list(request).map_err(|e| ExportError::fetch(kind, FetchPhase::VersionFetch, e))?;
        for item in &page {
            let version = item.version();
            if latest.is_none_or(|current| version > current) {
                latest = Some(version);
            }
        }
        if page.len() < request.page_size {
            break;
        }
        request = request.next();
    }

    let version = latest.ok_or(ExportError::NoVersions { kind })?;
    tracing::debug!(kind, version, "fetching latest version");
    get(version).map_err(|e| ExportError::fetch(kind, FetchPhase::DetailFetch, e))
}
