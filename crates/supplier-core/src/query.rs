//! Search filtering, pagination and list statistics.

use std::collections::BTreeSet;
use std::fmt;

use supplier_domain::{Country, SupplierId, SupplierRecord, SupplierStatus};

/// Keyword and country filter entered on the search screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub country: Option<Country>,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, country: Option<Country>) -> Self {
        Self {
            keyword: keyword.into(),
            country,
        }
    }

    /// A query without conditions matches every supplier.
    pub fn is_unfiltered(&self) -> bool {
        self.keyword.trim().is_empty() && self.country.is_none()
    }

    /// Case-insensitive keyword match against name, corporate id and email,
    /// combined with an exact country match.
    pub fn matches(&self, record: &SupplierRecord) -> bool {
        if let Some(country) = self.country {
            if record.country != country {
                return false;
            }
        }
        let needle = self.keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&record.name, &record.corporate_id, &record.email]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    pub fn filter<'a, I>(&self, rows: I) -> Vec<SupplierRecord>
    where
        I: IntoIterator<Item = &'a SupplierRecord>,
    {
        rows.into_iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect()
    }

    /// Chips describing the active conditions, e.g. `キーワード: ACME`.
    pub fn chips(&self) -> Vec<String> {
        let mut chips = Vec::new();
        if !self.keyword.trim().is_empty() {
            chips.push(format!("キーワード: {}", self.keyword.trim()));
        }
        if let Some(country) = self.country {
            chips.push(format!("国: {}", country.label()));
        }
        chips
    }
}

/// Page sizes offered by the list screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }

    /// Accepts only the offered sizes.
    pub fn from_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == len)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Zero-indexed page request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: PageSize,
}

impl PageRequest {
    pub fn new(page: usize, size: PageSize) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size.get())
    }
}

/// One page of rows plus the size of the full result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: PageSize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.get())
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.page_count()
    }
}

/// Slices `rows` according to `request`. Pages past the end are empty but keep the total.
pub fn paginate<T>(rows: Vec<T>, request: PageRequest) -> Page<T> {
    let total = rows.len();
    let rows = rows
        .into_iter()
        .skip(request.offset())
        .take(request.size.get())
        .collect();
    Page {
        rows,
        total,
        page: request.page,
        page_size: request.size,
    }
}

/// Status counts and membership of a whole filtered result, independent of paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSummary {
    pub active: usize,
    pub pending: usize,
    ids: BTreeSet<SupplierId>,
}

impl ResultSummary {
    pub fn collect(rows: &[SupplierRecord]) -> Self {
        let count = |status: SupplierStatus| rows.iter().filter(|row| row.status == status).count();
        Self {
            active: count(SupplierStatus::Active),
            pending: count(SupplierStatus::Pending),
            ids: rows.iter().map(|row| row.id.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &SupplierId) -> bool {
        self.ids.contains(id)
    }
}

/// A page of suppliers together with the summary of the full result it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub page: Page<SupplierRecord>,
    pub summary: ResultSummary,
}

impl Listing {
    /// Pages `rows` and summarizes all of them.
    pub fn from_rows(rows: Vec<SupplierRecord>, request: PageRequest) -> Self {
        let summary = ResultSummary::collect(&rows);
        Self {
            page: paginate(rows, request),
            summary,
        }
    }
}

/// Counters shown above the list grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub selected: usize,
}

impl ListStats {
    pub fn collect(rows: &[SupplierRecord], selection: &Selection) -> Self {
        Self::from_summary(&ResultSummary::collect(rows), selection)
    }

    pub fn from_summary(summary: &ResultSummary, selection: &Selection) -> Self {
        Self {
            total: summary.len(),
            active: summary.active,
            pending: summary.pending,
            selected: selection.len(),
        }
    }
}

/// Checkbox selection over list rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<SupplierId>,
}

impl Selection {
    /// Flips `id` and reports whether it is now selected.
    pub fn toggle(&mut self, id: SupplierId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &SupplierId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SupplierId> {
        self.ids.iter()
    }

    /// Drops ids that are no longer part of the result, wherever they are paged.
    pub fn retain_matching(&mut self, summary: &ResultSummary) {
        self.ids.retain(|id| summary.contains(id));
    }
}
