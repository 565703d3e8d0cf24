use supplier_domain::{SupplierId, SupplierRecord};
use tracing::debug;

use super::{ignore_stale, Banner, Completion, FlowAction, OperationId, UpdateResult};
use crate::{
    error::FlowError,
    navigation::Screen,
    query::{ListStats, Listing, Page, PageRequest, PageSize, SearchQuery, Selection},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMessage {
    /// Loads the current page, optionally replacing the carried query.
    Load(Option<SearchQuery>),
    SetPage(usize),
    SetPageSize(PageSize),
    Toggle(SupplierId),
    ClearSelection,
    Edit(SupplierId),
    GoToUpdate,
    Completed(Completion),
}

/// State of the list screen.
#[derive(Debug, Clone, Default)]
pub struct ListFlow {
    query: SearchQuery,
    request: PageRequest,
    listing: Option<Listing>,
    selection: Selection,
    loading: Option<OperationId>,
    banner: Option<Banner>,
}

impl ListFlow {
    pub fn new(size: PageSize) -> Self {
        Self {
            request: PageRequest::new(0, size),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn page(&self) -> Option<&Page<SupplierRecord>> {
        self.listing.as_ref().map(|listing| &listing.page)
    }

    pub fn rows(&self) -> &[SupplierRecord] {
        self.page()
            .map(|page| page.rows.as_slice())
            .unwrap_or_default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.loading.is_some()
    }

    /// Counters over the full result, not just the rows on screen.
    pub fn stats(&self) -> ListStats {
        match &self.listing {
            Some(listing) => ListStats::from_summary(&listing.summary, &self.selection),
            None => ListStats {
                selected: self.selection.len(),
                ..ListStats::default()
            },
        }
    }

    /// Row shown by the detail view.
    pub fn detail(&self, id: &SupplierId) -> Option<&SupplierRecord> {
        self.rows().iter().find(|row| &row.id == id)
    }

    pub fn update(&mut self, message: ListMessage) -> Result<UpdateResult, FlowError> {
        if self.is_busy() && !matches!(message, ListMessage::Completed(_)) {
            return Err(FlowError::Busy);
        }
        match message {
            ListMessage::Load(query) => {
                if let Some(query) = query {
                    if query != self.query {
                        self.request.page = 0;
                    }
                    self.query = query;
                }
                Ok(self.reload())
            }
            ListMessage::SetPage(page) => {
                self.request.page = page;
                Ok(self.reload())
            }
            ListMessage::SetPageSize(size) => {
                self.request = PageRequest::new(0, size);
                Ok(self.reload())
            }
            ListMessage::Toggle(id) => {
                let selected = self.selection.toggle(id.clone());
                debug!(%id, selected, "toggled list selection");
                Ok(UpdateResult::none())
            }
            ListMessage::ClearSelection => {
                self.selection.clear();
                Ok(UpdateResult::none())
            }
            ListMessage::Edit(id) => Ok(UpdateResult::action(FlowAction::Navigate(
                Screen::Update { id: Some(id) },
            ))),
            ListMessage::GoToUpdate => Ok(UpdateResult::action(FlowAction::Navigate(
                Screen::Update { id: None },
            ))),
            ListMessage::Completed(completion) => Ok(self.complete(completion)),
        }
    }

    fn reload(&mut self) -> UpdateResult {
        let op = OperationId::new();
        debug!(%op, page = self.request.page, size = %self.request.size, "loading supplier list");
        self.loading = Some(op);
        self.banner = None;
        UpdateResult::action(FlowAction::List {
            op,
            query: self.query.clone(),
            request: self.request,
        })
    }

    fn complete(&mut self, completion: Completion) -> UpdateResult {
        if self.loading != Some(completion.operation()) {
            return ignore_stale(&completion);
        }
        match completion {
            Completion::Listed { result, .. } => {
                self.loading = None;
                match result {
                    Ok(listing) => {
                        self.selection.retain_matching(&listing.summary);
                        self.listing = Some(listing);
                    }
                    Err(err) => self.banner = Some(Banner::from_error(&err)),
                }
                UpdateResult::none()
            }
            other => ignore_stale(&other),
        }
    }
}
