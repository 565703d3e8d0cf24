//! Contract between the flows and whatever stores supplier records.

use chrono::NaiveDate;
use supplier_domain::{Country, Rating, SupplierDraft, SupplierId, SupplierRecord};

use crate::{
    query::{Listing, Page, PageRequest, SearchQuery},
    CoreError,
};

/// Abstraction over backends capable of creating, updating and querying suppliers.
pub trait SupplierGateway: Send + Sync {
    /// Persists a new application and returns the assigned id.
    fn create_supplier(&self, draft: &SupplierDraft) -> Result<SupplierId, CoreError>;

    /// Applies `patch` to an existing record and returns the stored result.
    fn update_supplier(
        &self,
        id: &SupplierId,
        patch: &SupplierPatch,
    ) -> Result<SupplierRecord, CoreError>;

    fn search_suppliers(&self, query: &SearchQuery) -> Result<Vec<SupplierRecord>, CoreError>;

    fn list_suppliers(&self, request: PageRequest) -> Result<Page<SupplierRecord>, CoreError>;

    fn fetch_supplier(&self, id: &SupplierId) -> Result<SupplierRecord, CoreError>;

    /// Stores an unfinished application. Nothing is created.
    fn save_draft(&self, draft: &SupplierDraft) -> Result<(), CoreError>;

    /// Page of the list screen plus the status summary of everything `query` matches.
    fn list_matching(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Result<Listing, CoreError> {
        Ok(Listing::from_rows(self.search_suppliers(query)?, request))
    }
}

/// Partial update of the editable supplier fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub corporate_id: Option<String>,
    pub country: Option<Country>,
    pub email: Option<String>,
    pub rating: Option<Rating>,
}

impl SupplierPatch {
    /// Patch that overwrites every editable field.
    pub fn from_draft(draft: &SupplierDraft) -> Self {
        Self {
            name: Some(draft.name.clone()),
            corporate_id: Some(draft.corporate_id.clone()),
            country: Some(draft.country),
            email: Some(draft.email.clone()),
            rating: Some(draft.rating),
        }
    }

    /// Patch holding only the fields where `edited` differs from `original`.
    pub fn diff(original: &SupplierDraft, edited: &SupplierDraft) -> Self {
        Self {
            name: (original.name != edited.name).then(|| edited.name.clone()),
            corporate_id: (original.corporate_id != edited.corporate_id)
                .then(|| edited.corporate_id.clone()),
            country: (original.country != edited.country).then_some(edited.country),
            email: (original.email != edited.email).then(|| edited.email.clone()),
            rating: (original.rating != edited.rating).then_some(edited.rating),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into a draft without touching absent fields.
    pub fn merge_into(&self, draft: &mut SupplierDraft) {
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(corporate_id) = &self.corporate_id {
            draft.corporate_id = corporate_id.clone();
        }
        if let Some(country) = self.country {
            draft.country = country;
        }
        if let Some(email) = &self.email {
            draft.email = email.clone();
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
    }

    /// Applies the patch to `record` and stamps `last_updated` with `today`.
    pub fn apply_to(&self, record: &mut SupplierRecord, today: NaiveDate) {
        let mut draft = record.to_draft();
        self.merge_into(&mut draft);
        record.apply_draft(draft, today);
    }
}
