//! supplier-gateway-mock
//!
//! In-memory [`SupplierGateway`] seeded with the fixture suppliers. Every call
//! blocks for a configurable latency to stand in for a remote backend.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    thread,
    time::Duration,
};

use supplier_core::{
    paginate, Clock, CoreError, Listing, Page, PageRequest, SearchQuery, SupplierGateway,
    SupplierPatch, SystemClock,
};
use supplier_domain::{
    fixtures::mock_suppliers, SupplierDraft, SupplierId, SupplierRecord, SupplierStatus,
};
use tracing::{debug, info};

/// Simulated round-trip time per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub save_draft: Duration,
    pub submit: Duration,
    pub update: Duration,
    pub search: Duration,
    pub list: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            save_draft: Duration::from_millis(1000),
            submit: Duration::from_millis(2000),
            update: Duration::from_millis(1500),
            search: Duration::from_millis(1500),
            list: Duration::from_millis(1000),
        }
    }
}

impl Latency {
    pub fn zero() -> Self {
        Self {
            save_draft: Duration::ZERO,
            submit: Duration::ZERO,
            update: Duration::ZERO,
            search: Duration::ZERO,
            list: Duration::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    rows: Vec<SupplierRecord>,
    drafts: Vec<SupplierDraft>,
    fail_next: Option<CoreError>,
}

/// Gateway over an in-process vector of suppliers.
#[derive(Clone)]
pub struct InMemorySupplierGateway {
    state: Arc<Mutex<State>>,
    latency: Latency,
    clock: Arc<dyn Clock>,
}

impl Default for InMemorySupplierGateway {
    fn default() -> Self {
        Self::seeded()
    }
}

impl InMemorySupplierGateway {
    /// Gateway holding the five fixture suppliers.
    pub fn seeded() -> Self {
        Self::with_rows(mock_suppliers())
    }

    pub fn with_rows(rows: Vec<SupplierRecord>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                rows,
                ..State::default()
            })),
            latency: Latency::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Makes the next call fail with `error` instead of touching the rows.
    pub fn fail_next(&self, error: CoreError) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_next = Some(error);
        }
    }

    /// Snapshot of all stored suppliers.
    pub fn rows(&self) -> Vec<SupplierRecord> {
        self.state
            .lock()
            .map(|state| state.rows.clone())
            .unwrap_or_default()
    }

    /// Drafts acknowledged by `save_draft`, oldest first.
    pub fn saved_drafts(&self) -> Vec<SupplierDraft> {
        self.state
            .lock()
            .map(|state| state.drafts.clone())
            .unwrap_or_default()
    }

    fn wait(&self, delay: Duration, operation: &str) {
        if !delay.is_zero() {
            debug!(operation, delay_ms = delay.as_millis() as u64, "simulating latency");
            thread::sleep(delay);
        }
    }

    /// Locks the state, handing out an injected failure first if one is pending.
    fn enter(&self) -> Result<MutexGuard<'_, State>, CoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CoreError::TransientIo("supplier store is unavailable".into()))?;
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

fn next_id(rows: &[SupplierRecord]) -> Result<SupplierId, CoreError> {
    let highest = rows.iter().map(|row| row.id.sequence()).max().unwrap_or(0);
    let next = highest
        .checked_add(1)
        .ok_or_else(|| CoreError::Conflict("supplier id space exhausted".into()))?;
    Ok(SupplierId::from_sequence(next)?)
}

impl SupplierGateway for InMemorySupplierGateway {
    fn create_supplier(&self, draft: &SupplierDraft) -> Result<SupplierId, CoreError> {
        self.wait(self.latency.submit, "create");
        let mut state = self.enter()?;
        if !draft.is_submittable() {
            return Err(CoreError::Validation(
                "name and a 13-character corporate id are required".into(),
            ));
        }
        let id = next_id(&state.rows)?;
        let record = SupplierRecord::new(
            id.clone(),
            draft.clone(),
            SupplierStatus::Pending,
            self.clock.today(),
        );
        state.rows.push(record);
        info!(%id, "stored new supplier application");
        Ok(id)
    }

    fn update_supplier(
        &self,
        id: &SupplierId,
        patch: &SupplierPatch,
    ) -> Result<SupplierRecord, CoreError> {
        self.wait(self.latency.update, "update");
        let mut state = self.enter()?;
        let today = self.clock.today();
        let row = state
            .rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        patch.apply_to(row, today);
        Ok(row.clone())
    }

    fn search_suppliers(&self, query: &SearchQuery) -> Result<Vec<SupplierRecord>, CoreError> {
        self.wait(self.latency.search, "search");
        let state = self.enter()?;
        Ok(query.filter(&state.rows))
    }

    fn list_suppliers(&self, request: PageRequest) -> Result<Page<SupplierRecord>, CoreError> {
        self.wait(self.latency.list, "list");
        let state = self.enter()?;
        Ok(paginate(state.rows.clone(), request))
    }

    fn fetch_supplier(&self, id: &SupplierId) -> Result<SupplierRecord, CoreError> {
        let state = self.enter()?;
        state
            .rows
            .iter()
            .find(|row| &row.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    fn save_draft(&self, draft: &SupplierDraft) -> Result<(), CoreError> {
        self.wait(self.latency.save_draft, "save_draft");
        let mut state = self.enter()?;
        state.drafts.push(draft.clone());
        Ok(())
    }

    fn list_matching(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Result<Listing, CoreError> {
        self.wait(self.latency.list, "list");
        let state = self.enter()?;
        Ok(Listing::from_rows(query.filter(&state.rows), request))
    }
}
