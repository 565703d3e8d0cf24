use std::sync::Mutex;

use chrono::NaiveDate;

use crate::{
    flow::perform, paginate, ApplyFlow, ApplyMessage, ApplyPhase, ApplyStep, CoreError,
    FlowAction, FormField, Navigator, Page, PageRequest, PageSize, Screen, SearchQuery,
    SupplierForm, SupplierGateway, SupplierPatch, ValidationPolicy,
};
use supplier_domain::{
    fixtures::mock_suppliers, Country, SupplierDraft, SupplierId, SupplierRecord, SupplierStatus,
};

/// Gateway answering immediately from a vector of rows.
struct VecGateway {
    rows: Mutex<Vec<SupplierRecord>>,
}

impl VecGateway {
    fn seeded() -> Self {
        Self {
            rows: Mutex::new(mock_suppliers()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }
}

impl SupplierGateway for VecGateway {
    fn create_supplier(&self, draft: &SupplierDraft) -> Result<SupplierId, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let next = rows.iter().map(|row| row.id.sequence()).max().unwrap_or(0) + 1;
        let id = SupplierId::from_sequence(next)?;
        rows.push(SupplierRecord::new(
            id.clone(),
            draft.clone(),
            SupplierStatus::Pending,
            Self::today(),
        ));
        Ok(id)
    }

    fn update_supplier(
        &self,
        id: &SupplierId,
        patch: &SupplierPatch,
    ) -> Result<SupplierRecord, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        patch.apply_to(row, Self::today());
        Ok(row.clone())
    }

    fn search_suppliers(&self, query: &SearchQuery) -> Result<Vec<SupplierRecord>, CoreError> {
        Ok(query.filter(self.rows.lock().unwrap().iter()))
    }

    fn list_suppliers(&self, request: PageRequest) -> Result<Page<SupplierRecord>, CoreError> {
        Ok(paginate(self.rows.lock().unwrap().clone(), request))
    }

    fn fetch_supplier(&self, id: &SupplierId) -> Result<SupplierRecord, CoreError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| &row.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    fn save_draft(&self, _draft: &SupplierDraft) -> Result<(), CoreError> {
        Ok(())
    }
}

#[test]
fn empty_name_with_full_corporate_id_is_invalid() {
    let mut form = SupplierForm::for_apply(ValidationPolicy::default());
    form.set_field(FormField::Name, "").expect("set name");
    form.set_field(FormField::CorporateId, "1234567890123")
        .expect("set corporate id");
    assert!(!form.is_valid());
}

#[test]
fn twelve_character_corporate_id_is_invalid() {
    let mut form = SupplierForm::for_apply(ValidationPolicy::default());
    form.set_field(FormField::Name, "ACME").expect("set name");
    form.set_field(FormField::CorporateId, "123456789012")
        .expect("set corporate id");
    assert!(!form.is_valid());
}

#[test]
fn valid_application_is_created_and_retrievable() {
    let gateway = VecGateway::seeded();
    let mut flow = ApplyFlow::new(ValidationPolicy::default());
    flow.update(ApplyMessage::SetField(FormField::Name, "ACME".into()))
        .expect("set name");
    flow.update(ApplyMessage::SetField(
        FormField::CorporateId,
        "1234567890123".into(),
    ))
    .expect("set corporate id");
    flow.update(ApplyMessage::SetField(FormField::Country, "US".into()))
        .expect("set country");
    assert!(flow.form().is_valid());

    let action = flow
        .update(ApplyMessage::Submit)
        .expect("submit")
        .action
        .expect("create action");
    assert_eq!(flow.phase().step(), ApplyStep::Review);

    let completion = perform(&gateway, &action).expect("gateway completion");
    flow.update(ApplyMessage::Completed(completion))
        .expect("complete");
    assert_eq!(flow.step(), ApplyStep::Complete);

    let id = flow.submitted_id().cloned().expect("assigned id");
    assert_eq!(id.as_str(), "SUP-0006");
    let stored = gateway.fetch_supplier(&id).expect("stored record");
    assert_eq!(stored.name, "ACME");
    assert_eq!(stored.corporate_id, "1234567890123");
    assert_eq!(stored.country, Country::Us);
    assert_eq!(stored.rating.value(), 3);
    assert_eq!(stored.email, "");
}

#[test]
fn cancel_returns_to_prior_screen_and_keeps_draft() {
    let mut nav = Navigator::default();
    nav.navigate_to(Screen::List);
    nav.navigate_to(Screen::Apply);

    let mut flow = ApplyFlow::new(ValidationPolicy::default());
    flow.update(ApplyMessage::SetField(FormField::Name, "Draft Co".into()))
        .expect("set name");
    let before = flow.form().draft().clone();

    let action = flow.update(ApplyMessage::Cancel).expect("cancel").action;
    assert_eq!(action, Some(FlowAction::NavigateBack));
    nav.back();
    assert_eq!(nav.current(), &Screen::List);
    assert_eq!(flow.form().draft(), &before);
    assert_eq!(flow.phase(), &ApplyPhase::Editing);
}

#[test]
fn first_page_of_fixture_holds_all_rows() {
    let gateway = VecGateway::seeded();
    let page = gateway
        .list_suppliers(PageRequest::new(0, PageSize::Ten))
        .expect("list");
    assert_eq!(page.rows.len(), 5);
    assert_eq!(page.total, 5);
    assert!(page.is_last());
}

#[test]
fn setting_rating_twice_matches_setting_it_once() {
    let mut once = SupplierForm::for_apply(ValidationPolicy::default());
    once.set_field(FormField::Rating, "4").expect("rating");

    let mut twice = SupplierForm::for_apply(ValidationPolicy::default());
    twice.set_field(FormField::Rating, "4").expect("rating");
    twice.set_field(FormField::Rating, "4").expect("rating");

    assert_eq!(once.draft(), twice.draft());
}

#[test]
fn out_of_range_rating_is_rejected_and_three_reads_back() {
    let mut form = SupplierForm::for_apply(ValidationPolicy::default());
    assert!(form.set_field(FormField::Rating, "0").is_err());
    assert!(form.set_field(FormField::Rating, "6").is_err());
    form.set_field(FormField::Rating, "3").expect("rating");
    assert_eq!(form.draft().rating.value(), 3);
}

#[test]
fn list_matching_filters_then_pages() {
    let gateway = VecGateway::seeded();
    let query = SearchQuery::new("", Some(Country::Jp));
    let listing = gateway
        .list_matching(&query, PageRequest::new(0, PageSize::Ten))
        .expect("list");
    assert_eq!(listing.page.total, 3);
    assert_eq!(listing.summary.active, 3);
    assert!(listing.page.rows.iter().all(|row| row.country == Country::Jp));
}

#[test]
fn update_of_unknown_supplier_is_not_found() {
    let gateway = VecGateway::seeded();
    let id = SupplierId::parse("SUP-0042").expect("id");
    let err = gateway
        .update_supplier(&id, &SupplierPatch::default())
        .unwrap_err();
    assert_eq!(err, CoreError::NotFound(id));
    assert!(!err.is_retryable());
}
