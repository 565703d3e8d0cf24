//! Flows driven end to end against the in-memory gateway.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use supplier_core::{
    perform, ApplyFlow, ApplyMessage, Clock, FormField, ListFlow, ListMessage, ManualClock, PageSize,
    SearchFlow, SearchMessage, SupplierGateway, UpdateFlow, UpdateMessage, UpdatePhase,
    UpdateResult, ValidationPolicy,
};
use supplier_domain::{Country, SupplierId, SupplierStatus};
use supplier_gateway_mock::{InMemorySupplierGateway, Latency};

fn gateway() -> (InMemorySupplierGateway, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
    ));
    let gateway = InMemorySupplierGateway::seeded()
        .with_latency(Latency::zero())
        .with_clock(clock.clone());
    (gateway, clock)
}

fn call(gateway: &dyn SupplierGateway, result: UpdateResult) -> supplier_core::Completion {
    let action = result.action.expect("flow requested a call");
    perform(gateway, &action).expect("gateway-bound action")
}

#[test]
fn submitted_application_appears_in_the_list_as_pending() {
    let (gateway, _) = gateway();
    let mut apply = ApplyFlow::new(ValidationPolicy::default());
    apply
        .update(ApplyMessage::SetField(FormField::Name, "新規物産株式会社".into()))
        .unwrap();
    apply
        .update(ApplyMessage::SetField(FormField::CorporateId, "9876543210987".into()))
        .unwrap();
    let completion = call(&gateway, apply.update(ApplyMessage::Submit).unwrap());
    apply.update(ApplyMessage::Completed(completion)).unwrap();
    let id = apply.submitted_id().cloned().unwrap();

    let mut list = ListFlow::new(PageSize::Ten);
    let completion = call(&gateway, list.update(ListMessage::Load(None)).unwrap());
    list.update(ListMessage::Completed(completion)).unwrap();

    assert_eq!(list.stats().total, 6);
    let row = list.detail(&id).expect("new supplier is listed");
    assert_eq!(row.status, SupplierStatus::Pending);
    assert_eq!(row.name, "新規物産株式会社");
}

#[test]
fn updated_supplier_is_found_by_search() {
    let (gateway, clock) = gateway();
    let id = SupplierId::parse("SUP-0004").unwrap();

    let mut update = UpdateFlow::new(ValidationPolicy::default(), Duration::seconds(3));
    let completion = call(&gateway, update.update(UpdateMessage::Load(id.clone())).unwrap());
    update
        .update(UpdateMessage::Completed {
            completion,
            at: clock.now(),
        })
        .unwrap();
    update
        .update(UpdateMessage::SetField(FormField::Name, "華東精密製造有限公司".into()))
        .unwrap();
    let completion = call(&gateway, update.update(UpdateMessage::Save).unwrap());
    update
        .update(UpdateMessage::Completed {
            completion,
            at: clock.now(),
        })
        .unwrap();
    assert!(matches!(update.phase(), UpdatePhase::Saved { .. }));

    let mut search = SearchFlow::new();
    search
        .update(SearchMessage::SetKeyword("精密".into()))
        .unwrap();
    search
        .update(SearchMessage::SetCountry(Some(Country::Cn)))
        .unwrap();
    let completion = call(&gateway, search.update(SearchMessage::Search).unwrap());
    search.update(SearchMessage::Completed(completion)).unwrap();

    assert_eq!(search.results().len(), 1);
    assert_eq!(search.results()[0].id, id);
}

#[test]
fn page_size_change_starts_from_the_first_page() {
    let (gateway, _) = gateway();
    let mut list = ListFlow::new(PageSize::Ten);
    let completion = call(&gateway, list.update(ListMessage::SetPage(1)).unwrap());
    list.update(ListMessage::Completed(completion)).unwrap();
    assert!(list.rows().is_empty());

    let completion = call(
        &gateway,
        list.update(ListMessage::SetPageSize(PageSize::TwentyFive)).unwrap(),
    );
    list.update(ListMessage::Completed(completion)).unwrap();
    assert_eq!(list.request().page, 0);
    assert_eq!(list.rows().len(), 5);
}
