//! supplier-core
//!
//! Form state, submission flows, navigation and queries for supplier records.
//! Depends on supplier-domain. No CLI, no terminal I/O, no concrete gateway.

pub mod error;
pub mod flow;
pub mod form;
pub mod gateway;
pub mod navigation;
pub mod query;
pub mod time;

pub use error::{CoreError, FlowError, ValidationError};
pub use flow::{
    apply::{ApplyFlow, ApplyMessage, ApplyPhase, ApplyStep},
    list::{ListFlow, ListMessage},
    perform,
    search::{SearchFlow, SearchMessage, SearchPhase},
    update::{default_saved_banner, UpdateFlow, UpdateMessage, UpdatePhase},
    Banner, Completion, FlowAction, OperationId, UpdateResult,
};
pub use form::{FormField, FormTab, SearchForm, SupplierForm, ValidationPolicy};
pub use gateway::{SupplierGateway, SupplierPatch};
pub use navigation::{MenuEntry, Navigator, Screen};
pub use query::{
    paginate, ListStats, Listing, Page, PageRequest, PageSize, ResultSummary, SearchQuery,
    Selection,
};
pub use time::{Clock, ManualClock, SystemClock};

#[cfg(test)]
mod tests;
