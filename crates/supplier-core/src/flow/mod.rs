//! Screen state machines (message → update → action).
//!
//! Each screen owns a flow whose `update` is a pure transition on its own
//! state. Transitions that need the gateway return a [`FlowAction`]; the
//! caller runs it with [`perform`] and feeds the resulting [`Completion`]
//! back in. While an action is outstanding the flow sits in a busy phase
//! keyed by the action's [`OperationId`], so late or duplicate completions
//! can be told apart from the one being waited for.

pub mod apply;
pub mod list;
pub mod search;
pub mod update;

use std::fmt;

use supplier_domain::{SupplierDraft, SupplierId, SupplierRecord};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    gateway::{SupplierGateway, SupplierPatch},
    navigation::Screen,
    query::{Listing, PageRequest, SearchQuery},
    CoreError,
};

/// Identifies one in-flight gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.0.simple().to_string();
        f.write_str(&full[..8])
    }
}

/// Dismissible notice shown above a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Info(String),
    Error { message: String, retryable: bool },
}

impl Banner {
    pub fn from_error(err: &CoreError) -> Self {
        Banner::Error {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Banner::Success(message) | Banner::Info(message) => message,
            Banner::Error { message, .. } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Banner::Error { .. })
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowAction {
    SaveDraft {
        op: OperationId,
        draft: SupplierDraft,
    },
    Create {
        op: OperationId,
        draft: SupplierDraft,
    },
    Fetch {
        op: OperationId,
        id: SupplierId,
    },
    Update {
        op: OperationId,
        id: SupplierId,
        patch: SupplierPatch,
    },
    Search {
        op: OperationId,
        query: SearchQuery,
    },
    List {
        op: OperationId,
        query: SearchQuery,
        request: PageRequest,
    },
    Navigate(Screen),
    NavigateBack,
    ReturnToMenu,
}

impl FlowAction {
    /// The operation this action starts, if it calls the gateway.
    pub fn operation(&self) -> Option<OperationId> {
        match self {
            FlowAction::SaveDraft { op, .. }
            | FlowAction::Create { op, .. }
            | FlowAction::Fetch { op, .. }
            | FlowAction::Update { op, .. }
            | FlowAction::Search { op, .. }
            | FlowAction::List { op, .. } => Some(*op),
            FlowAction::Navigate(_) | FlowAction::NavigateBack | FlowAction::ReturnToMenu => None,
        }
    }
}

/// Outcome of a gateway call, tagged with the operation that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    DraftSaved {
        op: OperationId,
        result: Result<(), CoreError>,
    },
    Created {
        op: OperationId,
        result: Result<SupplierId, CoreError>,
    },
    Fetched {
        op: OperationId,
        result: Result<SupplierRecord, CoreError>,
    },
    Updated {
        op: OperationId,
        result: Result<SupplierRecord, CoreError>,
    },
    Searched {
        op: OperationId,
        result: Result<Vec<SupplierRecord>, CoreError>,
    },
    Listed {
        op: OperationId,
        result: Result<Listing, CoreError>,
    },
}

impl Completion {
    pub fn operation(&self) -> OperationId {
        match self {
            Completion::DraftSaved { op, .. }
            | Completion::Created { op, .. }
            | Completion::Fetched { op, .. }
            | Completion::Updated { op, .. }
            | Completion::Searched { op, .. }
            | Completion::Listed { op, .. } => *op,
        }
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Completion::DraftSaved { result, .. } => result.as_ref().err(),
            Completion::Created { result, .. } => result.as_ref().err(),
            Completion::Fetched { result, .. } => result.as_ref().err(),
            Completion::Updated { result, .. } => result.as_ref().err(),
            Completion::Searched { result, .. } => result.as_ref().err(),
            Completion::Listed { result, .. } => result.as_ref().err(),
        }
    }
}

/// Result of processing a message.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Optional action for the caller to perform
    pub action: Option<FlowAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn action(action: FlowAction) -> Self {
        Self {
            action: Some(action),
        }
    }
}

/// Runs a gateway-bound action. Navigation actions return `None`.
pub fn perform(gateway: &dyn SupplierGateway, action: &FlowAction) -> Option<Completion> {
    let completion = match action {
        FlowAction::SaveDraft { op, draft } => Completion::DraftSaved {
            op: *op,
            result: gateway.save_draft(draft),
        },
        FlowAction::Create { op, draft } => Completion::Created {
            op: *op,
            result: gateway.create_supplier(draft),
        },
        FlowAction::Fetch { op, id } => Completion::Fetched {
            op: *op,
            result: gateway.fetch_supplier(id),
        },
        FlowAction::Update { op, id, patch } => Completion::Updated {
            op: *op,
            result: gateway.update_supplier(id, patch),
        },
        FlowAction::Search { op, query } => Completion::Searched {
            op: *op,
            result: gateway.search_suppliers(query),
        },
        FlowAction::List { op, query, request } => Completion::Listed {
            op: *op,
            result: gateway.list_matching(query, *request),
        },
        FlowAction::Navigate(_) | FlowAction::NavigateBack | FlowAction::ReturnToMenu => {
            return None
        }
    };
    match completion.error() {
        Some(err) => warn!(op = %completion.operation(), error = %err, "gateway call failed"),
        None => info!(op = %completion.operation(), "gateway call completed"),
    }
    Some(completion)
}

fn ignore_stale(completion: &Completion) -> UpdateResult {
    warn!(op = %completion.operation(), "ignoring completion for an operation no longer awaited");
    UpdateResult::none()
}
