use supplier_domain::{Country, SupplierRecord};
use tracing::debug;

use super::{ignore_stale, Banner, Completion, FlowAction, OperationId, UpdateResult};
use crate::{error::FlowError, form::SearchForm, navigation::Screen, query::SearchQuery};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching {
        op: OperationId,
    },
    Completed {
        count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    SetKeyword(String),
    SetCountry(Option<Country>),
    Search,
    Clear,
    GoToList,
    Completed(Completion),
}

/// State of the search screen.
#[derive(Debug, Clone, Default)]
pub struct SearchFlow {
    form: SearchForm,
    phase: SearchPhase,
    results: Vec<SupplierRecord>,
    last_query: Option<SearchQuery>,
    banner: Option<Banner>,
}

impl SearchFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn results(&self) -> &[SupplierRecord] {
        &self.results
    }

    /// Query of the last completed search, carried over to the list screen.
    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, SearchPhase::Searching { .. })
    }

    /// The query the list screen should show: the last search, or the form as typed.
    pub fn carried_query(&self) -> SearchQuery {
        self.last_query
            .clone()
            .unwrap_or_else(|| self.form.to_query())
    }

    pub fn update(&mut self, message: SearchMessage) -> Result<UpdateResult, FlowError> {
        if self.is_busy() && !matches!(message, SearchMessage::Completed(_)) {
            return Err(FlowError::Busy);
        }
        match message {
            SearchMessage::SetKeyword(keyword) => {
                self.form.set_keyword(keyword);
                Ok(UpdateResult::none())
            }
            SearchMessage::SetCountry(country) => {
                match country {
                    Some(country) => self.form.set_country(country),
                    None => self.form.clear_country(),
                }
                Ok(UpdateResult::none())
            }
            SearchMessage::Search => {
                let op = OperationId::new();
                let query = self.form.to_query();
                debug!(%op, keyword = %query.keyword, country = ?query.country, "searching suppliers");
                self.phase = SearchPhase::Searching { op };
                self.banner = None;
                Ok(UpdateResult::action(FlowAction::Search { op, query }))
            }
            SearchMessage::Clear => {
                self.form.clear();
                self.results.clear();
                self.last_query = None;
                self.banner = None;
                self.phase = SearchPhase::Idle;
                Ok(UpdateResult::none())
            }
            SearchMessage::GoToList => Ok(UpdateResult::action(FlowAction::Navigate(Screen::List))),
            SearchMessage::Completed(completion) => Ok(self.complete(completion)),
        }
    }

    fn complete(&mut self, completion: Completion) -> UpdateResult {
        let awaited = match self.phase {
            SearchPhase::Searching { op } => Some(op),
            _ => None,
        };
        if awaited != Some(completion.operation()) {
            return ignore_stale(&completion);
        }
        match completion {
            Completion::Searched { result, .. } => {
                match result {
                    Ok(rows) => {
                        self.phase = SearchPhase::Completed { count: rows.len() };
                        self.results = rows;
                        self.last_query = Some(self.form.to_query());
                    }
                    Err(err) => {
                        self.phase = SearchPhase::Idle;
                        self.banner = Some(Banner::from_error(&err));
                    }
                }
                UpdateResult::none()
            }
            other => ignore_stale(&other),
        }
    }
}
