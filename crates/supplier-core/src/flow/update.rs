//! Update flow: Loading → Editing → Saving → Saved (transient) → Editing.

use chrono::{DateTime, Duration, Utc};
use supplier_domain::{SupplierDraft, SupplierId, SupplierRecord};
use tracing::{debug, info};

use super::{ignore_stale, Banner, Completion, FlowAction, OperationId, UpdateResult};
use crate::{
    error::FlowError,
    form::{FormField, FormTab, SupplierForm, ValidationPolicy},
    gateway::SupplierPatch,
};

/// How long the "saved" banner stays up before the form returns to editing.
pub fn default_saved_banner() -> Duration {
    Duration::seconds(3)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePhase {
    /// Nothing loaded yet.
    Idle,
    Loading { op: OperationId },
    Editing,
    Saving { op: OperationId },
    Saved { until: DateTime<Utc> },
}

impl UpdatePhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, UpdatePhase::Loading { .. } | UpdatePhase::Saving { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    Load(SupplierId),
    SetField(FormField, String),
    SetRating(u8),
    SelectTab(FormTab),
    Save,
    Cancel,
    DismissBanner,
    Tick(DateTime<Utc>),
    /// Completion of an outstanding call, stamped with the time it arrived.
    Completed {
        completion: Completion,
        at: DateTime<Utc>,
    },
}

/// State of the update screen.
#[derive(Debug, Clone)]
pub struct UpdateFlow {
    record: Option<SupplierRecord>,
    form: SupplierForm,
    phase: UpdatePhase,
    tab: FormTab,
    banner: Option<Banner>,
    saved_banner: Duration,
}

impl UpdateFlow {
    pub fn new(policy: ValidationPolicy, saved_banner: Duration) -> Self {
        Self {
            record: None,
            form: SupplierForm::new(SupplierDraft::for_update(), policy),
            phase: UpdatePhase::Idle,
            tab: FormTab::default(),
            banner: None,
            saved_banner,
        }
    }

    pub fn record(&self) -> Option<&SupplierRecord> {
        self.record.as_ref()
    }

    pub fn form(&self) -> &SupplierForm {
        &self.form
    }

    pub fn phase(&self) -> &UpdatePhase {
        &self.phase
    }

    pub fn tab(&self) -> FormTab {
        self.tab
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn update(&mut self, message: UpdateMessage) -> Result<UpdateResult, FlowError> {
        match message {
            UpdateMessage::Load(id) => {
                if self.is_busy() {
                    return Err(FlowError::Busy);
                }
                let op = OperationId::new();
                debug!(%op, %id, "loading supplier for update");
                self.phase = UpdatePhase::Loading { op };
                self.banner = None;
                Ok(UpdateResult::action(FlowAction::Fetch { op, id }))
            }
            UpdateMessage::SetField(field, value) => {
                self.begin_edit()?;
                self.form
                    .set_field(field, &value)
                    .map_err(|err| FlowError::Invalid(vec![err]))?;
                Ok(UpdateResult::none())
            }
            UpdateMessage::SetRating(value) => {
                self.begin_edit()?;
                self.form
                    .set_rating(value)
                    .map_err(|err| FlowError::Invalid(vec![err]))?;
                Ok(UpdateResult::none())
            }
            UpdateMessage::SelectTab(tab) => {
                self.tab = tab;
                Ok(UpdateResult::none())
            }
            UpdateMessage::Save => {
                self.begin_edit()?;
                let Some(record) = self.record.as_ref() else {
                    return Err(FlowError::NotEditing);
                };
                let issues = self.form.issues();
                if !issues.is_empty() {
                    return Err(FlowError::Invalid(issues));
                }
                let op = OperationId::new();
                let id = record.id.clone();
                let patch = SupplierPatch::diff(&record.to_draft(), self.form.draft());
                info!(%op, %id, "saving supplier changes");
                self.phase = UpdatePhase::Saving { op };
                Ok(UpdateResult::action(FlowAction::Update { op, id, patch }))
            }
            UpdateMessage::Cancel => {
                if self.is_busy() {
                    return Err(FlowError::Busy);
                }
                Ok(UpdateResult::action(FlowAction::NavigateBack))
            }
            UpdateMessage::DismissBanner => {
                self.banner = None;
                if matches!(self.phase, UpdatePhase::Saved { .. }) {
                    self.phase = UpdatePhase::Editing;
                }
                Ok(UpdateResult::none())
            }
            UpdateMessage::Tick(now) => {
                if let UpdatePhase::Saved { until } = self.phase {
                    if now >= until {
                        self.phase = UpdatePhase::Editing;
                        self.banner = None;
                    }
                }
                Ok(UpdateResult::none())
            }
            UpdateMessage::Completed { completion, at } => Ok(self.complete(completion, at)),
        }
    }

    /// Leaves the transient saved state, or refuses when there is nothing to edit.
    fn begin_edit(&mut self) -> Result<(), FlowError> {
        match self.phase {
            UpdatePhase::Editing => Ok(()),
            UpdatePhase::Saved { .. } => {
                self.phase = UpdatePhase::Editing;
                self.banner = None;
                Ok(())
            }
            UpdatePhase::Loading { .. } | UpdatePhase::Saving { .. } => Err(FlowError::Busy),
            UpdatePhase::Idle => Err(FlowError::NotEditing),
        }
    }

    fn awaited(&self) -> Option<OperationId> {
        match self.phase {
            UpdatePhase::Loading { op } | UpdatePhase::Saving { op } => Some(op),
            _ => None,
        }
    }

    fn complete(&mut self, completion: Completion, at: DateTime<Utc>) -> UpdateResult {
        if self.awaited() != Some(completion.operation()) {
            return ignore_stale(&completion);
        }
        match completion {
            Completion::Fetched { result, .. } => {
                match result {
                    Ok(record) => {
                        self.form.load(record.to_draft());
                        self.record = Some(record);
                        self.phase = UpdatePhase::Editing;
                    }
                    Err(err) => {
                        self.record = None;
                        self.form.load(SupplierDraft::for_update());
                        self.phase = UpdatePhase::Idle;
                        self.banner = Some(Banner::from_error(&err));
                    }
                }
                UpdateResult::none()
            }
            Completion::Updated { result, .. } => {
                match result {
                    Ok(record) => {
                        info!(id = %record.id, "supplier updated");
                        self.form.load(record.to_draft());
                        self.record = Some(record);
                        self.phase = UpdatePhase::Saved {
                            until: at + self.saved_banner,
                        };
                        self.banner = Some(Banner::Success(
                            "調達先情報が正常に更新されました。".into(),
                        ));
                    }
                    Err(err) => {
                        self.phase = UpdatePhase::Editing;
                        self.banner = Some(Banner::from_error(&err));
                    }
                }
                UpdateResult::none()
            }
            other => ignore_stale(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use chrono::TimeZone;
    use supplier_domain::fixtures::update_seed;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 25, 9, 0, 0).unwrap()
    }

    fn op_of(result: UpdateResult) -> OperationId {
        result
            .action
            .and_then(|action| action.operation())
            .expect("operation started")
    }

    fn loaded() -> UpdateFlow {
        let mut flow = UpdateFlow::new(ValidationPolicy::default(), default_saved_banner());
        let seed = update_seed();
        let op = op_of(flow.update(UpdateMessage::Load(seed.id.clone())).unwrap());
        flow.update(UpdateMessage::Completed {
            completion: Completion::Fetched {
                op,
                result: Ok(seed),
            },
            at: start(),
        })
        .unwrap();
        flow
    }

    #[test]
    fn edits_before_load_are_refused() {
        let mut flow = UpdateFlow::new(ValidationPolicy::default(), default_saved_banner());
        assert_eq!(flow.form().draft().rating.value(), 4);
        assert_eq!(
            flow.update(UpdateMessage::SetField(FormField::Name, "X".into())),
            Err(FlowError::NotEditing)
        );
    }

    #[test]
    fn load_fills_form_from_record() {
        let flow = loaded();
        assert_eq!(flow.phase(), &UpdatePhase::Editing);
        assert_eq!(flow.form().draft().name, "株式会社サンプル商事");
        assert!(!flow.form().is_dirty());
    }

    #[test]
    fn save_sends_only_changed_fields() {
        let mut flow = loaded();
        flow.update(UpdateMessage::SetRating(2)).unwrap();
        let result = flow.update(UpdateMessage::Save).unwrap();
        match result.action {
            Some(FlowAction::Update { id, patch, .. }) => {
                assert_eq!(id.as_str(), "SUP-0001");
                assert!(patch.name.is_none());
                assert_eq!(patch.rating.map(|r| r.value()), Some(2));
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(flow.is_busy());
    }

    #[test]
    fn saved_banner_reverts_after_delay() {
        let mut flow = loaded();
        flow.update(UpdateMessage::SetField(FormField::Email, "a@b.jp".into()))
            .unwrap();
        let op = op_of(flow.update(UpdateMessage::Save).unwrap());
        let mut stored = update_seed();
        stored.email = "a@b.jp".into();
        flow.update(UpdateMessage::Completed {
            completion: Completion::Updated {
                op,
                result: Ok(stored),
            },
            at: start(),
        })
        .unwrap();
        assert!(matches!(flow.phase(), UpdatePhase::Saved { .. }));
        assert!(matches!(flow.banner(), Some(Banner::Success(_))));

        flow.update(UpdateMessage::Tick(start() + Duration::milliseconds(2999)))
            .unwrap();
        assert!(matches!(flow.phase(), UpdatePhase::Saved { .. }));

        flow.update(UpdateMessage::Tick(start() + Duration::seconds(3)))
            .unwrap();
        assert_eq!(flow.phase(), &UpdatePhase::Editing);
        assert!(flow.banner().is_none());
    }

    #[test]
    fn editing_while_saved_dismisses_banner() {
        let mut flow = loaded();
        let op = op_of(flow.update(UpdateMessage::Save).unwrap());
        flow.update(UpdateMessage::Completed {
            completion: Completion::Updated {
                op,
                result: Ok(update_seed()),
            },
            at: start(),
        })
        .unwrap();
        flow.update(UpdateMessage::SetField(FormField::Name, "New".into()))
            .unwrap();
        assert_eq!(flow.phase(), &UpdatePhase::Editing);
        assert!(flow.banner().is_none());
    }

    #[test]
    fn missing_record_leaves_flow_idle_with_error() {
        let mut flow = UpdateFlow::new(ValidationPolicy::default(), default_saved_banner());
        let id = SupplierId::parse("SUP-0404").unwrap();
        let op = op_of(flow.update(UpdateMessage::Load(id.clone())).unwrap());
        flow.update(UpdateMessage::Completed {
            completion: Completion::Fetched {
                op,
                result: Err(CoreError::NotFound(id)),
            },
            at: start(),
        })
        .unwrap();
        assert_eq!(flow.phase(), &UpdatePhase::Idle);
        assert!(flow.banner().is_some_and(Banner::is_error));
        assert_eq!(flow.update(UpdateMessage::Save), Err(FlowError::NotEditing));
    }

    #[test]
    fn invalid_draft_cannot_be_saved() {
        let mut flow = loaded();
        flow.update(UpdateMessage::SetField(FormField::CorporateId, "123".into()))
            .unwrap();
        assert!(matches!(
            flow.update(UpdateMessage::Save),
            Err(FlowError::Invalid(_))
        ));
        assert_eq!(flow.phase(), &UpdatePhase::Editing);
    }

    #[test]
    fn cancel_is_refused_while_saving() {
        let mut flow = loaded();
        flow.update(UpdateMessage::Save).unwrap();
        assert_eq!(flow.update(UpdateMessage::Cancel), Err(FlowError::Busy));
    }
}
