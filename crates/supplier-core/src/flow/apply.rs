//! Application (create) flow: Editing → Submitting → Submitted.

use supplier_domain::{SupplierDraft, SupplierId};
use tracing::{debug, info};

use super::{ignore_stale, Banner, Completion, FlowAction, OperationId, UpdateResult};
use crate::{
    error::FlowError,
    form::{FormField, FormTab, SupplierForm, ValidationPolicy},
};

/// Steps of the application stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    Input,
    Review,
    Complete,
}

impl ApplyStep {
    pub const ALL: [ApplyStep; 3] = [ApplyStep::Input, ApplyStep::Review, ApplyStep::Complete];

    pub fn index(self) -> usize {
        match self {
            ApplyStep::Input => 0,
            ApplyStep::Review => 1,
            ApplyStep::Complete => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplyStep::Input => "基本情報入力",
            ApplyStep::Review => "内容確認",
            ApplyStep::Complete => "申請完了",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPhase {
    Editing,
    SavingDraft { op: OperationId },
    Submitting { op: OperationId },
    /// Terminal. Only returning to the menu remains possible.
    Submitted { id: SupplierId, draft: SupplierDraft },
}

impl ApplyPhase {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ApplyPhase::SavingDraft { .. } | ApplyPhase::Submitting { .. }
        )
    }

    pub fn step(&self) -> ApplyStep {
        match self {
            ApplyPhase::Editing | ApplyPhase::SavingDraft { .. } => ApplyStep::Input,
            ApplyPhase::Submitting { .. } => ApplyStep::Review,
            ApplyPhase::Submitted { .. } => ApplyStep::Complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyMessage {
    SetField(FormField, String),
    SetRating(u8),
    SelectTab(FormTab),
    SaveDraft,
    Submit,
    Cancel,
    ReturnToMenu,
    DismissBanner,
    Completed(Completion),
}

/// State of the application screen.
#[derive(Debug, Clone)]
pub struct ApplyFlow {
    form: SupplierForm,
    phase: ApplyPhase,
    tab: FormTab,
    banner: Option<Banner>,
    drafts_saved: usize,
}

impl ApplyFlow {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            form: SupplierForm::for_apply(policy),
            phase: ApplyPhase::Editing,
            tab: FormTab::default(),
            banner: None,
            drafts_saved: 0,
        }
    }

    pub fn form(&self) -> &SupplierForm {
        &self.form
    }

    pub fn phase(&self) -> &ApplyPhase {
        &self.phase
    }

    pub fn tab(&self) -> FormTab {
        self.tab
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn step(&self) -> ApplyStep {
        self.phase.step()
    }

    pub fn drafts_saved(&self) -> usize {
        self.drafts_saved
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase == ApplyPhase::Editing && self.form.is_valid()
    }

    pub fn submitted_id(&self) -> Option<&SupplierId> {
        match &self.phase {
            ApplyPhase::Submitted { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn update(&mut self, message: ApplyMessage) -> Result<UpdateResult, FlowError> {
        match message {
            ApplyMessage::SetField(field, value) => {
                self.ensure_editable()?;
                self.form
                    .set_field(field, &value)
                    .map_err(|err| FlowError::Invalid(vec![err]))?;
                Ok(UpdateResult::none())
            }
            ApplyMessage::SetRating(value) => {
                self.ensure_editable()?;
                self.form
                    .set_rating(value)
                    .map_err(|err| FlowError::Invalid(vec![err]))?;
                Ok(UpdateResult::none())
            }
            ApplyMessage::SelectTab(tab) => {
                if matches!(self.phase, ApplyPhase::Submitted { .. }) {
                    return Err(FlowError::Finished);
                }
                self.tab = tab;
                Ok(UpdateResult::none())
            }
            ApplyMessage::SaveDraft => {
                self.ensure_editable()?;
                let op = OperationId::new();
                debug!(%op, "saving application draft");
                self.phase = ApplyPhase::SavingDraft { op };
                Ok(UpdateResult::action(FlowAction::SaveDraft {
                    op,
                    draft: self.form.draft().clone(),
                }))
            }
            ApplyMessage::Submit => {
                self.ensure_editable()?;
                let issues = self.form.issues();
                if !issues.is_empty() {
                    return Err(FlowError::Invalid(issues));
                }
                let op = OperationId::new();
                info!(%op, name = %self.form.draft().name, "submitting supplier application");
                self.banner = None;
                self.phase = ApplyPhase::Submitting { op };
                Ok(UpdateResult::action(FlowAction::Create {
                    op,
                    draft: self.form.draft().clone(),
                }))
            }
            ApplyMessage::Cancel => {
                self.ensure_editable()?;
                Ok(UpdateResult::action(FlowAction::NavigateBack))
            }
            ApplyMessage::ReturnToMenu => {
                if self.is_busy() {
                    return Err(FlowError::Busy);
                }
                Ok(UpdateResult::action(FlowAction::ReturnToMenu))
            }
            ApplyMessage::DismissBanner => {
                self.banner = None;
                Ok(UpdateResult::none())
            }
            ApplyMessage::Completed(completion) => Ok(self.complete(completion)),
        }
    }

    fn ensure_editable(&self) -> Result<(), FlowError> {
        match self.phase {
            ApplyPhase::Editing => Ok(()),
            ApplyPhase::SavingDraft { .. } | ApplyPhase::Submitting { .. } => Err(FlowError::Busy),
            ApplyPhase::Submitted { .. } => Err(FlowError::Finished),
        }
    }

    fn awaited(&self) -> Option<OperationId> {
        match self.phase {
            ApplyPhase::SavingDraft { op } | ApplyPhase::Submitting { op } => Some(op),
            _ => None,
        }
    }

    fn complete(&mut self, completion: Completion) -> UpdateResult {
        if self.awaited() != Some(completion.operation()) {
            return ignore_stale(&completion);
        }
        match completion {
            Completion::DraftSaved { result, .. } => {
                self.phase = ApplyPhase::Editing;
                match result {
                    Ok(()) => {
                        self.drafts_saved += 1;
                        self.banner = Some(Banner::Info("下書きを保存しました。".into()));
                    }
                    Err(err) => self.banner = Some(Banner::from_error(&err)),
                }
                UpdateResult::none()
            }
            Completion::Created { result, .. } => {
                match result {
                    Ok(id) => {
                        info!(%id, "supplier application accepted");
                        self.phase = ApplyPhase::Submitted {
                            id,
                            draft: self.form.draft().clone(),
                        };
                        self.banner = Some(Banner::Success("申請が完了しました".into()));
                    }
                    Err(err) => {
                        self.phase = ApplyPhase::Editing;
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

    fn filled() -> ApplyFlow {
        let mut flow = ApplyFlow::new(ValidationPolicy::default());
        flow.update(ApplyMessage::SetField(FormField::Name, "ACME".into()))
            .unwrap();
        flow.update(ApplyMessage::SetField(
            FormField::CorporateId,
            "1234567890123".into(),
        ))
        .unwrap();
        flow
    }

    fn started_op(result: &UpdateResult) -> OperationId {
        result
            .action
            .as_ref()
            .and_then(FlowAction::operation)
            .expect("transition starts an operation")
    }

    #[test]
    fn submit_is_refused_while_invalid() {
        let mut flow = ApplyFlow::new(ValidationPolicy::default());
        assert!(!flow.can_submit());
        let err = flow.update(ApplyMessage::Submit).unwrap_err();
        assert!(matches!(err, FlowError::Invalid(ref issues) if issues.len() == 2));
        assert_eq!(flow.phase(), &ApplyPhase::Editing);
    }

    #[test]
    fn submit_walks_through_steps() {
        let mut flow = filled();
        assert_eq!(flow.step(), ApplyStep::Input);
        let result = flow.update(ApplyMessage::Submit).unwrap();
        let op = started_op(&result);
        assert_eq!(flow.step(), ApplyStep::Review);
        assert!(flow.is_busy());

        let id = SupplierId::parse("SUP-0006").unwrap();
        flow.update(ApplyMessage::Completed(Completion::Created {
            op,
            result: Ok(id.clone()),
        }))
        .unwrap();
        assert_eq!(flow.step(), ApplyStep::Complete);
        assert_eq!(flow.submitted_id(), Some(&id));
    }

    #[test]
    fn edits_are_refused_while_busy_and_after_submit() {
        let mut flow = filled();
        let op = started_op(&flow.update(ApplyMessage::Submit).unwrap());
        assert_eq!(
            flow.update(ApplyMessage::SetField(FormField::Name, "X".into())),
            Err(FlowError::Busy)
        );
        assert_eq!(flow.update(ApplyMessage::Cancel), Err(FlowError::Busy));

        flow.update(ApplyMessage::Completed(Completion::Created {
            op,
            result: Ok(SupplierId::parse("SUP-0006").unwrap()),
        }))
        .unwrap();
        assert_eq!(flow.update(ApplyMessage::SetRating(2)), Err(FlowError::Finished));
        assert_eq!(flow.update(ApplyMessage::Submit), Err(FlowError::Finished));
        assert_eq!(
            flow.update(ApplyMessage::ReturnToMenu).unwrap().action,
            Some(FlowAction::ReturnToMenu)
        );
    }

    #[test]
    fn failed_submit_returns_to_editing_with_banner() {
        let mut flow = filled();
        let op = started_op(&flow.update(ApplyMessage::Submit).unwrap());
        flow.update(ApplyMessage::Completed(Completion::Created {
            op,
            result: Err(CoreError::TransientIo("timeout".into())),
        }))
        .unwrap();
        assert_eq!(flow.phase(), &ApplyPhase::Editing);
        let banner = flow.banner().expect("error banner");
        assert!(matches!(banner, Banner::Error { retryable: true, .. }));
        assert_eq!(flow.form().draft().name, "ACME");
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut flow = filled();
        flow.update(ApplyMessage::Submit).unwrap();
        flow.update(ApplyMessage::Completed(Completion::Created {
            op: OperationId::new(),
            result: Ok(SupplierId::parse("SUP-0099").unwrap()),
        }))
        .unwrap();
        assert!(matches!(flow.phase(), ApplyPhase::Submitting { .. }));
    }

    #[test]
    fn save_draft_returns_to_editing_without_touching_draft() {
        let mut flow = filled();
        let before = flow.form().draft().clone();
        let op = started_op(&flow.update(ApplyMessage::SaveDraft).unwrap());
        assert!(flow.is_busy());
        flow.update(ApplyMessage::Completed(Completion::DraftSaved { op, result: Ok(()) }))
            .unwrap();
        assert_eq!(flow.phase(), &ApplyPhase::Editing);
        assert_eq!(flow.form().draft(), &before);
        assert_eq!(flow.drafts_saved(), 1);
    }

    #[test]
    fn cancel_navigates_back_and_keeps_draft() {
        let mut flow = filled();
        let before = flow.form().draft().clone();
        let result = flow.update(ApplyMessage::Cancel).unwrap();
        assert_eq!(result.action, Some(FlowAction::NavigateBack));
        assert_eq!(flow.form().draft(), &before);
    }
}
