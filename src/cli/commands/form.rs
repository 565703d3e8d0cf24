use std::str::FromStr;

use supplier_core::{
    ApplyMessage, FlowAction, FormField, FormTab, Screen, UpdateMessage, UpdateResult,
};

use super::{require_args, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "set",
            "Change a field of the open form",
            "set <name|corporate-id|country|email|rating> <value>",
            cmd_set,
        ),
        CommandDefinition::new(
            "tab",
            "Switch the form tab",
            "tab <basic|credit|contact>",
            cmd_tab,
        ),
        CommandDefinition::new(
            "save",
            "Save a draft (apply) or the changes (update)",
            "save",
            cmd_save,
        ),
        CommandDefinition::new("submit", "Submit the supplier application", "submit", cmd_submit),
        CommandDefinition::new("update", "Save the edited supplier", "update", cmd_update),
        CommandDefinition::new("cancel", "Leave the form without saving", "cancel", cmd_cancel),
        CommandDefinition::new("dismiss", "Hide the current notice", "dismiss", cmd_dismiss),
    ]
}

/// Form owned by the current screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormTarget {
    Apply,
    Update,
}

fn target(context: &ShellContext) -> Result<FormTarget, CommandError> {
    match context.navigator.current() {
        Screen::Apply => Ok(FormTarget::Apply),
        Screen::Update { .. } => Ok(FormTarget::Update),
        _ => Err(CommandError::Unavailable(
            "フォームが開かれていません。`open apply` または `open update` で移動してください。"
                .into(),
        )),
    }
}

/// Feeds one message to the flow behind the current form.
fn send(
    context: &mut ShellContext,
    apply: impl FnOnce() -> ApplyMessage,
    update: impl FnOnce() -> UpdateMessage,
) -> Result<UpdateResult, CommandError> {
    let result = match target(context)? {
        FormTarget::Apply => context.apply.update(apply())?,
        FormTarget::Update => context.update.update(update())?,
    };
    Ok(result)
}

fn drive_and_render(context: &mut ShellContext, result: UpdateResult) -> CommandResult {
    let navigates = matches!(
        result.action,
        Some(FlowAction::Navigate(_) | FlowAction::NavigateBack | FlowAction::ReturnToMenu)
    );
    context.drive(result)?;
    if !navigates {
        context.render_current();
    }
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "set <field> <value>")?;
    let field = FormField::from_str(args[0]).map_err(CommandError::InvalidArguments)?;
    let value = args[1..].join(" ");
    let result = send(
        context,
        || ApplyMessage::SetField(field, value.clone()),
        || UpdateMessage::SetField(field, value.clone()),
    )?;
    drive_and_render(context, result)
}

fn cmd_tab(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "tab <basic|credit|contact>")?;
    let tab = FormTab::from_str(args[0]).map_err(CommandError::InvalidArguments)?;
    let result = send(
        context,
        || ApplyMessage::SelectTab(tab),
        || UpdateMessage::SelectTab(tab),
    )?;
    drive_and_render(context, result)
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let result = send(context, || ApplyMessage::SaveDraft, || UpdateMessage::Save)?;
    drive_and_render(context, result)
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if target(context)? != FormTarget::Apply {
        return Err(CommandError::Unavailable(
            "申請は申請画面でのみ実行できます。更新画面では `update` を使用してください。".into(),
        ));
    }
    let result = context.apply.update(ApplyMessage::Submit)?;
    drive_and_render(context, result)
}

fn cmd_update(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if target(context)? != FormTarget::Update {
        return Err(CommandError::Unavailable(
            "更新は更新画面でのみ実行できます。申請画面では `submit` を使用してください。".into(),
        ));
    }
    let result = context.update.update(UpdateMessage::Save)?;
    drive_and_render(context, result)
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let result = send(context, || ApplyMessage::Cancel, || UpdateMessage::Cancel)?;
    drive_and_render(context, result)
}

fn cmd_dismiss(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let result = send(
        context,
        || ApplyMessage::DismissBanner,
        || UpdateMessage::DismissBanner,
    )?;
    drive_and_render(context, result)
}
