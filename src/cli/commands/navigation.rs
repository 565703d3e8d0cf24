use supplier_core::{MenuEntry, Screen};
use supplier_domain::SupplierId;

use super::{require_args, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("menu", "Return to the main menu", "menu", cmd_menu),
        CommandDefinition::new(
            "open",
            "Open a screen from the menu",
            "open <search|list|apply|update> [id]",
            cmd_open,
        ),
        CommandDefinition::new("back", "Go back to the previous screen", "back", cmd_back),
        CommandDefinition::new("show", "Redraw the current screen", "show", cmd_show),
        CommandDefinition::new(
            "tick",
            "Re-check timed notices against the clock",
            "tick",
            cmd_tick,
        ),
    ]
}

fn cmd_menu(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.apply.is_busy() || context.update.is_busy() {
        return Err(supplier_core::FlowError::Busy.into());
    }
    context.navigator.return_to_menu();
    context.enter_current()
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "open <search|list|apply|update> [id]")?;
    let entry = MenuEntry::find(args[0]).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown screen `{}` (search, list, apply, update)",
            args[0]
        ))
    })?;
    let screen = match (entry.screen, args.get(1)) {
        (Screen::Update { .. }, Some(raw)) => Screen::Update {
            id: Some(SupplierId::parse(raw)?),
        },
        (screen, _) => screen,
    };
    context.open(screen)
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.navigator.back();
    context.enter_current()
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.render_current();
    Ok(())
}

fn cmd_tick(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.tick();
    context.render_current();
    Ok(())
}
