use supplier_core::{ListMessage, PageSize, Screen};
use supplier_domain::SupplierId;

use super::{require_args, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::{output, render};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "list",
            "Show a page of the supplier list",
            "list [page] [10|25|50]",
            cmd_list,
        ),
        CommandDefinition::new(
            "select",
            "Toggle the selection of a listed supplier",
            "select <id|all|none>",
            cmd_select,
        ),
        CommandDefinition::new(
            "view",
            "Show the details of a listed supplier",
            "view <id> [--json]",
            cmd_view,
        ),
        CommandDefinition::new(
            "edit",
            "Open the update form for a supplier",
            "edit [id]",
            cmd_edit,
        ),
    ]
}

/// Reads the 1-based page number and the optional page size.
fn parse_list_args(args: &[&str]) -> Result<(Option<usize>, Option<PageSize>), CommandError> {
    let page = args
        .first()
        .map(|raw| match raw.parse::<usize>() {
            Ok(page) if page >= 1 => Ok(page - 1),
            _ => Err(CommandError::InvalidArguments(format!(
                "page must be a number starting at 1, got `{raw}`"
            ))),
        })
        .transpose()?;
    let size = args
        .get(1)
        .map(|raw| {
            raw.parse::<usize>()
                .ok()
                .and_then(PageSize::from_len)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "page size must be 10, 25 or 50, got `{raw}`"
                    ))
                })
        })
        .transpose()?;
    Ok((page, size))
}

fn require_list_screen(context: &ShellContext) -> CommandResult {
    if *context.navigator.current() != Screen::List {
        return Err(CommandError::Unavailable(
            "この操作は一覧画面でのみ使用できます。`open list` で移動してください。".into(),
        ));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (page, size) = parse_list_args(args)?;
    let entering = *context.navigator.current() != Screen::List;
    if entering {
        context.navigator.navigate_to(Screen::List);
    }
    if entering || (page.is_none() && size.is_none()) {
        let query = context.search.carried_query();
        let result = context.list.update(ListMessage::Load(Some(query)))?;
        context.drive(result)?;
    }
    if let Some(size) = size {
        let result = context.list.update(ListMessage::SetPageSize(size))?;
        context.drive(result)?;
    }
    if let Some(page) = page {
        let result = context.list.update(ListMessage::SetPage(page))?;
        context.drive(result)?;
    }
    context.render_current();
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "select <id|all|none>")?;
    require_list_screen(context)?;
    match args[0].to_ascii_lowercase().as_str() {
        "none" => {
            context.list.update(ListMessage::ClearSelection)?;
        }
        "all" => {
            let unselected: Vec<SupplierId> = context
                .list
                .rows()
                .iter()
                .map(|row| row.id.clone())
                .filter(|id| !context.list.selection().contains(id))
                .collect();
            for id in unselected {
                context.list.update(ListMessage::Toggle(id))?;
            }
        }
        _ => {
            let id = SupplierId::parse(args[0])?;
            if context.list.detail(&id).is_none() {
                return Err(CommandError::InvalidArguments(format!(
                    "`{id}` is not on the current page"
                )));
            }
            context.list.update(ListMessage::Toggle(id))?;
        }
    }
    output::plain(render::stats(&context.list.stats()));
    Ok(())
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "view <id> [--json]")?;
    require_list_screen(context)?;
    let id = SupplierId::parse(args[0])?;
    let record = context.list.detail(&id).ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{id}` is not on the current page"))
    })?;
    if args.iter().skip(1).any(|arg| *arg == "--json") {
        output::plain(serde_json::to_string_pretty(record)?);
    } else {
        output::section(format!("調達先詳細 {}", record.id));
        output::plain(render::detail(record));
        output::info(format!("`edit {}` で編集します。", record.id));
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let message = match args.first() {
        Some(raw) => ListMessage::Edit(SupplierId::parse(raw)?),
        None => ListMessage::GoToUpdate,
    };
    let result = context.list.update(message)?;
    context.drive(result)
}
