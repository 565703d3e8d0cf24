use std::str::FromStr;

use supplier_core::{Screen, SearchMessage};
use supplier_domain::Country;

use super::CommandDefinition;
use crate::cli::context::{CommandError, CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "search",
            "Search suppliers by keyword and country",
            "search [keyword] [--country JP|US|CN|all]",
            cmd_search,
        ),
        CommandDefinition::new("clear", "Reset the search conditions", "clear", cmd_clear),
        CommandDefinition::new(
            "to-list",
            "Show the search conditions on the list screen",
            "to-list",
            cmd_to_list,
        ),
    ]
}

/// Splits `search` arguments into the keyword and an optional country filter.
/// `Some(None)` means the filter was explicitly reset with `all`.
fn parse_search_args(args: &[&str]) -> Result<(String, Option<Option<Country>>), CommandError> {
    let mut keyword = Vec::new();
    let mut country = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--country=") {
            country = Some(parse_country(value)?);
        } else if *arg == "--country" {
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments("`--country` needs a value".into())
            })?;
            country = Some(parse_country(value)?);
        } else {
            keyword.push(*arg);
        }
    }
    Ok((keyword.join(" "), country))
}

fn parse_country(value: &str) -> Result<Option<Country>, CommandError> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    Ok(Some(Country::from_str(value)?))
}

fn ensure_search_screen(context: &mut ShellContext) -> CommandResult {
    if *context.navigator.current() != Screen::Search {
        context.navigator.navigate_to(Screen::Search);
    }
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (keyword, country) = parse_search_args(args)?;
    ensure_search_screen(context)?;
    context
        .search
        .update(SearchMessage::SetKeyword(keyword))?;
    if let Some(country) = country {
        context.search.update(SearchMessage::SetCountry(country))?;
    }
    let result = context.search.update(SearchMessage::Search)?;
    context.drive(result)?;
    context.render_current();
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    ensure_search_screen(context)?;
    context.search.update(SearchMessage::Clear)?;
    context.render_current();
    Ok(())
}

fn cmd_to_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let result = context.search.update(SearchMessage::GoToList)?;
    context.drive(result)
}
