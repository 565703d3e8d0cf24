use supplier_config::Config;
use supplier_core::PageSize;

use super::CommandDefinition;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::{help, output};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "config",
            "View and change desk preferences",
            "config [show|path|set <key> <value>]",
            cmd_config,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

const CONFIG_KEYS: &str = "page-size|strict-corporate-id|color|saved-banner-ms";

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("show") => {
            output::section("Configuration");
            output::plain(serde_json::to_string_pretty(&context.config)?);
            Ok(())
        }
        Some("path") => {
            match context.store.as_ref() {
                Some(store) => output::info(store.config_path().display()),
                None => output::warning("Configuration is not backed by a file."),
            }
            Ok(())
        }
        Some("set") => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{CONFIG_KEYS}> <value>"
                )));
            }
            apply_setting(&mut context.config, args[1], &args[2..].join(" "))?;
            if let Some(store) = context.store.as_ref() {
                store.save(&context.config)?;
            }
            output::success(format!("Updated `{}`.", args[1]));
            output::info("Changes apply the next time the desk starts.");
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`"
        ))),
    }
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> CommandResult {
    let invalid = |expected: &str| {
        CommandError::InvalidArguments(format!("`{key}` expects {expected}, got `{value}`"))
    };
    match key.to_ascii_lowercase().replace('_', "-").as_str() {
        "page-size" => {
            let size = value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(PageSize::from_len)
                .ok_or_else(|| invalid("10, 25 or 50"))?;
            config.default_page_size = size.get();
        }
        "strict-corporate-id" => {
            config.strict_corporate_id = parse_flag(value).ok_or_else(|| invalid("on/off"))?;
        }
        "color" => {
            config.ui_color_enabled = parse_flag(value).ok_or_else(|| invalid("on/off"))?;
        }
        "saved-banner-ms" => {
            config.saved_banner_ms = value
                .trim()
                .parse()
                .map_err(|_| invalid("a number of milliseconds"))?;
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{key}` ({CONFIG_KEYS})"
            )))
        }
    }
    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Supplier Desk {}", meta.version));
    output::info(format!("  CLI version  : {}", build_info::CLI_VERSION));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
